use anyhow::Result;
use serde_json::{Map, Value};
use std::io::Write;

const COLUMN_PADDING: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl OutputFormat {
    /// Unknown names fall back to `Table`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Table,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

/// Renders command results on stdout (or any writer) as text or JSON
pub struct Formatter<W: Write> {
    writer: W,
    format: OutputFormat,
}

impl Formatter<std::io::Stdout> {
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(std::io::stdout(), format)
    }
}

impl<W: Write> Formatter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self { writer, format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn print_table(&mut self, table: &Table) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.print_json(table),
            OutputFormat::Table if table.rows.is_empty() => {
                writeln!(self.writer, "No data found")?;
                Ok(())
            }
            OutputFormat::Table => self.print_aligned(table),
        }
    }

    /// Plain text line, dropped in JSON mode
    pub fn print_message(&mut self, message: &str) -> Result<()> {
        if self.format == OutputFormat::Table {
            writeln!(self.writer, "{}", message)?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn print_aligned(&mut self, table: &Table) -> Result<()> {
        let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
        for row in &table.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(i) {
                    Some(width) => *width = (*width).max(len),
                    None => widths.push(len),
                }
            }
        }

        write_row(&mut self.writer, &table.headers, &widths)?;
        for row in &table.rows {
            write_row(&mut self.writer, row, &widths)?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn print_json(&mut self, table: &Table) -> Result<()> {
        let items: Vec<Value> = table
            .rows
            .iter()
            .map(|row| {
                let object: Map<String, Value> = table
                    .headers
                    .iter()
                    .zip(row.iter())
                    .map(|(header, cell)| (header.clone(), Value::String(cell.clone())))
                    .collect();
                Value::Object(object)
            })
            .collect();

        let rendered = serde_json::to_string_pretty(&items)?;
        writeln!(self.writer, "{}", rendered)?;
        self.writer.flush()?;
        Ok(())
    }
}

// Last cell is written without trailing padding.
fn write_row<W: Write>(writer: &mut W, cells: &[String], widths: &[usize]) -> Result<()> {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i + 1 == cells.len() {
            line.push_str(cell);
        } else {
            let width = widths.get(i).copied().unwrap_or(0) + COLUMN_PADDING;
            line.push_str(&format!("{:<width$}", cell, width = width));
        }
    }
    writeln!(writer, "{}", line)?;
    Ok(())
}
