use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Source of an operator's answer to a yes/no prompt
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn read_answer(&self, prompt: &str) -> Result<String>;
}

/// Prompts on stderr and reads one line from stdin
pub struct StdinConfirmer;

#[async_trait]
impl Confirmer for StdinConfirmer {
    async fn read_answer(&self, prompt: &str) -> Result<String> {
        let mut stderr = tokio::io::stderr();
        stderr.write_all(prompt.as_bytes()).await?;
        stderr.flush().await?;

        let mut line = String::new();
        let read = BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .map_err(|e| anyhow!("failed to read confirmation: {}", e))?;

        if read == 0 {
            return Err(anyhow!("failed to read confirmation: stdin closed"));
        }
        Ok(line)
    }
}

/// Only `yes` and `y` count, ignoring case and surrounding whitespace.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "yes" | "y")
}
