//! Command line parsing for `sts-backup`.
//!
//! ```text
//! sts-backup [GLOBAL] elasticsearch <restore-snapshot|list-snapshots|list-indices|configure> [OPTIONS]
//! sts-backup version
//! ```
//!
//! Global flags are accepted anywhere on the line. Both `--flag value` and
//! `--flag=value` forms work.

use std::fmt;
use std::path::PathBuf;

use crate::constants::defaults::{CONFIG_PATH, SECRETS_PATH};
use crate::output::OutputFormat;

pub const USAGE: &str = "\
Backup and restore tool for SUSE Observability running on Kubernetes

Usage:
  sts-backup [GLOBAL OPTIONS] elasticsearch <COMMAND> [OPTIONS]
  sts-backup version

Commands:
  restore-snapshot   Restore Elasticsearch from a snapshot
  list-snapshots     List available Elasticsearch snapshots
  list-indices       List Elasticsearch indices
  configure          Configure the snapshot repository and SLM policy

Global options:
      --namespace <NS>      Kubernetes namespace (required)
      --kubeconfig <PATH>   Path to kubeconfig file (default: ~/.kube/config)
      --config <PATH>       Configuration file (default: config/main.toml)
      --secrets <PATH>      Secrets overlay file (default: config/secrets.toml)
      --debug               Enable debug output
  -q, --quiet               Only show errors and data output
  -o, --output <FORMAT>     Output format: table, json (default: table)
  -h, --help                Print help

restore-snapshot options:
  -s, --snapshot-name <NAME>  Snapshot to restore (required)
  -r, --drop-all-indices      Delete managed indices before restoring
      --yes                   Skip the deletion confirmation prompt
";

/// Options shared by every command, immutable once parsed
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalOptions {
    pub namespace: String,
    pub kubeconfig: Option<PathBuf>,
    pub config_path: PathBuf,
    pub secrets_path: PathBuf,
    pub debug: bool,
    pub quiet: bool,
    pub output: OutputFormat,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            kubeconfig: None,
            config_path: PathBuf::from(CONFIG_PATH),
            secrets_path: PathBuf::from(SECRETS_PATH),
            debug: false,
            quiet: false,
            output: OutputFormat::Table,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElasticsearchCommand {
    RestoreSnapshot {
        snapshot_name: String,
        drop_all_indices: bool,
        skip_confirmation: bool,
    },
    ListSnapshots,
    ListIndices,
    Configure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Version,
    Elasticsearch(ElasticsearchCommand),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cli {
    pub global: GlobalOptions,
    pub command: Command,
}

/// Invalid command line; the binary exits with code 2
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    pub message: String,
}

impl CliError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

#[derive(Default)]
struct RestoreFlags {
    snapshot_name: Option<String>,
    drop_all_indices: bool,
    skip_confirmation: bool,
}

impl RestoreFlags {
    fn any_set(&self) -> bool {
        self.snapshot_name.is_some() || self.drop_all_indices || self.skip_confirmation
    }
}

/// Parse `std::env::args()`, skipping the executable name
pub fn parse_args() -> Result<Cli, CliError> {
    parse_args_from(std::env::args().skip(1))
}

/// Parse arguments that do not include the executable name
pub fn parse_args_from<I>(args: I) -> Result<Cli, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut global = GlobalOptions::default();
    let mut namespace: Option<String> = None;
    let mut restore = RestoreFlags::default();
    let mut help = false;
    let mut positionals: Vec<String> = Vec::new();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };

        let mut value = |name: &str| -> Result<String, CliError> {
            match inline.clone().or_else(|| args.next()) {
                Some(v) if !v.is_empty() => Ok(v),
                _ => Err(CliError::new(format!("flag {} requires a value", name))),
            }
        };

        match flag.as_str() {
            "-h" | "--help" => help = true,
            "--namespace" => namespace = Some(value("--namespace")?),
            "--kubeconfig" => global.kubeconfig = Some(PathBuf::from(value("--kubeconfig")?)),
            "--config" => global.config_path = PathBuf::from(value("--config")?),
            "--secrets" => global.secrets_path = PathBuf::from(value("--secrets")?),
            "--debug" => global.debug = true,
            "-q" | "--quiet" => global.quiet = true,
            "-o" | "--output" => global.output = OutputFormat::parse_lenient(&value("--output")?),
            "-s" | "--snapshot-name" => restore.snapshot_name = Some(value("--snapshot-name")?),
            "-r" | "--drop-all-indices" => restore.drop_all_indices = true,
            "--yes" => restore.skip_confirmation = true,
            other if other.starts_with('-') && other.len() > 1 => {
                return Err(CliError::new(format!("unknown flag: {}", other)));
            }
            _ => positionals.push(arg),
        }
    }

    if help {
        return Ok(Cli {
            global,
            command: Command::Help,
        });
    }

    let command = match positionals.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] => Command::Help,
        ["version"] => Command::Version,
        ["elasticsearch"] => return Err(CliError::new("'elasticsearch' requires a command")),
        ["elasticsearch", sub] => Command::Elasticsearch(parse_elasticsearch(sub, &mut restore)?),
        ["elasticsearch", _, extra, ..] => {
            return Err(CliError::new(format!("unexpected argument: {}", extra)));
        }
        [other, ..] => return Err(CliError::new(format!("unknown command: {}", other))),
    };

    if restore.any_set() {
        return Err(CliError::new(
            "--snapshot-name, --drop-all-indices and --yes only apply to restore-snapshot",
        ));
    }

    if let Command::Elasticsearch(_) = command {
        global.namespace = namespace
            .ok_or_else(|| CliError::new("required flag \"namespace\" not set"))?;
    } else if let Some(ns) = namespace {
        global.namespace = ns;
    }

    Ok(Cli { global, command })
}

// Consumes the restore flags so the caller can reject them on other commands.
fn parse_elasticsearch(
    sub: &str,
    restore: &mut RestoreFlags,
) -> Result<ElasticsearchCommand, CliError> {
    match sub {
        "restore-snapshot" => {
            let flags = std::mem::take(restore);
            let snapshot_name = flags
                .snapshot_name
                .ok_or_else(|| CliError::new("required flag \"snapshot-name\" not set"))?;
            Ok(ElasticsearchCommand::RestoreSnapshot {
                snapshot_name,
                drop_all_indices: flags.drop_all_indices,
                skip_confirmation: flags.skip_confirmation,
            })
        }
        "list-snapshots" => Ok(ElasticsearchCommand::ListSnapshots),
        "list-indices" => Ok(ElasticsearchCommand::ListIndices),
        "configure" => Ok(ElasticsearchCommand::Configure),
        other => Err(CliError::new(format!(
            "unknown elasticsearch command: {}",
            other
        ))),
    }
}
