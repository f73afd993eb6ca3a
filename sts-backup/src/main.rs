use anyhow::Result;
use std::process::ExitCode;
use tracing::{debug, error};

use sts_backup::cli::{self, Command, ElasticsearchCommand, GlobalOptions, USAGE};
use sts_backup::logging::{init_tracing, Verbosity};
use sts_backup::operations::{
    configure, list_indices, list_snapshots, restore_snapshot, CommandContext,
};
use sts_backup::{ConfigManager, RestoreRequest};

const USAGE_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match cli::parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!();
            eprint!("{}", USAGE);
            return ExitCode::from(USAGE_ERROR);
        }
    };

    let command = match cli.command {
        Command::Help => {
            print!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Command::Version => {
            println!("sts-backup {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Command::Elasticsearch(command) => command,
    };

    if let Err(e) = init_tracing(Verbosity::from_flags(cli.global.debug, cli.global.quiet)) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli.global, command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(global: GlobalOptions, command: ElasticsearchCommand) -> Result<()> {
    debug!("Loading configuration from {}", global.config_path.display());
    let config_manager = ConfigManager::new(&global.config_path, &global.secrets_path).await?;
    let ctx = CommandContext::new(global, config_manager.get_current_config());

    match command {
        ElasticsearchCommand::RestoreSnapshot {
            snapshot_name,
            drop_all_indices,
            skip_confirmation,
        } => {
            let request = RestoreRequest {
                snapshot_name,
                drop_all_indices,
                skip_confirmation,
            };
            restore_snapshot::execute(&ctx, request).await
        }
        ElasticsearchCommand::ListSnapshots => list_snapshots::execute(&ctx).await,
        ElasticsearchCommand::ListIndices => list_indices::execute(&ctx).await,
        ElasticsearchCommand::Configure => configure::execute(&ctx).await,
    }
}
