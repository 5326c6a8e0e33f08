//! Handler for the `run` command.

use std::path::Path;

use tracing::info;

use crate::adapter::inbound::cli::command::RunArgs;
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::infrastructure::runtime;

/// Execute the run command.
pub async fn execute(config_path: &Path, args: &RunArgs) -> Result<()> {
    let mut config = Config::load(config_path)?;
    if args.dry_run {
        config.dry_run = true;
    }
    config.init_logging();
    info!(config = %config_path.display(), "pairsniper starting");

    runtime::run(config).await?;

    info!("pairsniper stopped");
    Ok(())
}
