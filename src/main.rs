use clap::Parser;
use pairsniper::adapter::inbound::cli::command::{Cli, Commands};
use pairsniper::adapter::inbound::cli::{check, clear, close, positions, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    // Both reqwest and tokio-tungstenite pull in rustls; pin the provider once.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Run(args) => run::execute(&cli.config, args).await?,
        Commands::Positions => positions::execute(&cli.config)?,
        Commands::Close(args) => close::execute(&cli.config, args).await?,
        Commands::Clear(args) => {
            if !args.yes {
                anyhow::bail!("refusing to clear the position ledger without --yes");
            }
            clear::execute(&cli.config)?;
        }
        Commands::Check => check::execute(&cli.config)?,
    }
    Ok(())
}
