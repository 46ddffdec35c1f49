use std::path::PathBuf;

use clap::Parser;

use dvcli::commands::Command;
use dvcli::config::Config;
use dvcli::error::ApiError;
use dvcli::logging;

#[derive(Parser)]
#[command(
    name = "dvcli",
    version,
    about = "Batch operations on a Dataverse repository."
)]
struct Cli {
    /// Configuration file (default: $DVCLI_CONFIG or the per-user config.yml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output, including every request and pause
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let path = Config::resolve_path(cli.config)?;
    let config = Config::load(&path)?;

    match cli.command.run(&config).await {
        Ok(_) => Ok(()),
        Err(e) => match e.downcast_ref::<ApiError>() {
            Some(api) => {
                eprintln!("{api}");
                std::process::exit(1);
            }
            None => Err(e),
        },
    }
}
