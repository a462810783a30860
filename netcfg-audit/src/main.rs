use anyhow::Result;
use clap::Parser;
use tracing::info;

mod check_cmd;
mod cli;
mod logging;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init(&cli.log)?;
    info!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Offline(args) => check_cmd::run_offline(args),
        Command::Online(args) => check_cmd::run_online(args),
    }
}
