use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "netcfg-audit", version)]
#[command(about = "Audit network device configurations against a YAML baseline")]
pub struct Cli {
    #[command(flatten)]
    pub log: LogArgs,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Check saved configuration files from a directory.
    Offline(OfflineArgs),
    /// Connect to devices over SSH and check their running configuration.
    Online(OnlineArgs),
}

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    /// File that receives a plain-text copy of the log.
    #[arg(long, default_value = "netcfg-audit.log", global = true)]
    pub log_file: PathBuf,
    /// Do not write a log file.
    #[arg(long, global = true)]
    pub no_log_file: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Baseline YAML with the rules to check.
    #[arg(short, long)]
    pub baseline: PathBuf,
    /// Only report failed checks.
    #[arg(short, long)]
    pub failed_only: bool,
    /// Write the JSON report to this file.
    #[arg(short, long)]
    pub report: Option<PathBuf>,
    /// Print results to stdout.
    #[arg(short, long)]
    pub print: bool,
    /// Output format used by --print.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Exit with an error when any check failed or any target could not be evaluated.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct OfflineArgs {
    /// Directory holding one configuration file per device.
    #[arg(short, long)]
    pub directory: PathBuf,
    #[command(flatten)]
    pub check: CheckArgs,
}

#[derive(Args, Debug)]
pub struct OnlineArgs {
    /// Connection inventory YAML.
    #[arg(short, long)]
    pub connections: PathBuf,
    #[command(flatten)]
    pub check: CheckArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
