//! AA CLI - Command line tool for anticipatory-action forecast timelines.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "aa-cli",
    version,
    about = "Anticipatory-action timeline and validity toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: aa_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("Starting aa-cli");
    aa_cmd::run(cli.command)
}
