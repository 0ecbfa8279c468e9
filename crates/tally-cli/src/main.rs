//! Tally CLI - ingest bank statement PDFs into a transactions store.

use clap::Parser;
use tally_cli::cli::RunArgs;
use tally_cli::commands;
use tally_cli::{Cli, Command, Formatter, Settings};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Secrets may live in ./.env; real environment variables win.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> tally_cli::Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(settings.output.format);

    // Determine color setting
    let color_enabled = !cli.no_color && settings.output.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command.unwrap_or(Command::Run(RunArgs::default())) {
        Command::Run(args) => commands::execute_run(args, settings, &formatter).await?,
        Command::Models => commands::execute_models(settings, &formatter).await?,
    }

    Ok(())
}
