//! Solmaint CLI - Extract versioned inverter settings from solar maintenance PDFs.

use clap::Parser;
use solmaint_cli::commands;
use solmaint_cli::{logging, Cli, Command, Config, Formatter};
use tracing::debug;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> solmaint_cli::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // A missing .env file is normal
    if let Ok(path) = dotenvy::dotenv() {
        debug!(path = %path.display(), "Loaded .env");
    }

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_env();

    let format = cli.format.map(Into::into).unwrap_or(config.output.format);
    let color_enabled = !cli.no_color && config.output.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Process(args) => commands::execute_process(args, &config, &formatter).await,
        Command::History(args) => commands::execute_history(args, &config, &formatter),
        Command::Latest(args) => commands::execute_latest(args, &config, &formatter),
        Command::Show(args) => commands::execute_show(args, &config, &formatter),
        Command::Stats(args) => commands::execute_stats(args, &config, &formatter),
        Command::Export(args) => commands::execute_export(args, &config, &formatter),
    }
}
