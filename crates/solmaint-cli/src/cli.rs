//! CLI command definitions and argument parsing.

use crate::config::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Solmaint - Extract versioned inverter settings from solar maintenance PDFs.
#[derive(Debug, Parser)]
#[command(name = "solmaint")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (defaults to ./solmaint.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Pretty-printed JSON (default)
    Json,
    /// Table format
    Table,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract, validate and store every PDF in a directory
    Process(ProcessArgs),

    /// Show every version extracted from one source file
    History(FileArgs),

    /// Show the newest version for one source file
    Latest(FileArgs),

    /// Show one extraction by id
    Show(ShowArgs),

    /// Summarize the store
    Stats(StoreArgs),

    /// Write the full audit trail to a file
    Export(ExportArgs),
}

/// Arguments for the process command.
#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Directory containing PDF files to process
    #[arg(short, long)]
    pub input_dir: Option<PathBuf>,

    /// Directory to save structured JSON files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Path to JSON schema file
    #[arg(short, long)]
    pub schema: Option<PathBuf>,

    /// Claude model to use
    #[arg(short, long)]
    pub model: Option<String>,
}

/// Location of an existing store.
#[derive(Debug, Args)]
pub struct StoreArgs {
    /// Store directory (defaults to pipeline.output_dir from the config)
    #[arg(short = 'd', long)]
    pub store_dir: Option<PathBuf>,
}

/// Arguments for commands keyed by source file.
#[derive(Debug, Args)]
pub struct FileArgs {
    /// Source file name as recorded (e.g. inverter.pdf)
    pub source_file: String,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Arguments for the show command.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Extraction id
    pub id: String,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Arguments for the export command.
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Destination file for the audit trail
    pub destination: PathBuf,

    #[command(flatten)]
    pub store: StoreArgs,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Json => OutputFormat::Json,
            CliFormat::Table => OutputFormat::Table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_command() {
        let cli = Cli::parse_from([
            "solmaint",
            "process",
            "--input-dir",
            "pdfs",
            "--output-dir",
            "out",
            "--model",
            "claude-3-haiku-20240307",
        ]);
        match cli.command {
            Command::Process(args) => {
                assert_eq!(args.input_dir, Some(PathBuf::from("pdfs")));
                assert_eq!(args.output_dir, Some(PathBuf::from("out")));
                assert!(args.schema.is_none());
                assert_eq!(args.model.as_deref(), Some("claude-3-haiku-20240307"));
            }
            _ => panic!("Expected Process command"),
        }
    }

    #[test]
    fn test_history_command_with_global_flags() {
        let cli = Cli::parse_from([
            "solmaint",
            "history",
            "inverter.pdf",
            "--store-dir",
            "out",
            "--format",
            "table",
            "-v",
        ]);
        assert!(cli.verbose);
        assert!(matches!(cli.format, Some(CliFormat::Table)));
        match cli.command {
            Command::History(args) => {
                assert_eq!(args.source_file, "inverter.pdf");
                assert_eq!(args.store.store_dir, Some(PathBuf::from("out")));
            }
            _ => panic!("Expected History command"),
        }
    }

    #[test]
    fn test_export_requires_destination() {
        assert!(Cli::try_parse_from(["solmaint", "export"]).is_err());
        let cli = Cli::parse_from(["solmaint", "export", "audit.json"]);
        assert!(matches!(cli.command, Command::Export(_)));
    }

    #[test]
    fn test_format_conversion() {
        let format: OutputFormat = CliFormat::Table.into();
        assert_eq!(format, OutputFormat::Table);
    }
}
