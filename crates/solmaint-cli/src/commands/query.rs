//! Read-only commands over an existing store.

use crate::cli::{ExportArgs, FileArgs, ShowArgs, StoreArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use solmaint_domain::traits::ExtractionStore;
use solmaint_store::JsonStore;
use std::path::PathBuf;

/// Store directory from `--store-dir`, else `pipeline.output_dir`.
pub fn resolve_store_dir(args: &StoreArgs, config: &Config) -> Result<PathBuf> {
    args.store_dir
        .clone()
        .or_else(|| config.pipeline.output_dir.clone())
        .ok_or_else(|| {
            CliError::InvalidInput(
                "--store-dir is required (or set pipeline.output_dir)".to_string(),
            )
        })
}

/// Open an existing store; a missing directory is reported, not created.
fn open_store(args: &StoreArgs, config: &Config) -> Result<JsonStore> {
    let dir = resolve_store_dir(args, config)?;
    if !dir.is_dir() {
        return Err(CliError::NotFound(format!(
            "Store directory {} does not exist",
            dir.display()
        )));
    }
    Ok(JsonStore::open(dir)?)
}

/// Execute the history command. An unknown file prints an empty list.
pub fn execute_history(args: FileArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let store = open_store(&args.store, config)?;
    let history = store.get_extraction_history(&args.source_file);
    println!("{}", formatter.format_records(&history)?);
    Ok(())
}

/// Execute the latest command.
pub fn execute_latest(args: FileArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let store = open_store(&args.store, config)?;
    let record = store.get_latest_extraction(&args.source_file).ok_or_else(|| {
        CliError::NotFound(format!("No extractions for {}", args.source_file))
    })?;
    println!("{}", formatter.format_record(record)?);
    Ok(())
}

/// Execute the show command.
pub fn execute_show(args: ShowArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let store = open_store(&args.store, config)?;
    let record = store
        .get_extraction_by_id(&args.id)
        .ok_or_else(|| CliError::NotFound(format!("No extraction with id {}", args.id)))?;
    println!("{}", formatter.format_record(record)?);
    Ok(())
}

/// Execute the stats command.
pub fn execute_stats(args: StoreArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let store = open_store(&args, config)?;
    println!("{}", formatter.format_statistics(&store.get_statistics())?);
    Ok(())
}

/// Execute the export command.
pub fn execute_export(args: ExportArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let store = open_store(&args.store, config)?;
    store.export_audit_trail(&args.destination)?;
    println!(
        "{}",
        formatter.success(&format!(
            "Exported {} extraction(s) to {}",
            store.len(),
            args.destination.display()
        ))
    );
    Ok(())
}
