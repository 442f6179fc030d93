//! Solmaint CLI library.
//!
//! Batch-processes inverter PDFs into versioned, schema-validated JSON records
//! and answers history and audit queries over the resulting store.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod pipeline;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use pipeline::{discover_pdfs, DocumentOutcome, OutcomeStatus, Pipeline, ProcessingSummary};
