//! Gatekeeper error types

use crate::validator::FieldViolation;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during schema loading and validation
#[derive(Error, Debug)]
pub enum GatekeeperError {
    /// Schema file does not exist
    #[error("Schema file not found: {}", .0.display())]
    SchemaNotFound(PathBuf),

    /// Schema file is not a usable JSON schema
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Data failed validation
    #[error("Data doesn't match schema: {}", describe(.missing, .invalid))]
    SchemaViolation {
        /// Required fields that were absent
        missing: Vec<String>,
        /// Fields whose values broke a rule
        invalid: Vec<FieldViolation>,
    },
}

fn describe(missing: &[String], invalid: &[FieldViolation]) -> String {
    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("missing fields [{}]", missing.join(", ")));
    }
    if !invalid.is_empty() {
        let details: Vec<String> = invalid.iter().map(ToString::to_string).collect();
        parts.push(format!("invalid fields [{}]", details.join("; ")));
    }
    parts.join(", ")
}
