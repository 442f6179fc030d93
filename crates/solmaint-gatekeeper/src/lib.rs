//! Solmaint Gatekeeper
//!
//! Validates extracted fields against a JSON schema before they reach the
//! extraction store.
//!
//! The Gatekeeper provides:
//! - Data cleaning (trimming, dropping empty values)
//! - Full JSON Schema validation through the `jsonschema` crate
//! - A full list of problems rather than the first one found
//!
//! # Examples
//!
//! ```no_run
//! use solmaint_gatekeeper::SchemaValidator;
//! use std::path::Path;
//!
//! let validator = SchemaValidator::load(Path::new("schemas/inverter_schema.json")).unwrap();
//! // let cleaned = validator.validate(&extracted.data)?;
//! ```

#![warn(missing_docs)]

mod error;
mod validator;

pub use error::GatekeeperError;
pub use validator::{
    validate_date_format, FieldViolation, SchemaValidator, ValidationReport, ROOT_FIELD,
};
