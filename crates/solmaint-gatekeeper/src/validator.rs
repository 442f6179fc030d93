//! Schema validation of extracted fields

use crate::GatekeeperError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use jsonschema::error::ValidationErrorKind;
use jsonschema::{ValidationError, Validator};
use serde_json::Value;
use solmaint_domain::FieldMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{info, warn};

/// Field name used for violations that are not tied to one property
pub const ROOT_FIELD: &str = "(root)";

/// A rule violation for one field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    /// Offending field
    pub field: String,
    /// What was wrong with it
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Outcome of checking one data map against the schema
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Required fields that were absent or null
    pub missing: Vec<String>,

    /// Rule violations, in the order the schema reported them
    pub invalid: Vec<FieldViolation>,
}

impl ValidationReport {
    /// Whether the data passed every check
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }

    /// Human-readable messages, one per problem
    pub fn messages(&self) -> Vec<String> {
        self.missing
            .iter()
            .map(|field| format!("{}: is a required property", field))
            .chain(self.invalid.iter().map(ToString::to_string))
            .collect()
    }

    fn into_result(self, cleaned: FieldMap) -> Result<FieldMap, GatekeeperError> {
        if self.is_valid() {
            Ok(cleaned)
        } else {
            Err(GatekeeperError::SchemaViolation {
                missing: self.missing,
                invalid: self.invalid,
            })
        }
    }
}

/// Validates extracted data against a JSON schema
///
/// Every keyword of the schema's draft is enforced. The `date` and
/// `date-time` formats also accept naive ISO date-times, as extracted
/// documents rarely carry an offset.
pub struct SchemaValidator {
    schema: Value,
    required: Vec<String>,
    validator: Validator,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl SchemaValidator {
    /// Compile a parsed schema
    ///
    /// # Errors
    ///
    /// `InvalidSchema` if the value is not an object or is not a valid schema
    pub fn new(schema: Value) -> Result<Self, GatekeeperError> {
        if !schema.is_object() {
            return Err(GatekeeperError::InvalidSchema(
                "Schema must be a JSON object".to_string(),
            ));
        }

        let validator = jsonschema::options()
            .should_validate_formats(true)
            .with_format("date", is_date)
            .with_format("date-time", is_date_time)
            .build(&schema)
            .map_err(|e| GatekeeperError::InvalidSchema(e.to_string()))?;

        let required = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            schema,
            required,
            validator,
        })
    }

    /// Load a schema file
    ///
    /// # Errors
    ///
    /// - `SchemaNotFound` if the file does not exist
    /// - `InvalidSchema` if it is not valid JSON or not a valid schema
    pub fn load(path: &Path) -> Result<Self, GatekeeperError> {
        let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => GatekeeperError::SchemaNotFound(path.to_path_buf()),
            _ => GatekeeperError::InvalidSchema(format!("{}: {}", path.display(), e)),
        })?;

        let validator = Self::from_json_str(&raw)?;
        info!(path = %path.display(), "Loaded schema");
        Ok(validator)
    }

    /// Parse a schema from JSON text
    pub fn from_json_str(raw: &str) -> Result<Self, GatekeeperError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| GatekeeperError::InvalidSchema(format!("Invalid JSON: {}", e)))?;
        Self::new(value)
    }

    /// The loaded schema document
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Clean `data` and check it against the schema
    ///
    /// Returns the cleaned data on success. On failure every missing and
    /// invalid field is reported at once.
    pub fn validate(&self, data: &FieldMap) -> Result<FieldMap, GatekeeperError> {
        let cleaned = self.clean_data(data);
        let report = self.check(&cleaned);

        if report.is_valid() {
            info!(fields = cleaned.len(), "Data validation successful");
        } else {
            warn!(
                missing = report.missing.len(),
                invalid = report.invalid.len(),
                "Schema validation failed"
            );
        }
        report.into_result(cleaned)
    }

    /// Normalize values before validation
    ///
    /// Nulls and empty strings are dropped and strings are trimmed. Numbers
    /// pass through unchanged; any other type is dropped with a warning.
    pub fn clean_data(&self, data: &FieldMap) -> FieldMap {
        let mut cleaned = FieldMap::new();
        for (key, value) in data {
            match value {
                Value::Null => {}
                Value::String(s) => {
                    let trimmed = s.trim();
                    if !trimmed.is_empty() {
                        cleaned.insert(key.clone(), Value::String(trimmed.to_string()));
                    }
                }
                Value::Number(_) => {
                    cleaned.insert(key.clone(), value.clone());
                }
                other => {
                    warn!(
                        "Skipping field {} with unexpected type: {}",
                        key,
                        type_name(other)
                    );
                }
            }
        }
        cleaned
    }

    /// Check `data` as given, without cleaning
    pub fn check(&self, data: &FieldMap) -> ValidationReport {
        let instance = Value::Object(data.clone());
        let mut report = ValidationReport {
            missing: self.missing_fields(data),
            invalid: Vec::new(),
        };

        for error in self.validator.iter_errors(&instance) {
            let path = error.instance_path.to_string();
            match &error.kind {
                // Already listed in `missing`
                ValidationErrorKind::Required { .. } if path.is_empty() => {}
                ValidationErrorKind::AdditionalProperties { unexpected } if path.is_empty() => {
                    report
                        .invalid
                        .extend(unexpected.iter().map(|field| FieldViolation {
                            field: field.clone(),
                            message: "is not an allowed property".to_string(),
                        }));
                }
                _ => report.invalid.push(violation(&path, &error)),
            }
        }
        report
    }

    /// Required fields absent from `data` or set to null
    pub fn missing_fields(&self, data: &FieldMap) -> Vec<String> {
        self.required
            .iter()
            .filter(|field| data.get(field.as_str()).map_or(true, Value::is_null))
            .cloned()
            .collect()
    }

    /// Every problem with `data`, as messages
    pub fn validation_errors(&self, data: &FieldMap) -> Vec<String> {
        self.check(data).messages()
    }

    /// Whether `data` passes validation as given
    pub fn is_valid(&self, data: &FieldMap) -> bool {
        self.missing_fields(data).is_empty()
            && self.validator.is_valid(&Value::Object(data.clone()))
    }

    /// See [`validate_date_format`]
    pub fn validate_date_format(&self, date_string: &str) -> bool {
        validate_date_format(date_string)
    }
}

/// Attribute an error to the top-level property its instance path starts with
fn violation(path: &str, error: &ValidationError<'_>) -> FieldViolation {
    let field = path
        .trim_start_matches('/')
        .split('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .unwrap_or_else(|| ROOT_FIELD.to_string());

    FieldViolation {
        field,
        message: error.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

fn is_date_time(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}

/// Whether `date_string` is an ISO date-time or a `YYYY-MM-DD` date
///
/// Accepts RFC 3339 (`2024-01-01T00:00:00Z`, `2024-01-01T00:00:00+00:00`),
/// naive date-times (`2024-01-01T00:00:00`) and plain dates (`2024-01-01`).
///
/// # Examples
///
/// ```
/// use solmaint_gatekeeper::validate_date_format;
///
/// assert!(validate_date_format("2024-01-01T00:00:00Z"));
/// assert!(validate_date_format("2024-01-01"));
/// assert!(!validate_date_format("2024-13-01"));
/// ```
pub fn validate_date_format(date_string: &str) -> bool {
    is_date_time(date_string) || is_date(date_string)
}
