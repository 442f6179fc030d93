//! Field catalogue and extraction result types

use serde::{Deserialize, Serialize};
use solmaint_domain::FieldMap;

/// Shape of a value the model is asked to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text
    Text,
    /// JSON number
    Number,
    /// ISO 8601 date-time string
    DateTime,
    /// ISO 8601 date string
    Date,
}

impl FieldKind {
    /// Placeholder shown in the prompt's return format
    pub fn placeholder(self) -> &'static str {
        match self {
            FieldKind::Text => "\"string or null\"",
            FieldKind::Number => "number or null",
            FieldKind::DateTime => "\"ISO date-time string or null\"",
            FieldKind::Date => "\"ISO date string or null\"",
        }
    }
}

/// One field the extractor knows how to ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Key in the extracted data
    pub name: &'static str,
    /// Human description given to the model
    pub description: &'static str,
    /// Expected value shape
    pub kind: FieldKind,
    /// Whether a document without it is incomplete
    pub required: bool,
}

const fn field(
    name: &'static str,
    description: &'static str,
    kind: FieldKind,
    required: bool,
) -> FieldSpec {
    FieldSpec {
        name,
        description,
        kind,
        required,
    }
}

/// Fields extracted from inverter maintenance documents
pub const INVERTER_FIELDS: &[FieldSpec] = &[
    field("supplier_name", "Name of the supplier/manufacturer", FieldKind::Text, true),
    field("product_code", "Product code or model number of the inverter", FieldKind::Text, true),
    field("description", "Description of the inverter product", FieldKind::Text, true),
    field("startup_voltage", "Startup voltage setting in volts (e.g., \"150V\")", FieldKind::Text, true),
    field("firmware_version", "Firmware version number (e.g., \"v2.1.4\")", FieldKind::Text, true),
    field("valid_from", "Start date and time when settings were active (ISO format)", FieldKind::DateTime, true),
    field("valid_to", "End date and time when settings were active (ISO format)", FieldKind::DateTime, true),
    field("unit_price", "Price per unit (optional)", FieldKind::Number, false),
    field("currency", "Currency code for the price (optional)", FieldKind::Text, false),
    field("effective_date", "Date when pricing/configuration became effective (optional)", FieldKind::Date, false),
];

/// Look up a known field by name
pub fn known_field(name: &str) -> Option<&'static FieldSpec> {
    INVERTER_FIELDS.iter().find(|spec| spec.name == name)
}

/// Names of the fields a complete extraction must carry
pub fn required_fields() -> impl Iterator<Item = &'static str> {
    INVERTER_FIELDS
        .iter()
        .filter(|spec| spec.required)
        .map(|spec| spec.name)
}

/// Structured output of one extraction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    /// Known fields with non-null values
    pub data: FieldMap,

    /// Everything else the model reported
    #[serde(default)]
    pub extras: FieldMap,
}

impl ExtractedFields {
    /// Required fields absent from `data`
    pub fn missing_required(&self) -> Vec<&'static str> {
        required_fields()
            .filter(|name| self.data.get(*name).map_or(true, |v| v.is_null()))
            .collect()
    }
}

/// Fields plus provenance of a single extraction
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted fields
    pub fields: ExtractedFields,

    /// Metadata about the extraction
    pub metadata: ExtractionMetadata,
}

/// Metadata about an extraction operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMetadata {
    /// Model used for extraction
    pub model_name: String,

    /// Length of the document text in characters
    pub text_length: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_fields() {
        let required: Vec<_> = required_fields().collect();
        assert_eq!(
            required,
            [
                "supplier_name",
                "product_code",
                "description",
                "startup_voltage",
                "firmware_version",
                "valid_from",
                "valid_to"
            ]
        );
    }

    #[test]
    fn test_known_field_lookup() {
        assert_eq!(known_field("unit_price").map(|s| s.kind), Some(FieldKind::Number));
        assert!(!known_field("unit_price").unwrap().required);
        assert!(known_field("warranty_years").is_none());
    }

    #[test]
    fn test_missing_required() {
        let mut fields = ExtractedFields::default();
        assert_eq!(fields.missing_required().len(), 7);

        fields.data.insert("supplier_name".into(), json!("SolarTech Inc"));
        fields.data.insert("product_code".into(), json!(null));
        let missing = fields.missing_required();
        assert!(!missing.contains(&"supplier_name"));
        assert!(missing.contains(&"product_code"));
        assert_eq!(missing.len(), 6);
    }
}
