//! Parse LLM output into extracted fields

use crate::error::ExtractorError;
use crate::types::{known_field, ExtractedFields};
use serde_json::Value;
use tracing::{debug, warn};

/// Key the model uses for unstructured findings
const EXTRAS_KEY: &str = "extras";

/// Extras key for an `extras` value that was not an object
const ADDITIONAL_INFO_KEY: &str = "additional_info";

/// Parse the LLM's JSON reply into `{data, extras}`
///
/// Known fields with non-null values go to `data`. The model's `extras`
/// object becomes `extras`, and any other non-null top-level key is added to
/// it unless `extras` already has that key.
pub fn parse_llm_response(response: &str) -> Result<ExtractedFields, ExtractorError> {
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(json_str)?;
    let Value::Object(object) = json else {
        return Err(ExtractorError::ExtractionFailure(
            "Expected a JSON object".to_string(),
        ));
    };

    let mut fields = ExtractedFields::default();
    let mut unknown = Vec::new();

    for (key, value) in object {
        if key == EXTRAS_KEY {
            match value {
                Value::Object(extras) => fields.extras.extend(extras),
                Value::Null => {}
                other => {
                    warn!("'extras' was not an object, keeping it as {}", ADDITIONAL_INFO_KEY);
                    fields.extras.insert(ADDITIONAL_INFO_KEY.to_string(), other);
                }
            }
        } else if known_field(&key).is_some() {
            if !value.is_null() {
                fields.data.insert(key, value);
            }
        } else if !value.is_null() {
            unknown.push((key, value));
        }
    }

    // Explicit extras win over stray top-level keys
    for (key, value) in unknown {
        if fields.extras.contains_key(&key) {
            debug!(key = %key, "Dropping top-level key shadowed by extras");
            continue;
        }
        debug!(key = %key, "Moving unknown field to extras");
        fields.extras.insert(key, value);
    }

    Ok(fields)
}

/// Extract JSON from response, handling markdown code fences
fn extract_json(response: &str) -> Result<&str, ExtractorError> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(ExtractorError::ExtractionFailure(
            "Empty response".to_string(),
        ));
    }

    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let body = without_open.strip_suffix("```").unwrap_or(without_open).trim();

    if body.is_empty() {
        return Err(ExtractorError::ExtractionFailure(
            "Empty code block".to_string(),
        ));
    }
    Ok(body)
}
