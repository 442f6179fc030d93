//! LLM prompt construction for field extraction

use crate::types::{FieldSpec, INVERTER_FIELDS};

/// Builds prompts for the LLM to extract document fields
pub struct PromptBuilder<'a> {
    text: &'a str,
    fields: &'a [FieldSpec],
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder over the inverter field catalogue
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            fields: INVERTER_FIELDS,
        }
    }

    /// Ask for a different set of fields
    pub fn with_fields(mut self, fields: &'a [FieldSpec]) -> Self {
        self.fields = fields;
        self
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Field list
        prompt.push_str("Please extract the following fields from the solar maintenance document:\n\n");
        for spec in self.fields {
            prompt.push_str(&format!("- {}: {}\n", spec.name, spec.description));
        }
        prompt.push('\n');

        // 2. Domain context
        prompt.push_str(DOMAIN_CONTEXT);
        prompt.push_str("\n\n");

        // 3. Instructions and the text to analyze
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\nDocument text:\n---\n");
        prompt.push_str(self.text);
        prompt.push_str("\n---\n\n");

        // 4. Output format
        prompt.push_str(&self.return_format());
        prompt
    }

    fn return_format(&self) -> String {
        let mut format = String::from("Return format:\n{\n");
        for spec in self.fields {
            format.push_str(&format!("  \"{}\": {},\n", spec.name, spec.kind.placeholder()));
        }
        format.push_str("  \"extras\": {\n    \"additional_fields\": \"any other relevant information\"\n  }\n}");
        format
    }
}

const DOMAIN_CONTEXT: &str = r#"Important context:
- Inverters convert DC electricity from solar panels to AC electricity
- Startup voltage determines when solar panels turn on in the morning
- Firmware version controls inverter parameters/settings
- Valid from/to dates are crucial for audit trails and root cause analysis"#;

const EXTRACTION_INSTRUCTIONS: &str = r#"Analyze the following solar maintenance document and extract the fields above.
Return ONLY a valid JSON object with the extracted data. If a field is not found,
use null for that field. Include any additional relevant information in an "extras" object."#;
