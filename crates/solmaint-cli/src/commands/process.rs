//! Process command implementation.

use crate::cli::ProcessArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::pipeline::Pipeline;
use solmaint_extractor::FieldExtractor;
use solmaint_gatekeeper::SchemaValidator;
use solmaint_llm::anthropic::API_KEY_ENV;
use solmaint_llm::AnthropicProvider;
use solmaint_pdf::PdfProcessor;
use solmaint_store::JsonStore;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Directories and schema a process run works with, after flags are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessPlan {
    /// Directory scanned for PDFs
    pub input_dir: PathBuf,
    /// Store location
    pub output_dir: PathBuf,
    /// Schema file
    pub schema_path: PathBuf,
}

impl ProcessPlan {
    /// Merge command-line arguments over the configuration.
    pub fn resolve(args: &ProcessArgs, config: &Config) -> Result<Self> {
        let input_dir = args
            .input_dir
            .clone()
            .or_else(|| config.pipeline.input_dir.clone())
            .ok_or_else(|| {
                CliError::InvalidInput(
                    "--input-dir is required (or set pipeline.input_dir)".to_string(),
                )
            })?;
        let output_dir = args
            .output_dir
            .clone()
            .or_else(|| config.pipeline.output_dir.clone())
            .ok_or_else(|| {
                CliError::InvalidInput(
                    "--output-dir is required (or set pipeline.output_dir)".to_string(),
                )
            })?;
        let schema_path = args
            .schema
            .clone()
            .unwrap_or_else(|| config.pipeline.schema_path.clone());

        Ok(Self {
            input_dir,
            output_dir,
            schema_path,
        })
    }
}

/// Execute the process command.
pub async fn execute_process(
    args: ProcessArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let plan = ProcessPlan::resolve(&args, config)?;
    let model = args.model.unwrap_or_else(|| config.llm.model.clone());

    let api_key = config.llm.api_key.clone().ok_or_else(|| {
        CliError::Config(format!("{} environment variable is required", API_KEY_ENV))
    })?;

    let validator = SchemaValidator::load(&plan.schema_path)?;

    let provider = AnthropicProvider::new(api_key, model.clone())?
        .with_endpoint(config.llm.endpoint.clone())
        .with_max_tokens(config.llm.max_tokens)
        .with_max_retries(config.llm.max_retries)
        .with_timeout(Duration::from_secs(config.llm.timeout_secs))?;
    let extractor = FieldExtractor::new(provider, config.extractor.clone())?;

    let store = JsonStore::open(&plan.output_dir)?.with_model_name(model.clone());

    info!(
        input = %plan.input_dir.display(),
        output = %plan.output_dir.display(),
        model = %model,
        "Starting batch"
    );

    let mut pipeline = Pipeline::new(PdfProcessor::new(), extractor, validator, store);
    let summary = pipeline.process_directory(&plan.input_dir).await?;

    println!("{}", formatter.format_summary(&summary)?);

    if summary.all_succeeded() {
        Ok(())
    } else {
        Err(CliError::ProcessingFailed {
            failed: summary.failed_extractions,
            total: summary.processed_files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(input: Option<&str>, output: Option<&str>) -> ProcessArgs {
        ProcessArgs {
            input_dir: input.map(PathBuf::from),
            output_dir: output.map(PathBuf::from),
            schema: None,
            model: None,
        }
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        config.pipeline.input_dir = Some(PathBuf::from("from-config"));
        config.pipeline.output_dir = Some(PathBuf::from("out-config"));

        let plan = ProcessPlan::resolve(&args(Some("pdfs"), None), &config).unwrap();
        assert_eq!(plan.input_dir, PathBuf::from("pdfs"));
        assert_eq!(plan.output_dir, PathBuf::from("out-config"));
        assert_eq!(plan.schema_path, config.pipeline.schema_path);
    }

    #[test]
    fn test_missing_directories_rejected() {
        let config = Config::default();
        let result = ProcessPlan::resolve(&args(None, Some("out")), &config);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));

        let result = ProcessPlan::resolve(&args(Some("pdfs"), None), &config);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        let formatter = Formatter::new(crate::config::OutputFormat::Json, false);

        let result = execute_process(
            args(
                Some(dir.path().to_str().unwrap()),
                Some(dir.path().join("out").to_str().unwrap()),
            ),
            &config,
            &formatter,
        )
        .await;
        match result {
            Err(CliError::Config(msg)) => assert!(msg.contains("ANTHROPIC_API_KEY")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }
}
