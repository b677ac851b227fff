//! Config command - View and validate cardsync configuration
//!
//! Provides the `cardsync config` CLI command which:
//! 1. Shows the effective configuration (YAML or JSON)
//! 2. Validates the configuration file and reports errors

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::info;

use cardsync_core::config::{Config, ValidationError};

use crate::output::{get_formatter, OutputFormat, OutputFormatter};

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,
    /// Validate configuration file
    Validate,
}

impl ConfigCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<ExitCode> {
        match self {
            ConfigCommand::Show => execute_show(config_path, format),
            ConfigCommand::Validate => Ok(if execute_validate(config_path, format)? {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }),
        }
    }
}

fn execute_show(config_path: &Path, format: OutputFormat) -> Result<ExitCode> {
    let formatter = get_formatter(format);
    let config = Config::load_or_default(config_path);

    info!(config_path = %config_path.display(), "Showing configuration");

    if format.is_json() {
        let json =
            serde_json::to_value(&config).context("Failed to serialize configuration to JSON")?;
        formatter.print_json(&json);
    } else {
        formatter.success(&format!("Configuration ({})", config_path.display()));
        if !config_path.exists() {
            formatter.info("(file not found, showing defaults)");
        }
        formatter.info("");
        let yaml =
            serde_yaml::to_string(&config).context("Failed to serialize configuration to YAML")?;
        for line in yaml.lines() {
            formatter.info(line);
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Returns whether the file exists, parses and passes validation
fn execute_validate(config_path: &Path, format: OutputFormat) -> Result<bool> {
    let formatter = get_formatter(format);

    if !config_path.exists() {
        report(
            formatter.as_ref(),
            format,
            config_path,
            &["Configuration file not found. Using defaults.".to_string()],
        );
        return Ok(false);
    }

    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            report(
                formatter.as_ref(),
                format,
                config_path,
                &[format!("Failed to parse configuration: {e}")],
            );
            return Ok(false);
        }
    };

    info!(config_path = %config_path.display(), "Validating configuration");

    let errors: Vec<String> = config.validate().iter().map(ValidationError::to_string).collect();
    report(formatter.as_ref(), format, config_path, &errors);
    Ok(errors.is_empty())
}

fn report(formatter: &dyn OutputFormatter, format: OutputFormat, path: &Path, errors: &[String]) {
    if format.is_json() {
        formatter.print_json(&serde_json::json!({
            "valid": errors.is_empty(),
            "config_path": path.display().to_string(),
            "errors": errors,
        }));
    } else if errors.is_empty() {
        formatter.success("Configuration is valid");
        formatter.info(&format!("File: {}", path.display()));
    } else {
        formatter.error(&format!(
            "Configuration has {} error{}:",
            errors.len(),
            if errors.len() == 1 { "" } else { "s" }
        ));
        formatter.info(&format!("File: {}", path.display()));
        formatter.info("");
        for error in errors {
            formatter.info(&format!("  {error}"));
        }
    }
}
