//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::{ConflictPolicy, PasteConfig};

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    default_delay_ms: u64,
    min_delay_ms: u64,
    on_conflict: ConflictPolicy,
    allow_empty_source: bool,
    destinations: Vec<String>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", config.version),
                    default_delay_ms: config.paste.default_delay_ms,
                    min_delay_ms: config.paste.min_delay_ms,
                    on_conflict: config.paste.on_conflict,
                    allow_empty_source: config.paste.allow_empty_source,
                    destinations: config
                        .destinations
                        .iter()
                        .map(|d| format!("{} ({:?}, {})", d.name, d.kind, d.network))
                        .collect(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Non-fatal issues
fn collect_warnings(config: &PasteConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.destinations.is_empty() {
        warnings.push("No destinations configured - pastes go to the log".to_string());
    }

    if config.paste.default_delay_ms < 500 {
        warnings.push(format!(
            "paste.default_delay_ms = {} - most chat hosts throttle faster senders",
            config.paste.default_delay_ms
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Default delay: {}ms", summary.default_delay_ms);
            println!("  Minimum delay: {}ms", summary.min_delay_ms);
            println!("  On conflict: {:?}", summary.on_conflict);
            println!("  Empty sources: {}", if summary.allow_empty_source { "allowed" } else { "rejected" });
            println!("  Destinations ({}):", summary.destinations.len());
            for destination in &summary.destinations {
                println!("    - {}", destination);
            }
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
