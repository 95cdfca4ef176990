//! Config validation
//!
//! Rules:
//! - destination names non-empty and unique per network
//! - `file` destinations carry `path`, `tcp` destinations carry a parseable `addr`
//! - `blank_line` non-empty (hosts refuse empty messages)
//! - `default_delay_ms` >= `min_delay_ms`

use std::collections::HashSet;
use std::net::SocketAddr;

use contracts::{DestinationKind, PasteConfig, PasteError};

/// Validate a PasteConfig
///
/// Returns the first error encountered.
pub fn validate(config: &PasteConfig) -> Result<(), PasteError> {
    validate_settings(config)?;
    validate_destination_names(config)?;
    validate_destination_params(config)?;
    Ok(())
}

fn validate_settings(config: &PasteConfig) -> Result<(), PasteError> {
    let paste = &config.paste;

    if paste.default_delay_ms < paste.min_delay_ms {
        return Err(PasteError::config_validation(
            "paste.default_delay_ms",
            format!(
                "default_delay_ms ({}) must be >= min_delay_ms ({})",
                paste.default_delay_ms, paste.min_delay_ms
            ),
        ));
    }

    if paste.blank_line.is_empty() {
        return Err(PasteError::config_validation(
            "paste.blank_line",
            "blank_line cannot be empty",
        ));
    }

    Ok(())
}

fn validate_destination_names(config: &PasteConfig) -> Result<(), PasteError> {
    let mut seen = HashSet::new();
    for (idx, dest) in config.destinations.iter().enumerate() {
        if dest.name.is_empty() {
            return Err(PasteError::config_validation(
                format!("destinations[{}].name", idx),
                "destination name cannot be empty",
            ));
        }
        if !seen.insert((dest.network.as_str(), dest.name.as_str())) {
            return Err(PasteError::config_validation(
                format!("destinations[name={}]", dest.name),
                "duplicate destination name",
            ));
        }
    }
    Ok(())
}

fn validate_destination_params(config: &PasteConfig) -> Result<(), PasteError> {
    for dest in &config.destinations {
        match dest.kind {
            DestinationKind::Log => {}
            DestinationKind::File => {
                if !dest.params.contains_key("path") {
                    return Err(PasteError::config_validation(
                        format!("destinations[{}].params.path", dest.name),
                        "file destination requires 'path'",
                    ));
                }
            }
            DestinationKind::Tcp => {
                let addr = dest.params.get("addr").ok_or_else(|| {
                    PasteError::config_validation(
                        format!("destinations[{}].params.addr", dest.name),
                        "tcp destination requires 'addr'",
                    )
                })?;
                addr.parse::<SocketAddr>().map_err(|e| {
                    PasteError::config_validation(
                        format!("destinations[{}].params.addr", dest.name),
                        format!("invalid address '{}': {}", addr, e),
                    )
                })?;
            }
        }
    }
    Ok(())
}
