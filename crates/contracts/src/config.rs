//! PasteConfig - Config Loader output
//!
//! Describes pacing defaults, the conflict policy and the destinations the
//! host exposes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Config version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PasteConfig {
    #[serde(default)]
    pub version: ConfigVersion,

    /// Pacing and policy settings
    #[serde(default)]
    pub paste: PasteSettings,

    /// Destinations exposed by the host
    #[serde(default)]
    pub destinations: Vec<DestinationConfig>,
}

/// Pacing and policy settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasteSettings {
    /// Delay between two lines when `paste` is given none (ms)
    #[serde(default = "default_delay_ms")]
    pub default_delay_ms: u64,

    /// Lower bound for operator-supplied delays (ms)
    #[serde(default)]
    pub min_delay_ms: u64,

    /// What `start` does when the destination already has a job
    #[serde(default)]
    pub on_conflict: ConflictPolicy,

    /// Whether an empty source starts a zero-length paste
    #[serde(default = "default_allow_empty_source")]
    pub allow_empty_source: bool,

    /// Written instead of a line that is empty after trimming
    #[serde(default = "default_blank_line")]
    pub blank_line: String,
}

fn default_delay_ms() -> u64 {
    2500
}

fn default_allow_empty_source() -> bool {
    true
}

fn default_blank_line() -> String {
    " ".to_string()
}

impl Default for PasteSettings {
    fn default() -> Self {
        Self {
            default_delay_ms: default_delay_ms(),
            min_delay_ms: 0,
            on_conflict: ConflictPolicy::default(),
            allow_empty_source: default_allow_empty_source(),
            blank_line: default_blank_line(),
        }
    }
}

impl PasteSettings {
    pub fn default_delay(&self) -> Duration {
        Duration::from_millis(self.default_delay_ms)
    }
}

/// Start-on-busy-destination policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Report "already pasting", leave the running job untouched
    #[default]
    Reject,
    /// Cancel the running job and start the new one
    Replace,
}

/// Destination exposed by the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationConfig {
    /// Destination name (the channel part of its identity)
    pub name: String,

    /// Network the destination belongs to
    #[serde(default = "default_network")]
    pub network: String,

    /// Destination type
    pub kind: DestinationKind,

    /// Type-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

fn default_network() -> String {
    "local".to_string()
}

/// Destination type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationKind {
    /// Lines go to the log
    Log,
    /// Lines are appended to a file
    File,
    /// Lines are written to a TCP peer
    Tcp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = PasteSettings::default();
        assert_eq!(settings.default_delay(), Duration::from_millis(2500));
        assert_eq!(settings.on_conflict, ConflictPolicy::Reject);
        assert!(settings.allow_empty_source);
        assert_eq!(settings.blank_line, " ");
    }

    #[test]
    fn test_deserialize_partial() {
        let json = r#"{
            "paste": { "on_conflict": "replace" },
            "destinations": [{ "name": "notes", "kind": "file", "params": { "path": "/tmp/notes" } }]
        }"#;
        let config: PasteConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.paste.on_conflict, ConflictPolicy::Replace);
        assert_eq!(config.paste.default_delay_ms, 2500);
        assert_eq!(config.destinations[0].network, "local");
        assert_eq!(config.destinations[0].kind, DestinationKind::File);
    }
}
