//! # Export Settings
//!
//! Configuration for one export: the document namespace, the target file,
//! output formatting, and the prefixes used to build record names.
//! Settings serialize to JSON so they can be kept next to a model.
//!
//! ## Example
//!
//! ```rust
//! use xchg_core::settings::ExportSettings;
//!
//! let settings = ExportSettings::from_json_str(r#"{ "indent": 0, "prefixes": { "node": "K" } }"#).unwrap();
//! assert_eq!(settings.indent, 0);
//! assert_eq!(settings.prefixes.node, "K");
//! // Unspecified fields keep their defaults
//! assert_eq!(settings.prefixes.load_group, "LG");
//! assert!(settings.validate);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ExportError, ExportResult};

/// Namespace declared on the document root
pub const DEFAULT_NAMESPACE: &str = "http://www.scia.cz";

/// File name used when no target is given
pub const DEFAULT_TARGET_FILE: &str = "model.xml";

/// Settings for a single export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportSettings {
    /// Namespace URI written as `xmlns` on the root element
    pub namespace_uri: String,

    /// File name the document is written to
    pub target_file_name: String,

    /// Spaces per nesting level (0 = single line)
    pub indent: usize,

    /// Run fail-fast invariant checks (unique ids, references) before writing
    pub validate: bool,

    /// Prefixes for generated record names
    pub prefixes: NamePrefixes,
}

impl Default for ExportSettings {
    fn default() -> Self {
        ExportSettings {
            namespace_uri: DEFAULT_NAMESPACE.to_string(),
            target_file_name: DEFAULT_TARGET_FILE.to_string(),
            indent: 2,
            validate: true,
            prefixes: NamePrefixes::default(),
        }
    }
}

impl ExportSettings {
    /// Parse settings from JSON, rejecting unknown fields.
    pub fn from_json_str(json: &str) -> ExportResult<Self> {
        serde_json::from_str(json).map_err(|e| ExportError::serialization(format!("Invalid settings: {}", e)))
    }
}

/// Prefixes joined with a domain key to name records (`N` + 12 = `N12`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamePrefixes {
    pub node: String,
    pub face: String,
    pub support: String,
    pub load_group: String,
    pub point_load: String,
    pub surface_load: String,
}

impl Default for NamePrefixes {
    fn default() -> Self {
        NamePrefixes {
            node: "N".to_string(),
            face: "F".to_string(),
            support: "Sn".to_string(),
            load_group: "LG".to_string(),
            point_load: "PF".to_string(),
            surface_load: "SF".to_string(),
        }
    }
}

/// Build a record name from a prefix and key
pub fn record_name(prefix: &str, key: impl std::fmt::Display) -> String {
    format!("{}{}", prefix, key)
}

/// Load settings from a JSON file.
pub fn load_settings(path: &Path) -> ExportResult<ExportSettings> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ExportError::file_error("read settings", path.display().to_string(), e.to_string()))?;
    ExportSettings::from_json_str(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ExportSettings::default();
        assert_eq!(settings.namespace_uri, DEFAULT_NAMESPACE);
        assert_eq!(settings.target_file_name, "model.xml");
        assert_eq!(settings.prefixes.support, "Sn");
        assert!(settings.validate);
    }

    #[test]
    fn test_settings_serialization() {
        let mut settings = ExportSettings::default();
        settings.target_file_name = "bridge.xml".to_string();
        let json = serde_json::to_string_pretty(&settings).unwrap();
        assert!(json.contains("bridge.xml"));

        let roundtrip = ExportSettings::from_json_str(&json).unwrap();
        assert_eq!(roundtrip, settings);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let err = ExportSettings::from_json_str(r#"{ "indnet": 4 }"#).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_load_settings_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "namespace_uri": "urn:test" }"#).unwrap();
        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.namespace_uri, "urn:test");
        assert_eq!(settings.indent, 2);

        let missing = load_settings(&dir.path().join("missing.json")).unwrap_err();
        assert_eq!(missing.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_record_name() {
        assert_eq!(record_name("LG", 2), "LG2");
        assert_eq!(record_name("", "A"), "A");
    }
}
