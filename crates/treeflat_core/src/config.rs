//! Configuration file for flatten runs

use crate::options::{FlattenOptions, SeparatorPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Main configuration for treeflat
///
/// ```toml
/// [separator]
/// default_separator = " > "
/// path_modules = ["Actions", "Contents"]
///
/// [options]
/// include_aggregate_rows = true
/// max_depth = 16
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeflatConfig {
    pub separator: SeparatorPolicy,
    pub options: FlattenOptions,
}

impl TreeflatConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{DEFAULT_MAX_DEPTH, DEFAULT_SEPARATOR};
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TreeflatConfig::from_toml_str("").unwrap();
        assert_eq!(config, TreeflatConfig::default());
        assert_eq!(config.separator.default_separator, DEFAULT_SEPARATOR);
        assert_eq!(config.options.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_partial_config() {
        let config = TreeflatConfig::from_toml_str(
            r#"
            [separator]
            default_separator = " > "
            path_modules = ["Actions", "Contents"]

            [options]
            include_aggregate_rows = true
            "#,
        )
        .unwrap();

        assert_eq!(config.separator.separator_for("Contents", "getContentNames"), "/");
        assert_eq!(config.separator.separator_for("Referrers", "getAll"), " > ");
        // Unset fields keep their defaults
        assert_eq!(config.separator.path_methods, vec!["getWebsites".to_string()]);
        assert!(config.options.include_aggregate_rows);
        assert_eq!(config.options.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("treeflat.toml");
        let config = TreeflatConfig {
            options: FlattenOptions::default().with_max_depth(8),
            ..TreeflatConfig::default()
        };
        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();

        assert_eq!(TreeflatConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_and_bad_toml() {
        let dir = TempDir::new().unwrap();
        let err = TreeflatConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));

        let err = TreeflatConfig::from_toml_str("[options]\nmax_depth = \"deep\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
