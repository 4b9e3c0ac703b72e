//! Registry configuration.
//!
//! Loaded from TOML under a `[registry]` table. Every field has a default,
//! so an empty file (or no file) is a valid configuration.

use crate::DEFAULT_MAX_INHERITANCE_DEPTH;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

///
/// RegistryConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Longest base-class chain resolved in one call. Chains beyond this
    /// fail with `ClassNotFound`.
    pub max_inheritance_depth: usize,

    /// Reject registering a different class under a taken name. When off,
    /// the existing class is kept and a warning is logged.
    pub strict_registration: bool,

    /// Rename entity property keys to the casing their class declares.
    pub normalize_property_names: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_inheritance_depth: DEFAULT_MAX_INHERITANCE_DEPTH,
            strict_registration: true,
            normalize_property_names: true,
        }
    }
}

///
/// ConfigFile
///

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    registry: RegistryConfig,
}

impl RegistryConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(source)?;
        file.registry.validate()?;

        Ok(file.registry)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_inheritance_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_inheritance_depth must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_yields_defaults() {
        let config = RegistryConfig::from_toml_str("").expect("empty config is valid");

        assert_eq!(config, RegistryConfig::default());
        assert_eq!(config.max_inheritance_depth, DEFAULT_MAX_INHERITANCE_DEPTH);
    }

    #[test]
    fn registry_table_overrides_defaults() {
        let config = RegistryConfig::from_toml_str(
            r"
            [registry]
            max_inheritance_depth = 8
            strict_registration = false
            ",
        )
        .expect("config should parse");

        assert_eq!(config.max_inheritance_depth, 8);
        assert!(!config.strict_registration);
        assert!(config.normalize_property_names);
    }

    #[test]
    fn zero_depth_is_rejected() {
        let err = RegistryConfig::from_toml_str("[registry]\nmax_inheritance_depth = 0\n")
            .expect_err("zero depth should fail validation");

        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = RegistryConfig::from_toml_str("[registry]\ncache_size = 10\n")
            .expect_err("unknown key should fail");

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = RegistryConfig::load("/nonexistent/ecreg.toml").expect_err("should fail");

        assert!(err.to_string().contains("/nonexistent/ecreg.toml"));
    }
}
