//! TOML configuration file support for power users.
//!
//! Instead of passing many CLI flags, users can specify settings in a config file:
//!
//! ```toml
//! # matchmass.toml
//! [matching]
//! tolerance = 0.01
//! abundance_threshold = 0.0
//! ions = ["[M+H]+", "[M+Na]+"]
//! preset = "positive"
//! ambiguity_policy = "max"
//! timeout_secs = 60
//!
//! [[files]]
//! path = "run1.csv"
//! tolerance = 0.005
//! abundance_threshold = 100.0
//! ```
//!
//! CLI flags override the `[matching]` values. A `[[files]]` entry overrides
//! the global values for that one file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use matchmass::ions::IonPreset;
use matchmass::theoretical::AmbiguityPolicy;

/// Root configuration structure for matchmass.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Global matching settings.
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Experimental files with optional per-file settings.
    #[serde(default)]
    pub files: Vec<FileConfig>,
}

/// Configuration for the match command.
#[derive(Debug, Default, Deserialize)]
pub struct MatchingConfig {
    /// m/z tolerance in Da.
    pub tolerance: Option<f64>,

    /// Peaks below this abundance are ignored.
    pub abundance_threshold: Option<f64>,

    /// Ion labels added to the preset.
    pub ions: Option<Vec<String>>,

    /// Starting ion selection (positive, negative, as-provided, none).
    pub preset: Option<String>,

    /// How per-file tolerances combine for ambiguity warnings.
    pub ambiguity_policy: Option<AmbiguityPolicy>,

    /// Abort the run after this many seconds.
    pub timeout_secs: Option<u64>,
}

/// One experimental file entry.
#[derive(Debug, Clone, Deserialize)]
pub struct FileConfig {
    /// Peak list path, relative to the working directory.
    pub path: PathBuf,

    /// Tolerance for this file only.
    pub tolerance: Option<f64>,

    /// Abundance threshold for this file only.
    pub abundance_threshold: Option<f64>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Parsed `[matching] preset`, if set.
    pub fn preset(&self) -> Result<Option<IonPreset>> {
        self.matching
            .preset
            .as_deref()
            .map(|name| name.parse::<IonPreset>().map_err(anyhow::Error::msg))
            .transpose()
    }

    /// Entry for `path`, if the config lists it.
    pub fn file(&self, path: &Path) -> Option<&FileConfig> {
        self.files.iter().find(|file| file.path == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [matching]
            tolerance = 0.01
            abundance_threshold = 50.0
            ions = ["[M+H]+", "[M+Na]+"]
            preset = "negative"
            ambiguity_policy = "min"
            timeout_secs = 60

            [[files]]
            path = "run1.csv"
            tolerance = 0.005
            abundance_threshold = 100.0

            [[files]]
            path = "run2.csv"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.matching.tolerance, Some(0.01));
        assert_eq!(config.matching.abundance_threshold, Some(50.0));
        assert_eq!(
            config.matching.ions,
            Some(vec!["[M+H]+".to_string(), "[M+Na]+".to_string()])
        );
        assert_eq!(config.preset().unwrap(), Some(IonPreset::Negative));
        assert_eq!(config.matching.ambiguity_policy, Some(AmbiguityPolicy::Min));
        assert_eq!(config.matching.timeout_secs, Some(60));

        assert_eq!(config.files.len(), 2);
        let run1 = config.file(Path::new("run1.csv")).unwrap();
        assert_eq!(run1.tolerance, Some(0.005));
        assert_eq!(run1.abundance_threshold, Some(100.0));
        let run2 = config.file(Path::new("run2.csv")).unwrap();
        assert_eq!(run2.tolerance, None);
        assert!(config.file(Path::new("run3.csv")).is_none());
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [matching]
            tolerance = 0.002
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.matching.tolerance, Some(0.002));
        assert_eq!(config.matching.abundance_threshold, None);
        assert!(config.files.is_empty());
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.matching.tolerance, None);
        assert_eq!(config.preset().unwrap(), None);
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::from_str("[matching]\nambiguity_policy = \"median\"").is_err());
        let config = Config::from_str("[matching]\npreset = \"sideways\"").unwrap();
        assert!(config.preset().is_err());
    }
}
