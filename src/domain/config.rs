use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::context::CampingStyle;

/// Configuration for the packing list engine.
///
/// This struct holds settings that control how lists are initialized and how
/// many suggestions are offered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The maximum number of suggestions returned at once.
    max_suggestions: usize,

    /// The minimum priority a context-matched item needs to be added during
    /// initialization.
    ///
    /// Lower-priority matches are only offered as suggestions.
    initial_priority_threshold: u8,

    /// Whether premium-only catalog items are eligible.
    pub include_premium: bool,

    /// The camping style assumed for trips that do not specify one.
    pub default_camping_style: CampingStyle,

    /// Path to a custom catalog file, relative to the root.
    ///
    /// The built-in catalog is used when this is not set.
    pub catalog: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_suggestions: default_max_suggestions(),
            initial_priority_threshold: default_priority_threshold(),
            include_premium: false,
            default_camping_style: CampingStyle::default(),
            catalog: None,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the maximum number of suggestions returned at once.
    #[must_use]
    pub const fn max_suggestions(&self) -> usize {
        self.max_suggestions
    }

    /// Sets the maximum number of suggestions.
    ///
    /// Zero is raised to one.
    pub fn set_max_suggestions(&mut self, value: usize) {
        self.max_suggestions = value.max(1);
    }

    /// Returns the minimum priority for items added during initialization.
    #[must_use]
    pub const fn initial_priority_threshold(&self) -> u8 {
        self.initial_priority_threshold
    }

    /// Sets the minimum priority for items added during initialization.
    ///
    /// The value is clamped to the valid priority range 1-5.
    pub fn set_initial_priority_threshold(&mut self, value: u8) {
        self.initial_priority_threshold = value.clamp(1, 5);
    }
}

const fn default_max_suggestions() -> usize {
    12
}

const fn default_priority_threshold() -> u8 {
    4
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_max_suggestions")]
        max_suggestions: usize,

        #[serde(default = "default_priority_threshold")]
        initial_priority_threshold: u8,

        #[serde(default)]
        include_premium: bool,

        #[serde(default)]
        default_camping_style: CampingStyle,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        catalog: Option<PathBuf>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                max_suggestions,
                initial_priority_threshold,
                include_premium,
                default_camping_style,
                catalog,
            } => Self {
                max_suggestions: max_suggestions.max(1),
                initial_priority_threshold: initial_priority_threshold.clamp(1, 5),
                include_premium,
                default_camping_style,
                catalog,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            max_suggestions: config.max_suggestions,
            initial_priority_threshold: config.initial_priority_threshold,
            include_premium: config.include_premium,
            default_camping_style: config.default_camping_style,
            catalog: config.catalog,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nmax_suggestions = 5\ninitial_priority_threshold = 3\ninclude_premium = true\ndefault_camping_style = \"backpacking\"\ncatalog = \"gear.yaml\"\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.max_suggestions(), 5);
        assert_eq!(config.initial_priority_threshold(), 3);
        assert!(config.include_premium);
        assert_eq!(config.default_camping_style, CampingStyle::Backpacking);
        assert_eq!(config.catalog, Some(PathBuf::from("gear.yaml")));
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nmax_suggestions = \"twelve\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config: Config =
            toml::from_str("_version = \"1\"\nmax_suggestions = 0\ninitial_priority_threshold = 9\n")
                .unwrap();
        assert_eq!(config.max_suggestions(), 1);
        assert_eq!(config.initial_priority_threshold(), 5);
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");

        let mut config = Config::default();
        config.set_max_suggestions(20);
        config.set_initial_priority_threshold(5);
        config.default_camping_style = CampingStyle::Rv;
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
