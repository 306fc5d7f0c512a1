//! Engine configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "registrar.toml";

/// Tunables for the registry and the surrounding tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrarConfig {
    /// Maximum number of name matches returned by a directory search.
    #[serde(default = "default_page_size")]
    pub search_page_size: usize,
    /// Lowest rating a student may submit.
    #[serde(default = "default_min_rating")]
    pub min_rating: f64,
    /// Highest rating a student may submit.
    #[serde(default = "default_max_rating")]
    pub max_rating: f64,
    /// Capacity for roster courses that do not declare one.
    #[serde(default = "default_capacity")]
    pub default_capacity: u32,
}

fn default_page_size() -> usize {
    crate::search::DEFAULT_PAGE_SIZE
}
fn default_min_rating() -> f64 {
    1.0
}
fn default_max_rating() -> f64 {
    5.0
}
fn default_capacity() -> u32 {
    15
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        Self {
            search_page_size: default_page_size(),
            min_rating: default_min_rating(),
            max_rating: default_max_rating(),
            default_capacity: default_capacity(),
        }
    }
}

impl RegistrarConfig {
    /// Returns `true` if `value` is an acceptable rating.
    pub fn rating_in_range(&self, value: f64) -> bool {
        (self.min_rating..=self.max_rating).contains(&value)
    }
}

/// Load `./registrar.toml`, or the defaults if it does not exist.
pub fn load_config() -> Result<RegistrarConfig> {
    load_config_from(None)
}

/// Load configuration from `path`, falling back to `./registrar.toml` and
/// then to the defaults.
///
/// An explicit path that does not exist is an error.
pub fn load_config_from(path: Option<&Path>) -> Result<RegistrarConfig> {
    let path = match path {
        Some(p) => p,
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if !default.exists() {
                tracing::debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                return Ok(RegistrarConfig::default());
            }
            default
        }
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    parse_config_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))
}

/// Parse a TOML config string.
pub fn parse_config_str(content: &str) -> Result<RegistrarConfig> {
    let config: RegistrarConfig = toml::from_str(content)?;
    if config.search_page_size == 0 {
        anyhow::bail!("search_page_size must be at least 1");
    }
    if config.min_rating > config.max_rating {
        anyhow::bail!(
            "min_rating ({}) is greater than max_rating ({})",
            config.min_rating,
            config.max_rating
        );
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse_config_str("").unwrap();
        assert_eq!(config, RegistrarConfig::default());
        assert_eq!(config.search_page_size, 10);
        assert_eq!(config.default_capacity, 15);
    }

    #[test]
    fn partial_override() {
        let config = parse_config_str("search_page_size = 3\nmax_rating = 10.0\n").unwrap();
        assert_eq!(config.search_page_size, 3);
        assert_eq!(config.min_rating, 1.0);
        assert!(config.rating_in_range(9.5));
        assert!(!config.rating_in_range(0.5));
    }

    #[test]
    fn rejects_inverted_rating_range() {
        let err = parse_config_str("min_rating = 5.0\nmax_rating = 1.0\n").unwrap_err();
        assert!(err.to_string().contains("greater than"));
    }

    #[test]
    fn rejects_zero_page_size() {
        assert!(parse_config_str("search_page_size = 0").is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registrar.toml");
        std::fs::write(&path, "default_capacity = 40\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.default_capacity, 40);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(load_config_from(Some(&path)).is_err());
    }
}
