//! Configuration file handling.
//!
//! ```toml
//! index = "customer_index"
//!
//! [engine]
//! url = "http://localhost:9200"
//! username = "elastic"
//! password = "changeme"
//! timeout_secs = 30
//!
//! [compiler]
//! sort_field = "CreatedAt"
//! sort_direction = "desc"
//! match_mode = "bool_prefix"
//!
//! [indexing]
//! immediate_visibility = false
//! ```
//!
//! Resolution order: `--config` / `$SIFT_CONFIG`, then
//! `<config dir>/sift/config.toml` if it exists, then built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sift_core::{CompilerConfig, Error, Result};
use sift_gateway::{HttpTransportConfig, IndexingOptions};

/// Complete CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiftConfig {
    /// Index searched and written to.
    #[serde(default = "default_index")]
    pub index: String,

    /// Engine connection.
    #[serde(default)]
    pub engine: HttpTransportConfig,

    /// Query compilation.
    #[serde(default)]
    pub compiler: CompilerConfig,

    /// Indexing behavior.
    #[serde(default)]
    pub indexing: IndexingOptions,
}

fn default_index() -> String {
    "customer_index".to_string()
}

impl Default for SiftConfig {
    fn default() -> Self {
        Self {
            index: default_index(),
            engine: HttpTransportConfig::default(),
            compiler: CompilerConfig::default(),
            indexing: IndexingOptions::default(),
        }
    }
}

impl SiftConfig {
    /// Platform default location of the config file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sift").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. The default path is optional.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(Path::new(path)),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Parse TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(e.to_string()))
    }

    /// Apply command-line overrides on top of file values.
    pub fn with_overrides(mut self, url: Option<String>, index: Option<String>) -> Self {
        if let Some(url) = url {
            self.engine.url = url;
        }
        if let Some(index) = index {
            self.index = index;
        }
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sift_core::{MatchMode, SortDirection};

    #[test]
    fn test_defaults() {
        let config = SiftConfig::default();
        assert_eq!(config.index, "customer_index");
        assert_eq!(config.engine.url, "http://localhost:9200");
        assert_eq!(config.compiler.sort_field, "CreatedAt");
        assert!(!config.indexing.immediate_visibility);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(SiftConfig::from_toml_str("").unwrap(), SiftConfig::default());
    }

    #[test]
    fn test_partial_tables() {
        let config = SiftConfig::from_toml_str(
            r#"
            index = "people"

            [engine]
            url = "https://search.internal:9200"
            timeout_secs = 5

            [compiler]
            sort_direction = "asc"
            match_mode = "phrase_prefix"

            [indexing]
            immediate_visibility = true
            "#,
        )
        .unwrap();

        assert_eq!(config.index, "people");
        assert_eq!(config.engine.url, "https://search.internal:9200");
        assert_eq!(config.engine.timeout_secs, Some(5));
        assert_eq!(config.compiler.sort_field, "CreatedAt");
        assert_eq!(config.compiler.sort_direction, SortDirection::Asc);
        assert_eq!(config.compiler.match_mode, MatchMode::PhrasePrefix);
        assert!(config.indexing.immediate_visibility);
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let err = SiftConfig::from_toml_str("index = [").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "index = \"from_file\"\n").unwrap();

        let config = SiftConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.index, "from_file");
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = SiftConfig::load(Some(path.to_str().unwrap())).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn test_overrides_win() {
        let config = SiftConfig::default().with_overrides(
            Some("http://other:9200".to_string()),
            Some("people".to_string()),
        );
        assert_eq!(config.engine.url, "http://other:9200");
        assert_eq!(config.index, "people");

        let untouched = SiftConfig::default().with_overrides(None, None);
        assert_eq!(untouched, SiftConfig::default());
    }
}
