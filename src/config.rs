use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::corpus::DEFAULT_CORPUS_URL;
use crate::engine::history::DEFAULT_HISTORY_WINDOW;

const MAX_HISTORY_WINDOW: usize = 1000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_cipher_file")]
    pub cipher_file: String,
    #[serde(default = "default_overrides_file")]
    pub overrides_file: String,
    #[serde(default = "default_corpus_url")]
    pub corpus_url: String,
    #[serde(default)]
    pub corpus_file: Option<String>,
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

fn default_cipher_file() -> String {
    "cipher.txt".to_string()
}
fn default_overrides_file() -> String {
    "mnemonic_overrides.txt".to_string()
}
fn default_corpus_url() -> String {
    DEFAULT_CORPUS_URL.to_string()
}
fn default_history_window() -> usize {
    DEFAULT_HISTORY_WINDOW
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cipher_file: default_cipher_file(),
            overrides_file: default_overrides_file(),
            corpus_url: default_corpus_url(),
            corpus_file: None,
            history_window: default_history_window(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let mut config: Config = toml::from_str(&content)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cipher-drill")
            .join("config.toml")
    }

    pub fn validate(&mut self) {
        self.history_window = self.history_window.clamp(1, MAX_HISTORY_WINDOW);
        if self.corpus_url.trim().is_empty() {
            self.corpus_url = default_corpus_url();
        }
        if self.corpus_file.as_deref().is_some_and(|p| p.trim().is_empty()) {
            self.corpus_file = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.cipher_file, "cipher.txt");
        assert_eq!(config.overrides_file, "mnemonic_overrides.txt");
        assert_eq!(config.corpus_url, DEFAULT_CORPUS_URL);
        assert_eq!(config.corpus_file, None);
        assert_eq!(config.history_window, 50);
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
cipher_file = "/tmp/my-cipher.txt"
corpus_file = "words.txt"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.cipher_file, "/tmp/my-cipher.txt");
        assert_eq!(config.corpus_file.as_deref(), Some("words.txt"));
        assert_eq!(config.history_window, 50);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.cipher_file, deserialized.cipher_file);
        assert_eq!(config.history_window, deserialized.history_window);
    }

    #[test]
    fn test_validate_clamps_and_resets() {
        let mut config = Config {
            history_window: 0,
            corpus_url: "  ".to_string(),
            corpus_file: Some(String::new()),
            ..Config::default()
        };
        config.validate();
        assert_eq!(config.history_window, 1);
        assert_eq!(config.corpus_url, DEFAULT_CORPUS_URL);
        assert_eq!(config.corpus_file, None);

        config.history_window = 5000;
        config.validate();
        assert_eq!(config.history_window, 1000);
    }
}
