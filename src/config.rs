use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub translation: TranslationConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TranslationConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_target_language")]
    pub default_target_language: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            default_target_language: default_target_language(),
            temperature: default_temperature(),
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            concurrency: default_concurrency(),
        }
    }
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}
fn default_target_language() -> String {
    "English".to_string()
}
fn default_temperature() -> f64 {
    0.3
}
fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_timeout_secs() -> u64 {
    120
}
fn default_max_retries() -> u32 {
    5
}
fn default_concurrency() -> usize {
    4
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_max_words")]
    pub max_words: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_words: default_max_words(),
        }
    }
}

fn default_max_words() -> usize {
    3500
}

impl Config {
    /// Built-in defaults, used when no config file exists.
    pub fn minimal() -> Self {
        Config::default()
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

/// Check invariants that hold for file-loaded and flag-overridden configs
/// alike.
pub fn validate(config: &Config) -> Result<()> {
    // Validate chunking
    if config.chunking.max_words == 0 {
        anyhow::bail!("chunking.max_words must be > 0");
    }

    // Validate translation
    if config.translation.concurrency == 0 {
        anyhow::bail!("translation.concurrency must be >= 1");
    }
    if !(0.0..=2.0).contains(&config.translation.temperature) {
        anyhow::bail!("translation.temperature must be in [0.0, 2.0]");
    }
    if config.translation.timeout_secs == 0 {
        anyhow::bail!("translation.timeout_secs must be > 0");
    }
    if config.translation.model.trim().is_empty() {
        anyhow::bail!("translation.model must not be empty");
    }
    if config.translation.api_base.trim().is_empty() {
        anyhow::bail!("translation.api_base must not be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.translation.model, "gpt-4.1-mini");
        assert_eq!(config.translation.default_target_language, "English");
        assert_eq!(config.translation.temperature, 0.3);
        assert_eq!(config.translation.concurrency, 4);
        assert_eq!(config.chunking.max_words, 3500);
        validate(&config).unwrap();
    }

    #[test]
    fn test_partial_config_overrides() {
        let config: Config = toml::from_str(
            r#"
[translation]
model = "gpt-4o"
concurrency = 2

[chunking]
max_words = 1200
"#,
        )
        .unwrap();
        assert_eq!(config.translation.model, "gpt-4o");
        assert_eq!(config.translation.concurrency, 2);
        assert_eq!(config.chunking.max_words, 1200);
        // Untouched fields keep their defaults.
        assert_eq!(config.translation.temperature, 0.3);
    }

    #[test]
    fn test_zero_max_words_rejected() {
        let config: Config = toml::from_str("[chunking]\nmax_words = 0\n").unwrap();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("max_words"));
    }

    #[test]
    fn test_out_of_range_temperature_rejected() {
        let config: Config = toml::from_str("[translation]\ntemperature = 3.5\n").unwrap();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn test_minimal_matches_defaults() {
        let minimal = Config::minimal();
        assert_eq!(minimal.chunking.max_words, 3500);
        validate(&minimal).unwrap();
    }
}
