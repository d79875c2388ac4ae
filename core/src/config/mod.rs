use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const HERMES_DIR: &str = ".hermes";

pub const DEFAULT_PROVIDER: &str = "gemini";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: Option<String>,
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    pub max_iterations: usize,
    pub max_history: usize,
    pub temperature: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            provider: None,
            api_key: String::new(),
            base_url: None,
            model: DEFAULT_MODEL.to_string(),
            max_iterations: 20,
            max_history: 50,
            temperature: 1.0,
        }
    }
}

pub fn get_hermes_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(HERMES_DIR)
}

pub fn get_config_path() -> PathBuf {
    get_hermes_dir().join("config.toml")
}

pub fn config_exists() -> bool {
    get_config_path().exists()
}

impl Config {
    pub fn provider_name(&self) -> String {
        self.provider
            .as_deref()
            .unwrap_or(DEFAULT_PROVIDER)
            .trim()
            .to_lowercase()
    }

    /// Loads `.env`, then the config file if there is one, then applies
    /// `HERMES_PROVIDER` / `HERMES_MODEL` overrides.
    pub fn load_or_init() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env");
        }

        let mut config = if config_exists() {
            load_config()?
        } else {
            Config::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(provider) = env_non_empty("HERMES_PROVIDER") {
            self.provider = Some(provider);
        }
        if let Some(model) = env_non_empty("HERMES_MODEL") {
            self.model = model;
        }
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

pub fn load_config() -> Result<Config> {
    load_config_from(&get_config_path())
}

pub fn load_config_from(config_path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(config_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            anyhow::anyhow!(
                "Config file not found. Run 'hermes onboard' to set up your configuration."
            )
        } else {
            anyhow::anyhow!("Failed to read config from {}: {}", config_path.display(), e)
        }
    })?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", config_path.display()))
}

pub fn save_config(config: &Config) -> Result<()> {
    save_config_to(config, &get_config_path())
}

pub fn save_config_to(config: &Config, config_path: &Path) -> Result<()> {
    if let Some(dir) = config_path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory at {}", dir.display()))?;
    }

    let content =
        toml::to_string_pretty(config).with_context(|| "Failed to serialize config to TOML")?;

    std::fs::write(config_path, content)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_target_gemini() {
        let config = Config::default();
        assert_eq!(config.provider_name(), "gemini");
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.max_iterations, 20);
    }

    #[test]
    fn save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.toml");
        let config = Config {
            provider: Some("openai".into()),
            api_key: "sk-test".into(),
            model: "gpt-4o-mini".into(),
            ..Config::default()
        };

        save_config_to(&config, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "api_key = \"abc\"\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_history, 50);
    }

    #[test]
    fn missing_file_mentions_onboard() {
        let tmp = TempDir::new().unwrap();
        let err = load_config_from(&tmp.path().join("none.toml")).unwrap_err();
        assert!(err.to_string().contains("hermes onboard"));
    }

    #[test]
    fn malformed_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "max_iterations = \"lots\"").unwrap();
        assert!(load_config_from(&path).is_err());
    }
}
