use crate::config::Config;
use crate::providers::OpenAIProvider;
use crate::traits::Provider;
use anyhow::{Result, anyhow};
use std::sync::Arc;

pub const GEMINI_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "HERMES_GEMINI_API_KEY"];
pub const OPENAI_KEY_VARS: &[&str] = &["OPENAI_API_KEY", "HERMES_OPENAI_API_KEY"];

pub fn create_provider(config: &Config) -> Result<Arc<dyn Provider>> {
    let provider_name = config.provider_name();

    let provider = match provider_name.as_str() {
        "gemini" => {
            let api_key = resolve_api_key_with_fallback(GEMINI_KEY_VARS, &config.api_key)?;
            OpenAIProvider::gemini(api_key)
        }
        "openai" => {
            let api_key = resolve_api_key_with_fallback(OPENAI_KEY_VARS, &config.api_key)?;
            OpenAIProvider::new(api_key)
        }
        _ => {
            return Err(anyhow!(
                "Unknown provider: {}. Available: gemini, openai",
                provider_name
            ));
        }
    };

    let mut provider = provider
        .with_model(config.model.clone())
        .with_temperature(config.temperature);
    if let Some(base_url) = &config.base_url {
        provider = provider.with_base_url(base_url.clone());
    }

    Ok(Arc::new(provider))
}

/// True when any of the provider's key variables is set.
pub fn env_has_api_key(provider_name: &str) -> bool {
    let vars = match provider_name {
        "openai" => OPENAI_KEY_VARS,
        _ => GEMINI_KEY_VARS,
    };
    vars.iter().any(|v| resolve_api_key_from_env(v).is_ok())
}

fn resolve_api_key_with_fallback(env_vars: &[&str], config_key: &str) -> Result<String> {
    for var_name in env_vars {
        if let Ok(key) = resolve_api_key_from_env(var_name) {
            return Ok(key);
        }
    }
    if !config_key.is_empty() {
        Ok(config_key.to_string())
    } else {
        Err(anyhow!(
            "No API key found. Set {} or run 'hermes onboard'.",
            env_vars.join(" or ")
        ))
    }
}

fn resolve_api_key_from_env(var_name: &str) -> Result<String> {
    std::env::var(var_name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| anyhow!("Environment variable {} not set", var_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_provider_is_rejected() {
        let config = Config {
            provider: Some("ollama".into()),
            api_key: "k".into(),
            ..Config::default()
        };
        let err = create_provider(&config).err().unwrap();
        assert!(err.to_string().contains("Unknown provider: ollama"));
    }

    #[test]
    fn config_key_is_the_fallback() {
        let key = resolve_api_key_with_fallback(&["HERMES_TEST_UNSET_KEY_VAR"], "from-config")
            .unwrap();
        assert_eq!(key, "from-config");
        assert!(resolve_api_key_with_fallback(&["HERMES_TEST_UNSET_KEY_VAR"], "").is_err());
    }

    #[test]
    fn provider_uses_configured_name() {
        let config = Config {
            provider: Some("OpenAI".into()),
            api_key: "k".into(),
            ..Config::default()
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "openai");
    }
}
