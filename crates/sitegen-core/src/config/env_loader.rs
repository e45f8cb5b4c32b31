//! Environment variable overrides
//!
//! Variable names follow the deployment conventions of the hosting service:
//! one triple per model variant for the cloud provider and one model name per
//! variant for Ollama.

use super::model::{Config, ProviderKind};
use crate::error::{SitegenError, SitegenResult};
use crate::llm::ModelRole;
use std::path::PathBuf;

const OLLAMA_DEFAULT_BASE_URL: &str = "http://localhost:11434";
const OLLAMA_DEFAULT_MODEL: &str = "qwen2.5";

fn cloud_prefix(role: ModelRole) -> &'static str {
    match role {
        ModelRole::Standard => "STREAMING_CHAT_MODEL",
        ModelRole::Reasoning => "REASONING_STREAMING_CHAT_MODEL",
        ModelRole::Route => "ROUTE_CHAT_MODEL",
    }
}

fn ollama_model_var(role: ModelRole) -> &'static str {
    match role {
        ModelRole::Standard => "OLLAMA_STREAMING_CHAT_MODEL",
        ModelRole::Reasoning => "OLLAMA_REASONING_CHAT_MODEL",
        ModelRole::Route => "OLLAMA_ROUTE_CHAT_MODEL",
    }
}

/// Apply overrides from the process environment
pub fn load_from_env(config: &mut Config) -> SitegenResult<()> {
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// Apply overrides using an arbitrary variable lookup
///
/// Empty values are treated as unset.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> SitegenResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(provider) = get("CHAT_MODEL_PROVIDER") {
        config.provider = match provider.trim().to_lowercase().as_str() {
            "cloud" | "openai" => ProviderKind::Cloud,
            "ollama" => ProviderKind::Ollama,
            other => {
                return Err(SitegenError::config_with_context(
                    format!("Unknown chat model provider: {}", other),
                    "CHAT_MODEL_PROVIDER",
                ));
            }
        };
    }

    for role in ModelRole::ALL {
        let prefix = cloud_prefix(role);
        let model = config.models.for_role_mut(role);

        if let Some(base_url) = get(&format!("{}_BASE_URL", prefix)) {
            model.base_url = base_url;
        }
        if let Some(api_key) = get(&format!("{}_API_KEY", prefix)) {
            model.api_key = Some(api_key);
        }
        if let Some(name) = get(&format!("{}_NAME", prefix)) {
            model.model = name;
        }
        if let Some(max_tokens) = get(&format!("{}_MAX_TOKENS", prefix)) {
            model.max_tokens = Some(max_tokens.trim().parse().map_err(|_| {
                SitegenError::config_with_context(
                    format!("Invalid max tokens: {}", max_tokens),
                    format!("{}_MAX_TOKENS", prefix),
                )
            })?);
        }
        if let Some(temperature) = get(&format!("{}_TEMPERATURE", prefix)) {
            model.temperature = Some(temperature.trim().parse().map_err(|_| {
                SitegenError::config_with_context(
                    format!("Invalid temperature: {}", temperature),
                    format!("{}_TEMPERATURE", prefix),
                )
            })?);
        }
    }

    if config.provider == ProviderKind::Ollama {
        let root = get("OLLAMA_BASE_URL").unwrap_or_else(|| OLLAMA_DEFAULT_BASE_URL.to_string());
        let base_url = format!("{}/v1", root.trim_end_matches('/'));
        for role in ModelRole::ALL {
            let model = config.models.for_role_mut(role);
            model.base_url = base_url.clone();
            model.api_key = None;
            model.model =
                get(ollama_model_var(role)).unwrap_or_else(|| OLLAMA_DEFAULT_MODEL.to_string());
        }
    }

    if let Some(root) = get("SITEGEN_OUTPUT_ROOT") {
        config.output_root = PathBuf::from(root);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_cloud_variables_per_role() {
        let mut config = Config::default();
        apply_env_overrides(
            &mut config,
            lookup(&[
                ("STREAMING_CHAT_MODEL_BASE_URL", "https://llm.example.com/v1"),
                ("STREAMING_CHAT_MODEL_API_KEY", "sk-standard"),
                ("STREAMING_CHAT_MODEL_NAME", "deepseek-chat"),
                ("REASONING_STREAMING_CHAT_MODEL_NAME", "deepseek-reasoner"),
                ("ROUTE_CHAT_MODEL_MAX_TOKENS", "64"),
            ]),
        )
        .unwrap();

        assert_eq!(config.models.standard.base_url, "https://llm.example.com/v1");
        assert_eq!(config.models.standard.api_key.as_deref(), Some("sk-standard"));
        assert_eq!(config.models.standard.model, "deepseek-chat");
        assert_eq!(config.models.reasoning.model, "deepseek-reasoner");
        assert_eq!(config.models.reasoning.temperature, Some(0.1));
        assert_eq!(config.models.route.max_tokens, Some(64));
    }

    #[test]
    fn test_ollama_provider_uses_local_defaults() {
        let mut config = Config::default();
        apply_env_overrides(
            &mut config,
            lookup(&[
                ("CHAT_MODEL_PROVIDER", "ollama"),
                ("OLLAMA_ROUTE_CHAT_MODEL", "llama3"),
            ]),
        )
        .unwrap();

        assert_eq!(config.provider, ProviderKind::Ollama);
        assert_eq!(config.models.standard.base_url, "http://localhost:11434/v1");
        assert_eq!(config.models.standard.model, "qwen2.5");
        assert_eq!(config.models.route.model, "llama3");
        assert!(config.models.reasoning.api_key.is_none());
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let mut config = Config::default();
        let err = apply_env_overrides(&mut config, lookup(&[("CHAT_MODEL_PROVIDER", "azure")]))
            .unwrap_err();
        assert!(err.to_string().contains("Unknown chat model provider"));
    }

    #[test]
    fn test_invalid_max_tokens_is_rejected() {
        let mut config = Config::default();
        let result = apply_env_overrides(
            &mut config,
            lookup(&[("STREAMING_CHAT_MODEL_MAX_TOKENS", "lots")]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, lookup(&[("SITEGEN_OUTPUT_ROOT", "  ")])).unwrap();
        assert_eq!(config.output_root, Config::default().output_root);
    }
}
