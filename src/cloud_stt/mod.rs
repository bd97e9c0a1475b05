pub mod gemini;
pub mod openai;

use crate::settings::SettingsError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CloudSTTProviderId {
    OpenAI,
    Gemini,
}

impl std::fmt::Display for CloudSTTProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CloudSTTProviderId::OpenAI => write!(f, "openai"),
            CloudSTTProviderId::Gemini => write!(f, "gemini"),
        }
    }
}

impl CloudSTTProviderId {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Some(CloudSTTProviderId::OpenAI),
            "gemini" => Some(CloudSTTProviderId::Gemini),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudSTTProvider {
    pub id: CloudSTTProviderId,
    pub label: String,
    pub description: String,
    pub base_url: String,
    pub models: Vec<CloudSTTModel>,
    pub default_model: String,
    pub api_key_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudSTTModel {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CloudSTTConfig {
    pub enabled: bool,
    pub active_provider: Option<String>,
    pub api_keys: HashMap<String, String>,
    pub selected_models: HashMap<String, String>,
}

/// Read-only provider catalog, not user-editable.
pub fn get_available_providers() -> Vec<CloudSTTProvider> {
    vec![
        CloudSTTProvider {
            id: CloudSTTProviderId::Gemini,
            label: "Google Gemini".to_string(),
            description: "Fast and affordable".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            models: gemini::get_available_models(),
            default_model: "gemini-2.0-flash".to_string(),
            api_key_url: "https://aistudio.google.com/apikey".to_string(),
        },
        CloudSTTProvider {
            id: CloudSTTProviderId::OpenAI,
            label: "OpenAI Whisper".to_string(),
            description: "Industry standard".to_string(),
            base_url: "https://api.openai.com".to_string(),
            models: openai::get_available_models(),
            default_model: "whisper-1".to_string(),
            api_key_url: "https://platform.openai.com/api-keys".to_string(),
        },
    ]
}

pub fn get_provider(provider_id: &str) -> Option<CloudSTTProvider> {
    get_available_providers()
        .into_iter()
        .find(|p| p.id.to_string() == provider_id)
}

/// Probe a provider with an explicitly passed key. Network and API
/// failures collapse to `false`; testing never touches stored config.
pub async fn test_connection(provider_id: &str, api_key: &str) -> Result<bool, SettingsError> {
    match provider_id {
        "openai" => Ok(openai::test_connection(api_key).await),
        "gemini" => Ok(gemini::test_connection(api_key).await),
        _ => Err(SettingsError::UnknownProvider(provider_id.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_round_trip_through_strings() {
        for provider in get_available_providers() {
            let id = provider.id.to_string();
            assert_eq!(CloudSTTProviderId::parse(&id), Some(provider.id));
        }
    }

    #[test]
    fn default_models_are_in_their_catalogs() {
        for provider in get_available_providers() {
            assert!(
                provider.models.iter().any(|m| m.id == provider.default_model),
                "default model of '{}' missing from its model list",
                provider.id
            );
        }
    }

    #[test]
    fn provider_lookup_by_string_id() {
        assert!(get_provider("gemini").is_some());
        assert!(get_provider("openai").is_some());
        assert!(get_provider("acme").is_none());
    }

    #[tokio::test]
    async fn unknown_provider_test_is_a_typed_error() {
        let result = test_connection("acme", "key").await;
        assert!(matches!(result, Err(SettingsError::UnknownProvider(_))));
    }
}
