use crate::cloud_stt::{self, CloudSTTConfig, CloudSTTProvider};
use crate::settings::{SettingsError, SettingsStore};

pub fn get_cloud_stt_providers() -> Vec<CloudSTTProvider> {
    cloud_stt::get_available_providers()
}

/// Probe a provider with an explicitly passed key. Testing and saving are
/// independent operations; a successful test persists nothing.
pub async fn test_cloud_stt_connection(
    provider_id: &str,
    api_key: &str,
) -> Result<bool, SettingsError> {
    cloud_stt::test_connection(provider_id, api_key).await
}

pub fn set_cloud_stt_enabled(store: &SettingsStore, enabled: bool) -> Result<(), SettingsError> {
    store.update(|settings| {
        settings.cloud_stt_enabled = enabled;
        Ok(())
    })
}

pub fn set_cloud_stt_provider(
    store: &SettingsStore,
    provider_id: &str,
) -> Result<(), SettingsError> {
    if cloud_stt::get_provider(provider_id).is_none() {
        return Err(SettingsError::UnknownProvider(provider_id.to_string()));
    }

    store.update(|settings| {
        settings.cloud_stt_provider = Some(provider_id.to_string());
        Ok(())
    })
}

pub fn set_cloud_stt_api_key(
    store: &SettingsStore,
    provider_id: &str,
    api_key: &str,
) -> Result<(), SettingsError> {
    store.update(|settings| {
        settings
            .cloud_stt_api_keys
            .insert(provider_id.to_string(), api_key.to_string());
        Ok(())
    })
}

pub fn set_cloud_stt_model(
    store: &SettingsStore,
    provider_id: &str,
    model_id: &str,
) -> Result<(), SettingsError> {
    let provider = cloud_stt::get_provider(provider_id)
        .ok_or_else(|| SettingsError::UnknownProvider(provider_id.to_string()))?;

    if !provider.models.iter().any(|m| m.id == model_id) {
        return Err(SettingsError::UnknownModel(
            model_id.to_string(),
            provider_id.to_string(),
        ));
    }

    store.update(|settings| {
        settings
            .cloud_stt_models
            .insert(provider_id.to_string(), model_id.to_string());
        Ok(())
    })
}

pub fn get_cloud_stt_config(store: &SettingsStore) -> CloudSTTConfig {
    let settings = store.get();
    CloudSTTConfig {
        enabled: settings.cloud_stt_enabled,
        active_provider: settings.cloud_stt_provider.clone(),
        api_keys: settings.cloud_stt_api_keys.clone(),
        selected_models: settings.cloud_stt_models.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_store(dir: &tempfile::TempDir) -> SettingsStore {
        SettingsStore::open(dir.path().join("settings.json"))
    }

    #[test]
    fn api_keys_are_isolated_per_provider() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        set_cloud_stt_api_key(&store, "gemini", "k1").unwrap();
        set_cloud_stt_api_key(&store, "openai", "k2").unwrap();

        let config = get_cloud_stt_config(&store);
        assert_eq!(config.api_keys.get("gemini").unwrap(), "k1");
        assert_eq!(config.api_keys.get("openai").unwrap(), "k2");
    }

    #[test]
    fn model_selection_never_perturbs_other_providers() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        set_cloud_stt_api_key(&store, "gemini", "k1").unwrap();
        set_cloud_stt_model(&store, "openai", "gpt-4o-transcribe").unwrap();

        let config = get_cloud_stt_config(&store);
        assert_eq!(config.api_keys.get("gemini").unwrap(), "k1");
        assert_eq!(config.selected_models.get("openai").unwrap(), "gpt-4o-transcribe");
        assert_eq!(config.selected_models.get("gemini").unwrap(), "gemini-2.0-flash");
    }

    #[test]
    fn active_provider_must_exist_in_the_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        let result = set_cloud_stt_provider(&store, "acme");
        assert!(matches!(result, Err(SettingsError::UnknownProvider(_))));
        assert_eq!(get_cloud_stt_config(&store).active_provider, None);

        set_cloud_stt_provider(&store, "gemini").unwrap();
        assert_eq!(
            get_cloud_stt_config(&store).active_provider.as_deref(),
            Some("gemini")
        );
    }

    #[test]
    fn selected_model_must_belong_to_the_provider() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        let result = set_cloud_stt_model(&store, "gemini", "whisper-1");
        assert!(matches!(result, Err(SettingsError::UnknownModel(_, _))));
        assert_eq!(
            get_cloud_stt_config(&store).selected_models.get("gemini").unwrap(),
            "gemini-2.0-flash"
        );
    }

    #[test]
    fn enabled_flag_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        assert!(!get_cloud_stt_config(&store).enabled);
        set_cloud_stt_enabled(&store, true).unwrap();
        assert!(get_cloud_stt_config(&store).enabled);
    }
}
