use crate::context_detection::browser_bridge::BridgeServer;
use crate::context_detection::context_resolver::{self, ContextResolver};
use crate::context_detection::DetectedContext;
use crate::settings::{
    default_context_style_prompts, ContextMapping, ContextStylePrompt, SettingsError,
    SettingsStore,
};
use std::sync::Arc;

pub fn get_context_style_prompts(store: &SettingsStore) -> Vec<ContextStylePrompt> {
    store.get().context_style_prompts
}

/// Update any subset of a prompt's editable fields; `None` leaves a field
/// unchanged.
pub fn update_context_style_prompt(
    store: &SettingsStore,
    prompt_id: &str,
    name: Option<String>,
    description: Option<String>,
    prompt: Option<String>,
) -> Result<(), SettingsError> {
    store.update(|settings| {
        let style_prompt = settings
            .context_style_prompts
            .iter_mut()
            .find(|p| p.id == prompt_id)
            .ok_or_else(|| SettingsError::PromptNotFound(prompt_id.to_string()))?;

        if let Some(n) = name {
            style_prompt.name = n;
        }
        if let Some(d) = description {
            style_prompt.description = d;
        }
        if let Some(p) = prompt {
            style_prompt.prompt = p;
        }
        Ok(())
    })
}

/// Restore a built-in prompt to its factory content. The `is_builtin`
/// flag is untouched; custom prompts have no factory content to restore.
pub fn reset_context_style_prompt(
    store: &SettingsStore,
    prompt_id: &str,
) -> Result<(), SettingsError> {
    store.update(|settings| {
        let current = settings
            .context_style_prompts
            .iter_mut()
            .find(|p| p.id == prompt_id)
            .ok_or_else(|| SettingsError::PromptNotFound(prompt_id.to_string()))?;

        if !current.is_builtin {
            return Err(SettingsError::NotBuiltin(prompt_id.to_string()));
        }

        let factory = default_context_style_prompts()
            .into_iter()
            .find(|p| p.id == prompt_id)
            .ok_or_else(|| SettingsError::NotBuiltin(prompt_id.to_string()))?;

        current.name = factory.name;
        current.description = factory.description;
        current.prompt = factory.prompt;
        Ok(())
    })
}

pub fn add_context_style_prompt(
    store: &SettingsStore,
    id: &str,
    name: &str,
    description: &str,
    prompt: &str,
) -> Result<(), SettingsError> {
    store.update(|settings| {
        if settings.context_style_prompts.iter().any(|p| p.id == id) {
            return Err(SettingsError::DuplicatePrompt(id.to_string()));
        }

        settings.context_style_prompts.push(ContextStylePrompt {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            prompt: prompt.to_string(),
            is_builtin: false,
        });
        Ok(())
    })
}

pub fn delete_context_style_prompt(
    store: &SettingsStore,
    prompt_id: &str,
) -> Result<(), SettingsError> {
    store.update(|settings| {
        if let Some(prompt) = settings
            .context_style_prompts
            .iter()
            .find(|p| p.id == prompt_id)
        {
            if prompt.is_builtin {
                return Err(SettingsError::BuiltinImmutable(prompt_id.to_string()));
            }
        }

        settings.context_style_prompts.retain(|p| p.id != prompt_id);
        Ok(())
    })
}

pub fn get_context_mappings(store: &SettingsStore) -> Vec<ContextMapping> {
    store.get().context_mappings
}

pub fn update_context_mapping(
    store: &SettingsStore,
    app_id: &str,
    context_style: &str,
) -> Result<(), SettingsError> {
    store.update(|settings| {
        if let Some(mapping) = settings
            .context_mappings
            .iter_mut()
            .find(|m| m.app_id == app_id)
        {
            mapping.context_style = context_style.to_string();
        } else {
            settings.context_mappings.push(ContextMapping {
                app_id: app_id.to_string(),
                context_style: context_style.to_string(),
            });
        }
        Ok(())
    })
}

pub fn delete_context_mapping(store: &SettingsStore, app_id: &str) -> Result<(), SettingsError> {
    store.update(|settings| {
        settings.context_mappings.retain(|m| m.app_id != app_id);
        Ok(())
    })
}

pub fn is_custom_mapping(store: &SettingsStore, app_id: &str) -> bool {
    let settings = store.get();
    context_resolver::is_custom_mapping(
        app_id,
        &settings.context_mappings,
        &settings.context_style_prompts,
    )
}

pub async fn get_current_context(
    store: &SettingsStore,
    bridge: &Arc<BridgeServer>,
) -> DetectedContext {
    let settings = store.get();
    let resolver = ContextResolver::new(Some(bridge.clone()));
    resolver.resolve(&settings).await
}

pub async fn get_browser_bridge_status(bridge: &BridgeServer) -> bool {
    bridge.is_extension_connected().await
}
