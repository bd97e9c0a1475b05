//! The boundary the dictation pipeline calls at session start to learn
//! which style prompt and which transcription engine to use.

use crate::cloud_stt;
use crate::context_detection::browser_bridge::BridgeServer;
use crate::context_detection::context_resolver::ContextResolver;
use crate::context_detection::DetectedContext;
use crate::events::{ContextEvent, EventBus};
use crate::settings::{AppSettings, ContextStylePrompt, SettingsStore};
use log::{info, warn};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum SttRoute {
    /// Use the local transcription engine.
    Offline,
    /// Use a cloud provider with the given credential and model.
    Cloud {
        provider_id: String,
        api_key: String,
        model: String,
    },
}

#[derive(Debug, Clone)]
pub struct TranscriptionRoute {
    pub context: DetectedContext,
    pub style_prompt: Option<ContextStylePrompt>,
    pub stt: SttRoute,
}

pub struct RoutingFacade {
    store: Arc<SettingsStore>,
    resolver: ContextResolver,
    events: EventBus,
}

impl RoutingFacade {
    pub fn new(store: Arc<SettingsStore>, bridge: Option<Arc<BridgeServer>>, events: EventBus) -> Self {
        Self {
            store,
            resolver: ContextResolver::new(bridge),
            events,
        }
    }

    /// Decide the route for the session that is about to start and notify
    /// the overlay of the detected context.
    pub async fn current_route(&self) -> TranscriptionRoute {
        let settings = self.store.get();
        let context = self.resolver.resolve(&settings).await;
        self.route_for(context, &settings)
    }

    /// Same decision for a natively detected foreground app, when the host
    /// has one and the bridge does not apply.
    pub fn route_for_native_app(&self, app_id: &str) -> TranscriptionRoute {
        let settings = self.store.get();
        let context = self.resolver.resolve_native(app_id, &settings);
        self.route_for(context, &settings)
    }

    fn route_for(&self, context: DetectedContext, settings: &AppSettings) -> TranscriptionRoute {
        info!(
            "Context detected: {} ({}) -> style: {}",
            context.app_name, context.app_id, context.context_style
        );
        self.events.emit(ContextEvent::ContextDetected {
            context: context.clone(),
        });

        let style_prompt = settings
            .context_style_prompts
            .iter()
            .find(|p| p.id == context.context_style)
            .cloned();

        TranscriptionRoute {
            context,
            style_prompt,
            stt: select_stt(settings),
        }
    }

    pub fn session_show(&self) {
        self.events.emit(ContextEvent::SessionShow);
    }

    pub fn session_hide(&self) {
        self.events.emit(ContextEvent::SessionHide);
    }
}

/// Pick the transcription engine from the cloud STT config. A cloud setup
/// missing its provider or key degrades to the offline engine; the
/// pipeline always gets a usable decision.
fn select_stt(settings: &AppSettings) -> SttRoute {
    if !settings.cloud_stt_enabled {
        return SttRoute::Offline;
    }

    let provider_id = match &settings.cloud_stt_provider {
        Some(id) => id.clone(),
        None => {
            warn!("Cloud STT enabled but no provider selected, using offline engine");
            return SttRoute::Offline;
        }
    };

    let provider = match cloud_stt::get_provider(&provider_id) {
        Some(provider) => provider,
        None => {
            warn!(
                "Cloud STT provider '{}' not in catalog, using offline engine",
                provider_id
            );
            return SttRoute::Offline;
        }
    };

    let api_key = match settings
        .cloud_stt_api_keys
        .get(&provider_id)
        .filter(|k| !k.is_empty())
    {
        Some(key) => key.clone(),
        None => {
            warn!(
                "No API key configured for cloud provider '{}', using offline engine",
                provider_id
            );
            return SttRoute::Offline;
        }
    };

    let model = settings
        .cloud_stt_models
        .get(&provider_id)
        .filter(|m| provider.models.iter().any(|pm| &pm.id == *m))
        .cloned()
        .unwrap_or(provider.default_model);

    SttRoute::Cloud {
        provider_id,
        api_key,
        model,
    }
}
