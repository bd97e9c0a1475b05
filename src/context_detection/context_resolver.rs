use super::app_catalog;
use super::browser_bridge::{BridgeServer, BrowserContext};
use super::{ContextSource, DetectedContext, FALLBACK_CONTEXT_STYLE};
use crate::settings::{AppSettings, ContextMapping, ContextStylePrompt};
use log::debug;
use std::sync::Arc;

/// Resolve the effective style id for an app.
///
/// Precedence: explicit user mapping, then the catalog's factory default,
/// then the generic fallback. The winner is validated against the style
/// store; a dangling reference resolves to the fallback instead of
/// erroring.
pub fn resolve_style(
    app_id: &str,
    mappings: &[ContextMapping],
    prompts: &[ContextStylePrompt],
) -> String {
    let resolved = mappings
        .iter()
        .find(|m| m.app_id == app_id)
        .map(|m| m.context_style.clone())
        .or_else(|| app_catalog::default_context_style(app_id).map(|s| s.to_string()))
        .unwrap_or_else(|| FALLBACK_CONTEXT_STYLE.to_string());

    if prompts.iter().any(|p| p.id == resolved) {
        resolved
    } else {
        debug!(
            "Style '{}' for app '{}' is not in the store, falling back",
            resolved, app_id
        );
        FALLBACK_CONTEXT_STYLE.to_string()
    }
}

/// A mapping is custom iff the resolved style differs from the factory
/// default. Derived, never stored.
pub fn is_custom_mapping(
    app_id: &str,
    mappings: &[ContextMapping],
    prompts: &[ContextStylePrompt],
) -> bool {
    let factory = app_catalog::default_context_style(app_id).unwrap_or(FALLBACK_CONTEXT_STYLE);
    resolve_style(app_id, mappings, prompts) != factory
}

pub struct ContextResolver {
    bridge: Option<Arc<BridgeServer>>,
}

impl ContextResolver {
    pub fn new(bridge: Option<Arc<BridgeServer>>) -> Self {
        Self { bridge }
    }

    /// Resolve the current context from the browser bridge, if any.
    pub async fn resolve(&self, settings: &AppSettings) -> DetectedContext {
        if let Some(ref bridge) = self.bridge {
            if let Some(browser_ctx) = bridge.current_context().await {
                debug!(
                    "Browser context from extension: domain='{}', title='{}'",
                    browser_ctx.domain, browser_ctx.page_title
                );
                return self.resolve_browser(&browser_ctx, settings);
            }
        }

        debug!("No context detected, using fallback");
        DetectedContext::default()
    }

    /// Resolve a context pushed by the browser extension.
    pub fn resolve_browser(
        &self,
        browser_ctx: &BrowserContext,
        settings: &AppSettings,
    ) -> DetectedContext {
        let app_id = browser_ctx.detected_app.clone().or_else(|| {
            app_catalog::identify_from_domain(&browser_ctx.domain).map(|s| s.to_string())
        });

        match app_id {
            Some(app_id) => self.detected(ContextSource::Browser, &app_id, 0.98, settings),
            None => DetectedContext::default(),
        }
    }

    /// Resolve a context for a natively detected foreground app. Window
    /// detection itself is the host's job; only the app id comes in.
    pub fn resolve_native(&self, app_id: &str, settings: &AppSettings) -> DetectedContext {
        self.detected(ContextSource::Native, app_id, 1.0, settings)
    }

    fn detected(
        &self,
        source: ContextSource,
        app_id: &str,
        confidence: f32,
        settings: &AppSettings,
    ) -> DetectedContext {
        let style = resolve_style(
            app_id,
            &settings.context_mappings,
            &settings.context_style_prompts,
        );
        debug!("Identified app '{}' with style '{}'", app_id, style);
        DetectedContext {
            source,
            app_id: app_id.to_string(),
            app_name: app_catalog::app_display_name(app_id),
            context_style: style,
            confidence,
        }
    }
}

impl Default for ContextResolver {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::get_default_settings;

    fn mapping(app_id: &str, style: &str) -> ContextMapping {
        ContextMapping {
            app_id: app_id.to_string(),
            context_style: style.to_string(),
        }
    }

    #[test]
    fn mapping_wins_over_factory_default() {
        let settings = get_default_settings();
        let mappings = vec![mapping("gmail", "chat")];
        assert_eq!(
            resolve_style("gmail", &mappings, &settings.context_style_prompts),
            "chat"
        );
    }

    #[test]
    fn factory_default_wins_without_mapping() {
        let settings = get_default_settings();
        assert_eq!(
            resolve_style("gmail", &[], &settings.context_style_prompts),
            "email_pro"
        );
        assert_eq!(
            resolve_style("vscode", &[], &settings.context_style_prompts),
            "code"
        );
    }

    #[test]
    fn unknown_app_resolves_to_fallback() {
        let settings = get_default_settings();
        assert_eq!(
            resolve_style("some_random_tool", &[], &settings.context_style_prompts),
            FALLBACK_CONTEXT_STYLE
        );
    }

    #[test]
    fn dangling_mapping_resolves_to_fallback() {
        let settings = get_default_settings();
        let mappings = vec![mapping("gmail", "deleted_style")];
        assert_eq!(
            resolve_style("gmail", &mappings, &settings.context_style_prompts),
            FALLBACK_CONTEXT_STYLE
        );
    }

    #[test]
    fn custom_detection_tracks_mapping_lifecycle() {
        let settings = get_default_settings();
        let prompts = &settings.context_style_prompts;

        assert!(!is_custom_mapping("gmail", &[], prompts));

        let mappings = vec![mapping("gmail", "chat")];
        assert!(is_custom_mapping("gmail", &mappings, prompts));

        // Mapping an app to its own factory default is not custom.
        let mappings = vec![mapping("gmail", "email_pro")];
        assert!(!is_custom_mapping("gmail", &mappings, prompts));
    }

    #[test]
    fn unmapped_unknown_app_is_not_custom() {
        let settings = get_default_settings();
        assert!(!is_custom_mapping(
            "some_random_tool",
            &[],
            &settings.context_style_prompts
        ));
    }

    #[test]
    fn browser_context_resolves_through_domain_table() {
        let settings = get_default_settings();
        let resolver = ContextResolver::default();
        let ctx = BrowserContext {
            browser: "chrome".to_string(),
            url: "https://mail.google.com/mail/u/0".to_string(),
            domain: "mail.google.com".to_string(),
            page_title: "Inbox".to_string(),
            detected_app: None,
        };

        let detected = resolver.resolve_browser(&ctx, &settings);
        assert_eq!(detected.source, ContextSource::Browser);
        assert_eq!(detected.app_id, "gmail");
        assert_eq!(detected.app_name, "Gmail");
        assert_eq!(detected.context_style, "email_pro");
    }

    #[test]
    fn unknown_domain_resolves_to_default_context() {
        let settings = get_default_settings();
        let resolver = ContextResolver::default();
        let ctx = BrowserContext {
            browser: "chrome".to_string(),
            url: "https://example.com".to_string(),
            domain: "example.com".to_string(),
            page_title: "Example".to_string(),
            detected_app: None,
        };

        let detected = resolver.resolve_browser(&ctx, &settings);
        assert_eq!(detected, DetectedContext::default());
    }

    #[tokio::test]
    async fn no_bridge_resolves_to_default_context() {
        let settings = get_default_settings();
        let resolver = ContextResolver::default();
        assert_eq!(resolver.resolve(&settings).await, DetectedContext::default());
    }

    #[test]
    fn native_resolution_uses_full_confidence() {
        let settings = get_default_settings();
        let resolver = ContextResolver::default();
        let detected = resolver.resolve_native("slack", &settings);
        assert_eq!(detected.source, ContextSource::Native);
        assert_eq!(detected.context_style, "chat");
        assert_eq!(detected.confidence, 1.0);
    }
}
