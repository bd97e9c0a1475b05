pub mod app_catalog;
pub mod bridge_client;
pub mod browser_bridge;
pub mod context_resolver;

use serde::{Deserialize, Serialize};

/// Style id used whenever nothing more specific can be resolved.
pub const FALLBACK_CONTEXT_STYLE: &str = "correction";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedContext {
    pub source: ContextSource,
    pub app_id: String,
    pub app_name: String,
    pub context_style: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextSource {
    Native,
    Browser,
    Fallback,
}

impl Default for DetectedContext {
    fn default() -> Self {
        Self {
            source: ContextSource::Fallback,
            app_id: "unknown".to_string(),
            app_name: "Unknown".to_string(),
            context_style: FALLBACK_CONTEXT_STYLE.to_string(),
            confidence: 0.5,
        }
    }
}
