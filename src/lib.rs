pub mod cloud_stt;
pub mod commands;
pub mod context_detection;
pub mod events;
pub mod routing;
pub mod settings;

pub use context_detection::bridge_client::{BridgeClient, ConnectionState};
pub use context_detection::browser_bridge::{BridgeServer, BrowserContext};
pub use context_detection::{ContextSource, DetectedContext};
pub use events::{ContextEvent, EventBus};
pub use routing::{RoutingFacade, SttRoute, TranscriptionRoute};
pub use settings::{AppSettings, SettingsError, SettingsStore};
