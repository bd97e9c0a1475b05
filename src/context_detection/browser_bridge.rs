use super::app_catalog;
use super::context_resolver::ContextResolver;
use crate::events::{ContextEvent, EventBus};
use crate::settings::SettingsStore;
use futures_util::StreamExt;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio_tungstenite::accept_async;

/// Well-known port the browser extension connects to.
pub const DEFAULT_BRIDGE_PORT: u16 = 9876;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Failed to bind bridge socket: {0}")]
    Bind(#[from] std::io::Error),
    #[error("Bridge connection failed: {0}")]
    Connect(String),
    #[error("Bridge send failed: {0}")]
    Send(String),
}

/// One push from the extension. Every push is a full replacement of the
/// current browser context, never a delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserContext {
    pub browser: String,
    pub url: String,
    pub domain: String,
    pub page_title: String,
    pub detected_app: Option<String>,
}

impl BrowserContext {
    /// Build a push for a page, resolving `detected_app` from the static
    /// domain table the way the extension does.
    pub fn new(browser: &str, url: &str, domain: &str, page_title: &str) -> Self {
        Self {
            browser: browser.to_string(),
            url: url.to_string(),
            domain: domain.to_string(),
            page_title: page_title.to_string(),
            detected_app: app_catalog::identify_from_domain(domain).map(|s| s.to_string()),
        }
    }
}

/// Desktop-side bridge endpoint.
///
/// Listens on the loopback interface only; localhost is the trust
/// boundary. The server never replies to the extension. Each accepted
/// push overwrites the current browser context and is forwarded, already
/// resolved, to the notification channel.
pub struct BridgeServer {
    latest_context: Arc<RwLock<Option<BrowserContext>>>,
    port: u16,
    store: Arc<SettingsStore>,
    events: EventBus,
}

impl BridgeServer {
    pub fn new(port: u16, store: Arc<SettingsStore>, events: EventBus) -> Self {
        Self {
            latest_context: Arc::new(RwLock::new(None)),
            port,
            store,
            events,
        }
    }

    /// Bind the listener and spawn the accept loop. Returns the bound
    /// port (useful when constructed with port 0).
    pub async fn start(&self) -> Result<u16, BridgeError> {
        let addr = format!("127.0.0.1:{}", self.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!("Browser bridge listening on ws://127.0.0.1:{}", port);

        let context = self.latest_context.clone();
        let store = self.store.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            while let Ok((stream, peer)) = listener.accept().await {
                debug!("Browser extension connected from: {}", peer);
                let ctx = context.clone();
                let store = store.clone();
                let events = events.clone();

                tokio::spawn(async move {
                    match accept_async(stream).await {
                        Ok(ws_stream) => {
                            let (_, mut read) = ws_stream.split();

                            while let Some(msg_result) = read.next().await {
                                match msg_result {
                                    Ok(msg) => {
                                        if let Ok(text) = msg.to_text() {
                                            match serde_json::from_str::<BrowserContext>(text) {
                                                Ok(browser_ctx) => {
                                                    debug!(
                                                        "Received browser context: {} - {}",
                                                        browser_ctx.domain,
                                                        browser_ctx.page_title
                                                    );
                                                    *ctx.write().await =
                                                        Some(browser_ctx.clone());

                                                    let settings = store.get();
                                                    let detected = ContextResolver::new(None)
                                                        .resolve_browser(&browser_ctx, &settings);
                                                    events.emit(ContextEvent::ContextDetected {
                                                        context: detected,
                                                    });
                                                }
                                                Err(e) => {
                                                    debug!("Ignoring malformed push: {}", e);
                                                }
                                            }
                                        }
                                    }
                                    Err(e) => {
                                        debug!("WebSocket error: {}", e);
                                        break;
                                    }
                                }
                            }
                            debug!("Browser extension disconnected");
                        }
                        Err(e) => {
                            error!("WebSocket handshake failed: {}", e);
                        }
                    }
                });
            }
        });

        Ok(port)
    }

    pub async fn current_context(&self) -> Option<BrowserContext> {
        self.latest_context.read().await.clone()
    }

    /// Whether the extension has pushed a context since startup.
    pub async fn is_extension_connected(&self) -> bool {
        self.latest_context.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_context_resolves_detected_app_from_domain() {
        let ctx = BrowserContext::new("chrome", "https://mail.google.com", "mail.google.com", "Inbox");
        assert_eq!(ctx.detected_app.as_deref(), Some("gmail"));

        let unknown = BrowserContext::new("chrome", "https://example.com", "example.com", "Example");
        assert_eq!(unknown.detected_app, None);
    }

    #[test]
    fn push_message_round_trips_as_json() {
        let ctx = BrowserContext::new("firefox", "https://claude.ai/chat", "claude.ai", "Claude");
        let json = serde_json::to_string(&ctx).unwrap();
        let parsed: BrowserContext = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ctx);
        assert_eq!(parsed.detected_app.as_deref(), Some("claude"));
    }
}
