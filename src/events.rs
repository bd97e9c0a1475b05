use crate::context_detection::DetectedContext;
use serde::Serialize;
use tokio::sync::broadcast;

/// Notifications pushed toward the UI overlay.
///
/// Delivery is fire-and-forget: emitting with no subscriber is not an
/// error, and a slow subscriber only loses old events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContextEvent {
    ContextDetected { context: DetectedContext },
    SessionShow,
    SessionHide,
}

#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ContextEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ContextEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: ContextEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emit_without_subscribers_is_a_no_op() {
        let bus = EventBus::new();
        bus.emit(ContextEvent::SessionShow);
    }

    #[tokio::test]
    async fn subscriber_receives_emitted_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        bus.emit(ContextEvent::SessionShow);
        bus.emit(ContextEvent::SessionHide);

        assert!(matches!(rx.recv().await, Ok(ContextEvent::SessionShow)));
        assert!(matches!(rx.recv().await, Ok(ContextEvent::SessionHide)));
    }
}
