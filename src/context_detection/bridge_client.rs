//! Extension-side bridge endpoint.
//!
//! Owns the connection to the desktop bridge server: a single event-loop
//! task fed by tab updates and socket outcomes. An unreachable server is
//! an expected state, not an error; the client sits in `Disconnected` and
//! retries on a fixed interval. On every successful connect the current
//! tab context is pushed again, so the server never holds stale state
//! after a restart of either side.

use super::browser_bridge::{BridgeError, BrowserContext};
use futures_util::{SinkExt, StreamExt};
use log::{debug, info};
use std::future::Future;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub const RECONNECT_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// An established connection to the bridge server. The server never
/// replies; the only signals are send success and the connection closing.
pub trait BridgeConnection: Send {
    fn send(&mut self, payload: String) -> impl Future<Output = Result<(), BridgeError>> + Send;
    fn closed(&mut self) -> impl Future<Output = ()> + Send;
}

pub trait BridgeTransport: Send + Sync + 'static {
    type Conn: BridgeConnection + 'static;
    fn connect(&self) -> impl Future<Output = Result<Self::Conn, BridgeError>> + Send;
}

/// WebSocket transport against the local bridge server.
pub struct WsTransport {
    url: String,
}

impl WsTransport {
    pub fn new(port: u16) -> Self {
        Self {
            url: format!("ws://127.0.0.1:{}", port),
        }
    }
}

pub struct WsConnection {
    inner: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl BridgeTransport for WsTransport {
    type Conn = WsConnection;

    fn connect(&self) -> impl Future<Output = Result<WsConnection, BridgeError>> + Send {
        let url = self.url.clone();
        async move {
            let (stream, _) = connect_async(url.as_str())
                .await
                .map_err(|e| BridgeError::Connect(e.to_string()))?;
            Ok(WsConnection { inner: stream })
        }
    }
}

impl BridgeConnection for WsConnection {
    fn send(&mut self, payload: String) -> impl Future<Output = Result<(), BridgeError>> + Send {
        async move {
            self.inner
                .send(Message::text(payload))
                .await
                .map_err(|e| BridgeError::Send(e.to_string()))
        }
    }

    fn closed(&mut self) -> impl Future<Output = ()> + Send {
        async move {
            // The server sends nothing; drain until the stream ends.
            while let Some(msg) = self.inner.next().await {
                if msg.is_err() {
                    break;
                }
            }
        }
    }
}

enum ClientCommand {
    UpdateContext(BrowserContext),
    Shutdown,
}

#[derive(PartialEq)]
enum LoopExit {
    Reconnect,
    Shutdown,
}

pub struct BridgeClient {
    cmd_tx: mpsc::UnboundedSender<ClientCommand>,
    state_rx: watch::Receiver<ConnectionState>,
    task: JoinHandle<()>,
}

impl BridgeClient {
    /// Spawn the client loop over the given transport.
    pub fn start<T: BridgeTransport>(transport: T) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let task = tokio::spawn(run(transport, cmd_rx, state_tx));
        Self {
            cmd_tx,
            state_rx,
            task,
        }
    }

    /// Connect to the bridge server on the given local port.
    pub fn connect(port: u16) -> Self {
        Self::start(WsTransport::new(port))
    }

    /// Called when the active tab changed or the active tab finished
    /// loading. Replaces the remembered context; pushed immediately when
    /// connected, otherwise delivered by the next resync.
    pub fn update_context(&self, context: BrowserContext) {
        let _ = self.cmd_tx.send(ClientCommand::UpdateContext(context));
    }

    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    pub fn state_changes(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Tear the client down, cancelling any pending reconnect timer.
    pub async fn stop(self) {
        let _ = self.cmd_tx.send(ClientCommand::Shutdown);
        let _ = self.task.await;
    }
}

async fn run<T: BridgeTransport>(
    transport: T,
    mut cmd_rx: mpsc::UnboundedReceiver<ClientCommand>,
    state_tx: watch::Sender<ConnectionState>,
) {
    let mut current: Option<BrowserContext> = None;

    loop {
        let _ = state_tx.send(ConnectionState::Connecting);
        match transport.connect().await {
            Ok(mut conn) => {
                let _ = state_tx.send(ConnectionState::Connected);
                info!("Bridge connected");
                if serve_connection(&mut conn, &mut cmd_rx, &mut current).await
                    == LoopExit::Shutdown
                {
                    let _ = state_tx.send(ConnectionState::Disconnected);
                    return;
                }
                debug!("Bridge connection lost");
            }
            Err(e) => {
                debug!("Bridge connect failed: {}", e);
            }
        }

        let _ = state_tx.send(ConnectionState::Disconnected);
        if wait_for_retry(&mut cmd_rx, &mut current).await == LoopExit::Shutdown {
            return;
        }
    }
}

async fn serve_connection<C: BridgeConnection>(
    conn: &mut C,
    cmd_rx: &mut mpsc::UnboundedReceiver<ClientCommand>,
    current: &mut Option<BrowserContext>,
) -> LoopExit {
    // Resync on connect.
    if let Some(ctx) = current.clone() {
        if push(conn, &ctx).await.is_err() {
            return LoopExit::Reconnect;
        }
    }

    loop {
        let cmd = tokio::select! {
            cmd = cmd_rx.recv() => cmd,
            _ = conn.closed() => return LoopExit::Reconnect,
        };

        match cmd {
            Some(ClientCommand::UpdateContext(ctx)) => {
                *current = Some(ctx.clone());
                if push(conn, &ctx).await.is_err() {
                    return LoopExit::Reconnect;
                }
            }
            Some(ClientCommand::Shutdown) | None => return LoopExit::Shutdown,
        }
    }
}

/// Single retry timer per disconnect; context updates arriving while the
/// timer runs only replace the remembered context.
async fn wait_for_retry(
    cmd_rx: &mut mpsc::UnboundedReceiver<ClientCommand>,
    current: &mut Option<BrowserContext>,
) -> LoopExit {
    let retry = time::sleep(RECONNECT_INTERVAL);
    tokio::pin!(retry);

    loop {
        tokio::select! {
            _ = &mut retry => return LoopExit::Reconnect,
            cmd = cmd_rx.recv() => match cmd {
                Some(ClientCommand::UpdateContext(ctx)) => *current = Some(ctx),
                Some(ClientCommand::Shutdown) | None => return LoopExit::Shutdown,
            },
        }
    }
}

async fn push<C: BridgeConnection>(conn: &mut C, ctx: &BrowserContext) -> Result<(), BridgeError> {
    match serde_json::to_string(ctx) {
        Ok(payload) => conn.send(payload).await,
        Err(e) => Err(BridgeError::Send(e.to_string())),
    }
}
