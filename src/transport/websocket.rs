//! Client channel over WebSocket.
//!
//! Every text frame carries one decimal code: [`GameAction`] codes towards
//! the client, [`GameStateEvent`] codes from it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use log::{debug, info, warn};
use tokio::sync::mpsc;
use tower_http::cors::CorsLayer;

use crate::protocol::{GameAction, GameStateEvent};
use crate::relay::{ClientId, RelayEvent};
use crate::transport::ChannelSender;

/// Frames buffered per client before emissions start failing.
const CHANNEL_BUFFER: usize = 32;

#[derive(Clone)]
pub struct ChannelState {
    events: mpsc::Sender<RelayEvent>,
    next_id: Arc<AtomicU64>,
    allowed_origin: Option<String>,
}

impl ChannelState {
    /// `allowed_origin` of `None` accepts upgrades from any origin.
    pub fn new(events: mpsc::Sender<RelayEvent>, allowed_origin: Option<String>) -> Self {
        Self {
            events,
            next_id: Arc::new(AtomicU64::new(1)),
            allowed_origin,
        }
    }
}

/// Build the HTTP router serving the health check and the channel endpoint.
pub fn router(state: ChannelState) -> Router {
    let cors = state
        .allowed_origin
        .as_deref()
        .and_then(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("origin {:?} is not a valid header value, CORS disabled", origin);
                None
            }
        })
        .map(|origin| {
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::OPTIONS])
        });

    let router = Router::new()
        .route("/", get(health_handler))
        .route("/ws", get(ws_handler))
        .with_state(state);

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

async fn health_handler() -> &'static str {
    "Hello World!"
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    State(state): State<ChannelState>,
) -> Response {
    if let Some(allowed) = &state.allowed_origin {
        let origin = headers
            .get(header::ORIGIN)
            .and_then(|v| v.to_str().ok());
        if origin != Some(allowed.as_str()) {
            warn!("refusing channel upgrade from origin {:?}", origin);
            return (StatusCode::FORBIDDEN, "Forbidden").into_response();
        }
    }
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: ChannelState) {
    let id: ClientId = state.next_id.fetch_add(1, Ordering::Relaxed);
    info!("client {} connected", id);

    let (mut ws_sink, mut ws_stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<GameAction>(CHANNEL_BUFFER);

    let channel = Box::new(WsChannel { tx });
    if state
        .events
        .send(RelayEvent::ClientAttached { id, channel })
        .await
        .is_err()
    {
        debug!("relay session gone, closing client {}", id);
        return;
    }

    // Writer task: session emissions -> WebSocket
    let writer_handle = tokio::spawn(async move {
        while let Some(action) = rx.recv().await {
            if let Err(e) = ws_sink.send(Message::Text(action.to_string())).await {
                debug!("send to client {} failed: {}", id, e);
                break;
            }
        }
        let _ = ws_sink.close().await;
    });

    // Reader loop: WebSocket -> session queue
    while let Some(frame) = ws_stream.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                debug!("client {} read error: {}", id, e);
                break;
            }
        };
        match text.parse::<GameStateEvent>() {
            Ok(event) => {
                let msg = RelayEvent::ClientEvent { id, event };
                if state.events.send(msg).await.is_err() {
                    break;
                }
            }
            Err(e) => warn!("client {} sent {:?}: {}", id, text, e),
        }
    }

    let _ = state.events.send(RelayEvent::ClientDetached { id }).await;
    writer_handle.abort();
    info!("client {} disconnected", id);
}

/// Outbound half of one WebSocket client.
pub struct WsChannel {
    tx: mpsc::Sender<GameAction>,
}

#[async_trait::async_trait]
impl ChannelSender for WsChannel {
    async fn emit(&mut self, action: GameAction) -> anyhow::Result<()> {
        self.tx.try_send(action).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => anyhow::anyhow!("Client channel full"),
            mpsc::error::TrySendError::Closed(_) => anyhow::anyhow!("Client channel closed"),
        })
    }
}
