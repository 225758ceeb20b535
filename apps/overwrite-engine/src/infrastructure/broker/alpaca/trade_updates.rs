//! Trade Updates WebSocket Client
//!
//! Follows a single submitted order on Alpaca's trade updates stream until
//! it reaches a terminal event.
//!
//! # Stream URL
//!
//! - Production: `wss://api.alpaca.markets/stream`
//! - Sandbox: `wss://paper-api.alpaca.markets/stream`
//!
//! # Protocol
//!
//! JSON frames (text or binary). After connecting, send `authenticate`, wait
//! for `authorization`, send `listen` for `trade_updates`, wait for
//! `listening`. Every later frame on the `trade_updates` stream carries one
//! order event for the account.

use chrono::{DateTime, Utc};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::domain::order_execution::{OrderConfirmation, OrderEvent, OrderUpdate};

use super::adapter::AlpacaAdapter;
use super::api_types::AlpacaOrderResponse;
use super::config::AlpacaConfig;
use super::error::AlpacaError;

const TRADE_UPDATES: &str = "trade_updates";

// =============================================================================
// Outbound Messages
// =============================================================================

#[derive(Debug, Serialize)]
struct AuthenticateRequest<'a> {
    action: &'static str,
    data: AuthenticateData<'a>,
}

#[derive(Debug, Serialize)]
struct AuthenticateData<'a> {
    key_id: &'a str,
    secret_key: &'a str,
}

#[derive(Debug, Serialize)]
struct ListenRequest {
    action: &'static str,
    data: ListeningData,
}

// =============================================================================
// Inbound Messages
// =============================================================================

#[derive(Debug, Deserialize)]
struct Envelope {
    stream: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// `authorization` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizationData {
    /// `authorized` or `unauthorized`.
    pub status: String,
}

/// `listening` payload; also the body of a listen request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListeningData {
    #[serde(default)]
    pub streams: Vec<String>,
}

/// `trade_updates` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeUpdateData {
    /// `new`, `fill`, `partial_fill`, `canceled`, ...
    pub event: String,
    /// Order state after the event.
    pub order: AlpacaOrderResponse,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl TradeUpdateData {
    fn into_update(self) -> OrderUpdate {
        let event = OrderEvent::from_broker_str(&self.event);
        self.order.into_update(event, self.timestamp)
    }
}

/// One decoded frame.
#[derive(Debug, Clone)]
pub enum StreamMessage {
    Authorization(AuthorizationData),
    Listening(ListeningData),
    TradeUpdate(Box<TradeUpdateData>),
    /// A stream this client does not read.
    Other(String),
}

impl StreamMessage {
    /// Decode a JSON frame.
    pub fn decode(payload: &[u8]) -> Result<Self, AlpacaError> {
        let envelope: Envelope =
            serde_json::from_slice(payload).map_err(|e| AlpacaError::JsonParse(e.to_string()))?;
        let message = match envelope.stream.as_str() {
            "authorization" => serde_json::from_value(envelope.data).map(Self::Authorization),
            "listening" => serde_json::from_value(envelope.data).map(Self::Listening),
            TRADE_UPDATES => serde_json::from_value(envelope.data)
                .map(|data| Self::TradeUpdate(Box::new(data))),
            other => Ok(Self::Other(other.to_string())),
        };
        message.map_err(|e| AlpacaError::JsonParse(format!("{} message: {e}", envelope.stream)))
    }
}

fn stream_error(err: tokio_tungstenite::tungstenite::Error) -> AlpacaError {
    AlpacaError::Stream(err.to_string())
}

// =============================================================================
// Client
// =============================================================================

/// Connection settings for the trade updates stream.
#[derive(Debug, Clone)]
pub struct TradeUpdatesClient {
    url: String,
    api_key: String,
    api_secret: String,
}

impl TradeUpdatesClient {
    /// Client for the configured environment or override.
    pub fn new(config: &AlpacaConfig) -> Self {
        Self {
            url: config.trade_stream_url().to_string(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
        }
    }

    /// Connect, authenticate and listen to `trade_updates`.
    pub async fn subscribe(&self) -> Result<TradeUpdateSubscription, AlpacaError> {
        tracing::debug!(url = %self.url, "Connecting to trade updates stream");
        let (ws, _response) = tokio_tungstenite::connect_async(self.url.as_str())
            .await
            .map_err(stream_error)?;
        let mut subscription = TradeUpdateSubscription { ws };

        subscription
            .send(&AuthenticateRequest {
                action: "authenticate",
                data: AuthenticateData {
                    key_id: &self.api_key,
                    secret_key: &self.api_secret,
                },
            })
            .await?;
        loop {
            match subscription.next_message().await? {
                StreamMessage::Authorization(auth) if auth.status == "authorized" => break,
                StreamMessage::Authorization(auth) => {
                    tracing::warn!(status = %auth.status, "Trade updates authentication refused");
                    return Err(AlpacaError::AuthenticationFailed);
                }
                other => tracing::trace!(frame = ?other, "Ignoring message before authorization"),
            }
        }

        subscription
            .send(&ListenRequest {
                action: "listen",
                data: ListeningData {
                    streams: vec![TRADE_UPDATES.to_string()],
                },
            })
            .await?;
        loop {
            match subscription.next_message().await? {
                StreamMessage::Listening(listening)
                    if listening.streams.iter().any(|s| s == TRADE_UPDATES) =>
                {
                    break;
                }
                StreamMessage::Listening(listening) => {
                    return Err(AlpacaError::Stream(format!(
                        "listen not acknowledged, streams: {:?}",
                        listening.streams
                    )));
                }
                other => tracing::trace!(frame = ?other, "Ignoring message before listening"),
            }
        }

        tracing::debug!("Listening to trade updates");
        Ok(subscription)
    }
}

/// An authenticated `trade_updates` subscription.
pub struct TradeUpdateSubscription {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TradeUpdateSubscription {
    async fn send<T: Serialize>(&mut self, request: &T) -> Result<(), AlpacaError> {
        let json = serde_json::to_string(request).map_err(|e| AlpacaError::JsonParse(e.to_string()))?;
        self.ws
            .send(Message::Text(json.into()))
            .await
            .map_err(stream_error)
    }

    async fn next_message(&mut self) -> Result<StreamMessage, AlpacaError> {
        loop {
            let frame = self
                .ws
                .next()
                .await
                .ok_or_else(|| AlpacaError::Stream("stream ended".to_string()))?
                .map_err(stream_error)?;
            match frame {
                Message::Text(text) => return StreamMessage::decode(text.as_bytes()),
                // Alpaca sends trade updates as binary frames
                Message::Binary(data) => return StreamMessage::decode(&data),
                Message::Ping(data) => {
                    self.ws.send(Message::Pong(data)).await.map_err(stream_error)?;
                }
                Message::Close(_) => {
                    return Err(AlpacaError::Stream("server closed the stream".to_string()));
                }
                _ => {}
            }
        }
    }

    /// Next trade update for any order on the account.
    pub async fn next_trade_update(&mut self) -> Result<TradeUpdateData, AlpacaError> {
        loop {
            match self.next_message().await? {
                StreamMessage::TradeUpdate(update) => return Ok(*update),
                other => tracing::trace!(frame = ?other, "Ignoring non trade update"),
            }
        }
    }

    /// Close the connection; errors are only logged.
    pub async fn close(mut self) {
        if let Err(e) = self.ws.close(None).await {
            tracing::debug!(error = %e, "Trade updates stream close failed");
        }
    }
}

// =============================================================================
// Order follow-up
// =============================================================================

impl AlpacaAdapter {
    /// Follow `confirmation` until a terminal event, recording each state in
    /// `latest`.
    ///
    /// Subscribes before reading the order snapshot so an event between the
    /// two is seen on the stream.
    pub(super) async fn follow_order(
        &self,
        confirmation: &OrderConfirmation,
        latest: &mut Option<OrderUpdate>,
    ) -> Result<(), AlpacaError> {
        let mut subscription = self.trade_updates.subscribe().await?;

        let snapshot: AlpacaOrderResponse = self
            .client
            .get(&format!("/v2/orders/{}", confirmation.broker_order_id))
            .await?;
        let update = OrderUpdate::from(snapshot);
        tracing::debug!(
            client_order_id = %confirmation.client_order_id,
            event = %update.event,
            "Order snapshot"
        );
        let mut done = update.is_terminal();
        *latest = Some(update);

        while !done {
            let data = subscription.next_trade_update().await?;
            if data.order.client_order_id != confirmation.client_order_id.as_str() {
                tracing::trace!(client_order_id = %data.order.client_order_id, "Update for another order");
                continue;
            }
            let update = data.into_update();
            tracing::info!(
                client_order_id = %confirmation.client_order_id,
                event = %update.event,
                filled_qty = %update.filled_qty,
                filled_avg_price = ?update.filled_avg_price,
                "Trade update"
            );
            done = update.is_terminal();
            *latest = Some(update);
        }

        subscription.close().await;
        Ok(())
    }
}
