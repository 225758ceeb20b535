//! Order follow-up against a local trade updates stream.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use overwrite_engine::application::ports::{BrokerError, BrokerPort};
use overwrite_engine::domain::order_execution::{OrderConfirmation, OrderEvent};
use overwrite_engine::domain::shared::{BrokerOrderId, ClientOrderId, Symbol};
use overwrite_engine::infrastructure::broker::alpaca::{
    AlpacaAdapter, AlpacaConfig, AlpacaEnvironment, RetryConfig,
};

const ORDER_ID: &str = "61e69015-8549-4bfd-b9c3-01e75843f47d";
const CLIENT_ID: &str = "overwrite-AAPL-test";
const CONTRACT: &str = "AAPL240216C00260000";

fn confirmation() -> OrderConfirmation {
    OrderConfirmation {
        broker_order_id: BrokerOrderId::new(ORDER_ID),
        client_order_id: ClientOrderId::new(CLIENT_ID),
        symbol: Symbol::new(CONTRACT),
        status: "accepted".to_string(),
    }
}

fn order(client_order_id: &str, status: &str, filled_qty: &str, avg: Option<&str>) -> Value {
    json!({
        "id": ORDER_ID,
        "client_order_id": client_order_id,
        "symbol": CONTRACT,
        "status": status,
        "filled_qty": filled_qty,
        "filled_avg_price": avg,
        "side": "sell",
        "type": "market"
    })
}

fn trade_update(event: &str, order: Value) -> Value {
    json!({
        "stream": "trade_updates",
        "data": {"event": event, "timestamp": "2024-01-02T15:31:07.104Z", "order": order}
    })
}

fn adapter(rest: &MockServer, stream_url: &str) -> AlpacaAdapter {
    let config = AlpacaConfig::new("test-key", "test-secret", AlpacaEnvironment::Paper)
        .with_base_urls(rest.uri(), rest.uri())
        .with_stream_url(stream_url)
        .with_retry(RetryConfig {
            max_attempts: 1,
            jitter: 0.0,
            ..RetryConfig::default()
        });
    AlpacaAdapter::new(&config).unwrap()
}

async fn order_snapshot(status: &str, filled_qty: &str, avg: Option<&str>) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/orders/{ORDER_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(order(
            CLIENT_ID, status, filled_qty, avg,
        )))
        .mount(&server)
        .await;
    server
}

async fn next_json(ws: &mut WebSocketStream<TcpStream>) -> Value {
    loop {
        if let Message::Text(text) = ws.next().await.unwrap().unwrap() {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// One-connection stream server: runs the handshake, sends `updates` as
/// binary frames, then waits for the client to leave. Returns what the
/// client sent.
async fn trade_stream(authorized: bool, updates: Vec<Value>) -> (String, JoinHandle<Vec<Value>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}/stream", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        let mut received = vec![next_json(&mut ws).await];

        let status = if authorized { "authorized" } else { "unauthorized" };
        let authorization = json!({
            "stream": "authorization",
            "data": {"status": status, "action": "authenticate"}
        });
        ws.send(Message::Text(authorization.to_string().into()))
            .await
            .unwrap();
        if !authorized {
            return received;
        }

        received.push(next_json(&mut ws).await);
        let listening = json!({"stream": "listening", "data": {"streams": ["trade_updates"]}});
        ws.send(Message::Text(listening.to_string().into()))
            .await
            .unwrap();

        for update in updates {
            ws.send(Message::Binary(serde_json::to_vec(&update).unwrap().into()))
                .await
                .unwrap();
        }

        while let Some(Ok(message)) = ws.next().await {
            if message.is_close() {
                break;
            }
        }
        received
    });

    (url, handle)
}

#[tokio::test]
async fn follows_order_to_fill() {
    let rest = order_snapshot("accepted", "0", None).await;
    let (url, server) = trade_stream(
        true,
        vec![
            trade_update("fill", order("someone-else", "filled", "5", Some("1.00"))),
            trade_update("partial_fill", order(CLIENT_ID, "partially_filled", "1", Some("3.10"))),
            trade_update("fill", order(CLIENT_ID, "filled", "2", Some("3.15"))),
        ],
    )
    .await;

    let update = adapter(&rest, &url)
        .await_order_update(&confirmation(), Duration::from_secs(5))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(update.event, OrderEvent::Fill);
    assert_eq!(update.client_order_id.as_str(), CLIENT_ID);
    assert_eq!(update.filled_qty, dec!(2));
    assert_eq!(update.filled_avg_price, Some(dec!(3.15)));

    let received = server.await.unwrap();
    assert_eq!(
        received[0],
        json!({"action": "authenticate", "data": {"key_id": "test-key", "secret_key": "test-secret"}})
    );
    assert_eq!(
        received[1],
        json!({"action": "listen", "data": {"streams": ["trade_updates"]}})
    );
}

#[tokio::test]
async fn terminal_snapshot_needs_no_stream_events() {
    let rest = order_snapshot("filled", "2", Some("3.20")).await;
    let (url, server) = trade_stream(true, Vec::new()).await;

    let update = adapter(&rest, &url)
        .await_order_update(&confirmation(), Duration::from_secs(5))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(update.event, OrderEvent::Fill);
    assert_eq!(update.filled_avg_price, Some(dec!(3.20)));
    assert_eq!(server.await.unwrap().len(), 2);
}

#[tokio::test]
async fn window_end_returns_last_update() {
    let rest = order_snapshot("accepted", "0", None).await;
    let (url, _server) = trade_stream(
        true,
        vec![trade_update(
            "partial_fill",
            order(CLIENT_ID, "partially_filled", "1", Some("3.10")),
        )],
    )
    .await;

    let update = adapter(&rest, &url)
        .await_order_update(&confirmation(), Duration::from_millis(500))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(update.event, OrderEvent::PartialFill);
    assert!(!update.is_terminal());
    assert_eq!(update.filled_qty, dec!(1));
}

#[tokio::test]
async fn refused_credentials() {
    let rest = MockServer::start().await;
    let (url, _server) = trade_stream(false, Vec::new()).await;

    let err = adapter(&rest, &url)
        .await_order_update(&confirmation(), Duration::from_secs(5))
        .await
        .unwrap_err();

    assert_eq!(err, BrokerError::AuthenticationFailed);
}

#[tokio::test]
async fn unreachable_stream_is_a_connection_error() {
    let rest = MockServer::start().await;

    let err = adapter(&rest, "ws://127.0.0.1:1/stream")
        .await_order_update(&confirmation(), Duration::from_secs(5))
        .await
        .unwrap_err();

    assert!(matches!(err, BrokerError::ConnectionError { .. }));
}
