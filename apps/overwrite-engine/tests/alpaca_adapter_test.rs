//! Alpaca adapter against a mock HTTP server.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use overwrite_engine::application::ports::{
    AccountError, AccountPort, AssetFilter, BrokerError, BrokerPort, ContractQuery,
    MarketDataError, MarketDataPort,
};
use overwrite_engine::domain::option_selection::{
    ContractType, ExpirationWindow, OptionContract, StrikeThreshold,
};
use overwrite_engine::domain::order_execution::{OrderRequest, OrderStyle, TimeInForce};
use overwrite_engine::domain::risk_management::RiskPolicy;
use overwrite_engine::domain::shared::Symbol;
use overwrite_engine::infrastructure::broker::alpaca::{
    AlpacaAdapter, AlpacaConfig, AlpacaEnvironment, RetryConfig,
};

fn adapter(server: &MockServer) -> AlpacaAdapter {
    let config = AlpacaConfig::new("test-key", "test-secret", AlpacaEnvironment::Paper)
        .with_base_urls(server.uri(), server.uri())
        .with_retry(RetryConfig {
            max_attempts: 2,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(2),
            multiplier: 2.0,
            jitter: 0.0,
        });
    AlpacaAdapter::new(&config).unwrap()
}

#[tokio::test]
async fn reads_account_with_auth_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/account"))
        .and(header("APCA-API-KEY-ID", "test-key"))
        .and(header("APCA-API-SECRET-KEY", "test-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "account_number": "PA3XYZ",
            "status": "ACTIVE",
            "options_approved_level": 2,
            "options_trading_level": 2,
            "options_buying_power": "25000.50"
        })))
        .mount(&server)
        .await;

    let account = adapter(&server).get_account().await.unwrap();

    assert_eq!(account.account_number, "PA3XYZ");
    assert_eq!(account.options_trading_level, Some(2));
    assert_eq!(account.options_buying_power, dec!(25000.50));
}

#[tokio::test]
async fn proposes_lower_level_when_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/account/configurations"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"max_options_trading_level": 3})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/v2/account/configurations"))
        .and(body_json(json!({"max_options_trading_level": 1})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"max_options_trading_level": 1})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = adapter(&server).propose_max_options_level(3, 1).await.unwrap();

    assert_eq!(config.max_options_trading_level, Some(1));
}

#[tokio::test]
async fn proposal_conflicts_when_level_moved() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/account/configurations"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"max_options_trading_level": 2})),
        )
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/v2/account/configurations"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = adapter(&server)
        .propose_max_options_level(3, 1)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        AccountError::Conflict {
            expected: 3,
            actual: Some(2)
        }
    );
}

#[tokio::test]
async fn sets_policy_level() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/v2/account/configurations"))
        .and(body_json(json!({"max_options_trading_level": 2})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"max_options_trading_level": 2})),
        )
        .mount(&server)
        .await;

    let config = adapter(&server)
        .set_account_configurations(RiskPolicy::new(2).unwrap())
        .await
        .unwrap();

    assert_eq!(config.max_options_trading_level, Some(2));
}

#[tokio::test]
async fn lists_optionable_assets() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/assets"))
        .and(query_param("status", "active"))
        .and(query_param("asset_class", "us_equity"))
        .and(query_param("attributes", "options_enabled"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"symbol": "AAPL", "name": "Apple Inc.", "status": "active", "tradable": true,
             "attributes": ["options_enabled", "has_options"]},
            {"symbol": "SPY", "name": "SPDR S&P 500", "status": "active", "tradable": true,
             "attributes": ["options_enabled"]}
        ])))
        .mount(&server)
        .await;

    let assets = adapter(&server)
        .get_all_assets(AssetFilter::optionable_equities())
        .await
        .unwrap();

    assert_eq!(assets.len(), 2);
    assert!(assets.iter().all(|a| a.options_enabled()));
}

#[tokio::test]
async fn unknown_asset_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/assets/ZZZZ"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"code": 40410000, "message": "asset not found"})),
        )
        .mount(&server)
        .await;

    let err = adapter(&server)
        .get_asset(&Symbol::new("ZZZZ"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        BrokerError::AssetNotFound {
            symbol: "ZZZZ".to_string()
        }
    );
}

#[tokio::test]
async fn reads_positions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/positions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"symbol": "AAPL", "qty": "300", "side": "long"}
        ])))
        .mount(&server)
        .await;

    let positions = adapter(&server).get_all_positions().await.unwrap();

    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0].symbol.as_str(), "AAPL");
    assert_eq!(positions[0].quantity, dec!(300));
    assert!(positions[0].is_long());
}

fn contract() -> OptionContract {
    OptionContract::call(
        "AAPL240315C00260000",
        "AAPL",
        dec!(260),
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
    )
}

#[tokio::test]
async fn submits_sell_to_open() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "broker-1",
            "client_order_id": "overwrite-abc",
            "symbol": "AAPL240315C00260000",
            "status": "accepted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let order = OrderRequest::covered_call(
        &contract(),
        1,
        OrderStyle::Market,
        TimeInForce::Day,
        None,
    )
    .unwrap();
    let confirmation = adapter(&server).submit_order(order).await.unwrap();

    assert_eq!(confirmation.status, "accepted");
    assert_eq!(confirmation.symbol.as_str(), "AAPL240315C00260000");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["side"], "sell");
    assert_eq!(body["position_intent"], "sell_to_open");
    assert_eq!(body["qty"], "1");
}

#[tokio::test]
async fn rejected_order_surfaces_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/orders"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "code": 42210000,
            "message": "insufficient options trading level"
        })))
        .mount(&server)
        .await;

    let order = OrderRequest::covered_call(
        &contract(),
        1,
        OrderStyle::Market,
        TimeInForce::Day,
        None,
    )
    .unwrap();
    let err = adapter(&server).submit_order(order).await.unwrap_err();

    assert_eq!(
        err,
        BrokerError::OrderRejected {
            reason: "insufficient options trading level".to_string()
        }
    );
}

#[tokio::test]
async fn pages_through_option_contracts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/options/contracts"))
        .and(query_param("page_token", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "option_contracts": [
                {"symbol": "AAPL240419C00270000", "underlying_symbol": "AAPL", "type": "call",
                 "strike_price": "270", "expiration_date": "2024-04-19", "size": "100"}
            ],
            "next_page_token": null
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/options/contracts"))
        .and(query_param("underlying_symbols", "AAPL"))
        .and(query_param("type", "call"))
        .and(query_param("expiration_date_gte", "2024-01-15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "option_contracts": [
                {"symbol": "AAPL240315C00260000", "underlying_symbol": "AAPL", "type": "call",
                 "strike_price": "260", "expiration_date": "2024-03-15", "size": "100"}
            ],
            "next_page_token": "page-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let window = ExpirationWindow::new(
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
    )
    .unwrap();
    let query = ContractQuery::eligible(
        "AAPL",
        &window,
        &StrikeThreshold::new(dec!(255)),
        ContractType::Call,
    );

    let contracts = adapter(&server).get_option_contracts(query).await.unwrap();

    let symbols: Vec<&str> = contracts.iter().map(|c| c.symbol().as_str()).collect();
    assert_eq!(symbols, vec!["AAPL240315C00260000", "AAPL240419C00270000"]);
    assert!(contracts.iter().all(|c| c.multiplier() == 100));
}

#[tokio::test]
async fn latest_trade_from_data_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/stocks/AAPL/trades/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "symbol": "AAPL",
            "trade": {"t": "2024-01-01T15:59:59Z", "p": 250.12}
        })))
        .mount(&server)
        .await;

    let trade = adapter(&server)
        .get_stock_latest_trade(&Symbol::new("AAPL"))
        .await
        .unwrap();

    assert_eq!(trade.price, dec!(250.12));
}

#[tokio::test]
async fn missing_quote_is_no_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta1/options/quotes/latest"))
        .and(query_param("symbols", "AAPL240315C00260000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"quotes": {}})))
        .mount(&server)
        .await;

    let err = adapter(&server)
        .get_option_latest_quote(&Symbol::new("AAPL240315C00260000"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        MarketDataError::NoData {
            symbol: "AAPL240315C00260000".to_string()
        }
    );
}

#[tokio::test]
async fn retries_server_errors_then_gives_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/account"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let err = adapter(&server).get_account().await.unwrap_err();

    let AccountError::ConnectionError { message } = err else {
        panic!("expected connection error, got {err:?}");
    };
    assert!(message.starts_with("Max retries exceeded after 2 attempts: 503"), "{message}");
}

#[tokio::test]
async fn unreachable_host_keeps_last_network_error() {
    let config = AlpacaConfig::new("test-key", "test-secret", AlpacaEnvironment::Paper)
        .with_base_urls("http://127.0.0.1:1", "http://127.0.0.1:1")
        .with_timeout(Duration::from_secs(2))
        .with_retry(RetryConfig {
            max_attempts: 2,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(2),
            multiplier: 2.0,
            jitter: 0.0,
        });

    let err = AlpacaAdapter::new(&config)
        .unwrap()
        .get_account()
        .await
        .unwrap_err();

    let AccountError::ConnectionError { message } = err else {
        panic!("expected connection error, got {err:?}");
    };
    let prefix = "Max retries exceeded after 2 attempts: ";
    assert!(message.starts_with(prefix), "{message}");
    assert!(message.len() > prefix.len(), "{message}");
}
