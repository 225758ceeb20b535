//! Alpaca API request and response types.
//!
//! These types map directly to Alpaca's REST API format. Money and quantity
//! fields arrive as either JSON strings or numbers; `Decimal` accepts both.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::application::ports::{AccountConfiguration, AccountSummary, Asset};
use crate::domain::option_selection::{ContractType, OptionContract, STANDARD_MULTIPLIER};
use crate::domain::order_execution::{OrderConfirmation, OrderEvent, OrderRequest, OrderUpdate};
use crate::domain::portfolio::{Position, PositionSide};
use crate::domain::shared::{BrokerOrderId, ClientOrderId, Symbol};

use super::error::AlpacaError;

/// Error body returned by Alpaca.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaErrorResponse {
    /// Numeric or string error code.
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    /// Error message.
    #[serde(default)]
    pub message: String,
}

// ============================================================================
// Account
// ============================================================================

/// `GET /v2/account`.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaAccount {
    pub account_number: String,
    pub status: String,
    #[serde(default)]
    pub options_approved_level: Option<u8>,
    #[serde(default)]
    pub options_trading_level: Option<u8>,
    #[serde(default)]
    pub options_buying_power: Option<Decimal>,
}

impl From<AlpacaAccount> for AccountSummary {
    fn from(account: AlpacaAccount) -> Self {
        Self {
            account_number: account.account_number,
            status: account.status,
            options_approved_level: account.options_approved_level,
            options_trading_level: account.options_trading_level,
            options_buying_power: account.options_buying_power.unwrap_or_default(),
        }
    }
}

/// `GET|PATCH /v2/account/configurations`. Only the fields this engine reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlpacaAccountConfigurations {
    #[serde(default)]
    pub max_options_trading_level: Option<u8>,
}

impl From<AlpacaAccountConfigurations> for AccountConfiguration {
    fn from(config: AlpacaAccountConfigurations) -> Self {
        Self {
            max_options_trading_level: config.max_options_trading_level,
        }
    }
}

/// PATCH body changing the options level.
#[derive(Debug, Clone, Serialize)]
pub struct AlpacaConfigurationPatch {
    pub max_options_trading_level: u8,
}

// ============================================================================
// Assets and positions
// ============================================================================

/// `GET /v2/assets` item and `GET /v2/assets/{symbol}`.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaAsset {
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub tradable: bool,
    #[serde(default)]
    pub attributes: Vec<String>,
}

impl From<AlpacaAsset> for Asset {
    fn from(asset: AlpacaAsset) -> Self {
        Self {
            symbol: Symbol::new(asset.symbol),
            name: asset.name,
            status: asset.status,
            tradable: asset.tradable,
            attributes: asset.attributes,
        }
    }
}

/// `GET /v2/positions` item.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaPosition {
    pub symbol: String,
    pub qty: Decimal,
    pub side: String,
}

impl TryFrom<AlpacaPosition> for Position {
    type Error = AlpacaError;

    fn try_from(position: AlpacaPosition) -> Result<Self, Self::Error> {
        let side = match position.side.as_str() {
            "long" => PositionSide::Long,
            "short" => PositionSide::Short,
            other => {
                return Err(AlpacaError::InvalidResponse(format!(
                    "unknown position side '{other}' for {}",
                    position.symbol
                )));
            }
        };
        Ok(Self {
            symbol: Symbol::new(position.symbol),
            quantity: position.qty.abs(),
            side,
        })
    }
}

// ============================================================================
// Orders
// ============================================================================

/// `POST /v2/orders` body.
#[derive(Debug, Clone, Serialize)]
pub struct AlpacaOrderRequest {
    pub symbol: String,
    pub qty: String,
    pub side: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub time_in_force: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<String>,
    pub client_order_id: String,
    pub position_intent: String,
}

impl From<&OrderRequest> for AlpacaOrderRequest {
    fn from(order: &OrderRequest) -> Self {
        Self {
            symbol: order.symbol().to_string(),
            qty: order.qty().to_string(),
            side: order.side().as_str().to_string(),
            order_type: order.order_type().as_str().to_string(),
            time_in_force: order.time_in_force().as_str().to_string(),
            limit_price: order.limit_price().map(|p| p.to_string()),
            client_order_id: order.client_order_id().to_string(),
            position_intent: order.position_intent().as_str().to_string(),
        }
    }
}

/// Order as returned by `POST /v2/orders`, `GET /v2/orders/{id}` and the
/// trade updates stream, fields this engine reads.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaOrderResponse {
    pub id: String,
    pub client_order_id: String,
    pub symbol: String,
    pub status: String,
    #[serde(default)]
    pub filled_qty: Option<Decimal>,
    #[serde(default)]
    pub filled_avg_price: Option<Decimal>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AlpacaOrderResponse {
    /// Order state labelled with `event`.
    pub fn into_update(self, event: OrderEvent, timestamp: Option<DateTime<Utc>>) -> OrderUpdate {
        OrderUpdate {
            broker_order_id: BrokerOrderId::new(self.id),
            client_order_id: ClientOrderId::new(self.client_order_id),
            symbol: Symbol::new(self.symbol),
            event,
            filled_qty: self.filled_qty.unwrap_or_default(),
            filled_avg_price: self.filled_avg_price,
            timestamp: timestamp.or(self.updated_at),
        }
    }
}

/// A REST snapshot: the order status stands in for the event.
impl From<AlpacaOrderResponse> for OrderUpdate {
    fn from(response: AlpacaOrderResponse) -> Self {
        let event = OrderEvent::from_broker_str(&response.status);
        response.into_update(event, None)
    }
}

impl From<AlpacaOrderResponse> for OrderConfirmation {
    fn from(response: AlpacaOrderResponse) -> Self {
        Self {
            broker_order_id: BrokerOrderId::new(response.id),
            client_order_id: ClientOrderId::new(response.client_order_id),
            symbol: Symbol::new(response.symbol),
            status: response.status,
        }
    }
}

// ============================================================================
// Option contracts
// ============================================================================

/// `GET /v2/options/contracts` page.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaOptionContractsPage {
    #[serde(default)]
    pub option_contracts: Vec<AlpacaOptionContract>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// One option contract.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaOptionContract {
    pub symbol: String,
    pub underlying_symbol: String,
    #[serde(rename = "type")]
    pub contract_type: String,
    pub strike_price: Decimal,
    pub expiration_date: NaiveDate,
    #[serde(default)]
    pub size: Option<Decimal>,
}

impl TryFrom<AlpacaOptionContract> for OptionContract {
    type Error = AlpacaError;

    fn try_from(contract: AlpacaOptionContract) -> Result<Self, Self::Error> {
        let contract_type = ContractType::from_broker_str(&contract.contract_type).ok_or_else(|| {
            AlpacaError::InvalidResponse(format!(
                "unknown contract type '{}' for {}",
                contract.contract_type, contract.symbol
            ))
        })?;

        let multiplier = contract
            .size
            .and_then(|s| s.to_u32())
            .filter(|m| *m > 0)
            .unwrap_or(STANDARD_MULTIPLIER);

        Ok(Self::new(
            contract.symbol,
            contract.underlying_symbol,
            contract_type,
            contract.strike_price,
            contract.expiration_date,
        )
        .with_multiplier(multiplier))
    }
}

// ============================================================================
// Market data
// ============================================================================

/// `GET /v2/stocks/{symbol}/trades/latest`.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaLatestTradeResponse {
    pub symbol: String,
    pub trade: AlpacaTrade,
}

/// A trade.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaTrade {
    #[serde(rename = "t")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "p")]
    pub price: Decimal,
}

/// `GET /v1beta1/options/quotes/latest`.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaLatestQuotesResponse {
    #[serde(default)]
    pub quotes: HashMap<String, AlpacaQuote>,
}

/// A quote.
#[derive(Debug, Clone, Deserialize)]
pub struct AlpacaQuote {
    #[serde(rename = "t")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "bp")]
    pub bid_price: Decimal,
    #[serde(rename = "ap")]
    pub ask_price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order_execution::{OrderStyle, TimeInForce};
    use rust_decimal_macros::dec;

    #[test]
    fn contract_parses_string_strike_and_size() {
        let json = r#"{
            "id": "6e58f870-fe73-4583-81e4-b9a37892c36f",
            "symbol": "AAPL240216C00190000",
            "name": "AAPL Feb 16 2024 190 Call",
            "status": "active",
            "tradable": true,
            "expiration_date": "2024-02-16",
            "root_symbol": "AAPL",
            "underlying_symbol": "AAPL",
            "type": "call",
            "style": "american",
            "strike_price": "190",
            "size": "100"
        }"#;
        let contract: OptionContract = serde_json::from_str::<AlpacaOptionContract>(json)
            .unwrap()
            .try_into()
            .unwrap();

        assert_eq!(contract.strike_price(), dec!(190));
        assert_eq!(contract.contract_type(), ContractType::Call);
        assert_eq!(contract.multiplier(), 100);
    }

    #[test]
    fn contract_with_unknown_type_rejected() {
        let raw = AlpacaOptionContract {
            symbol: "AAPL240216X00190000".to_string(),
            underlying_symbol: "AAPL".to_string(),
            contract_type: "straddle".to_string(),
            strike_price: dec!(190),
            expiration_date: NaiveDate::from_ymd_opt(2024, 2, 16).unwrap(),
            size: None,
        };
        assert!(OptionContract::try_from(raw).is_err());
    }

    #[test]
    fn position_side_mapping() {
        let json = r#"{"symbol": "AAPL", "qty": "-300", "side": "short", "asset_class": "us_equity"}"#;
        let position: Position = serde_json::from_str::<AlpacaPosition>(json)
            .unwrap()
            .try_into()
            .unwrap();
        assert_eq!(position.side, PositionSide::Short);
        assert_eq!(position.quantity, dec!(300));
    }

    #[test]
    fn order_request_wire_format() {
        let contract = OptionContract::call(
            "AAPL240216C00260000",
            "AAPL",
            dec!(260),
            NaiveDate::from_ymd_opt(2024, 2, 16).unwrap(),
        );
        let order = OrderRequest::covered_call(
            &contract,
            2,
            OrderStyle::LimitAtBid,
            TimeInForce::Day,
            Some(dec!(3.15)),
        )
        .unwrap()
        .with_client_order_id(ClientOrderId::new("cc-AAPL-1"));

        let json = serde_json::to_value(AlpacaOrderRequest::from(&order)).unwrap();
        assert_eq!(json["symbol"], "AAPL240216C00260000");
        assert_eq!(json["qty"], "2");
        assert_eq!(json["side"], "sell");
        assert_eq!(json["type"], "limit");
        assert_eq!(json["time_in_force"], "day");
        assert_eq!(json["limit_price"], "3.15");
        assert_eq!(json["client_order_id"], "cc-AAPL-1");
        assert_eq!(json["position_intent"], "sell_to_open");
    }

    #[test]
    fn market_order_omits_limit_price() {
        let contract = OptionContract::call(
            "AAPL240216C00260000",
            "AAPL",
            dec!(260),
            NaiveDate::from_ymd_opt(2024, 2, 16).unwrap(),
        );
        let order =
            OrderRequest::covered_call(&contract, 1, OrderStyle::Market, TimeInForce::Day, None)
                .unwrap();
        let json = serde_json::to_value(AlpacaOrderRequest::from(&order)).unwrap();
        assert!(json.get("limit_price").is_none());
    }

    #[test]
    fn order_snapshot_becomes_update() {
        let json = r#"{
            "id": "61e69015-8549-4bfd-b9c3-01e75843f47d",
            "client_order_id": "overwrite-AAPL-1",
            "symbol": "AAPL240216C00260000",
            "status": "filled",
            "filled_qty": "2",
            "filled_avg_price": "3.15",
            "updated_at": "2024-01-02T15:31:07.104Z"
        }"#;
        let update: OrderUpdate = serde_json::from_str::<AlpacaOrderResponse>(json)
            .unwrap()
            .into();
        assert_eq!(update.event, OrderEvent::Fill);
        assert!(update.is_terminal());
        assert_eq!(update.filled_qty, dec!(2));
        assert_eq!(update.filled_avg_price, Some(dec!(3.15)));
        assert!(update.timestamp.is_some());
    }

    #[test]
    fn accepted_order_has_nothing_filled() {
        let json = r#"{"id":"o-1","client_order_id":"c-1","symbol":"AAPL240216C00260000","status":"accepted","filled_qty":"0","filled_avg_price":null}"#;
        let update: OrderUpdate = serde_json::from_str::<AlpacaOrderResponse>(json)
            .unwrap()
            .into();
        assert_eq!(update.event, OrderEvent::New);
        assert_eq!(update.filled_qty, Decimal::ZERO);
        assert_eq!(update.filled_avg_price, None);
    }

    #[test]
    fn latest_trade_accepts_numeric_price() {
        let json = r#"{"symbol":"AAPL","trade":{"t":"2024-01-02T15:59:59.123Z","x":"V","p":185.64,"s":100,"c":["@"],"i":1,"z":"C"}}"#;
        let response: AlpacaLatestTradeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.trade.price, dec!(185.64));
    }

    #[test]
    fn account_without_options_fields() {
        let json = r#"{"account_number":"PA3ABC","status":"ACTIVE","cash":"1000"}"#;
        let summary: AccountSummary = serde_json::from_str::<AlpacaAccount>(json).unwrap().into();
        assert_eq!(summary.options_trading_level, None);
        assert_eq!(summary.options_buying_power, Decimal::ZERO);
    }
}
