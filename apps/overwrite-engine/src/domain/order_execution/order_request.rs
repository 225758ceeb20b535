//! Covered-call order construction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::option_selection::OptionContract;
use crate::domain::order_execution::value_objects::{
    OrderSide, OrderType, PositionIntent, TimeInForce,
};
use crate::domain::shared::{ClientOrderId, DomainError, Symbol};

/// How the overwrite order is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStyle {
    /// Market order.
    #[default]
    Market,
    /// Limit order at the contract's latest bid.
    LimitAtBid,
}

impl OrderStyle {
    /// Whether the style needs a quote before the order can be built.
    #[must_use]
    pub const fn needs_quote(&self) -> bool {
        matches!(self, Self::LimitAtBid)
    }
}

/// An order ready to be submitted to the broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    client_order_id: ClientOrderId,
    symbol: Symbol,
    side: OrderSide,
    order_type: OrderType,
    qty: u32,
    time_in_force: TimeInForce,
    limit_price: Option<Decimal>,
    position_intent: PositionIntent,
}

impl OrderRequest {
    /// Build a sell-to-open order writing `qty` contracts of `contract`.
    ///
    /// `bid` is required for [`OrderStyle::LimitAtBid`] and ignored otherwise.
    pub fn covered_call(
        contract: &OptionContract,
        qty: u32,
        style: OrderStyle,
        time_in_force: TimeInForce,
        bid: Option<Decimal>,
    ) -> Result<Self, DomainError> {
        contract.symbol().validate()?;

        if qty == 0 {
            return Err(DomainError::InvalidValue {
                field: "qty".to_string(),
                message: "order quantity must be at least 1".to_string(),
            });
        }

        let (order_type, limit_price) = match style {
            OrderStyle::Market => (OrderType::Market, None),
            OrderStyle::LimitAtBid => match bid {
                Some(price) if price > Decimal::ZERO => (OrderType::Limit, Some(price)),
                _ => {
                    return Err(DomainError::InvalidValue {
                        field: "limit_price".to_string(),
                        message: format!("no positive bid quoted for {}", contract.symbol()),
                    });
                }
            },
        };

        Ok(Self {
            client_order_id: ClientOrderId::for_overwrite(contract.underlying_symbol().as_str()),
            symbol: contract.symbol().clone(),
            side: OrderSide::Sell,
            order_type,
            qty,
            time_in_force,
            limit_price,
            position_intent: PositionIntent::SellToOpen,
        })
    }

    /// Replace the generated client order id.
    #[must_use]
    pub fn with_client_order_id(mut self, client_order_id: ClientOrderId) -> Self {
        self.client_order_id = client_order_id;
        self
    }

    /// Get the client order id.
    #[must_use]
    pub const fn client_order_id(&self) -> &ClientOrderId {
        &self.client_order_id
    }

    /// Get the contract symbol.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Get the side.
    #[must_use]
    pub const fn side(&self) -> OrderSide {
        self.side
    }

    /// Get the order type.
    #[must_use]
    pub const fn order_type(&self) -> OrderType {
        self.order_type
    }

    /// Get the number of contracts.
    #[must_use]
    pub const fn qty(&self) -> u32 {
        self.qty
    }

    /// Get the time in force.
    #[must_use]
    pub const fn time_in_force(&self) -> TimeInForce {
        self.time_in_force
    }

    /// Get the limit price.
    #[must_use]
    pub const fn limit_price(&self) -> Option<Decimal> {
        self.limit_price
    }

    /// Get the position intent.
    #[must_use]
    pub const fn position_intent(&self) -> PositionIntent {
        self.position_intent
    }
}
