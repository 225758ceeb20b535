//! Order lifecycle updates observed after submission.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{BrokerOrderId, ClientOrderId, Symbol};

/// Lifecycle event reported for a submitted order.
///
/// Covers both trade-stream events (`fill`, `partial_fill`) and REST order
/// statuses (`filled`, `partially_filled`), which map onto the same variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderEvent {
    /// Submitted, not yet acknowledged.
    PendingNew,
    /// Accepted and working.
    New,
    /// Some contracts filled.
    PartialFill,
    /// Completely filled.
    Fill,
    /// Canceled.
    Canceled,
    /// Expired unfilled.
    Expired,
    /// Done for the day.
    DoneForDay,
    /// Replaced by another order.
    Replaced,
    /// Rejected by the broker or exchange.
    Rejected,
    /// Anything else (pending cancel, suspended, ...).
    #[serde(other)]
    Other,
}

impl OrderEvent {
    /// Map a broker event or order status name.
    #[must_use]
    pub fn from_broker_str(value: &str) -> Self {
        match value {
            "pending_new" => Self::PendingNew,
            "new" | "accepted" => Self::New,
            "partial_fill" | "partially_filled" => Self::PartialFill,
            "fill" | "filled" => Self::Fill,
            "canceled" => Self::Canceled,
            "expired" => Self::Expired,
            "done_for_day" => Self::DoneForDay,
            "replaced" => Self::Replaced,
            "rejected" => Self::Rejected,
            _ => Self::Other,
        }
    }

    /// No further fills can follow.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Fill
                | Self::Canceled
                | Self::Expired
                | Self::DoneForDay
                | Self::Replaced
                | Self::Rejected
        )
    }

    /// Snake-case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PendingNew => "pending_new",
            Self::New => "new",
            Self::PartialFill => "partial_fill",
            Self::Fill => "fill",
            Self::Canceled => "canceled",
            Self::Expired => "expired",
            Self::DoneForDay => "done_for_day",
            Self::Replaced => "replaced",
            Self::Rejected => "rejected",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for OrderEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest known state of a submitted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    /// Broker-assigned id.
    pub broker_order_id: BrokerOrderId,
    /// Id the engine sent.
    pub client_order_id: ClientOrderId,
    /// Contract symbol.
    pub symbol: Symbol,
    /// Event that produced this state.
    pub event: OrderEvent,
    /// Contracts filled so far.
    pub filled_qty: Decimal,
    /// Average fill price, once anything filled.
    pub filled_avg_price: Option<Decimal>,
    /// Event time, when the broker reports one.
    pub timestamp: Option<DateTime<Utc>>,
}

impl OrderUpdate {
    /// No further fills can follow.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.event.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("fill", OrderEvent::Fill ; "stream fill")]
    #[test_case("filled", OrderEvent::Fill ; "rest filled")]
    #[test_case("partially_filled", OrderEvent::PartialFill ; "rest partial")]
    #[test_case("accepted", OrderEvent::New ; "accepted is working")]
    #[test_case("pending_cancel", OrderEvent::Other ; "unmodelled status")]
    fn broker_names(name: &str, expected: OrderEvent) {
        assert_eq!(OrderEvent::from_broker_str(name), expected);
    }

    #[test]
    fn terminal_events() {
        assert!(OrderEvent::Fill.is_terminal());
        assert!(OrderEvent::Rejected.is_terminal());
        assert!(OrderEvent::Expired.is_terminal());
        assert!(!OrderEvent::New.is_terminal());
        assert!(!OrderEvent::PartialFill.is_terminal());
        assert!(!OrderEvent::Other.is_terminal());
    }

    #[test]
    fn unknown_event_deserializes_as_other() {
        let event: OrderEvent = serde_json::from_str("\"order_cancel_rejected\"").unwrap();
        assert_eq!(event, OrderEvent::Other);
        let event: OrderEvent = serde_json::from_str("\"partial_fill\"").unwrap();
        assert_eq!(event, OrderEvent::PartialFill);
    }
}
