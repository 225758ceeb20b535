//! Broker acknowledgment of a submitted order.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{BrokerOrderId, ClientOrderId, Symbol};

/// Order as accepted by the broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    /// Broker-assigned id.
    pub broker_order_id: BrokerOrderId,
    /// Id the engine sent.
    pub client_order_id: ClientOrderId,
    /// Contract symbol.
    pub symbol: Symbol,
    /// Broker order status, verbatim (e.g. `accepted`, `pending_new`).
    pub status: String,
}
