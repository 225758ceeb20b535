//! `BrokerPort` for Alpaca.

use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{Asset, AssetFilter, BrokerError, BrokerPort};
use crate::domain::order_execution::{OrderConfirmation, OrderRequest, OrderUpdate};
use crate::domain::portfolio::Position;
use crate::domain::shared::Symbol;

use super::adapter::AlpacaAdapter;
use super::api_types::{AlpacaAsset, AlpacaOrderRequest, AlpacaOrderResponse, AlpacaPosition};

#[async_trait]
impl BrokerPort for AlpacaAdapter {
    async fn get_all_assets(&self, filter: AssetFilter) -> Result<Vec<Asset>, BrokerError> {
        let mut query = Vec::new();
        if let Some(status) = &filter.status {
            query.push(("status", status.clone()));
        }
        if let Some(asset_class) = &filter.asset_class {
            query.push(("asset_class", asset_class.clone()));
        }
        if !filter.attributes.is_empty() {
            query.push(("attributes", filter.attributes.join(",")));
        }

        let assets: Vec<AlpacaAsset> = self.client.get_with_query("/v2/assets", &query).await?;
        tracing::debug!(count = assets.len(), "Fetched assets");
        Ok(assets.into_iter().map(Asset::from).collect())
    }

    async fn get_asset(&self, symbol: &Symbol) -> Result<Asset, BrokerError> {
        let asset: AlpacaAsset = self.client.get(&format!("/v2/assets/{symbol}")).await?;
        Ok(asset.into())
    }

    async fn get_all_positions(&self) -> Result<Vec<Position>, BrokerError> {
        let positions: Vec<AlpacaPosition> = self.client.get("/v2/positions").await?;
        positions
            .into_iter()
            .map(|p| Position::try_from(p).map_err(BrokerError::from))
            .collect()
    }

    async fn submit_order(&self, order: OrderRequest) -> Result<OrderConfirmation, BrokerError> {
        if self.is_live() {
            tracing::warn!(
                client_order_id = %order.client_order_id(),
                symbol = %order.symbol(),
                "Submitting LIVE order - this will execute real trades"
            );
        }

        let request = AlpacaOrderRequest::from(&order);
        tracing::info!(
            client_order_id = %request.client_order_id,
            symbol = %request.symbol,
            side = %request.side,
            order_type = %request.order_type,
            qty = %request.qty,
            limit_price = ?request.limit_price,
            position_intent = %request.position_intent,
            "Submitting order to Alpaca"
        );

        let response: AlpacaOrderResponse = self.client.post("/v2/orders", &request).await?;
        Ok(response.into())
    }

    async fn await_order_update(
        &self,
        confirmation: &OrderConfirmation,
        timeout: Duration,
    ) -> Result<Option<OrderUpdate>, BrokerError> {
        let mut latest = None;
        let followed = tokio::time::timeout(timeout, self.follow_order(confirmation, &mut latest)).await;
        match followed {
            Ok(result) => result?,
            Err(_) => tracing::info!(
                client_order_id = %confirmation.client_order_id,
                timeout_ms = timeout.as_millis(),
                last_event = ?latest.as_ref().map(|u: &OrderUpdate| u.event),
                "Order follow-up window ended before a terminal event"
            ),
        }
        Ok(latest)
    }
}
