//! `MarketDataPort` for Alpaca.

use async_trait::async_trait;

use crate::application::ports::{
    ContractQuery, LatestTrade, MarketDataError, MarketDataPort, OptionQuote,
};
use crate::domain::option_selection::OptionContract;
use crate::domain::shared::Symbol;

use super::adapter::AlpacaAdapter;
use super::api_types::{
    AlpacaLatestQuotesResponse, AlpacaLatestTradeResponse, AlpacaOptionContractsPage,
};

/// Page size for the contracts endpoint (Alpaca maximum).
const CONTRACTS_PAGE_LIMIT: u32 = 10_000;

/// Hard stop for a runaway `next_page_token` chain.
const MAX_CONTRACT_PAGES: usize = 50;

fn contract_query_params(query: &ContractQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("underlying_symbols", query.underlying_symbol.to_string()),
        ("status", "active".to_string()),
        ("limit", CONTRACTS_PAGE_LIMIT.to_string()),
    ];
    if let Some(date) = query.expiration_date_gte {
        params.push(("expiration_date_gte", date.to_string()));
    }
    if let Some(date) = query.expiration_date_lte {
        params.push(("expiration_date_lte", date.to_string()));
    }
    if let Some(strike) = query.strike_price_gte {
        params.push(("strike_price_gte", strike.to_string()));
    }
    if let Some(strike) = query.strike_price_lte {
        params.push(("strike_price_lte", strike.to_string()));
    }
    if let Some(contract_type) = query.contract_type {
        params.push(("type", contract_type.as_broker_str().to_string()));
    }
    params
}

#[async_trait]
impl MarketDataPort for AlpacaAdapter {
    async fn get_stock_latest_trade(&self, symbol: &Symbol) -> Result<LatestTrade, MarketDataError> {
        let response: AlpacaLatestTradeResponse = self
            .client
            .data_get(&format!("/v2/stocks/{symbol}/trades/latest"), &[])
            .await?;

        Ok(LatestTrade {
            symbol: Symbol::new(response.symbol),
            price: response.trade.price,
            timestamp: response.trade.timestamp,
        })
    }

    async fn get_option_contracts(
        &self,
        query: ContractQuery,
    ) -> Result<Vec<OptionContract>, MarketDataError> {
        let base_params = contract_query_params(&query);
        let mut contracts = Vec::new();
        let mut page_token: Option<String> = None;

        for page in 1..=MAX_CONTRACT_PAGES {
            let mut params = base_params.clone();
            if let Some(token) = &page_token {
                params.push(("page_token", token.clone()));
            }

            let response: AlpacaOptionContractsPage = self
                .client
                .get_with_query("/v2/options/contracts", &params)
                .await?;

            tracing::debug!(
                page,
                count = response.option_contracts.len(),
                underlying = %query.underlying_symbol,
                "Fetched option contracts page"
            );

            for raw in response.option_contracts {
                contracts.push(OptionContract::try_from(raw).map_err(MarketDataError::from)?);
            }

            match response.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => return Ok(contracts),
            }
        }

        tracing::warn!(
            pages = MAX_CONTRACT_PAGES,
            fetched = contracts.len(),
            "Option contract pagination truncated"
        );
        Ok(contracts)
    }

    async fn get_option_latest_quote(
        &self,
        symbol: &Symbol,
    ) -> Result<OptionQuote, MarketDataError> {
        let mut response: AlpacaLatestQuotesResponse = self
            .client
            .data_get("/v1beta1/options/quotes/latest", &[("symbols", symbol.to_string())])
            .await?;

        let quote = response
            .quotes
            .remove(symbol.as_str())
            .ok_or_else(|| MarketDataError::NoData {
                symbol: symbol.to_string(),
            })?;

        Ok(OptionQuote {
            symbol: symbol.clone(),
            bid_price: quote.bid_price,
            ask_price: quote.ask_price,
            timestamp: quote.timestamp,
        })
    }
}
