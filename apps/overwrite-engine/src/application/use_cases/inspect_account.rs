//! Inspect Account Use Case
//!
//! Read-only snapshot of the account taken before an overwrite run.

use std::sync::Arc;

use crate::application::dto::AccountSnapshot;
use crate::application::ports::{AccountError, AccountPort, AssetFilter, BrokerError, BrokerPort};

/// Errors while inspecting the account.
#[derive(Debug, thiserror::Error)]
pub enum InspectAccountError {
    /// Account port failure.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// Broker port failure.
    #[error(transparent)]
    Broker(#[from] BrokerError),
}

/// Use case collecting an [`AccountSnapshot`].
pub struct InspectAccountUseCase<A, B>
where
    A: AccountPort,
    B: BrokerPort,
{
    account: Arc<A>,
    broker: Arc<B>,
}

impl<A, B> InspectAccountUseCase<A, B>
where
    A: AccountPort,
    B: BrokerPort,
{
    /// Create a new use case.
    pub const fn new(account: Arc<A>, broker: Arc<B>) -> Self {
        Self { account, broker }
    }

    /// Collect the snapshot.
    pub async fn execute(&self) -> Result<AccountSnapshot, InspectAccountError> {
        let account = self.account.get_account().await?;
        let configuration = self.account.get_account_configurations().await?;
        let positions = self.broker.get_all_positions().await?;
        let optionable_assets = self
            .broker
            .get_all_assets(AssetFilter::optionable_equities())
            .await?
            .len();

        tracing::info!(
            account = %account.account_number,
            approved_level = ?account.options_approved_level,
            trading_level = ?account.options_trading_level,
            max_level = ?configuration.max_options_trading_level,
            positions = positions.len(),
            optionable_assets,
            "Account inspected"
        );

        Ok(AccountSnapshot {
            account,
            configuration,
            positions,
            optionable_assets,
        })
    }
}
