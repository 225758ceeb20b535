//! `AccountPort` for Alpaca.

use async_trait::async_trait;

use crate::application::ports::{AccountConfiguration, AccountError, AccountPort, AccountSummary};
use crate::domain::risk_management::RiskPolicy;

use super::adapter::AlpacaAdapter;
use super::api_types::{AlpacaAccount, AlpacaAccountConfigurations, AlpacaConfigurationPatch};
use super::error::AlpacaError;

const ACCOUNT_PATH: &str = "/v2/account";
const CONFIGURATIONS_PATH: &str = "/v2/account/configurations";

impl AlpacaAdapter {
    async fn patch_max_options_level(&self, level: u8) -> Result<AccountConfiguration, AlpacaError> {
        let patch = AlpacaConfigurationPatch {
            max_options_trading_level: level,
        };
        let updated: AlpacaAccountConfigurations =
            self.client.patch(CONFIGURATIONS_PATH, &patch).await?;

        if updated.max_options_trading_level != Some(level) {
            return Err(AlpacaError::InvalidResponse(format!(
                "requested max_options_trading_level {level}, broker reports {:?}",
                updated.max_options_trading_level
            )));
        }

        Ok(updated.into())
    }
}

#[async_trait]
impl AccountPort for AlpacaAdapter {
    async fn get_account(&self) -> Result<AccountSummary, AccountError> {
        let account: AlpacaAccount = self.client.get(ACCOUNT_PATH).await?;
        Ok(account.into())
    }

    async fn get_account_configurations(&self) -> Result<AccountConfiguration, AccountError> {
        let config: AlpacaAccountConfigurations = self.client.get(CONFIGURATIONS_PATH).await?;
        Ok(config.into())
    }

    async fn set_account_configurations(
        &self,
        policy: RiskPolicy,
    ) -> Result<AccountConfiguration, AccountError> {
        let _guard = self.config_lock.lock().await;
        Ok(self
            .patch_max_options_level(policy.max_options_trading_level())
            .await?)
    }

    async fn propose_max_options_level(
        &self,
        expected: u8,
        proposed: u8,
    ) -> Result<AccountConfiguration, AccountError> {
        let _guard = self.config_lock.lock().await;

        let current: AlpacaAccountConfigurations = self.client.get(CONFIGURATIONS_PATH).await?;
        if current.max_options_trading_level != Some(expected) {
            tracing::warn!(
                expected,
                actual = ?current.max_options_trading_level,
                "Options level changed since it was read"
            );
            return Err(AlpacaError::Conflict {
                expected,
                actual: current.max_options_trading_level,
            }
            .into());
        }

        if self.is_live() {
            tracing::warn!(from = expected, to = proposed, "Changing LIVE account options level");
        }

        Ok(self.patch_max_options_level(proposed).await?)
    }
}
