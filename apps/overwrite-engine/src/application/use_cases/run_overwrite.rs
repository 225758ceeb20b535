//! Run Overwrite Use Case
//!
//! One covered-call evaluation run for one underlying:
//! 1. Read the account's risk configuration and pass it through the risk gate
//! 2. Lower the account's level atomically when the gate asks for it
//! 3. Snapshot the underlying and compute the eligibility inputs once
//! 4. Fetch, filter and rank option contracts
//! 5. Size against the long share position and build a sell-to-open order
//! 6. Submit it, or stop at a dry run
//! 7. Follow the submitted order for a bounded window
//!
//! No order is built until both the filter and the gate have passed.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::application::dto::{GateSummary, OverwriteOutcome, OverwriteReport};
use crate::application::ports::{
    AccountError, AccountPort, BrokerError, BrokerPort, ContractQuery, MarketDataError,
    MarketDataPort,
};
use crate::domain::option_selection::{EligibilityFilter, SelectionError, Underlying};
use crate::domain::order_execution::{
    OrderConfirmation, OrderEvent, OrderRequest, OrderStyle, OrderUpdate, TimeInForce,
};
use crate::domain::portfolio::coverable_contracts;
use crate::domain::risk_management::{
    MAX_OPTIONS_LEVEL, RiskGateError, RiskGateRun, RiskViolation,
};
use crate::domain::shared::{DomainError, Symbol};
use crate::observability::{
    record_eligible_contracts, record_overwrite_run, record_risk_gate_decision,
};

/// Parameters of one overwrite run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverwriteParams {
    /// Underlying to write calls on.
    pub underlying: Symbol,
    /// Eligibility criteria.
    pub filter: EligibilityFilter,
    /// Options trading level the run asks for.
    pub desired_level: u8,
    /// Policy ceiling for the desired level.
    pub policy_ceiling: u8,
    /// Upper bound on contracts written per run.
    pub max_contracts: u32,
    /// Market or limit at bid.
    pub order_style: OrderStyle,
    /// Order time in force.
    pub time_in_force: TimeInForce,
    /// Submit the order instead of stopping at a dry run.
    pub execute: bool,
    /// How long to follow a submitted order's updates; `None` skips it.
    pub follow_updates: Option<Duration>,
}

impl OverwriteParams {
    /// Dry-run parameters for `underlying` with default criteria.
    #[must_use]
    pub fn new(underlying: impl Into<Symbol>) -> Self {
        Self {
            underlying: underlying.into(),
            filter: EligibilityFilter::default(),
            desired_level: 1,
            policy_ceiling: 1,
            max_contracts: 1,
            order_style: OrderStyle::Market,
            time_in_force: TimeInForce::Day,
            execute: false,
            follow_updates: None,
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        self.underlying.validate()?;

        for (field, level) in [
            ("desired_level", self.desired_level),
            ("policy_ceiling", self.policy_ceiling),
        ] {
            if level > MAX_OPTIONS_LEVEL {
                return Err(DomainError::InvalidValue {
                    field: field.to_string(),
                    message: format!("level {level} exceeds maximum {MAX_OPTIONS_LEVEL}"),
                });
            }
        }

        if self.max_contracts == 0 {
            return Err(DomainError::InvalidValue {
                field: "max_contracts".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

/// Errors that abort an overwrite run.
#[derive(Debug, thiserror::Error)]
pub enum RunOverwriteError {
    /// Eligibility inputs were invalid.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// The risk gate refused the run.
    #[error(transparent)]
    Risk(#[from] RiskViolation),

    /// Invalid parameters or an out-of-order gate step.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The underlying has no listed options.
    #[error("Underlying {symbol} is not options enabled")]
    UnderlyingNotOptionable {
        /// Ticker.
        symbol: Symbol,
    },

    /// Account port failure.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// Broker port failure.
    #[error(transparent)]
    Broker(#[from] BrokerError),

    /// Market data port failure.
    #[error(transparent)]
    MarketData(#[from] MarketDataError),
}

impl From<RiskGateError> for RunOverwriteError {
    fn from(err: RiskGateError) -> Self {
        match err {
            RiskGateError::Violation(violation) => Self::Risk(violation),
            RiskGateError::Transition(err) => Self::Domain(err),
        }
    }
}

impl RunOverwriteError {
    /// Metric label for a failed run.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Selection(_) | Self::Domain(_) => "invalid_input",
            Self::Risk(_) => "risk_rejected",
            Self::UnderlyingNotOptionable { .. } => "not_optionable",
            Self::Account(_) | Self::Broker(_) | Self::MarketData(_) => "port_error",
        }
    }
}

/// Use case running one covered-call overwrite.
pub struct RunOverwriteUseCase<A, B, M>
where
    A: AccountPort,
    B: BrokerPort,
    M: MarketDataPort,
{
    account: Arc<A>,
    broker: Arc<B>,
    market_data: Arc<M>,
}

impl<A, B, M> RunOverwriteUseCase<A, B, M>
where
    A: AccountPort,
    B: BrokerPort,
    M: MarketDataPort,
{
    /// Create a new use case.
    pub const fn new(account: Arc<A>, broker: Arc<B>, market_data: Arc<M>) -> Self {
        Self {
            account,
            broker,
            market_data,
        }
    }

    /// Execute one run anchored to `today`.
    pub async fn execute(
        &self,
        params: &OverwriteParams,
        today: NaiveDate,
    ) -> Result<OverwriteReport, RunOverwriteError> {
        let result = self.run(params, today).await;

        let label = match &result {
            Ok(report) => report.outcome.label(),
            Err(err) => err.label(),
        };
        record_overwrite_run(params.underlying.as_str(), label);

        if let Err(err) = &result {
            tracing::error!(
                underlying = %params.underlying,
                error = %err,
                "Overwrite run aborted"
            );
        }

        result
    }

    async fn run(
        &self,
        params: &OverwriteParams,
        today: NaiveDate,
    ) -> Result<OverwriteReport, RunOverwriteError> {
        params.validate()?;
        let symbol = &params.underlying;

        tracing::info!(underlying = %symbol, %today, execute = params.execute, "Starting overwrite run");

        // Risk gate
        let mut gate = RiskGateRun::new();
        let config = self.account.get_account_configurations().await?;
        gate.record_config_read(config.max_options_trading_level)?;

        let authorization = match gate.decide(params.desired_level, params.policy_ceiling) {
            Ok(authorization) => {
                record_risk_gate_decision("authorized");
                authorization
            }
            Err(err) => {
                if let RiskGateError::Violation(violation) = &err {
                    record_risk_gate_decision(violation.reason.as_str());
                    tracing::warn!(
                        reason = %violation.reason,
                        desired_level = params.desired_level,
                        policy_ceiling = params.policy_ceiling,
                        "Risk gate rejected run"
                    );
                }
                return Err(err.into());
            }
        };

        let mut level_written = false;
        if authorization.lowers_level() {
            self.account
                .propose_max_options_level(authorization.current_level, authorization.desired_level)
                .await?;
            gate.record_config_written()?;
            level_written = true;
            tracing::info!(
                from = authorization.current_level,
                to = authorization.desired_level,
                "Lowered max options trading level"
            );
        }

        let gate_summary = GateSummary {
            state: gate.state(),
            current_level: gate.current_level(),
            effective_level: authorization.effective_level(),
            level_written,
        };

        authorization.ensure_covered_calls()?;

        // Underlying snapshot
        let asset = self.broker.get_asset(symbol).await?;
        if !asset.options_enabled() {
            return Err(RunOverwriteError::UnderlyingNotOptionable {
                symbol: symbol.clone(),
            });
        }

        let trade = self.market_data.get_stock_latest_trade(symbol).await?;
        let underlying = Underlying::new(symbol.clone(), trade.price, true);

        // Eligibility
        let filter = &params.filter;
        let window = filter.window(today)?;
        let threshold = filter.threshold(underlying.last_price)?;

        tracing::debug!(
            min_date = %window.min_date(),
            max_date = %window.max_date(),
            min_strike = %threshold.min_strike(),
            "Computed eligibility inputs"
        );

        let query = ContractQuery::eligible(symbol.clone(), &window, &threshold, filter.contract_type);
        let contracts = self.market_data.get_option_contracts(query).await?;
        let eligibility = filter.apply(window, threshold, &contracts);

        record_eligible_contracts(symbol.as_str(), eligibility.candidates.len());
        tracing::info!(
            fetched = contracts.len(),
            eligible = eligibility.candidates.len(),
            "Filtered option contracts"
        );

        let mut report = OverwriteReport {
            today,
            underlying,
            window,
            min_strike: threshold.min_strike(),
            eligible_count: eligibility.candidates.len(),
            selected: eligibility.best().cloned(),
            coverable_contracts: None,
            gate: gate_summary,
            outcome: OverwriteOutcome::NoEligibleContracts,
        };

        let Some(best) = eligibility.best() else {
            return Ok(report);
        };

        // Sizing
        let positions = self.broker.get_all_positions().await?;
        let coverable =
            coverable_contracts(&positions, symbol, best.multiplier()).min(params.max_contracts);
        report.coverable_contracts = Some(coverable);

        if coverable == 0 {
            report.outcome = OverwriteOutcome::InsufficientShares {
                shares_per_contract: best.multiplier(),
            };
            return Ok(report);
        }

        // Order
        let bid = if params.order_style.needs_quote() {
            let quote = self.market_data.get_option_latest_quote(best.symbol()).await?;
            Some(quote.bid_price)
        } else {
            None
        };

        let order = OrderRequest::covered_call(
            best,
            coverable,
            params.order_style,
            params.time_in_force,
            bid,
        )?;

        if !params.execute {
            tracing::info!(
                contract = %order.symbol(),
                qty = order.qty(),
                "Dry run, order not submitted"
            );
            report.outcome = OverwriteOutcome::DryRun { order };
            return Ok(report);
        }

        tracing::warn!(
            contract = %order.symbol(),
            qty = order.qty(),
            order_type = %order.order_type(),
            client_order_id = %order.client_order_id(),
            "Submitting covered call order"
        );
        let confirmation = self.broker.submit_order(order.clone()).await?;
        tracing::info!(
            broker_order_id = %confirmation.broker_order_id,
            status = %confirmation.status,
            "Order accepted"
        );

        let update = match params.follow_updates {
            Some(timeout) => self.follow_up(&confirmation, timeout).await?,
            None => None,
        };

        report.outcome = OverwriteOutcome::Submitted {
            order,
            confirmation,
            update,
        };
        Ok(report)
    }

    /// Wait for the submitted order to settle.
    ///
    /// The order is already placed, so a failed follow-up only loses the
    /// update. A rejection fails the run.
    async fn follow_up(
        &self,
        confirmation: &OrderConfirmation,
        timeout: Duration,
    ) -> Result<Option<OrderUpdate>, RunOverwriteError> {
        let update = match self.broker.await_order_update(confirmation, timeout).await {
            Ok(update) => update,
            Err(err) => {
                tracing::warn!(
                    client_order_id = %confirmation.client_order_id,
                    error = %err,
                    "Order follow-up failed; order remains submitted"
                );
                return Ok(None);
            }
        };

        match &update {
            Some(update) if update.event == OrderEvent::Rejected => {
                return Err(BrokerError::OrderRejected {
                    reason: format!(
                        "order {} rejected after submission",
                        update.client_order_id
                    ),
                }
                .into());
            }
            Some(update) => tracing::info!(
                client_order_id = %update.client_order_id,
                event = %update.event,
                filled_qty = %update.filled_qty,
                filled_avg_price = ?update.filled_avg_price,
                "Order follow-up finished"
            ),
            None => tracing::info!(
                client_order_id = %confirmation.client_order_id,
                "No order update within follow-up window"
            ),
        }
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        AccountConfiguration, Asset, LatestTrade, MockAccountPort, MockBrokerPort,
        MockMarketDataPort, OptionQuote,
    };
    use crate::domain::option_selection::OptionContract;
    use crate::domain::order_execution::{OrderConfirmation, OrderType};
    use crate::domain::portfolio::Position;
    use crate::domain::risk_management::{GateState, ViolationReason};
    use crate::domain::shared::BrokerOrderId;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn account_at(level: Option<u8>) -> MockAccountPort {
        let mut account = MockAccountPort::new();
        account.expect_get_account_configurations().returning(move || {
            Ok(AccountConfiguration {
                max_options_trading_level: level,
            })
        });
        account
    }

    fn optionable_asset(symbol: &Symbol) -> Asset {
        Asset {
            symbol: symbol.clone(),
            name: "Apple Inc.".to_string(),
            status: "active".to_string(),
            tradable: true,
            attributes: vec!["options_enabled".to_string()],
        }
    }

    fn broker_with_shares(shares: rust_decimal::Decimal) -> MockBrokerPort {
        let mut broker = MockBrokerPort::new();
        broker
            .expect_get_asset()
            .returning(|symbol| Ok(optionable_asset(symbol)));
        broker
            .expect_get_all_positions()
            .returning(move || Ok(vec![Position::long("AAPL", shares)]));
        broker
    }

    fn market_data() -> MockMarketDataPort {
        let mut market_data = MockMarketDataPort::new();
        market_data.expect_get_stock_latest_trade().returning(|symbol| {
            Ok(LatestTrade {
                symbol: symbol.clone(),
                price: dec!(250.00),
                timestamp: Utc::now(),
            })
        });
        market_data.expect_get_option_contracts().returning(|query| {
            assert_eq!(query.strike_price_gte, Some(dec!(255.00)));
            Ok(vec![
                OptionContract::call("AAPL240315C00260000", "AAPL", dec!(260), date(3, 15)),
                OptionContract::call("AAPL240216C00265000", "AAPL", dec!(265), date(2, 16)),
                OptionContract::call("AAPL240216C00250000", "AAPL", dec!(250), date(2, 16)),
            ])
        });
        market_data
    }

    fn use_case(
        account: MockAccountPort,
        broker: MockBrokerPort,
        market_data: MockMarketDataPort,
    ) -> RunOverwriteUseCase<MockAccountPort, MockBrokerPort, MockMarketDataPort> {
        RunOverwriteUseCase::new(Arc::new(account), Arc::new(broker), Arc::new(market_data))
    }

    #[tokio::test]
    async fn dry_run_builds_order_without_submitting() {
        let mut broker = broker_with_shares(dec!(300));
        broker.expect_submit_order().never();

        let params = OverwriteParams {
            max_contracts: 5,
            ..OverwriteParams::new("AAPL")
        };
        let report = use_case(account_at(Some(1)), broker, market_data())
            .execute(&params, today())
            .await
            .unwrap();

        assert_eq!(report.min_strike, dec!(255.00));
        assert_eq!(report.eligible_count, 2);
        assert_eq!(
            report.selected.as_ref().unwrap().symbol().as_str(),
            "AAPL240216C00265000"
        );
        assert_eq!(report.coverable_contracts, Some(3));
        assert_eq!(report.gate.state, GateState::Authorized);
        assert!(!report.gate.level_written);

        let OverwriteOutcome::DryRun { order } = report.outcome else {
            panic!("expected dry run, got {:?}", report.outcome);
        };
        assert_eq!(order.qty(), 3);
        assert_eq!(order.order_type(), OrderType::Market);
    }

    #[tokio::test]
    async fn execute_submits_limit_at_bid() {
        let mut broker = broker_with_shares(dec!(100));
        broker.expect_submit_order().times(1).returning(|order| {
            assert_eq!(order.limit_price(), Some(dec!(4.10)));
            Ok(OrderConfirmation {
                broker_order_id: BrokerOrderId::new("broker-1"),
                client_order_id: order.client_order_id().clone(),
                symbol: order.symbol().clone(),
                status: "accepted".to_string(),
            })
        });

        let mut market_data = market_data();
        market_data
            .expect_get_option_latest_quote()
            .returning(|symbol| {
                Ok(OptionQuote {
                    symbol: symbol.clone(),
                    bid_price: dec!(4.10),
                    ask_price: dec!(4.30),
                    timestamp: Utc::now(),
                })
            });

        let params = OverwriteParams {
            order_style: OrderStyle::LimitAtBid,
            execute: true,
            ..OverwriteParams::new("AAPL")
        };
        let report = use_case(account_at(Some(1)), broker, market_data)
            .execute(&params, today())
            .await
            .unwrap();

        let OverwriteOutcome::Submitted { confirmation, .. } = report.outcome else {
            panic!("expected submission");
        };
        assert_eq!(confirmation.broker_order_id.as_str(), "broker-1");
    }

    fn submitting_broker(event: Result<OrderEvent, BrokerError>) -> MockBrokerPort {
        let mut broker = broker_with_shares(dec!(200));
        broker.expect_submit_order().times(1).returning(|order| {
            Ok(OrderConfirmation {
                broker_order_id: BrokerOrderId::new("broker-7"),
                client_order_id: order.client_order_id().clone(),
                symbol: order.symbol().clone(),
                status: "accepted".to_string(),
            })
        });
        broker
            .expect_await_order_update()
            .times(1)
            .returning(move |confirmation, timeout| {
                assert_eq!(timeout, Duration::from_secs(5));
                let event = event.clone()?;
                Ok(Some(OrderUpdate {
                    broker_order_id: confirmation.broker_order_id.clone(),
                    client_order_id: confirmation.client_order_id.clone(),
                    symbol: confirmation.symbol.clone(),
                    event,
                    filled_qty: if event == OrderEvent::Fill { dec!(2) } else { dec!(0) },
                    filled_avg_price: (event == OrderEvent::Fill).then_some(dec!(4.05)),
                    timestamp: Some(Utc::now()),
                }))
            });
        broker
    }

    fn following_params() -> OverwriteParams {
        OverwriteParams {
            max_contracts: 2,
            execute: true,
            follow_updates: Some(Duration::from_secs(5)),
            ..OverwriteParams::new("AAPL")
        }
    }

    #[tokio::test]
    async fn submitted_order_followed_to_fill() {
        let report = use_case(
            account_at(Some(1)),
            submitting_broker(Ok(OrderEvent::Fill)),
            market_data(),
        )
        .execute(&following_params(), today())
        .await
        .unwrap();

        let OverwriteOutcome::Submitted { update, .. } = report.outcome else {
            panic!("expected submission");
        };
        let update = update.unwrap();
        assert!(update.is_terminal());
        assert_eq!(update.filled_qty, dec!(2));
        assert_eq!(update.filled_avg_price, Some(dec!(4.05)));
    }

    #[tokio::test]
    async fn rejection_after_submit_fails_run() {
        let err = use_case(
            account_at(Some(1)),
            submitting_broker(Ok(OrderEvent::Rejected)),
            market_data(),
        )
        .execute(&following_params(), today())
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            RunOverwriteError::Broker(BrokerError::OrderRejected { .. })
        ));
    }

    #[tokio::test]
    async fn follow_up_failure_keeps_submission() {
        let broker = submitting_broker(Err(BrokerError::ConnectionError {
            message: "stream ended".to_string(),
        }));
        let report = use_case(account_at(Some(1)), broker, market_data())
            .execute(&following_params(), today())
            .await
            .unwrap();

        assert!(matches!(
            report.outcome,
            OverwriteOutcome::Submitted { update: None, .. }
        ));
    }

    #[tokio::test]
    async fn without_follow_window_no_update_is_awaited() {
        let mut broker = broker_with_shares(dec!(100));
        broker.expect_submit_order().times(1).returning(|order| {
            Ok(OrderConfirmation {
                broker_order_id: BrokerOrderId::new("broker-8"),
                client_order_id: order.client_order_id().clone(),
                symbol: order.symbol().clone(),
                status: "accepted".to_string(),
            })
        });
        broker.expect_await_order_update().never();

        let params = OverwriteParams {
            execute: true,
            ..OverwriteParams::new("AAPL")
        };
        let report = use_case(account_at(Some(1)), broker, market_data())
            .execute(&params, today())
            .await
            .unwrap();
        assert_eq!(report.outcome.label(), "submitted");
    }

    #[tokio::test]
    async fn ceiling_violation_aborts_before_any_write() {
        let mut account = account_at(Some(2));
        account.expect_propose_max_options_level().never();
        account.expect_set_account_configurations().never();
        let mut broker = MockBrokerPort::new();
        broker.expect_get_asset().never();
        broker.expect_submit_order().never();

        let params = OverwriteParams {
            desired_level: 2,
            policy_ceiling: 1,
            ..OverwriteParams::new("AAPL")
        };
        let err = use_case(account, broker, MockMarketDataPort::new())
            .execute(&params, today())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RunOverwriteError::Risk(RiskViolation {
                reason: ViolationReason::CeilingExceeded,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn misconfigured_account_rejected() {
        let err = use_case(account_at(None), MockBrokerPort::new(), MockMarketDataPort::new())
            .execute(&OverwriteParams::new("AAPL"), today())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RunOverwriteError::Risk(RiskViolation {
                reason: ViolationReason::AccountMisconfigured,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn lowering_level_uses_atomic_proposal() {
        let mut account = account_at(Some(3));
        account
            .expect_propose_max_options_level()
            .withf(|expected, proposed| *expected == 3 && *proposed == 1)
            .times(1)
            .returning(|_, proposed| {
                Ok(AccountConfiguration {
                    max_options_trading_level: Some(proposed),
                })
            });

        let report = use_case(account, broker_with_shares(dec!(100)), market_data())
            .execute(&OverwriteParams::new("AAPL"), today())
            .await
            .unwrap();

        assert_eq!(report.gate.state, GateState::ConfigWritten);
        assert!(report.gate.level_written);
        assert_eq!(report.gate.effective_level, 1);
    }

    #[tokio::test]
    async fn proposal_conflict_aborts_run() {
        let mut account = account_at(Some(3));
        account
            .expect_propose_max_options_level()
            .returning(|expected, _| {
                Err(AccountError::Conflict {
                    expected,
                    actual: Some(2),
                })
            });
        let mut broker = MockBrokerPort::new();
        broker.expect_get_asset().never();

        let err = use_case(account, broker, MockMarketDataPort::new())
            .execute(&OverwriteParams::new("AAPL"), today())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RunOverwriteError::Account(AccountError::Conflict { expected: 3, .. })
        ));
    }

    #[tokio::test]
    async fn level_zero_cannot_write_calls() {
        let params = OverwriteParams {
            desired_level: 0,
            ..OverwriteParams::new("AAPL")
        };
        let mut account = account_at(Some(0));
        account.expect_propose_max_options_level().never();

        let err = use_case(account, MockBrokerPort::new(), MockMarketDataPort::new())
            .execute(&params, today())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RunOverwriteError::Risk(RiskViolation {
                reason: ViolationReason::LevelInsufficient,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn not_optionable_underlying_rejected() {
        let mut broker = MockBrokerPort::new();
        broker.expect_get_asset().returning(|symbol| {
            Ok(Asset {
                attributes: vec![],
                ..optionable_asset(symbol)
            })
        });

        let err = use_case(account_at(Some(1)), broker, MockMarketDataPort::new())
            .execute(&OverwriteParams::new("AAPL"), today())
            .await
            .unwrap_err();

        assert!(matches!(err, RunOverwriteError::UnderlyingNotOptionable { .. }));
    }

    #[tokio::test]
    async fn insufficient_shares_outcome() {
        let mut broker = broker_with_shares(dec!(99));
        broker.expect_submit_order().never();

        let report = use_case(account_at(Some(1)), broker, market_data())
            .execute(&OverwriteParams::new("AAPL"), today())
            .await
            .unwrap();

        assert_eq!(report.coverable_contracts, Some(0));
        assert_eq!(
            report.outcome,
            OverwriteOutcome::InsufficientShares {
                shares_per_contract: 100
            }
        );
    }

    #[tokio::test]
    async fn existing_written_calls_consume_coverage() {
        let mut broker = MockBrokerPort::new();
        broker
            .expect_get_asset()
            .returning(|symbol| Ok(optionable_asset(symbol)));
        broker.expect_get_all_positions().returning(|| {
            Ok(vec![
                Position::long("AAPL", dec!(200)),
                Position::short("AAPL240216C00260000", dec!(2)),
            ])
        });
        broker.expect_submit_order().never();

        let params = OverwriteParams {
            max_contracts: 5,
            execute: true,
            ..OverwriteParams::new("AAPL")
        };
        let report = use_case(account_at(Some(1)), broker, market_data())
            .execute(&params, today())
            .await
            .unwrap();

        assert_eq!(report.coverable_contracts, Some(0));
        assert!(matches!(
            report.outcome,
            OverwriteOutcome::InsufficientShares { .. }
        ));
    }

    #[tokio::test]
    async fn no_eligible_contracts_outcome() {
        let mut market_data = MockMarketDataPort::new();
        market_data.expect_get_stock_latest_trade().returning(|symbol| {
            Ok(LatestTrade {
                symbol: symbol.clone(),
                price: dec!(250.00),
                timestamp: Utc::now(),
            })
        });
        market_data
            .expect_get_option_contracts()
            .returning(|_| Ok(vec![]));
        let mut broker_no_positions = MockBrokerPort::new();
        broker_no_positions
            .expect_get_asset()
            .returning(|symbol| Ok(optionable_asset(symbol)));
        broker_no_positions.expect_get_all_positions().never();

        let report = use_case(account_at(Some(1)), broker_no_positions, market_data)
            .execute(&OverwriteParams::new("AAPL"), today())
            .await
            .unwrap();

        assert_eq!(report.outcome, OverwriteOutcome::NoEligibleContracts);
        assert!(report.selected.is_none());
        assert!(report.coverable_contracts.is_none());
    }

    #[tokio::test]
    async fn invalid_window_aborts_before_contract_fetch() {
        let mut market_data = MockMarketDataPort::new();
        market_data.expect_get_stock_latest_trade().returning(|symbol| {
            Ok(LatestTrade {
                symbol: symbol.clone(),
                price: dec!(250.00),
                timestamp: Utc::now(),
            })
        });
        market_data.expect_get_option_contracts().never();

        let mut params = OverwriteParams::new("AAPL");
        params.filter.min_days = 90;
        params.filter.max_days = 14;

        let err = use_case(account_at(Some(1)), broker_with_shares(dec!(100)), market_data)
            .execute(&params, today())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RunOverwriteError::Selection(SelectionError::InvalidWindow { .. })
        ));
    }

    #[tokio::test]
    async fn invalid_params_rejected_before_io() {
        let mut account = MockAccountPort::new();
        account.expect_get_account_configurations().never();

        let params = OverwriteParams {
            max_contracts: 0,
            ..OverwriteParams::new("AAPL")
        };
        let err = use_case(account, MockBrokerPort::new(), MockMarketDataPort::new())
            .execute(&params, today())
            .await
            .unwrap_err();

        assert!(matches!(err, RunOverwriteError::Domain(_)));
    }
}
