//! Covered-call coverage.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::domain::portfolio::Position;
use crate::domain::shared::Symbol;

/// Number of new contracts the long shares of `underlying` can cover.
///
/// Short positions never cover. Calls already written on `underlying`
/// (short OCC calls with a matching root) reserve `multiplier` shares each.
/// Fractional shares are ignored by flooring; the result never goes below 0.
#[must_use]
pub fn coverable_contracts(positions: &[Position], underlying: &Symbol, multiplier: u32) -> u32 {
    if multiplier == 0 {
        return 0;
    }
    let lot = Decimal::from(multiplier);

    let shares: Decimal = positions
        .iter()
        .filter(|p| p.is_long() && &p.symbol == underlying)
        .map(|p| p.quantity)
        .sum();

    let written: Decimal = positions
        .iter()
        .filter(|p| p.is_short_call_on(underlying))
        .map(|p| p.quantity)
        .sum();

    let free = (shares - written * lot).max(Decimal::ZERO);

    (free / lot).floor().to_u32().unwrap_or(u32::MAX)
}
