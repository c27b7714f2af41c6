//! Money rounding

use rust_decimal::{Decimal, RoundingStrategy};

use crate::MONEY_DECIMAL_PLACES;

/// Round an amount to cents, half away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}
