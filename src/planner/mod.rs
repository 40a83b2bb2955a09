use crate::math::clmm::full_math::Rounding;
use rust_decimal::Decimal;
use serde::Serialize;

pub mod deposit;
pub mod range;

pub use deposit::{deposit_plan, plan_with_prices};
pub use range::PriceRange;

/// Liquidity used to value one "unit" of position in a range.
pub const REFERENCE_LIQUIDITY: u64 = 1_000_000;

/// Default half-width of the range around the current price (10%).
pub const DEFAULT_RANGE_WIDTH: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanOptions {
    pub rounding: Rounding,
    pub range_width: Decimal,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            rounding: Rounding::Down,
            range_width: DEFAULT_RANGE_WIDTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenAmount {
    pub symbol: String,
    /// Whole tokens, scaled by the mint's decimals.
    pub amount: f64,
}

/// Token amounts needed to open a position worth `deposit_value_usd`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepositResult {
    pub deposit_value_usd: f64,
    pub yearly_return_usd: f64,
    pub token_a: TokenAmount,
    pub token_b: TokenAmount,
    pub range: PriceRange,
    /// Target liquidity as a decimal integer string.
    pub liquidity: String,
}
