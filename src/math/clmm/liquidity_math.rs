use super::constants::Q64;
use super::full_math::{Rounding, mul_div_floor};
use super::sqrt_price_math::{token_a_from_liquidity, token_b_from_liquidity};
use crate::errors::PlannerError;
use alloy_primitives::U256;

/// Splits `liquidity` over [lower, upper] into (token A, token B) at the current sqrt price.
///
/// Below the range everything is token A, above it everything is token B, and
/// inside it token A covers [current, upper] while token B covers [lower, current].
pub fn amounts_from_liquidity(
    sqrt_price_current_x64: U256,
    sqrt_price_lower_x64: U256,
    sqrt_price_upper_x64: U256,
    liquidity: U256,
    rounding: Rounding,
) -> Result<(U256, U256), PlannerError> {
    let (mut lower, mut upper) = (sqrt_price_lower_x64, sqrt_price_upper_x64);
    if lower > upper {
        std::mem::swap(&mut lower, &mut upper);
    }

    if sqrt_price_current_x64 <= lower {
        let amount_a = token_a_from_liquidity(lower, upper, liquidity, rounding)?;
        Ok((amount_a, U256::ZERO))
    } else if sqrt_price_current_x64 < upper {
        let amount_a = token_a_from_liquidity(sqrt_price_current_x64, upper, liquidity, rounding)?;
        let amount_b = token_b_from_liquidity(lower, sqrt_price_current_x64, liquidity, rounding)?;
        Ok((amount_a, amount_b))
    } else {
        let amount_b = token_b_from_liquidity(lower, upper, liquidity, rounding)?;
        Ok((U256::ZERO, amount_b))
    }
}

/// Computes the liquidity provided by `amount_a` of token A over a sqrt price interval.
pub fn liquidity_for_amount_a(
    sqrt_price_a_x64: U256,
    sqrt_price_b_x64: U256,
    amount_a: U256,
) -> Result<U256, PlannerError> {
    let (mut lower, mut upper) = (sqrt_price_a_x64, sqrt_price_b_x64);
    if lower > upper {
        std::mem::swap(&mut lower, &mut upper);
    }

    let intermediate = mul_div_floor(lower, upper, Q64)?;
    mul_div_floor(amount_a, intermediate, upper - lower)
}

/// Computes the liquidity provided by `amount_b` of token B over a sqrt price interval.
pub fn liquidity_for_amount_b(
    sqrt_price_a_x64: U256,
    sqrt_price_b_x64: U256,
    amount_b: U256,
) -> Result<U256, PlannerError> {
    let (mut lower, mut upper) = (sqrt_price_a_x64, sqrt_price_b_x64);
    if lower > upper {
        std::mem::swap(&mut lower, &mut upper);
    }

    mul_div_floor(amount_b, Q64, upper - lower)
}

/// Largest liquidity both token budgets can fund at the current sqrt price.
pub fn liquidity_from_amounts(
    sqrt_price_current_x64: U256,
    sqrt_price_lower_x64: U256,
    sqrt_price_upper_x64: U256,
    amount_a: U256,
    amount_b: U256,
) -> Result<U256, PlannerError> {
    let (mut lower, mut upper) = (sqrt_price_lower_x64, sqrt_price_upper_x64);
    if lower > upper {
        std::mem::swap(&mut lower, &mut upper);
    }

    if sqrt_price_current_x64 <= lower {
        liquidity_for_amount_a(lower, upper, amount_a)
    } else if sqrt_price_current_x64 < upper {
        let liquidity_a = liquidity_for_amount_a(sqrt_price_current_x64, upper, amount_a)?;
        let liquidity_b = liquidity_for_amount_b(lower, sqrt_price_current_x64, amount_b)?;
        Ok(liquidity_a.min(liquidity_b))
    } else {
        liquidity_for_amount_b(lower, upper, amount_b)
    }
}
