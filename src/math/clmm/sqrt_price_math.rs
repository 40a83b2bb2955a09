use super::constants::Q64;
use super::full_math::{Rounding, div_rounding_up, mul_div, mul_div_ceil, mul_div_floor};
use crate::errors::PlannerError;
use alloy_primitives::U256;

fn ordered(sqrt_price_a_x64: U256, sqrt_price_b_x64: U256) -> (U256, U256) {
    if sqrt_price_a_x64 > sqrt_price_b_x64 {
        (sqrt_price_b_x64, sqrt_price_a_x64)
    } else {
        (sqrt_price_a_x64, sqrt_price_b_x64)
    }
}

/// Amount of token A held by `liquidity` between two sqrt prices:
/// L * 2^64 * (pb - pa) / (pb * pa).
pub fn token_a_from_liquidity(
    sqrt_price_a_x64: U256,
    sqrt_price_b_x64: U256,
    liquidity: U256,
    rounding: Rounding,
) -> Result<U256, PlannerError> {
    let (sqrt_price_a_x64, sqrt_price_b_x64) = ordered(sqrt_price_a_x64, sqrt_price_b_x64);
    if sqrt_price_a_x64.is_zero() {
        return Err(PlannerError::DivisionByZero);
    }
    if liquidity.bit_len() > 192 {
        return Err(PlannerError::CalculationError(
            "liquidity too large to scale by 2^64".to_string(),
        ));
    }

    let numerator1 = liquidity << 64;
    let numerator2 = sqrt_price_b_x64 - sqrt_price_a_x64;

    match rounding {
        Rounding::Up => {
            let res = mul_div_ceil(numerator1, numerator2, sqrt_price_b_x64)?;
            div_rounding_up(res, sqrt_price_a_x64)
        }
        Rounding::Down => {
            let res = mul_div_floor(numerator1, numerator2, sqrt_price_b_x64)?;
            Ok(res / sqrt_price_a_x64)
        }
    }
}

/// Amount of token B held by `liquidity` between two sqrt prices:
/// L * (pb - pa) / 2^64.
pub fn token_b_from_liquidity(
    sqrt_price_a_x64: U256,
    sqrt_price_b_x64: U256,
    liquidity: U256,
    rounding: Rounding,
) -> Result<U256, PlannerError> {
    let (sqrt_price_a_x64, sqrt_price_b_x64) = ordered(sqrt_price_a_x64, sqrt_price_b_x64);
    mul_div(liquidity, sqrt_price_b_x64 - sqrt_price_a_x64, Q64, rounding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::clmm::tick_math::sqrt_price_x64_from_price;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn e18(n: u64) -> U256 {
        U256::from(n) * U256::from(10).pow(U256::from(18))
    }

    fn sqrt_price(price: &str) -> U256 {
        sqrt_price_x64_from_price(Decimal::from_str(price).unwrap()).unwrap()
    }

    #[test]
    fn test_token_a_simple() {
        let amount_up =
            token_a_from_liquidity(sqrt_price("1"), sqrt_price("1.21"), e18(1), Rounding::Up)
                .unwrap();
        assert_eq!(amount_up, U256::from(90909090909090910u64));

        let amount_down =
            token_a_from_liquidity(sqrt_price("1"), sqrt_price("1.21"), e18(1), Rounding::Down)
                .unwrap();
        assert_eq!(amount_down, amount_up - U256::from(1));
    }

    #[test]
    fn test_token_b_simple() {
        let amount_up =
            token_b_from_liquidity(sqrt_price("1"), sqrt_price("1.21"), e18(1), Rounding::Up)
                .unwrap();
        assert_eq!(amount_up, U256::from(100000000000000000u64));

        let amount_down =
            token_b_from_liquidity(sqrt_price("1"), sqrt_price("1.21"), e18(1), Rounding::Down)
                .unwrap();
        assert_eq!(amount_down, amount_up - U256::from(1));
    }

    #[test]
    fn test_argument_order_does_not_matter() {
        let (a, b) = (sqrt_price("0.5"), sqrt_price("2"));
        let liquidity = U256::from(123_456_789u64);
        assert_eq!(
            token_a_from_liquidity(a, b, liquidity, Rounding::Down),
            token_a_from_liquidity(b, a, liquidity, Rounding::Down)
        );
        assert_eq!(
            token_b_from_liquidity(a, b, liquidity, Rounding::Up),
            token_b_from_liquidity(b, a, liquidity, Rounding::Up)
        );
    }

    #[test]
    fn test_zero_sqrt_price_is_rejected() {
        assert_eq!(
            token_a_from_liquidity(U256::ZERO, Q64, e18(1), Rounding::Down),
            Err(PlannerError::DivisionByZero)
        );
    }

    #[test]
    fn test_zero_width_interval_yields_nothing() {
        let p = sqrt_price("3");
        assert_eq!(token_a_from_liquidity(p, p, e18(5), Rounding::Up), Ok(U256::ZERO));
        assert_eq!(token_b_from_liquidity(p, p, e18(5), Rounding::Up), Ok(U256::ZERO));
    }
}
