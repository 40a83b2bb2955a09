use crate::errors::PlannerError;
use alloy_primitives::{U256, U512};

/// Direction in which a non-terminating division is resolved.
///
/// `Up` guarantees the caller never under-funds a position; `Down` yields a
/// safe lower bound for estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Rounding {
    #[default]
    Down,
    Up,
}

impl Rounding {
    pub fn from_round_up(round_up: bool) -> Self {
        if round_up { Rounding::Up } else { Rounding::Down }
    }
}

fn narrow(value: U512) -> Result<U256, PlannerError> {
    if value > U512::from(U256::MAX) {
        return Err(PlannerError::CalculationError(
            "mul_div result exceeds 256 bits".to_string(),
        ));
    }
    Ok(value.to())
}

/// Computes floor((a * b) / denominator) with a 512-bit intermediate product.
pub fn mul_div_floor(a: U256, b: U256, denominator: U256) -> Result<U256, PlannerError> {
    if denominator.is_zero() {
        return Err(PlannerError::DivisionByZero);
    }

    let product = a.widening_mul(b);
    narrow(product / U512::from(denominator))
}

/// Computes ceil((a * b) / denominator) with a 512-bit intermediate product.
/// Rounds toward positive infinity whenever the division leaves a remainder.
pub fn mul_div_ceil(a: U256, b: U256, denominator: U256) -> Result<U256, PlannerError> {
    if denominator.is_zero() {
        return Err(PlannerError::DivisionByZero);
    }

    let product = a.widening_mul(b);
    let denominator = U512::from(denominator);
    let mut result = product / denominator;
    if !(product % denominator).is_zero() {
        result += U512::from(1);
    }
    narrow(result)
}

pub fn mul_div(
    a: U256,
    b: U256,
    denominator: U256,
    rounding: Rounding,
) -> Result<U256, PlannerError> {
    match rounding {
        Rounding::Down => mul_div_floor(a, b, denominator),
        Rounding::Up => mul_div_ceil(a, b, denominator),
    }
}

/// ceil(a / denominator).
pub fn div_rounding_up(a: U256, denominator: U256) -> Result<U256, PlannerError> {
    if denominator.is_zero() {
        return Err(PlannerError::DivisionByZero);
    }
    if a.is_zero() {
        return Ok(U256::ZERO);
    }
    Ok((a - U256::from(1)) / denominator + U256::from(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    const Q128: U256 = U256::from_limbs([0, 0, 1, 0]);

    #[test]
    fn test_mul_div_ceil_small_values() {
        assert_eq!(
            mul_div_ceil(U256::from(7), U256::from(3), U256::from(2)),
            Ok(U256::from(11))
        );
        assert_eq!(
            mul_div_ceil(U256::from(6), U256::from(3), U256::from(2)),
            Ok(U256::from(9))
        );
        assert_eq!(
            mul_div_ceil(U256::ZERO, U256::from(3), U256::from(2)),
            Ok(U256::ZERO)
        );
    }

    #[test]
    fn test_mul_div_division_by_zero() {
        assert_eq!(
            mul_div_ceil(Q128, U256::from(5), U256::ZERO),
            Err(PlannerError::DivisionByZero)
        );
        assert_eq!(
            mul_div_floor(Q128, Q128, U256::ZERO),
            Err(PlannerError::DivisionByZero)
        );
        assert_eq!(
            div_rounding_up(U256::from(1), U256::ZERO),
            Err(PlannerError::DivisionByZero)
        );
    }

    #[test]
    fn test_mul_div_overflow() {
        assert!(matches!(
            mul_div_floor(Q128, Q128, U256::from(1)),
            Err(PlannerError::CalculationError(_))
        ));
        assert!(matches!(
            mul_div_ceil(U256::MAX, U256::MAX, U256::MAX - U256::from(1)),
            Err(PlannerError::CalculationError(_))
        ));
    }

    #[test]
    fn test_mul_div_all_max_inputs() {
        assert_eq!(mul_div_floor(U256::MAX, U256::MAX, U256::MAX), Ok(U256::MAX));
        assert_eq!(mul_div_ceil(U256::MAX, U256::MAX, U256::MAX), Ok(U256::MAX));
    }

    #[test]
    fn test_mul_div_wide_intermediate() {
        let half_q128 = Q128 / U256::from(2);
        let one_and_a_half_q128 = Q128 * U256::from(3) / U256::from(2);
        assert_eq!(
            mul_div_floor(Q128, half_q128, one_and_a_half_q128),
            Ok(Q128 / U256::from(3))
        );
        assert_eq!(
            mul_div_ceil(Q128, half_q128, one_and_a_half_q128),
            Ok(Q128 / U256::from(3) + U256::from(1))
        );
        assert_eq!(
            mul_div_ceil(Q128, Q128 * U256::from(35), Q128 * U256::from(8)),
            Ok(Q128 * U256::from(4375) / U256::from(1000))
        );
    }

    #[test]
    fn test_div_rounding_up() {
        assert_eq!(div_rounding_up(U256::ZERO, U256::from(3)), Ok(U256::ZERO));
        assert_eq!(div_rounding_up(U256::from(9), U256::from(3)), Ok(U256::from(3)));
        assert_eq!(div_rounding_up(U256::from(10), U256::from(3)), Ok(U256::from(4)));
    }
}
