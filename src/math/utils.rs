use crate::errors::PlannerError;
use alloy_primitives::U256;
use num_bigint::BigUint;

const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;
const TWO_POW_128: f64 = TWO_POW_64 * TWO_POW_64;

/// Converts a U256 into a f64 by folding its limbs from the most significant down.
/// Loses precision past 53 bits, which is fine for USD valuation.
pub fn u256_to_f64(value: U256) -> f64 {
    value
        .as_limbs()
        .iter()
        .rev()
        .fold(0.0, |acc, &limb| acc * TWO_POW_64 + limb as f64)
}

/// Converts a non-negative finite f64 into a U256, rounding toward zero.
pub fn f64_to_u256_floor(value: f64) -> Result<U256, PlannerError> {
    if !value.is_finite() || value < 0.0 {
        return Err(PlannerError::InvalidInput(format!(
            "cannot convert {value} to an unsigned integer"
        )));
    }
    if value < TWO_POW_128 {
        return Ok(U256::from(value.floor() as u128));
    }

    // value >= 2^128 is an integer: mantissa * 2^exponent with exponent >= 76.
    let bits = value.to_bits();
    let exponent = ((bits >> 52) & 0x7ff) as usize - 1075;
    let mantissa = (bits & ((1u64 << 52) - 1)) | (1u64 << 52);
    if exponent + 53 > 256 {
        return Err(PlannerError::CalculationError(format!(
            "{value} does not fit in 256 bits"
        )));
    }
    Ok(U256::from(mantissa) << exponent)
}

/// Scales a raw token amount down by the token's decimals.
pub fn to_human_amount(raw: U256, decimals: u8) -> f64 {
    u256_to_f64(raw) / 10f64.powi(decimals as i32)
}

pub fn biguint_to_u256(value: &BigUint) -> Result<U256, PlannerError> {
    if value.bits() > 256 {
        return Err(PlannerError::CalculationError(
            "BigUint to U256 conversion overflow".into(),
        ));
    }
    let bytes = value.to_bytes_be();
    let mut padded_bytes = [0u8; 32];
    padded_bytes[32 - bytes.len()..].copy_from_slice(&bytes);
    Ok(U256::from_be_bytes(padded_bytes))
}

pub fn u256_to_biguint(value: U256) -> BigUint {
    BigUint::from_bytes_be(&value.to_be_bytes::<32>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u256_to_f64() {
        assert_eq!(u256_to_f64(U256::ZERO), 0.0);
        assert_eq!(u256_to_f64(U256::from(1_000_000u64)), 1_000_000.0);
        assert_eq!(u256_to_f64(U256::from(1) << 64), TWO_POW_64);
        assert_eq!(u256_to_f64(U256::from(3) << 128), 3.0 * TWO_POW_128);
    }

    #[test]
    fn test_f64_to_u256_floor() {
        assert_eq!(f64_to_u256_floor(0.0), Ok(U256::ZERO));
        assert_eq!(f64_to_u256_floor(1041.99), Ok(U256::from(1041)));
        assert_eq!(f64_to_u256_floor(TWO_POW_128 * 4.0), Ok(U256::from(1) << 130));
        assert!(f64_to_u256_floor(-1.0).is_err());
        assert!(f64_to_u256_floor(f64::NAN).is_err());
        assert!(f64_to_u256_floor(f64::INFINITY).is_err());
        assert!(f64_to_u256_floor(1e90).is_err());
    }

    #[test]
    fn test_to_human_amount() {
        assert_eq!(to_human_amount(U256::from(1_500_000u64), 6), 1.5);
        assert_eq!(to_human_amount(U256::from(42u64), 0), 42.0);
    }

    #[test]
    fn test_biguint_roundtrip_edges() {
        assert_eq!(biguint_to_u256(&BigUint::from(0u32)), Ok(U256::ZERO));
        assert_eq!(biguint_to_u256(&u256_to_biguint(U256::MAX)), Ok(U256::MAX));
        let too_big = BigUint::from(1u32) << 256u32;
        assert!(biguint_to_u256(&too_big).is_err());
    }
}
