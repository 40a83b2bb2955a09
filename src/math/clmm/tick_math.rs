use super::constants::{
    GUARD_BITS, MAX_SQRT_PRICE_X64, MAX_TICK, MIN_SQRT_PRICE_X64, MIN_TICK, Q64,
    TICK_BASE_DENOMINATOR, TICK_BASE_NUMERATOR,
};
use crate::errors::PlannerError;
use crate::math::utils::biguint_to_u256;
use alloy_primitives::U256;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::cmp::Ordering;

/// Lower and upper bound of a positive real, both scaled by 2^GUARD_BITS.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Bounds {
    low: BigUint,
    high: BigUint,
}

impl Bounds {
    fn unit() -> Self {
        let one = BigUint::one() << GUARD_BITS;
        Self {
            low: one.clone(),
            high: one,
        }
    }

    fn mul(&self, other: &Bounds) -> Self {
        Self {
            low: (&self.low * &other.low) >> GUARD_BITS,
            high: ceil_shr(&self.high * &other.high, GUARD_BITS),
        }
    }

    fn reciprocal(&self) -> Self {
        let numerator = BigUint::one() << (2 * GUARD_BITS);
        Self {
            low: &numerator / &self.high,
            high: ceil_div(&numerator, &self.low),
        }
    }

    fn pow(&self, mut exponent: u32) -> Self {
        let mut result = Bounds::unit();
        let mut base = self.clone();
        while exponent > 0 {
            if exponent & 1 == 1 {
                result = result.mul(&base);
            }
            exponent >>= 1;
            if exponent > 0 {
                base = base.mul(&base);
            }
        }
        result
    }
}

// sqrt(1.0001) * 2^GUARD_BITS lies in [low, low + 1).
static SQRT_TICK_BASE: Lazy<Bounds> = Lazy::new(|| {
    let radicand = (BigUint::from(TICK_BASE_NUMERATOR) << (2 * GUARD_BITS))
        / BigUint::from(TICK_BASE_DENOMINATOR);
    let low = radicand.sqrt();
    let high = &low + 1u32;
    Bounds { low, high }
});

fn ceil_shr(value: BigUint, bits: u32) -> BigUint {
    let quotient = &value >> bits;
    if (value - (&quotient << bits)).is_zero() {
        quotient
    } else {
        quotient + 1u32
    }
}

fn ceil_div(numerator: &BigUint, denominator: &BigUint) -> BigUint {
    let quotient = numerator / denominator;
    if (numerator % denominator).is_zero() {
        quotient
    } else {
        quotient + 1u32
    }
}

/// Bounds on sqrt(1.0001^tick) * 2^GUARD_BITS. No range check.
fn sqrt_ratio_bounds(tick: i32) -> Bounds {
    let bounds = SQRT_TICK_BASE.pow(tick.unsigned_abs());
    if tick < 0 { bounds.reciprocal() } else { bounds }
}

/// 1.0001^tick as an exact (numerator, denominator) pair.
fn exact_tick_ratio(tick: i32) -> (BigUint, BigUint) {
    let k = tick.unsigned_abs();
    let base_num = BigUint::from(TICK_BASE_NUMERATOR).pow(k);
    let base_den = BigUint::from(TICK_BASE_DENOMINATOR).pow(k);
    if tick < 0 {
        (base_den, base_num)
    } else {
        (base_num, base_den)
    }
}

/// Splits a positive decimal into (mantissa, 10^scale).
fn decimal_ratio(price: Decimal) -> Result<(BigUint, BigUint), PlannerError> {
    if price <= Decimal::ZERO {
        return Err(PlannerError::InvalidInput(format!(
            "price must be positive, got {price}"
        )));
    }
    let mantissa = BigUint::from(price.mantissa().unsigned_abs());
    let scale = BigUint::from(10u32).pow(price.scale());
    Ok((mantissa, scale))
}

/// Calculates sqrt(1.0001^tick) * 2^64 from a given tick.
///
/// Replicates the bit-shift ladder of the Raydium CLMM program so that range
/// bounds agree with on-chain values bit for bit. Each factor is
/// sqrt(1.0001^-(2^i)) in Q64.64, truncated as the program stores it.
pub fn sqrt_price_x64_from_tick(tick: i32) -> Result<U256, PlannerError> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(PlannerError::OutOfRange(tick));
    }

    let abs_tick = tick.unsigned_abs();

    let mut ratio = if abs_tick & 0x1 != 0 {
        U256::from(0xfffcb933bd6fb800u128)
    } else {
        Q64
    };

    if abs_tick & 0x2 != 0 {
        ratio = (ratio * U256::from(0xfff97272373d4000u128)) >> 64;
    }
    if abs_tick & 0x4 != 0 {
        ratio = (ratio * U256::from(0xfff2e50f5f657000u128)) >> 64;
    }
    if abs_tick & 0x8 != 0 {
        ratio = (ratio * U256::from(0xffe5caca7e10f000u128)) >> 64;
    }
    if abs_tick & 0x10 != 0 {
        ratio = (ratio * U256::from(0xffcb9843d60f7000u128)) >> 64;
    }
    if abs_tick & 0x20 != 0 {
        ratio = (ratio * U256::from(0xff973b41fa98e800u128)) >> 64;
    }
    if abs_tick & 0x40 != 0 {
        ratio = (ratio * U256::from(0xff2ea16466c9b000u128)) >> 64;
    }
    if abs_tick & 0x80 != 0 {
        ratio = (ratio * U256::from(0xfe5dee046a9a3800u128)) >> 64;
    }
    if abs_tick & 0x100 != 0 {
        ratio = (ratio * U256::from(0xfcbe86c7900bb000u128)) >> 64;
    }
    if abs_tick & 0x200 != 0 {
        ratio = (ratio * U256::from(0xf987a7253ac65800u128)) >> 64;
    }
    if abs_tick & 0x400 != 0 {
        ratio = (ratio * U256::from(0xf3392b0822bb6000u128)) >> 64;
    }
    if abs_tick & 0x800 != 0 {
        ratio = (ratio * U256::from(0xe7159475a2caf000u128)) >> 64;
    }
    if abs_tick & 0x1000 != 0 {
        ratio = (ratio * U256::from(0xd097f3bdfd2f2000u128)) >> 64;
    }
    if abs_tick & 0x2000 != 0 {
        ratio = (ratio * U256::from(0xa9f746462d9f8000u128)) >> 64;
    }
    if abs_tick & 0x4000 != 0 {
        ratio = (ratio * U256::from(0x70d869a156f31c00u128)) >> 64;
    }
    if abs_tick & 0x8000 != 0 {
        ratio = (ratio * U256::from(0x31be135f97ed3200u128)) >> 64;
    }
    if abs_tick & 0x10000 != 0 {
        ratio = (ratio * U256::from(0x9aa508b5b85a500u128)) >> 64;
    }
    if abs_tick & 0x20000 != 0 {
        ratio = (ratio * U256::from(0x5d6af8dedc582cu128)) >> 64;
    }
    if abs_tick & 0x40000 != 0 {
        ratio = (ratio * U256::from(0x2216e584f5fau128)) >> 64;
    }

    // Positive ticks take the reciprocal in Q128 then drop back to Q64.64.
    if tick > 0 {
        ratio = U256::from(u128::MAX) / ratio;
    }

    Ok(ratio)
}

/// Calculates floor(sqrt(price) * 2^64) directly from the decimal price.
pub fn sqrt_price_x64_from_price(price: Decimal) -> Result<U256, PlannerError> {
    let (numerator, denominator) = decimal_ratio(price)?;
    biguint_to_u256(&((numerator << 128u32) / denominator).sqrt())
}

/// Orders 1.0001^tick against numerator / denominator.
fn compare_tick_to_ratio(
    tick: i32,
    target: &Bounds,
    numerator: &BigUint,
    denominator: &BigUint,
) -> Ordering {
    let ratio = sqrt_ratio_bounds(tick);
    if ratio.high < target.low {
        return Ordering::Less;
    }
    if ratio.low >= target.high {
        return Ordering::Greater;
    }
    let (tick_num, tick_den) = exact_tick_ratio(tick);
    (tick_num * denominator).cmp(&(numerator * tick_den))
}

/// Returns floor(ln(price) / ln(1.0001)): the greatest tick with 1.0001^tick <= price.
pub fn tick_at_price(price: Decimal) -> Result<i32, PlannerError> {
    let (numerator, denominator) = decimal_ratio(price)?;
    let low = ((&numerator << (2 * GUARD_BITS)) / &denominator).sqrt();
    let high = &low + 1u32;
    let target = Bounds { low, high };

    let below_or_at =
        |tick: i32| compare_tick_to_ratio(tick, &target, &numerator, &denominator) != Ordering::Greater;

    if !below_or_at(MIN_TICK) {
        return Err(PlannerError::OutOfRange(MIN_TICK - 1));
    }
    if below_or_at(MAX_TICK + 1) {
        return Err(PlannerError::OutOfRange(MAX_TICK + 1));
    }

    // Invariant: below_or_at(lo) && !below_or_at(hi).
    let (mut lo, mut hi) = (MIN_TICK, MAX_TICK + 1);
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if below_or_at(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(lo)
}

/// Returns the greatest tick whose sqrt price does not exceed `sqrt_price_x64`.
pub fn tick_at_sqrt_price_x64(sqrt_price_x64: U256) -> Result<i32, PlannerError> {
    if sqrt_price_x64 < U256::from(MIN_SQRT_PRICE_X64) {
        return Err(PlannerError::InvalidInput(format!(
            "sqrt price {sqrt_price_x64} is below the minimum {MIN_SQRT_PRICE_X64}"
        )));
    }
    if sqrt_price_x64 >= U256::from(MAX_SQRT_PRICE_X64) {
        return Ok(MAX_TICK);
    }

    let (mut lo, mut hi) = (MIN_TICK, MAX_TICK);
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if sqrt_price_x64_from_tick(mid)? <= sqrt_price_x64 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(lo)
}

/// Snaps a tick down to the nearest multiple of `tick_spacing` (floor, not round).
pub fn floor_to_spacing(tick: i32, tick_spacing: i32) -> Result<i32, PlannerError> {
    if tick_spacing <= 0 {
        return Err(PlannerError::InvalidInput(format!(
            "tick spacing must be positive, got {tick_spacing}"
        )));
    }
    Ok(tick.div_euclid(tick_spacing) * tick_spacing)
}

/// Lowest tick usable by a pool with this spacing.
pub fn min_usable_tick(tick_spacing: i32) -> Result<i32, PlannerError> {
    let floored = floor_to_spacing(MIN_TICK, tick_spacing)?;
    Ok(if floored < MIN_TICK { floored + tick_spacing } else { floored })
}

/// Highest tick usable by a pool with this spacing.
pub fn max_usable_tick(tick_spacing: i32) -> Result<i32, PlannerError> {
    floor_to_spacing(MAX_TICK, tick_spacing)
}
