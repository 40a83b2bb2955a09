use alloy_primitives::U256;

pub const MIN_TICK: i32 = -443636;
pub const MAX_TICK: i32 = -MIN_TICK;

// Q64.64 sqrt prices at MIN_TICK and MAX_TICK.
pub const MIN_SQRT_PRICE_X64: u128 = 4_295_048_016;
pub const MAX_SQRT_PRICE_X64: u128 = 79_226_673_521_066_979_257_578_248_091;

/// 2^64, the scale of a Q64.64 sqrt price.
pub const Q64: U256 = U256::from_limbs([0, 1, 0, 0]);

/// Fractional bits carried when bracketing 1.0001^tick against a price.
pub const GUARD_BITS: u32 = 256;

/// 1.0001 expressed as a ratio of integers.
pub const TICK_BASE_NUMERATOR: u32 = 10_001;
pub const TICK_BASE_DENOMINATOR: u32 = 10_000;
