use crate::errors::PlannerError;
use crate::math::clmm::tick_math::{floor_to_spacing, sqrt_price_x64_from_tick, tick_at_price};
use alloy_primitives::U256;
use rust_decimal::Decimal;
use serde::Serialize;

/// A tick range placed symmetrically (in price) around the current price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRange {
    pub lower_tick: i32,
    pub upper_tick: i32,
    pub lower_price: Decimal,
    pub upper_price: Decimal,
}

impl PriceRange {
    /// Builds `[price * (1 - width), price * (1 + width)]` and snaps each bound
    /// down to the pool's tick spacing independently.
    pub fn around(price: Decimal, width: Decimal, tick_spacing: i32) -> Result<Self, PlannerError> {
        if width <= Decimal::ZERO || width >= Decimal::ONE {
            return Err(PlannerError::InvalidInput(format!(
                "range width must be in (0, 1), got {width}"
            )));
        }

        let lower_price = price
            .checked_mul(Decimal::ONE - width)
            .ok_or_else(|| PlannerError::CalculationError("lower price overflow".to_string()))?;
        let upper_price = price
            .checked_mul(Decimal::ONE + width)
            .ok_or_else(|| PlannerError::CalculationError("upper price overflow".to_string()))?;

        let lower_tick = floor_to_spacing(tick_at_price(lower_price)?, tick_spacing)?;
        let upper_tick = floor_to_spacing(tick_at_price(upper_price)?, tick_spacing)?;

        Ok(Self::normalized(lower_tick, upper_tick, lower_price, upper_price))
    }

    fn normalized(
        lower_tick: i32,
        upper_tick: i32,
        lower_price: Decimal,
        upper_price: Decimal,
    ) -> Self {
        Self {
            lower_tick: lower_tick.min(upper_tick),
            upper_tick: lower_tick.max(upper_tick),
            lower_price: lower_price.min(upper_price),
            upper_price: lower_price.max(upper_price),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lower_tick == self.upper_tick
    }

    /// Q64.64 sqrt prices at the lower and upper tick.
    pub fn sqrt_prices_x64(&self) -> Result<(U256, U256), PlannerError> {
        Ok((
            sqrt_price_x64_from_tick(self.lower_tick)?,
            sqrt_price_x64_from_tick(self.upper_tick)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_symmetric_range_around_100() {
        let range = PriceRange::around(dec("100"), dec("0.1"), 60).unwrap();
        assert_eq!(range.lower_tick, 45000);
        assert_eq!(range.upper_tick, 46980);
        assert_eq!(range.lower_price, dec("90"));
        assert_eq!(range.upper_price, dec("110"));
        assert!(!range.is_empty());
    }

    #[test]
    fn test_coarse_spacing_collapses_range() {
        let range = PriceRange::around(dec("100"), dec("0.1"), 100_000).unwrap();
        assert_eq!((range.lower_tick, range.upper_tick), (0, 0));
        assert!(range.is_empty());
    }

    #[test]
    fn test_ticks_floor_below_one() {
        let range = PriceRange::around(dec("0.01"), dec("0.1"), 10).unwrap();
        assert!(range.lower_tick < range.upper_tick);
        assert_eq!(range.lower_tick % 10, 0);
        assert_eq!(range.upper_tick % 10, 0);
        assert!(range.upper_tick < 0);
    }

    #[test]
    fn test_width_must_be_a_fraction() {
        for width in ["0", "1", "-0.1", "1.5"] {
            assert!(matches!(
                PriceRange::around(dec("100"), dec(width), 60),
                Err(PlannerError::InvalidInput(_))
            ));
        }
    }
}
