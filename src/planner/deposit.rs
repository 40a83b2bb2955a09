use super::{DepositResult, PlanOptions, PriceRange, REFERENCE_LIQUIDITY, TokenAmount};
use crate::core::price_oracle::PriceOracle;
use crate::core::token::TokenLike;
use crate::errors::PlannerError;
use crate::math::clmm::liquidity_math::amounts_from_liquidity;
use crate::math::clmm::tick_math::sqrt_price_x64_from_price;
use crate::math::utils::f64_to_u256_floor;
use crate::pool::{PoolSnapshot, ValidatedPool};
use alloy_primitives::U256;

fn check_deposit(deposit_usd: f64) -> Result<(), PlannerError> {
    if !deposit_usd.is_finite() || deposit_usd < 0.0 {
        return Err(PlannerError::InvalidInput(format!(
            "deposit must be a non-negative amount of USD, got {deposit_usd}"
        )));
    }
    Ok(())
}

fn check_unit_price(mint: &str, price_usd: Option<f64>) -> Result<f64, PlannerError> {
    match price_usd {
        Some(price) if price.is_finite() && price > 0.0 => Ok(price),
        Some(price) => Err(PlannerError::MissingData(format!(
            "usable USD price for {mint} (got {price})"
        ))),
        None => Err(PlannerError::MissingData(format!("USD price for {mint}"))),
    }
}

/// Sizes a deposit of `deposit_usd` into `snapshot`, pricing both mints through `oracle`.
pub async fn deposit_plan<O>(
    snapshot: &PoolSnapshot,
    deposit_usd: f64,
    oracle: &O,
    options: &PlanOptions,
) -> Result<DepositResult, PlannerError>
where
    O: PriceOracle + ?Sized,
{
    let pool = snapshot.validate()?;
    check_deposit(deposit_usd)?;

    let mints = vec![pool.token_a.mint.clone(), pool.token_b.mint.clone()];
    let prices = oracle.get_token_prices(&mints).await;
    let price_a_usd = check_unit_price(pool.token_a.mint(), prices.get(pool.token_a.mint()).copied())?;
    let price_b_usd = check_unit_price(pool.token_b.mint(), prices.get(pool.token_b.mint()).copied())?;

    plan_with_prices(&pool, deposit_usd, price_a_usd, price_b_usd, options)
}

/// The synchronous part of a plan once USD unit prices are known.
///
/// Values one reference unit of liquidity in the range, scales it to the
/// deposit, and recomputes the token amounts at the scaled liquidity.
pub fn plan_with_prices(
    pool: &ValidatedPool,
    deposit_usd: f64,
    price_a_usd: f64,
    price_b_usd: f64,
    options: &PlanOptions,
) -> Result<DepositResult, PlannerError> {
    check_deposit(deposit_usd)?;
    let price_a_usd = check_unit_price(pool.token_a.mint(), Some(price_a_usd))?;
    let price_b_usd = check_unit_price(pool.token_b.mint(), Some(price_b_usd))?;

    let range = PriceRange::around(pool.current_price, options.range_width, pool.tick_spacing)?;
    let sqrt_price_current_x64 = sqrt_price_x64_from_price(pool.current_price)?;
    let (sqrt_price_lower_x64, sqrt_price_upper_x64) = range.sqrt_prices_x64()?;

    tracing::debug!(
        lower_tick = range.lower_tick,
        upper_tick = range.upper_tick,
        %sqrt_price_current_x64,
        "Resolved deposit range"
    );

    let reference_liquidity = U256::from(REFERENCE_LIQUIDITY);
    let (unit_a, unit_b) = amounts_from_liquidity(
        sqrt_price_current_x64,
        sqrt_price_lower_x64,
        sqrt_price_upper_x64,
        reference_liquidity,
        options.rounding,
    )?;
    let unit_value_usd =
        pool.token_a.to_human(unit_a) * price_a_usd + pool.token_b.to_human(unit_b) * price_b_usd;
    if unit_value_usd == 0.0 {
        tracing::error!(
            pool = ?pool.id,
            lower_tick = range.lower_tick,
            upper_tick = range.upper_tick,
            collapsed = range.is_empty(),
            "Reference liquidity is worth nothing, cannot size deposit"
        );
        return Err(PlannerError::ZeroUnitValue);
    }

    let target_liquidity =
        f64_to_u256_floor(deposit_usd / unit_value_usd * REFERENCE_LIQUIDITY as f64)?;
    let (amount_a, amount_b) = amounts_from_liquidity(
        sqrt_price_current_x64,
        sqrt_price_lower_x64,
        sqrt_price_upper_x64,
        target_liquidity,
        options.rounding,
    )?;

    let result = DepositResult {
        deposit_value_usd: deposit_usd,
        yearly_return_usd: deposit_usd * pool.apy_24h,
        token_a: TokenAmount {
            symbol: pool.token_a.symbol().to_string(),
            amount: pool.token_a.to_human(amount_a),
        },
        token_b: TokenAmount {
            symbol: pool.token_b.symbol().to_string(),
            amount: pool.token_b.to_human(amount_b),
        },
        range,
        liquidity: target_liquidity.to_string(),
    };

    tracing::info!(
        pool = ?pool.id,
        deposit_usd,
        unit_value_usd,
        liquidity = %result.liquidity,
        amount_a = result.token_a.amount,
        amount_b = result.token_b.amount,
        "Planned deposit"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::token::TokenInfo;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn pool(price: &str, tick_spacing: i32) -> ValidatedPool {
        ValidatedPool {
            id: Some("pool".to_string()),
            token_a: TokenInfo::new("mintA", "AAA", 6),
            token_b: TokenInfo::new("mintB", "BBB", 6),
            current_price: Decimal::from_str(price).unwrap(),
            tick_spacing,
            apy_24h: 0.25,
        }
    }

    #[test]
    fn test_rejects_bad_deposits() {
        let pool = pool("100", 60);
        for deposit in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                plan_with_prices(&pool, deposit, 100.0, 1.0, &PlanOptions::default()),
                Err(PlannerError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_rejects_unusable_unit_prices() {
        let pool = pool("100", 60);
        assert!(matches!(
            plan_with_prices(&pool, 1000.0, f64::NAN, 1.0, &PlanOptions::default()),
            Err(PlannerError::MissingData(_))
        ));
        assert!(matches!(
            plan_with_prices(&pool, 1000.0, 100.0, -1.0, &PlanOptions::default()),
            Err(PlannerError::MissingData(_))
        ));
    }

    #[test]
    fn test_rejects_zero_unit_price() {
        let pool = pool("100", 60);
        assert_eq!(
            plan_with_prices(&pool, 1000.0, 0.0, 1.0, &PlanOptions::default()),
            Err(PlannerError::MissingData("usable USD price for mintA (got 0)".to_string()))
        );
        assert!(matches!(
            plan_with_prices(&pool, 1000.0, 100.0, 0.0, &PlanOptions::default()),
            Err(PlannerError::MissingData(_))
        ));
    }

    #[test]
    fn test_zero_deposit_needs_nothing() {
        let result =
            plan_with_prices(&pool("100", 60), 0.0, 100.0, 1.0, &PlanOptions::default()).unwrap();
        assert_eq!(result.liquidity, "0");
        assert_eq!(result.token_a.amount, 0.0);
        assert_eq!(result.token_b.amount, 0.0);
    }

    #[test]
    fn test_yearly_return_uses_daily_apr() {
        let result =
            plan_with_prices(&pool("100", 60), 1000.0, 100.0, 1.0, &PlanOptions::default()).unwrap();
        assert_eq!(result.yearly_return_usd, 250.0);
    }
}
