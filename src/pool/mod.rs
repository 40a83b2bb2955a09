use crate::core::token::TokenInfo;
use crate::errors::PlannerError;
use rust_decimal::Decimal;

pub mod snapshot;

pub use snapshot::{MintRecord, PeriodStats, PoolConfigRecord, PoolSnapshot, PriceField};

/// A pool snapshot with every field a deposit plan depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPool {
    pub id: Option<String>,
    pub token_a: TokenInfo,
    pub token_b: TokenInfo,
    /// Price of token A in token B units.
    pub current_price: Decimal,
    pub tick_spacing: i32,
    /// 24h APR as a fraction.
    pub apy_24h: f64,
}

fn token_from(record: Option<&MintRecord>, side: &str) -> Result<TokenInfo, PlannerError> {
    let record = record.ok_or_else(|| PlannerError::MissingData(side.to_string()))?;
    let address = record
        .address
        .clone()
        .ok_or_else(|| PlannerError::MissingData(format!("{side}.address")))?;
    let decimals = record
        .decimals
        .ok_or_else(|| PlannerError::MissingData(format!("{side}.decimals")))?;
    let symbol = record.symbol.clone().unwrap_or_default();
    Ok(TokenInfo::new(address, symbol, decimals))
}

impl PoolSnapshot {
    pub fn validate(&self) -> Result<ValidatedPool, PlannerError> {
        let token_a = token_from(self.mint_a.as_ref(), "mintA")?;
        let token_b = token_from(self.mint_b.as_ref(), "mintB")?;

        let current_price = self
            .price
            .as_ref()
            .ok_or_else(|| PlannerError::MissingData("price".to_string()))?
            .to_decimal()?;
        if current_price <= Decimal::ZERO {
            return Err(PlannerError::InvalidInput(format!(
                "pool price must be positive, got {current_price}"
            )));
        }

        let tick_spacing = self
            .config
            .as_ref()
            .and_then(|c| c.tick_spacing)
            .ok_or_else(|| PlannerError::MissingData("config.tickSpacing".to_string()))?;
        if tick_spacing <= 0 {
            return Err(PlannerError::InvalidInput(format!(
                "tick spacing must be positive, got {tick_spacing}"
            )));
        }

        Ok(ValidatedPool {
            id: self.id.clone(),
            token_a,
            token_b,
            current_price,
            tick_spacing,
            apy_24h: self.apr_or_zero() / 100.0,
        })
    }
}
