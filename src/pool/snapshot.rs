use crate::errors::PlannerError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// A price as served by the pool list: either a decimal string or a JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceField {
    Number(f64),
    Text(String),
}

impl PriceField {
    /// Parses the price into a decimal without passing strings through binary floats.
    /// Numbers go through their shortest round-trip text.
    pub fn to_decimal(&self) -> Result<Decimal, PlannerError> {
        match self {
            PriceField::Number(value) => {
                if !value.is_finite() {
                    return Err(PlannerError::InvalidInput(format!("pool price {value}")));
                }
                parse_decimal(&value.to_string())
            }
            PriceField::Text(text) => parse_decimal(text.trim()),
        }
    }
}

fn parse_decimal(text: &str) -> Result<Decimal, PlannerError> {
    let parsed = if text.contains(['e', 'E']) {
        Decimal::from_scientific(text)
    } else {
        Decimal::from_str(text)
    };
    parsed.map_err(|e| PlannerError::InvalidInput(format!("pool price {text:?}: {e}")))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MintRecord {
    pub address: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolConfigRecord {
    pub tick_spacing: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodStats {
    /// Annualized rate in percent.
    pub apr: Option<f64>,
    pub volume: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One concentrated-liquidity pool record from the Raydium pool list.
///
/// Every field is optional on the wire; [`PoolSnapshot::validate`] decides
/// which ones a plan needs. Fields this crate does not read are kept in
/// `extra` so the record serializes back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSnapshot {
    pub id: Option<String>,
    pub mint_a: Option<MintRecord>,
    pub mint_b: Option<MintRecord>,
    pub price: Option<PriceField>,
    pub config: Option<PoolConfigRecord>,
    pub day: Option<PeriodStats>,
    pub tvl: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PoolSnapshot {
    pub fn symbol_a(&self) -> Option<&str> {
        self.mint_a.as_ref().and_then(|m| m.symbol.as_deref())
    }

    pub fn symbol_b(&self) -> Option<&str> {
        self.mint_b.as_ref().and_then(|m| m.symbol.as_deref())
    }

    pub fn tvl_or_zero(&self) -> f64 {
        self.tvl.unwrap_or(0.0)
    }

    /// 24h APR in percent, zero when absent.
    pub fn apr_or_zero(&self) -> f64 {
        self.day.as_ref().and_then(|d| d.apr).unwrap_or(0.0)
    }

    pub fn volume_or_zero(&self) -> f64 {
        self.day.as_ref().and_then(|d| d.volume).unwrap_or(0.0)
    }

    /// "A-B" from the two mint symbols.
    pub fn name(&self) -> String {
        format!(
            "{}-{}",
            self.symbol_a().unwrap_or_default(),
            self.symbol_b().unwrap_or_default()
        )
    }
}
