use crate::config::parse_base_url;
use crate::errors::PlannerError;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Supplies USD unit prices keyed by mint address.
///
/// Mints the oracle cannot price are left out of the returned map, so callers
/// decide what a missing price means.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    async fn get_token_prices(&self, mints: &[String]) -> HashMap<String, f64>;
}

/// A quoted price as it appears on the wire: a decimal string, a JSON number,
/// or an object carrying either under `price`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum PriceValue {
    Number(f64),
    Text(String),
    Nested { price: Box<PriceValue> },
}

impl PriceValue {
    fn as_f64(&self) -> Option<f64> {
        match self {
            PriceValue::Number(value) => Some(*value),
            PriceValue::Text(text) => text.trim().parse().ok(),
            PriceValue::Nested { price } => price.as_f64(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MintPriceResponse {
    #[serde(default)]
    data: HashMap<String, Option<PriceValue>>,
}

/// Prices mints through Raydium's `/mint/price` endpoint.
#[derive(Debug, Clone)]
pub struct RaydiumPriceOracle {
    base_url: Url,
    client: reqwest::Client,
}

impl RaydiumPriceOracle {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PlannerError> {
        let base_url = parse_base_url(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlannerError::ProviderError(e.to_string()))?;
        Ok(Self { base_url, client })
    }

    fn price_url(&self, mints: &[String]) -> Result<Url, PlannerError> {
        let mut url = self
            .base_url
            .join("mint/price")
            .map_err(|e| PlannerError::InvalidInput(e.to_string()))?;
        url.query_pairs_mut().append_pair("mints", &mints.join(","));
        Ok(url)
    }

    async fn fetch(&self, mints: &[String]) -> Result<HashMap<String, f64>, PlannerError> {
        let url = self.price_url(mints)?;
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(PlannerError::ProviderError(format!(
                "mint price request failed: {}",
                response.status()
            )));
        }
        let body: MintPriceResponse = response.json().await?;
        Ok(parse_prices(body))
    }
}

fn parse_prices(body: MintPriceResponse) -> HashMap<String, f64> {
    body.data
        .into_iter()
        .filter_map(|(mint, value)| value.and_then(|v| v.as_f64()).map(|price| (mint, price)))
        .collect()
}

#[async_trait]
impl PriceOracle for RaydiumPriceOracle {
    async fn get_token_prices(&self, mints: &[String]) -> HashMap<String, f64> {
        match self.fetch(mints).await {
            Ok(prices) => {
                tracing::info!(?prices, "Fetched token prices");
                prices
            }
            Err(e) => {
                tracing::error!(?mints, "Failed to fetch token prices: {}", e);
                HashMap::new()
            }
        }
    }
}

/// An oracle answering from a fixed in-memory table.
#[derive(Debug, Clone, Default)]
pub struct FixedPriceOracle {
    prices: HashMap<String, f64>,
}

impl FixedPriceOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, mint: impl Into<String>, price_usd: f64) -> Self {
        self.prices.insert(mint.into(), price_usd);
        self
    }
}

#[async_trait]
impl PriceOracle for FixedPriceOracle {
    async fn get_token_prices(&self, mints: &[String]) -> HashMap<String, f64> {
        mints
            .iter()
            .filter_map(|mint| self.prices.get(mint).map(|p| (mint.clone(), *p)))
            .collect()
    }
}
