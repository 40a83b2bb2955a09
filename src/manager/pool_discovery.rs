use crate::config::{PlannerConfig, parse_base_url};
use crate::errors::PlannerError;
use crate::manager::rank_source::RankSource;
use crate::pool::PoolSnapshot;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt::{self, Debug, Display};
use std::str::FromStr;
use std::sync::Arc;
use url::Url;

pub const DEFAULT_RANK_LIMIT: u32 = 100;

/// APR (percent) a pool must beat to be selected.
pub const APR_FLOOR: f64 = -1.0;

const POOL_LIST_PATH: &str = "pools/info/list";
const POOL_LIST_QUERY: [(&str, &str); 5] = [
    ("poolType", "concentrated"),
    ("poolSortField", "volume24h"),
    ("sortType", "desc"),
    ("pageSize", "200"),
    ("page", "1"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Minimum pool TVL in USD; a pool must exceed it to qualify.
    pub fn tvl_threshold(&self) -> f64 {
        match self {
            RiskLevel::Low => 5_000_000.0,
            RiskLevel::Medium => 1_000_000.0,
            RiskLevel::High => 100_000.0,
        }
    }
}

impl FromStr for RiskLevel {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(PlannerError::InvalidInput(format!(
                "unknown risk level {other:?}, expected low, medium or high"
            ))),
        }
    }
}

impl Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolQuery {
    pub risk_level: RiskLevel,
    pub market_cap_rank_limit: u32,
}

impl Default for PoolQuery {
    fn default() -> Self {
        Self {
            risk_level: RiskLevel::Low,
            market_cap_rank_limit: DEFAULT_RANK_LIMIT,
        }
    }
}

/// The pool chosen for a query, with the headline numbers a user sees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolProposal {
    pub pool_id: String,
    pub pool_name: String,
    /// 24h APR as a fraction.
    pub apy: f64,
    /// Pool TVL in USD.
    pub liquidity: f64,
    pub volume_24h: f64,
    pub raw_proposal: PoolSnapshot,
}

impl PoolProposal {
    pub fn from_snapshot(pool: &PoolSnapshot) -> Result<Self, PlannerError> {
        let pool_id = pool
            .id
            .clone()
            .ok_or_else(|| PlannerError::MissingData("id".to_string()))?;
        Ok(Self {
            pool_id,
            pool_name: pool.name(),
            apy: pool.apr_or_zero() / 100.0,
            liquidity: pool.tvl_or_zero(),
            volume_24h: pool.volume_or_zero(),
            raw_proposal: pool.clone(),
        })
    }
}

/// Returns the qualifying pool with the highest APR.
///
/// A pool qualifies when its TVL exceeds `tvl_threshold`, its APR exceeds
/// [`APR_FLOOR`] and, if `top_symbols` is non-empty, both of its symbols are
/// in it. Ties keep the earlier pool.
pub fn select_best_pool<'a>(
    pools: &'a [PoolSnapshot],
    tvl_threshold: f64,
    top_symbols: &HashSet<String>,
) -> Option<&'a PoolSnapshot> {
    let mut best: Option<&PoolSnapshot> = None;
    let mut best_apr = APR_FLOOR;
    for pool in pools {
        if pool.tvl_or_zero() <= tvl_threshold {
            continue;
        }
        if !top_symbols.is_empty() {
            let ranked = |symbol: Option<&str>| symbol.is_some_and(|s| top_symbols.contains(s));
            if !ranked(pool.symbol_a()) || !ranked(pool.symbol_b()) {
                continue;
            }
        }
        let apr = pool.apr_or_zero();
        if apr > best_apr {
            best = Some(pool);
            best_apr = apr;
        }
    }
    best
}

/// Supplies the list of candidate pools.
#[async_trait]
pub trait PoolSource: Debug + Send + Sync {
    async fn fetch_pools(&self) -> Result<Vec<PoolSnapshot>, PlannerError>;
}

#[derive(Debug, Deserialize)]
struct PoolPage {
    #[serde(default)]
    data: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct PoolListResponse {
    data: Option<PoolPage>,
}

fn decode_pools(body: PoolListResponse) -> Vec<PoolSnapshot> {
    let records = body.data.map(|page| page.data).unwrap_or_default();
    let mut pools = Vec::with_capacity(records.len());
    for (i, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<PoolSnapshot>(record) {
            Ok(pool) => pools.push(pool),
            Err(e) => tracing::debug!(index = i, "Skipping undecodable pool record: {}", e),
        }
    }
    pools
}

/// Concentrated pools from Raydium's pool list, sorted by 24h volume.
#[derive(Debug, Clone)]
pub struct RaydiumPoolSource {
    client: reqwest::Client,
    url: Url,
}

impl RaydiumPoolSource {
    pub fn new(config: &PlannerConfig) -> Result<Self, PlannerError> {
        let mut url = parse_base_url(&config.raydium_api_url)?
            .join(POOL_LIST_PATH)
            .map_err(|e| PlannerError::InvalidInput(e.to_string()))?;
        url.query_pairs_mut().extend_pairs(POOL_LIST_QUERY);
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout()?)
            .build()
            .map_err(|e| PlannerError::ProviderError(e.to_string()))?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl PoolSource for RaydiumPoolSource {
    async fn fetch_pools(&self) -> Result<Vec<PoolSnapshot>, PlannerError> {
        let response = self.client.get(self.url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(PlannerError::ProviderError(format!(
                "pool list request failed: {}",
                response.status()
            )));
        }
        let body: PoolListResponse = response.json().await?;
        Ok(decode_pools(body))
    }
}

/// A pool source over an in-memory list.
#[derive(Debug, Clone, Default)]
pub struct FixedPoolSource {
    pools: Vec<PoolSnapshot>,
}

impl FixedPoolSource {
    pub fn new(pools: Vec<PoolSnapshot>) -> Self {
        Self { pools }
    }
}

#[async_trait]
impl PoolSource for FixedPoolSource {
    async fn fetch_pools(&self) -> Result<Vec<PoolSnapshot>, PlannerError> {
        Ok(self.pools.clone())
    }
}

/// Finds the best pool for a risk tier, optionally restricted to top-ranked tokens.
#[derive(Debug, Clone)]
pub struct PoolDiscovery {
    pools: Arc<dyn PoolSource>,
    ranks: Option<Arc<dyn RankSource>>,
}

impl PoolDiscovery {
    pub fn new(pools: Arc<dyn PoolSource>, ranks: Option<Arc<dyn RankSource>>) -> Self {
        Self { pools, ranks }
    }

    /// Returns `None` when nothing qualifies or a collaborator fails; failures are logged.
    pub async fn find_and_propose(&self, query: &PoolQuery) -> Option<PoolProposal> {
        tracing::info!(
            risk = %query.risk_level,
            rank_limit = query.market_cap_rank_limit,
            "Searching for pool"
        );
        let tvl_threshold = query.risk_level.tvl_threshold();

        let top_symbols = match &self.ranks {
            Some(ranks) => {
                let symbols = ranks.top_symbols(query.market_cap_rank_limit).await;
                if ranks.is_enabled() && symbols.is_empty() {
                    tracing::error!(
                        "Market cap filtering is enabled but no top-ranked tokens were found"
                    );
                    return None;
                }
                symbols
            }
            None => HashSet::new(),
        };

        let pools = match self.pools.fetch_pools().await {
            Ok(pools) => pools,
            Err(e) => {
                tracing::error!("Error fetching pool data: {}", e);
                return None;
            }
        };
        if pools.is_empty() {
            tracing::warn!("Pool source returned no pools");
            return None;
        }

        let Some(best) = select_best_pool(&pools, tvl_threshold, &top_symbols) else {
            tracing::warn!(
                risk = %query.risk_level,
                tvl_threshold,
                "No pools found matching criteria"
            );
            return None;
        };

        match PoolProposal::from_snapshot(best) {
            Ok(proposal) => {
                tracing::info!(
                    pool = %proposal.pool_name,
                    tvl = proposal.liquidity,
                    volume_24h = proposal.volume_24h,
                    "Proposing pool"
                );
                Some(proposal)
            }
            Err(e) => {
                tracing::error!("Selected pool cannot be proposed: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_parsing() {
        assert_eq!("LOW".parse::<RiskLevel>(), Ok(RiskLevel::Low));
        assert_eq!(" medium ".parse::<RiskLevel>(), Ok(RiskLevel::Medium));
        assert_eq!("high".parse::<RiskLevel>(), Ok(RiskLevel::High));
        assert!("extreme".parse::<RiskLevel>().is_err());
        assert_eq!(RiskLevel::default(), RiskLevel::Low);
        assert_eq!(RiskLevel::Medium.to_string(), "medium");
    }

    #[test]
    fn test_pool_list_url() {
        let source = RaydiumPoolSource::new(&PlannerConfig::default()).unwrap();
        assert_eq!(
            source.url().as_str(),
            "https://api-v3.raydium.io/pools/info/list?poolType=concentrated&poolSortField=volume24h&sortType=desc&pageSize=200&page=1"
        );
    }

    #[test]
    fn test_decode_skips_bad_records() {
        let body: PoolListResponse = serde_json::from_str(
            r#"{"success":true,"data":{"count":3,"data":[
                {"id":"good","tvl":10.0},
                {"id":"bad","tvl":"lots"},
                {"id":"also-good"}
            ]}}"#,
        )
        .unwrap();
        let pools = decode_pools(body);
        let ids: Vec<_> = pools.iter().map(|p| p.id.as_deref()).collect();
        assert_eq!(ids, vec![Some("good"), Some("also-good")]);
    }

    #[test]
    fn test_decode_missing_page() {
        let body: PoolListResponse = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(decode_pools(body).is_empty());
    }
}
