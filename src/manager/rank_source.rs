use crate::config::PlannerConfig;
use crate::core::cache::TimedCache;
use crate::errors::PlannerError;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use url::Url;

/// Supplies the symbols of the top-ranked tokens by market cap.
#[async_trait]
pub trait RankSource: Debug + Send + Sync {
    /// Whether ranking is active. A disabled source never filters pools.
    fn is_enabled(&self) -> bool;

    /// Symbols of the `limit` highest-ranked tokens. Empty when unavailable.
    async fn top_symbols(&self, limit: u32) -> HashSet<String>;
}

#[derive(Debug, Deserialize)]
struct Listing {
    symbol: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListingsResponse {
    #[serde(default)]
    data: Vec<Listing>,
}

/// Wrapped SOL trades under its own symbol on Solana pools.
fn collect_symbols(listings: Vec<Listing>) -> HashSet<String> {
    let mut symbols: HashSet<String> = listings.into_iter().filter_map(|l| l.symbol).collect();
    if symbols.contains("SOL") {
        symbols.insert("WSOL".to_string());
    }
    symbols
}

/// Ranks tokens through CoinMarketCap's latest listings, cached per rank limit.
pub struct CoinMarketCapRankSource {
    client: reqwest::Client,
    url: Url,
    api_key: Option<String>,
    cache: TimedCache<(u32, HashSet<String>)>,
}

impl Debug for CoinMarketCapRankSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CoinMarketCapRankSource")
            .field("url", &self.url.as_str())
            .field("enabled", &self.api_key.is_some())
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl CoinMarketCapRankSource {
    pub fn new(config: &PlannerConfig) -> Result<Self, PlannerError> {
        let cache = TimedCache::new(config.rank_cache_ttl());
        Self::with_cache(config, cache)
    }

    pub fn with_cache(
        config: &PlannerConfig,
        cache: TimedCache<(u32, HashSet<String>)>,
    ) -> Result<Self, PlannerError> {
        let url = Url::parse(&config.coinmarketcap_api_url)
            .map_err(|e| PlannerError::InvalidInput(format!("invalid CoinMarketCap url: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout()?)
            .build()
            .map_err(|e| PlannerError::ProviderError(e.to_string()))?;
        Ok(Self {
            client,
            url,
            api_key: config.coinmarketcap_api_key.clone(),
            cache,
        })
    }

    async fn fetch(&self, api_key: &str, limit: u32) -> Result<HashSet<String>, PlannerError> {
        let response = self
            .client
            .get(self.url.clone())
            .header("Accepts", "application/json")
            .header("X-CMC_PRO_API_KEY", api_key)
            .query(&[("limit", limit.to_string()), ("convert", "USD".to_string())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(PlannerError::ProviderError(format!(
                "CoinMarketCap request failed: {}",
                response.status()
            )));
        }
        let body: ListingsResponse = response.json().await?;
        Ok(collect_symbols(body.data))
    }
}

#[async_trait]
impl RankSource for CoinMarketCapRankSource {
    fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    async fn top_symbols(&self, limit: u32) -> HashSet<String> {
        if let Some((cached_limit, symbols)) = self.cache.get().await {
            if cached_limit == limit && !symbols.is_empty() {
                tracing::info!(limit, "Using cached CoinMarketCap ranks");
                return symbols;
            }
        }

        let Some(api_key) = self.api_key.as_deref() else {
            tracing::warn!("COINMARKETCAP_API_KEY not set, market cap filtering is disabled");
            return HashSet::new();
        };

        tracing::info!(limit, "Fetching top tokens from CoinMarketCap");
        match self.fetch(api_key, limit).await {
            Ok(symbols) => {
                tracing::info!(count = symbols.len(), "Fetched top-ranked symbols");
                if !symbols.is_empty() {
                    self.cache.insert((limit, symbols.clone())).await;
                }
                symbols
            }
            Err(e) => {
                tracing::error!("Error fetching data from CoinMarketCap: {}", e);
                HashSet::new()
            }
        }
    }
}

/// A rank source answering from a fixed symbol set, for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct FixedRankSource {
    symbols: HashSet<String>,
}

impl FixedRankSource {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl RankSource for FixedRankSource {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn top_symbols(&self, _limit: u32) -> HashSet<String> {
        self.symbols.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::tests::ManualClock;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_sol_implies_wsol() {
        let body: ListingsResponse = serde_json::from_str(
            r#"{"status":{},"data":[{"symbol":"BTC"},{"symbol":"SOL"},{"name":"no symbol"}]}"#,
        )
        .unwrap();
        let symbols = collect_symbols(body.data);
        assert_eq!(symbols.len(), 3);
        assert!(symbols.contains("WSOL"));
    }

    #[test]
    fn test_no_wsol_without_sol() {
        let symbols = collect_symbols(vec![Listing {
            symbol: Some("USDC".to_string()),
        }]);
        assert_eq!(symbols, HashSet::from(["USDC".to_string()]));
    }

    #[tokio::test]
    async fn test_without_api_key_ranking_is_disabled() {
        let source = CoinMarketCapRankSource::new(&PlannerConfig::default()).unwrap();
        assert!(!source.is_enabled());
        assert!(source.top_symbols(100).await.is_empty());
    }

    #[tokio::test]
    async fn test_serves_fresh_cache_for_same_limit() {
        let clock = Arc::new(ManualClock::new());
        let cache = TimedCache::with_clock(Duration::from_secs(3600), clock.clone());
        let symbols = HashSet::from(["SOL".to_string(), "WSOL".to_string()]);
        cache.insert((50, symbols.clone())).await;

        // No API key: anything not served from cache comes back empty.
        let source = CoinMarketCapRankSource::with_cache(&PlannerConfig::default(), cache).unwrap();
        assert_eq!(source.top_symbols(50).await, symbols);
        assert!(source.top_symbols(10).await.is_empty());

        clock.advance(Duration::from_secs(3600));
        assert!(source.top_symbols(50).await.is_empty());
    }
}
