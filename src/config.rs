use crate::errors::PlannerError;
use clap::Args;
use std::time::Duration;
use url::Url;

pub const DEFAULT_RAYDIUM_API_URL: &str = "https://api-v3.raydium.io";
pub const DEFAULT_COINMARKETCAP_API_URL: &str =
    "https://pro-api.coinmarketcap.com/v1/cryptocurrency/listings/latest";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RANK_CACHE_TTL_SECS: u64 = 3600;

/// Endpoints and limits shared by the planner's HTTP collaborators.
/// Every flag falls back to an environment variable.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    #[arg(long, env = "RAYDIUM_API_URL", default_value = DEFAULT_RAYDIUM_API_URL)]
    pub raydium_api_url: String,

    /// Market-cap filtering is disabled when unset.
    #[arg(long, env = "COINMARKETCAP_API_KEY", hide_env_values = true)]
    pub coinmarketcap_api_key: Option<String>,

    #[arg(long, env = "COINMARKETCAP_API_URL", default_value = DEFAULT_COINMARKETCAP_API_URL)]
    pub coinmarketcap_api_url: String,

    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    pub http_timeout_secs: u64,

    #[arg(long, env = "RANK_CACHE_TTL_SECS", default_value_t = DEFAULT_RANK_CACHE_TTL_SECS)]
    pub rank_cache_ttl_secs: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            raydium_api_url: DEFAULT_RAYDIUM_API_URL.to_string(),
            coinmarketcap_api_key: None,
            coinmarketcap_api_url: DEFAULT_COINMARKETCAP_API_URL.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            rank_cache_ttl_secs: DEFAULT_RANK_CACHE_TTL_SECS,
        }
    }
}

impl PlannerConfig {
    pub fn http_timeout(&self) -> Result<Duration, PlannerError> {
        if self.http_timeout_secs == 0 {
            return Err(PlannerError::InvalidInput(
                "HTTP_TIMEOUT_SECS must be > 0".to_string(),
            ));
        }
        Ok(Duration::from_secs(self.http_timeout_secs))
    }

    pub fn rank_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.rank_cache_ttl_secs)
    }
}

/// Parses an API base URL so relative joins append to its path.
pub fn parse_base_url(raw: &str) -> Result<Url, PlannerError> {
    let mut url =
        Url::parse(raw).map_err(|e| PlannerError::InvalidInput(format!("invalid url {raw:?}: {e}")))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: PlannerConfig,
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = TestCli::parse_from([
            "test",
            "--raydium-api-url",
            "http://localhost:8080",
            "--http-timeout-secs",
            "5",
        ]);
        assert_eq!(cli.config.raydium_api_url, "http://localhost:8080");
        assert_eq!(cli.config.http_timeout().unwrap(), Duration::from_secs(5));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = PlannerConfig {
            http_timeout_secs: 0,
            ..PlannerConfig::default()
        };
        assert!(config.http_timeout().is_err());
    }

    #[test]
    fn test_parse_base_url_keeps_path() {
        let url = parse_base_url("https://example.com/api/v3").unwrap();
        assert_eq!(url.join("mint/price").unwrap().as_str(), "https://example.com/api/v3/mint/price");
        let url = parse_base_url("https://api-v3.raydium.io").unwrap();
        assert_eq!(url.join("mint/price").unwrap().as_str(), "https://api-v3.raydium.io/mint/price");
        assert!(parse_base_url("not a url").is_err());
    }
}
