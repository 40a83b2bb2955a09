use clap::{Parser, Subcommand};
use clmm_planner::{
    PlanOptions, PlannerConfig, PoolDiscovery, PoolQuery, PoolSnapshot, RaydiumPriceOracle,
    RiskLevel, Rounding, deposit_plan,
    manager::{
        pool_discovery::{DEFAULT_RANK_LIMIT, RaydiumPoolSource},
        rank_source::{CoinMarketCapRankSource, RankSource},
    },
    planner::DEFAULT_RANGE_WIDTH,
};
use rust_decimal::Decimal;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clmm-planner")]
#[command(about = "Size concentrated-liquidity deposits on Raydium pools", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: PlannerConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a deposit into a pool record read from a JSON file.
    Plan {
        #[arg(long)]
        pool: PathBuf,
        #[arg(long)]
        deposit_usd: f64,
        #[arg(long)]
        round_up: bool,
        #[arg(long, default_value_t = DEFAULT_RANGE_WIDTH)]
        range_width: Decimal,
    },
    /// Pick the best pool for a risk tier, optionally planning a deposit into it.
    Discover {
        #[arg(long, default_value_t = RiskLevel::Low)]
        risk: RiskLevel,
        #[arg(long, default_value_t = DEFAULT_RANK_LIMIT)]
        rank_limit: u32,
        #[arg(long)]
        deposit_usd: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let oracle = RaydiumPriceOracle::new(&cli.config.raydium_api_url, cli.config.http_timeout()?)?;

    match cli.command {
        Commands::Plan {
            pool,
            deposit_usd,
            round_up,
            range_width,
        } => {
            let raw = tokio::fs::read_to_string(&pool).await?;
            let snapshot: PoolSnapshot = serde_json::from_str(&raw)?;
            let options = PlanOptions {
                rounding: Rounding::from_round_up(round_up),
                range_width,
            };
            let result = deposit_plan(&snapshot, deposit_usd, &oracle, &options).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Discover {
            risk,
            rank_limit,
            deposit_usd,
        } => {
            let pools = Arc::new(RaydiumPoolSource::new(&cli.config)?);
            let ranks: Arc<dyn RankSource> = Arc::new(CoinMarketCapRankSource::new(&cli.config)?);
            let discovery = PoolDiscovery::new(pools, Some(ranks));
            let query = PoolQuery {
                risk_level: risk,
                market_cap_rank_limit: rank_limit,
            };

            let Some(proposal) = discovery.find_and_propose(&query).await else {
                tracing::warn!("No pool matched the query");
                std::process::exit(1);
            };

            let plan = match deposit_usd {
                Some(deposit_usd) => Some(
                    deposit_plan(
                        &proposal.raw_proposal,
                        deposit_usd,
                        &oracle,
                        &PlanOptions::default(),
                    )
                    .await?,
                ),
                None => None,
            };
            let output = json!({ "proposal": proposal, "plan": plan });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
