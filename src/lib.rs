pub mod config;
pub mod core;
pub mod errors;
pub mod manager;
pub mod math;
pub mod planner;
pub mod pool;

pub use errors::PlannerError;

pub use config::PlannerConfig;
pub use core::price_oracle::{FixedPriceOracle, PriceOracle, RaydiumPriceOracle};
pub use core::token::{TokenInfo, TokenLike};
pub use manager::pool_discovery::{PoolDiscovery, PoolProposal, PoolQuery, RiskLevel};
pub use math::clmm::full_math::Rounding;
pub use planner::{DepositResult, PlanOptions, PriceRange, deposit_plan, plan_with_prices};
pub use pool::{PoolSnapshot, PriceField, ValidatedPool};
