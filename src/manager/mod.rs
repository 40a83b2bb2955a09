pub mod pool_discovery;
pub mod rank_source;
