use crate::math::clmm::constants::{MAX_TICK, MIN_TICK};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    #[error("Tick {0} is outside [{min}, {max}]", min = MIN_TICK, max = MAX_TICK)]
    OutOfRange(i32),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Reference liquidity is worth zero USD in this range")]
    ZeroUnitValue,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

impl From<reqwest::Error> for PlannerError {
    fn from(err: reqwest::Error) -> Self {
        PlannerError::ProviderError(err.to_string())
    }
}
