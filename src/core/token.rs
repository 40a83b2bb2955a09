use crate::math::utils::to_human_amount;
use alloy_primitives::U256;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::hash::{Hash, Hasher};

pub trait TokenLike: Send + Sync {
    fn mint(&self) -> &str;
    fn symbol(&self) -> &str;
    fn decimals(&self) -> u8;

    /// Scales a raw on-chain amount into whole tokens.
    fn to_human(&self, raw: U256) -> f64 {
        to_human_amount(raw, self.decimals())
    }
}

/// A pool token identified by its mint address.
#[derive(Debug, Clone, Serialize)]
pub struct TokenInfo {
    pub mint: String,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenInfo {
    pub fn new(mint: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            mint: mint.into(),
            symbol: symbol.into(),
            decimals,
        }
    }
}

impl TokenLike for TokenInfo {
    fn mint(&self) -> &str {
        &self.mint
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }
}

impl PartialEq for TokenInfo {
    fn eq(&self, other: &Self) -> bool {
        self.mint == other.mint
    }
}

impl Eq for TokenInfo {}

impl Hash for TokenInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.mint.hash(state);
    }
}

impl PartialOrd for TokenInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TokenInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.mint.cmp(&other.mint)
    }
}

impl Display for TokenInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} ({})", self.symbol, self.mint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_the_mint() {
        let a = TokenInfo::new("So11111111111111111111111111111111111111112", "SOL", 9);
        let b = TokenInfo::new("So11111111111111111111111111111111111111112", "WSOL", 9);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "SOL (So11111111111111111111111111111111111111112)");
    }

    #[test]
    fn test_to_human() {
        let usdc = TokenInfo::new("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", "USDC", 6);
        assert_eq!(usdc.to_human(U256::from(2_500_000u64)), 2.5);
    }
}
