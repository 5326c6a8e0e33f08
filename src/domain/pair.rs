//! Newly discovered trading pairs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{PairId, TokenAddress};

/// Venue a pair was discovered on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DexInfo {
    pub name: String,
    pub router: String,
}

/// A pair reported by the discovery collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPair {
    pub pair: PairId,
    pub token0: TokenAddress,
    pub token1: TokenAddress,
    pub dex: DexInfo,
}

impl NewPair {
    /// The token traded against `quote`, or `None` if `quote` is not in the pair.
    #[must_use]
    pub fn target_token(&self, quote: &TokenAddress) -> Option<&TokenAddress> {
        if &self.token0 == quote {
            Some(&self.token1)
        } else if &self.token1 == quote {
            Some(&self.token0)
        } else {
            None
        }
    }
}

/// Market figures reported by the screening collaborator for one pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screening {
    /// Pool liquidity in whole quote units.
    pub liquidity: Decimal,
    /// Expected slippage for the configured trade size (0.02 = 2%).
    pub slippage: Decimal,
    pub spread: Decimal,
    pub not_honeypot: bool,
}
