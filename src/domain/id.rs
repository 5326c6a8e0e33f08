//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Traded instrument identifier.
///
/// Positions and cooldowns are keyed by the traded token's address, since
/// every pair is quoted against the same fixed quote asset.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairId(String);

impl PairId {
    /// Create a new `PairId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the pair ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The traded token behind this pair.
    #[must_use]
    pub fn token(&self) -> TokenAddress {
        TokenAddress::new(self.0.as_str())
    }
}

impl From<&TokenAddress> for PairId {
    fn from(token: &TokenAddress) -> Self {
        Self::new(token.as_str())
    }
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PairId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for PairId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Token contract address.
///
/// Hex addresses are compared case-insensitively, so the address is stored
/// lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TokenAddress(String);

impl TokenAddress {
    /// Create a new `TokenAddress`, normalizing to lowercase.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into().trim().to_ascii_lowercase())
    }

    /// Get the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TokenAddress {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for TokenAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<TokenAddress> for String {
    fn from(address: TokenAddress) -> Self {
        address.0
    }
}

/// Opaque handle returned for a submitted order (a tx hash in live mode).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionHandle(String);

impl ExecutionHandle {
    /// Create a new `ExecutionHandle`.
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// Get the handle as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the handle was synthesized by simulated execution.
    #[must_use]
    pub fn is_simulated(&self) -> bool {
        self.0.starts_with(SIMULATED_PREFIX)
    }
}

/// Prefix carried by every handle produced in dry-run mode.
pub const SIMULATED_PREFIX: &str = "dryrun-";

impl fmt::Display for ExecutionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ExecutionHandle {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
