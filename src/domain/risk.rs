//! Audit records of risk decisions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::trade::TradeContext;

/// Outcome of a single risk decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskOutcome {
    /// The trade was denied.
    Blocked,
    /// The trade was allowed through.
    Released,
}

impl fmt::Display for RiskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blocked => f.write_str("BLOCKED"),
            Self::Released => f.write_str("RELEASED"),
        }
    }
}

/// Reason code recorded for approvals.
pub const APPROVED_REASON: &str = "approved";

/// Immutable audit record of one admit/deny decision.
///
/// Events are append-only for the life of the process.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskEvent {
    id: Uuid,
    timestamp: DateTime<Utc>,
    outcome: RiskOutcome,
    reason: &'static str,
    detail: String,
    context: TradeContext,
    /// Cooldown seconds remaining for the pair/direction when decided.
    cooldown_remaining_secs: Option<i64>,
}

impl RiskEvent {
    /// Create a new event.
    #[must_use]
    pub fn new(
        outcome: RiskOutcome,
        reason: &'static str,
        detail: impl Into<String>,
        context: TradeContext,
        cooldown_remaining_secs: Option<i64>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: context.timestamp,
            outcome,
            reason,
            detail: detail.into(),
            context,
            cooldown_remaining_secs,
        }
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[must_use]
    pub const fn outcome(&self) -> RiskOutcome {
        self.outcome
    }

    #[must_use]
    pub const fn reason(&self) -> &'static str {
        self.reason
    }

    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    #[must_use]
    pub const fn context(&self) -> &TradeContext {
        &self.context
    }

    #[must_use]
    pub const fn cooldown_remaining_secs(&self) -> Option<i64> {
        self.cooldown_remaining_secs
    }

    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.outcome == RiskOutcome::Blocked
    }
}
