use rust_decimal::Decimal;
use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Order execution errors.
///
/// These never escape the execution layer as `Err`; they are carried inside
/// a failed submit/trade outcome so callers can tell them apart from denials.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("failed to submit order: {0}")]
    SubmissionFailed(String),

    #[error("order submission timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("invalid response from order relay: {0}")]
    InvalidResponse(String),
}

/// Risk policy denials, one variant per decision branch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RiskError {
    #[error("exposure limit exceeded: {size} > {limit}")]
    ExposureLimitExceeded { size: Decimal, limit: Decimal },

    #[error("invalid trade context: {reason}")]
    InvalidContext { reason: String },

    #[error("price ran up: {current} > {ceiling} (last {last})")]
    PriceRunUp {
        current: Decimal,
        last: Decimal,
        ceiling: Decimal,
    },

    #[error("insufficient liquidity: {observed} < {required}")]
    InsufficientLiquidity { observed: Decimal, required: Decimal },

    #[error("token flagged as honeypot")]
    Honeypot,

    #[error("cooldown active: {remaining_secs}s remaining")]
    CooldownActive { remaining_secs: i64 },

    #[error("slippage too high: {observed} > {max}")]
    SlippageTooHigh { observed: Decimal, max: Decimal },

    #[error("daily trade limit reached: {count} >= {limit}")]
    DailyTradeLimit { count: u32, limit: u32 },

    #[error("loss streak limit reached: {streak} >= {limit}")]
    LossStreak { streak: u32, limit: u32 },

    #[error("daily loss limit reached: {loss} >= {limit}")]
    DailyLossLimit { loss: Decimal, limit: Decimal },
}

impl RiskError {
    /// Stable reason code used in audit events and reports.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ExposureLimitExceeded { .. } => "exposure",
            Self::InvalidContext { .. } => "invalid_context",
            Self::PriceRunUp { .. } => "price_run_up",
            Self::InsufficientLiquidity { .. } => "liquidity",
            Self::Honeypot => "honeypot",
            Self::CooldownActive { .. } => "cooldown",
            Self::SlippageTooHigh { .. } => "slippage",
            Self::DailyTradeLimit { .. } => "daily_trade_limit",
            Self::LossStreak { .. } => "loss_streak",
            Self::DailyLossLimit { .. } => "daily_loss",
        }
    }
}

/// Position ledger persistence errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage connection error: {0}")]
    Connection(String),

    #[error("storage query failed: {0}")]
    Query(String),

    #[error("corrupt ledger row for {pair}: {reason}")]
    Corrupt { pair: String, reason: String },

    #[error("position ledger is in use by {holder}; stop it first, or remove {path} if no such process is running")]
    Locked { path: String, holder: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Risk(#[from] RiskError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("quote unavailable for {token}: {reason}")]
    QuoteUnavailable { token: String, reason: String },

    #[error("connection error: {0}")]
    Connection(String),
}

impl Error {
    /// True when the error came from the position ledger's backing store.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::WebSocket(Box::new(err))
    }
}
