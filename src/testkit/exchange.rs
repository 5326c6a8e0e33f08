//! Scripted relay collaborators.
//!
//! - [`ScriptedPriceSource`] - per-token prices set by the test, with an
//!   error switch.
//! - [`StaticScreener`] - the same screening figures for every pair.
//! - [`ScriptedSubmitter`] - records intents and answers with sequential
//!   handles, or a fixed failure.
//! - [`ScriptedFeed`] - a pre-loaded queue of discovered pairs.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal_macros::dec;

use crate::domain::{ExecutionHandle, NewPair, Price, Screening, TokenAddress, TradeIntent};
use crate::error::{Error, ExecutionError, Result};
use crate::port::{OrderSubmitter, PairFeed, PairScreener, PriceSource};

// ---------------------------------------------------------------------------
// ScriptedPriceSource
// ---------------------------------------------------------------------------

/// Price source backed by a map the test writes to.
///
/// Tokens without an entry have no quote (`Ok(None)`).
#[derive(Default)]
pub struct ScriptedPriceSource {
    prices: Mutex<HashMap<TokenAddress, Price>>,
    failing: AtomicBool,
}

impl ScriptedPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(self, token: &str, price: Price) -> Self {
        self.set(token, price);
        self
    }

    pub fn set(&self, token: &str, price: Price) {
        self.prices
            .lock()
            .expect("lock prices")
            .insert(TokenAddress::from(token), price);
    }

    pub fn clear(&self, token: &str) {
        self.prices
            .lock()
            .expect("lock prices")
            .remove(&TokenAddress::from(token));
    }

    /// Make every lookup return an error until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl PriceSource for ScriptedPriceSource {
    async fn price(&self, token: &TokenAddress, _quote: &TokenAddress) -> Result<Option<Price>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::QuoteUnavailable {
                token: token.to_string(),
                reason: "scripted failure".into(),
            });
        }
        Ok(self.prices.lock().expect("lock prices").get(token).copied())
    }
}

// ---------------------------------------------------------------------------
// StaticScreener
// ---------------------------------------------------------------------------

/// Screener that reports the same figures for every pair.
pub struct StaticScreener {
    screening: Option<Screening>,
}

impl StaticScreener {
    /// Deep liquidity, low slippage, not a honeypot.
    pub fn passing() -> Self {
        Self::with(Screening {
            liquidity: dec!(10),
            slippage: dec!(0.01),
            spread: dec!(0.001),
            not_honeypot: true,
        })
    }

    pub fn with(screening: Screening) -> Self {
        Self {
            screening: Some(screening),
        }
    }

    pub fn unavailable() -> Self {
        Self { screening: None }
    }
}

#[async_trait]
impl PairScreener for StaticScreener {
    async fn screen(&self, _pair: &NewPair, _target: &TokenAddress) -> Result<Option<Screening>> {
        Ok(self.screening)
    }
}

// ---------------------------------------------------------------------------
// ScriptedSubmitter
// ---------------------------------------------------------------------------

/// Order submitter that records every intent it sees.
///
/// Successful submissions return handles `0xtx1`, `0xtx2`, ...
pub struct ScriptedSubmitter {
    failure: Mutex<Option<String>>,
    delay: Option<Duration>,
    intents: Mutex<Vec<TradeIntent>>,
    calls: AtomicUsize,
}

impl ScriptedSubmitter {
    pub fn succeeding() -> Self {
        Self {
            failure: Mutex::new(None),
            delay: None,
            intents: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        let submitter = Self::succeeding();
        submitter.set_failure(Some(message));
        submitter
    }

    /// Sleep before answering, to exercise the submission timeout.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Switch between failing with `message` and succeeding (`None`).
    pub fn set_failure(&self, message: Option<&str>) {
        *self.failure.lock().expect("lock failure") = message.map(str::to_string);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn intents(&self) -> Vec<TradeIntent> {
        self.intents.lock().expect("lock intents").clone()
    }
}

#[async_trait]
impl OrderSubmitter for ScriptedSubmitter {
    async fn submit(&self, intent: &TradeIntent) -> std::result::Result<ExecutionHandle, ExecutionError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.intents
            .lock()
            .expect("lock intents")
            .push(intent.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.failure.lock().expect("lock failure").clone();
        match failure {
            Some(message) => Err(ExecutionError::SubmissionFailed(message)),
            None => Ok(ExecutionHandle::new(format!("0xtx{n}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// ScriptedFeed
// ---------------------------------------------------------------------------

/// Pair feed that yields a fixed queue, then ends.
#[derive(Default)]
pub struct ScriptedFeed {
    pairs: VecDeque<NewPair>,
}

impl ScriptedFeed {
    pub fn new(pairs: Vec<NewPair>) -> Self {
        Self {
            pairs: pairs.into(),
        }
    }
}

#[async_trait]
impl PairFeed for ScriptedFeed {
    async fn next_pair(&mut self) -> Option<NewPair> {
        self.pairs.pop_front()
    }
}

