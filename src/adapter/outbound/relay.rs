//! Execution relay HTTP client.
//!
//! The relay is the external service that quotes tokens, screens new pairs
//! and signs and broadcasts swaps. This client implements the three
//! exchange ports over its REST API:
//!
//! - `GET  /v1/price?token=&quote=` - `{"price": "..."}`, 404 when unquoted
//! - `GET  /v1/screen?pair=&token=` - screening figures, 404 when unknown
//! - `POST /v1/orders` - submit a swap, returns `{"tx_hash": "..."}`
//!
//! Token amounts travel as decimal strings since they exceed JSON's safe
//! integer range.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::domain::{ExecutionHandle, NewPair, Price, Screening, TokenAddress, TradeIntent};
use crate::error::{ExecutionError, Result};
use crate::infrastructure::config::RelayConfig;
use crate::port::{OrderSubmitter, PairScreener, PriceSource};

/// Header carrying the relay API key.
const API_KEY_HEADER: &str = "x-api-key";

/// HTTP client for the execution relay.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: Client,
    base_url: Url,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct PriceResponse {
    price: Decimal,
}

#[derive(Deserialize)]
struct ScreenResponse {
    liquidity: Decimal,
    slippage: Decimal,
    #[serde(default)]
    spread: Decimal,
    not_honeypot: bool,
}

#[derive(Serialize)]
struct OrderRequest<'a> {
    side: &'static str,
    token_in: &'a str,
    token_out: &'a str,
    amount_in: String,
    min_out: String,
}

impl<'a> From<&'a TradeIntent> for OrderRequest<'a> {
    fn from(intent: &'a TradeIntent) -> Self {
        Self {
            side: intent.side.as_str(),
            token_in: intent.token_in.as_str(),
            token_out: intent.token_out.as_str(),
            amount_in: intent.amount_in.to_string(),
            min_out: intent.min_out.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct OrderResponse {
    tx_hash: String,
}

/// Parse the relay base URL as a directory so relative endpoints extend its
/// path instead of replacing the last segment.
fn base_url(raw: &str) -> Result<Url> {
    if raw.ends_with('/') {
        return Ok(Url::parse(raw)?);
    }
    Ok(Url::parse(&format!("{raw}/"))?)
}

impl RelayClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the base URL
    /// does not parse.
    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url(&config.base_url)?,
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    async fn post_order(&self, intent: &TradeIntent) -> Result<OrderResponse> {
        let response = self
            .authorize(self.http.post(self.endpoint("v1/orders")?))
            .json(&OrderRequest::from(intent))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl PriceSource for RelayClient {
    async fn price(&self, token: &TokenAddress, quote: &TokenAddress) -> Result<Option<Price>> {
        let mut url = self.endpoint("v1/price")?;
        url.query_pairs_mut()
            .append_pair("token", token.as_str())
            .append_pair("quote", quote.as_str());

        let response = self.authorize(self.http.get(url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(token = %token, "Relay has no quote");
            return Ok(None);
        }
        let body: PriceResponse = response.error_for_status()?.json().await?;
        Ok(Some(body.price))
    }
}

#[async_trait]
impl PairScreener for RelayClient {
    async fn screen(&self, pair: &NewPair, target: &TokenAddress) -> Result<Option<Screening>> {
        let mut url = self.endpoint("v1/screen")?;
        url.query_pairs_mut()
            .append_pair("pair", pair.pair.as_str())
            .append_pair("token", target.as_str())
            .append_pair("dex", &pair.dex.name);

        let response = self.authorize(self.http.get(url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(pair = %pair.pair, "Relay has no screening data");
            return Ok(None);
        }
        let body: ScreenResponse = response.error_for_status()?.json().await?;
        Ok(Some(Screening {
            liquidity: body.liquidity,
            slippage: body.slippage,
            spread: body.spread,
            not_honeypot: body.not_honeypot,
        }))
    }
}

#[async_trait]
impl OrderSubmitter for RelayClient {
    async fn submit(&self, intent: &TradeIntent) -> std::result::Result<ExecutionHandle, ExecutionError> {
        let response = self
            .post_order(intent)
            .await
            .map_err(|e| ExecutionError::SubmissionFailed(e.to_string()))?;
        if response.tx_hash.trim().is_empty() {
            return Err(ExecutionError::InvalidResponse("empty tx_hash".into()));
        }
        Ok(ExecutionHandle::new(response.tx_hash))
    }
}
