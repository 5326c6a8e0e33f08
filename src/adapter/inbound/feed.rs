//! WebSocket discovery feed.
//!
//! Connects to a pair-discovery service and yields every `pair_created`
//! message as a [`NewPair`]. Other message types are ignored. The feed
//! reconnects after a fixed delay whenever the connection drops, so
//! [`PairFeed::next_pair`] only ever waits.
//!
//! Expected message shape:
//!
//! ```json
//! {"type": "pair_created", "pair": "0x..", "token0": "0x..", "token1": "0x..",
//!  "dex": {"name": "uniswap-v2", "router": "0x.."}}
//! ```

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, trace, warn};

use crate::domain::{DexInfo, NewPair, PairId, TokenAddress};
use crate::error::Result;
use crate::port::PairFeed;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum FeedMessage {
    PairCreated {
        pair: String,
        token0: String,
        token1: String,
        dex: DexMessage,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct DexMessage {
    name: String,
    #[serde(default)]
    router: String,
}

/// Parse one text frame. `Ok(None)` for messages that are not new pairs.
///
/// # Errors
///
/// Returns an error if the frame is not valid JSON of the expected shape.
pub fn parse_pair_message(text: &str) -> Result<Option<NewPair>> {
    Ok(match serde_json::from_str::<FeedMessage>(text)? {
        FeedMessage::PairCreated {
            pair,
            token0,
            token1,
            dex,
        } => Some(NewPair {
            pair: PairId::new(pair),
            token0: TokenAddress::new(token0),
            token1: TokenAddress::new(token1),
            dex: DexInfo {
                name: dex.name,
                router: dex.router,
            },
        }),
        FeedMessage::Other => None,
    })
}

/// Reconnecting WebSocket pair feed.
pub struct WsPairFeed {
    url: String,
    reconnect_delay: Duration,
    ws: Option<WsStream>,
}

impl WsPairFeed {
    #[must_use]
    pub fn new(url: impl Into<String>, reconnect_delay: Duration) -> Self {
        Self {
            url: url.into(),
            reconnect_delay,
            ws: None,
        }
    }

    async fn connect(&self) -> Result<WsStream> {
        info!(url = %self.url, "Connecting to discovery feed");
        let (ws, response) = connect_async(self.url.as_str()).await?;
        info!(status = %response.status(), "Discovery feed connected");
        Ok(ws)
    }

    /// Read frames until one carries a new pair. `None` when the connection
    /// is gone and must be re-established.
    async fn read_pair(ws: &mut WsStream) -> Option<NewPair> {
        while let Some(frame) = ws.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    trace!(bytes = text.len(), "Received discovery frame");
                    match parse_pair_message(&text) {
                        Ok(Some(pair)) => return Some(pair),
                        Ok(None) => {}
                        Err(e) => warn!(error = %e, bytes = text.len(), "Failed to parse message"),
                    }
                }
                Ok(Message::Ping(data)) => {
                    if let Err(e) = ws.send(Message::Pong(data)).await {
                        warn!(error = %e, "Failed to answer ping");
                        return None;
                    }
                }
                Ok(Message::Close(frame)) => {
                    info!(frame = ?frame, "Discovery feed closed by server");
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "Discovery feed error");
                    return None;
                }
            }
        }
        debug!("Discovery feed stream ended");
        None
    }
}

#[async_trait]
impl PairFeed for WsPairFeed {
    async fn next_pair(&mut self) -> Option<NewPair> {
        loop {
            let mut ws = match self.ws.take() {
                Some(ws) => ws,
                None => match self.connect().await {
                    Ok(ws) => ws,
                    Err(e) => {
                        warn!(
                            error = %e,
                            retry_in_ms = self.reconnect_delay.as_millis() as u64,
                            "Discovery feed connection failed"
                        );
                        tokio::time::sleep(self.reconnect_delay).await;
                        continue;
                    }
                },
            };

            if let Some(pair) = Self::read_pair(&mut ws).await {
                self.ws = Some(ws);
                return Some(pair);
            }
            tokio::time::sleep(self.reconnect_delay).await;
        }
    }
}
