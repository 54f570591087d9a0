// src/price.rs
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::PriceQuoteError;

#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Current ETH→USD rate.
    async fn eth_usd_rate(&self) -> Result<f64, PriceQuoteError>;
}

/// cryptocompare-style quote endpoint returning `{"USD": <rate>}`.
pub struct HttpPriceSource {
    client: Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
    #[serde(rename = "USD")]
    usd: f64,
}

impl HttpPriceSource {
    pub fn new(url: String) -> eyre::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl PriceSource for HttpPriceSource {
    async fn eth_usd_rate(&self) -> Result<f64, PriceQuoteError> {
        let resp = self.client.get(&self.url).send().await?;

        if resp.status() != StatusCode::OK {
            return Err(PriceQuoteError::Payload(format!(
                "HTTP {}",
                resp.status()
            )));
        }

        let text = resp.text().await?;
        let parsed: PriceResponse = serde_json::from_str(&text)
            .map_err(|e| PriceQuoteError::Payload(e.to_string()))?;

        Ok(parsed.usd)
    }
}

/// Process-wide ETH/USD rate cache: empty until the first successful quote,
/// then reused for the remainder of the process. Never refreshed.
#[derive(Debug, Default)]
pub struct PriceCache {
    rate: Mutex<Option<f64>>,
}

impl PriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached rate, fetching from `source` on first use. A quote failure
    /// is downgraded to `default_rate` and left uncached, so a later
    /// invocation gets another shot at the real quote.
    pub async fn rate_or_default<S: PriceSource + ?Sized>(
        &self,
        source: &S,
        default_rate: f64,
    ) -> f64 {
        let mut slot = self.rate.lock().await;
        if let Some(rate) = *slot {
            return rate;
        }

        match source.eth_usd_rate().await {
            Ok(rate) => {
                info!("Cached ETH/USD rate: {}", rate);
                *slot = Some(rate);
                rate
            }
            Err(e) => {
                warn!("Price quote failed, using default rate {}: {}", default_rate, e);
                default_rate
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
        result: Result<f64, ()>,
    }

    #[async_trait]
    impl PriceSource for CountingSource {
        async fn eth_usd_rate(&self) -> Result<f64, PriceQuoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .map_err(|_| PriceQuoteError::Payload("down".to_string()))
        }
    }

    #[tokio::test]
    async fn first_success_is_cached() {
        let source = CountingSource {
            calls: AtomicUsize::new(0),
            result: Ok(3000.0),
        };
        let cache = PriceCache::new();

        assert_eq!(cache.rate_or_default(&source, 2228.0).await, 3000.0);
        assert_eq!(cache.rate_or_default(&source, 2228.0).await, 3000.0);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_falls_back_without_caching() {
        let source = CountingSource {
            calls: AtomicUsize::new(0),
            result: Err(()),
        };
        let cache = PriceCache::new();

        assert_eq!(cache.rate_or_default(&source, 2228.0).await, 2228.0);
        assert_eq!(cache.rate_or_default(&source, 2228.0).await, 2228.0);
        // the default is never cached, each invocation retries the source
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn quote_payload_parses() {
        let parsed: PriceResponse = serde_json::from_str(r#"{"USD":2228.5}"#).unwrap();
        assert_eq!(parsed.usd, 2228.5);
        assert!(serde_json::from_str::<PriceResponse>(r#"{"EUR":1.0}"#).is_err());
    }
}
