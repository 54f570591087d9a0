// src/provider.rs
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use crate::error::ProviderError;
use crate::models::{Receipt, TxRecord};

/// Ledger history backend: current chain height, bounded per-address history,
/// and per-transaction receipt lookup.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    async fn current_height(&self) -> Result<u64, ProviderError>;

    async fn history(
        &self,
        address: &str,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<TxRecord>, ProviderError>;

    async fn receipt(&self, tx_hash: &str) -> Result<Receipt, ProviderError>;
}

/// One height query plus one bounded history query: the most-recent `window`
/// blocks of activity for `address`. Order is whatever the provider returns.
pub async fn fetch_recent_history<P: HistoryProvider + ?Sized>(
    provider: &P,
    address: &str,
    window: u64,
) -> Result<Vec<TxRecord>, ProviderError> {
    let latest = provider.current_height().await?;
    let start = latest.saturating_sub(window);

    info!("Fetching history {} → {} for {}", start, latest, address);

    provider.history(address, start, latest).await
}

/// Etherscan-compatible HTTP provider. Proxy actions carry hex numbers,
/// account actions carry decimal strings.
pub struct EtherscanProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ProxyResponse<T> {
    result: T,
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    status: String,
    message: String,
    result: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct TxEntry {
    hash: String,
    value: String, // decimal wei
    #[serde(rename = "gasPrice")]
    gas_price: String, // decimal wei
}

#[derive(Debug, Deserialize)]
struct ReceiptEntry {
    #[serde(rename = "gasUsed")]
    gas_used: String, // hex
}

fn hex_to_u64(s: &str) -> Result<u64, ProviderError> {
    u64::from_str_radix(s.trim_start_matches("0x"), 16)
        .map_err(|_| ProviderError::Payload(format!("bad hex quantity: {s}")))
}

impl TxEntry {
    fn into_record(self) -> Result<TxRecord, ProviderError> {
        let value_wei = self
            .value
            .parse::<u128>()
            .map_err(|_| ProviderError::Payload(format!("bad value in tx {}", self.hash)))?;
        let gas_price_wei = self
            .gas_price
            .parse::<u128>()
            .map_err(|_| ProviderError::Payload(format!("bad gasPrice in tx {}", self.hash)))?;

        Ok(TxRecord {
            hash: self.hash,
            value_wei,
            gas_price_wei,
        })
    }
}

impl EtherscanProvider {
    pub fn new(base_url: String, api_key: String) -> eyre::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    async fn get_text(&self, query: &[(&str, &str)]) -> Result<String, ProviderError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(query)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;

        if resp.status() != StatusCode::OK {
            return Err(ProviderError::Rejected(format!("HTTP {}", resp.status())));
        }

        Ok(resp.text().await?)
    }
}

#[async_trait]
impl HistoryProvider for EtherscanProvider {
    async fn current_height(&self) -> Result<u64, ProviderError> {
        let text = self
            .get_text(&[("module", "proxy"), ("action", "eth_blockNumber")])
            .await?;

        let parsed: ProxyResponse<String> = serde_json::from_str(&text)
            .map_err(|e| ProviderError::Payload(format!("blockNumber response: {e}")))?;

        hex_to_u64(&parsed.result)
    }

    async fn history(
        &self,
        address: &str,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<TxRecord>, ProviderError> {
        let from = from_block.to_string();
        let to = to_block.to_string();
        let text = self
            .get_text(&[
                ("module", "account"),
                ("action", "txlist"),
                ("address", address),
                ("startblock", &from),
                ("endblock", &to),
                ("sort", "asc"),
            ])
            .await?;

        let parsed: AccountResponse = serde_json::from_str(&text)
            .map_err(|e| ProviderError::Payload(format!("txlist response: {e}")))?;

        // Etherscan reports an empty history as status "0" / "No transactions found"
        if parsed.status != "1" {
            if parsed.message.starts_with("No transactions") {
                return Ok(Vec::new());
            }
            return Err(ProviderError::Rejected(parsed.message));
        }

        let entries: Vec<TxEntry> = serde_json::from_value(parsed.result)
            .map_err(|e| ProviderError::Payload(format!("txlist entries: {e}")))?;

        entries.into_iter().map(TxEntry::into_record).collect()
    }

    async fn receipt(&self, tx_hash: &str) -> Result<Receipt, ProviderError> {
        let text = self
            .get_text(&[
                ("module", "proxy"),
                ("action", "eth_getTransactionReceipt"),
                ("txhash", tx_hash),
            ])
            .await?;

        let parsed: ProxyResponse<Option<ReceiptEntry>> = serde_json::from_str(&text)
            .map_err(|e| ProviderError::Payload(format!("receipt response: {e}")))?;

        let entry = parsed
            .result
            .ok_or_else(|| ProviderError::Payload(format!("no receipt for {tx_hash}")))?;

        Ok(Receipt {
            gas_used: hex_to_u64(&entry.gas_used)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_heights_decode() {
        assert_eq!(hex_to_u64("0x10").unwrap(), 16);
        assert_eq!(hex_to_u64("0x0").unwrap(), 0);
        assert!(hex_to_u64("0xzz").is_err());
        assert!(hex_to_u64("").is_err());
    }

    #[test]
    fn tx_entry_maps_to_record() {
        let entry = TxEntry {
            hash: "0xabc".to_string(),
            value: "1000000000000000000".to_string(),
            gas_price: "100000000000".to_string(),
        };

        let record = entry.into_record().unwrap();
        assert_eq!(record.hash, "0xabc");
        assert_eq!(record.value_wei, 1_000_000_000_000_000_000);
        assert_eq!(record.gas_price_wei, 100_000_000_000);
    }

    #[test]
    fn malformed_tx_entry_is_a_payload_error() {
        let entry = TxEntry {
            hash: "0xdef".to_string(),
            value: "not-a-number".to_string(),
            gas_price: "1".to_string(),
        };

        assert!(matches!(
            entry.into_record(),
            Err(ProviderError::Payload(_))
        ));
    }

    #[test]
    fn empty_history_message_means_no_transactions() {
        let text = r#"{"status":"0","message":"No transactions found","result":[]}"#;
        let parsed: AccountResponse = serde_json::from_str(text).unwrap();
        assert_eq!(parsed.status, "0");
        assert!(parsed.message.starts_with("No transactions"));
    }
}
