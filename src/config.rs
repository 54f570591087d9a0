use dotenvy::dotenv;
use eyre::Result;
use std::{env, time::Duration};
use tracing::info;

// Roughly one six-month treatment course ($27000) split into monthly sessions.
const DEFAULT_SESSION_COST_USD: f64 = 4500.0;
// Small window so each request stays cheap; only very recent activity counts.
const DEFAULT_HISTORY_WINDOW_BLOCKS: u64 = 15;
const DEFAULT_RECEIPT_DELAY_MS: u64 = 200;
const DEFAULT_ETH_PRICE_USD: f64 = 2228.0;
// Placeholder loss charged per token/contract transaction, in native units.
const DEFAULT_TOKEN_TX_FLAT_LOSS: f64 = 100.0;

#[derive(Debug, Clone)]
pub struct Config {
    pub provider_url: String,
    pub provider_api_key: String,
    pub price_url: String,
    pub port: u16,
    pub session_cost_usd: f64,
    pub history_window_blocks: u64,
    pub receipt_delay: Duration,
    pub default_eth_price_usd: f64,
    pub token_tx_flat_loss: f64,
}

pub fn load() -> Result<Config> {
    dotenv().ok(); // load from .env file when present

    let provider_url = env::var("PROVIDER_HTTP_URL")
        .or_else(|_| env::var("ETHERSCAN_URL")) // alias support
        .unwrap_or_else(|_| "https://api.etherscan.io/api".to_string());

    let provider_api_key = env::var("ETHERSCAN_API_KEY").unwrap_or_default();

    let price_url = env::var("PRICE_URL").unwrap_or_else(|_| {
        "https://min-api.cryptocompare.com/data/price?fsym=ETH&tsyms=USD".to_string()
    });

    let port = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let session_cost_usd = env::var("SESSION_COST_USD")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SESSION_COST_USD);

    let history_window_blocks = env::var("HISTORY_WINDOW_BLOCKS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_HISTORY_WINDOW_BLOCKS);

    let receipt_delay_ms = env::var("RECEIPT_DELAY_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_RECEIPT_DELAY_MS);

    let default_eth_price_usd = env::var("DEFAULT_ETH_PRICE_USD")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_ETH_PRICE_USD);

    let token_tx_flat_loss = env::var("TOKEN_TX_FLAT_LOSS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_TOKEN_TX_FLAT_LOSS);

    let cfg = Config {
        provider_url,
        provider_api_key,
        price_url,
        port,
        session_cost_usd,
        history_window_blocks,
        receipt_delay: Duration::from_millis(receipt_delay_ms),
        default_eth_price_usd,
        token_tx_flat_loss,
    };

    info!("Loaded config: {:?}", cfg);

    Ok(cfg)
}
