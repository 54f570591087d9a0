// src/pipeline.rs
use alloy::primitives::Address;
use std::str::FromStr;
use tracing::info;

use crate::config::Config;
use crate::error::{ProviderError, ValidationError};
use crate::estimator::{estimate_losses, LossPolicy};
use crate::models::SessionReport;
use crate::price::{PriceCache, PriceSource};
use crate::provider::{fetch_recent_history, HistoryProvider};
use crate::sessions;

/// Syntactic address check, applied before any external call is made.
pub fn validate_address(raw: &str) -> Result<Address, ValidationError> {
    Address::from_str(raw.trim()).map_err(|_| ValidationError(raw.to_string()))
}

/// Fetch → estimate → convert for one wallet. The price cache is the only
/// state shared across invocations.
pub async fn estimate_for_wallet<P, S>(
    cfg: &Config,
    provider: &P,
    price_source: &S,
    price_cache: &PriceCache,
    address: Address,
) -> Result<SessionReport, ProviderError>
where
    P: HistoryProvider + ?Sized,
    S: PriceSource + ?Sized,
{
    let address = address.to_string();

    let history = fetch_recent_history(provider, &address, cfg.history_window_blocks).await?;
    info!("Fetched {} transactions for {}", history.len(), address);

    let policy = LossPolicy::new(cfg.token_tx_flat_loss);
    let native_loss = estimate_losses(provider, &history, &policy, cfg.receipt_delay).await?;

    let rate = price_cache
        .rate_or_default(price_source, cfg.default_eth_price_usd)
        .await;

    Ok(sessions::build_report(
        native_loss,
        rate,
        cfg.session_cost_usd,
    ))
}
