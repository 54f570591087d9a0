// src/estimator.rs
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use crate::error::ProviderError;
use crate::models::TxRecord;
use crate::provider::HistoryProvider;

const WEI_PER_ETH: f64 = 1e18;

/// Coarse transaction classes. A non-zero native value marks a native
/// transfer; everything else is assumed to be a token or contract call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxClass {
    NativeTransfer,
    Other,
}

pub type Classifier = fn(&TxRecord) -> TxClass;

pub fn classify_by_native_value(tx: &TxRecord) -> TxClass {
    if tx.value_wei == 0 {
        TxClass::Other
    } else {
        TxClass::NativeTransfer
    }
}

/// Loss heuristics, kept as swappable policy so a real token-valuation module
/// can replace them without touching the aggregation. `flat_other_loss` is
/// the placeholder loss charged per non-native transaction, in native units.
#[derive(Debug, Clone, Copy)]
pub struct LossPolicy {
    pub classify: Classifier,
    pub flat_other_loss: f64,
}

impl LossPolicy {
    pub fn new(flat_other_loss: f64) -> Self {
        Self {
            classify: classify_by_native_value,
            flat_other_loss,
        }
    }
}

/// Total loss over `history`, in native units (ETH).
///
/// Every native transfer counts its full value plus the realized fee; value
/// received back is not netted out. Receipt lookups run one at a time with
/// `receipt_delay` between them to stay under provider rate limits. A failed
/// lookup aborts the whole estimate rather than dropping the transaction.
pub async fn estimate_losses<P: HistoryProvider + ?Sized>(
    provider: &P,
    history: &[TxRecord],
    policy: &LossPolicy,
    receipt_delay: Duration,
) -> Result<f64, ProviderError> {
    let native: Vec<&TxRecord> = history
        .iter()
        .filter(|tx| (policy.classify)(tx) == TxClass::NativeTransfer)
        .collect();

    let mut total = 0.0_f64;

    for tx in &native {
        let receipt = provider.receipt(&tx.hash).await?;
        sleep(receipt_delay).await;

        let gas_cost_wei = tx.gas_price_wei * receipt.gas_used as u128;
        let loss_wei = tx.value_wei + gas_cost_wei;
        total += loss_wei as f64 / WEI_PER_ETH;

        debug!("Tx {}: loss {} wei", tx.hash, loss_wei);
    }

    let other_count = history.len() - native.len();
    total += other_count as f64 * policy.flat_other_loss;

    debug!(
        "Estimated loss {} ETH over {} native / {} other transactions",
        total,
        native.len(),
        other_count
    );

    Ok(total)
}
