// src/models.rs
use serde::Serialize;

/// One ledger event touching the wallet, as returned by the history provider.
/// Values stay in wei until the estimator converts the aggregate to ETH.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxRecord {
    pub hash: String,
    pub value_wei: u128,     // native value moved (magnitude only)
    pub gas_price_wei: u128, // declared gas price
}

/// Resolution record for a transaction: the gas it actually consumed.
#[derive(Debug, Clone, Copy)]
pub struct Receipt {
    pub gas_used: u64,
}

/// Final report returned to the caller. The renamed fields are the public
/// wire contract, so keep them in sync with the frontend.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionReport {
    #[serde(rename = "averageSessionCostUSD")]
    pub average_session_cost_usd: f64,
    pub costs: Costs,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Costs {
    #[serde(rename = "totalLossesUSD")]
    pub total_losses_usd: f64,
    #[serde(rename = "chemoSession")]
    pub chemo_session: u64,
}
