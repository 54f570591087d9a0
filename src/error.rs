// src/error.rs
use thiserror::Error;

/// History or receipt lookup failed. Fatal to the current invocation; no
/// retries happen inside the pipeline.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned malformed payload: {0}")]
    Payload(String),

    #[error("provider rejected request: {0}")]
    Rejected(String),
}

/// Price quote service unreachable or unparseable. Never fatal: the caller
/// substitutes the default rate and carries on.
#[derive(Debug, Error)]
pub enum PriceQuoteError {
    #[error("price request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("price payload malformed: {0}")]
    Payload(String),
}

/// Wallet address failed syntactic validation. Rejected before any external
/// call is made.
#[derive(Debug, Error)]
#[error("invalid wallet address: {0:?}")]
pub struct ValidationError(pub String);
