use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::models::SessionReport;
use crate::pipeline;
use crate::price::{HttpPriceSource, PriceCache};
use crate::provider::EtherscanProvider;

pub struct AppState {
    pub cfg: Config,
    pub provider: EtherscanProvider,
    pub price_source: HttpPriceSource,
    pub price_cache: PriceCache,
}

#[derive(Deserialize)]
pub struct CalculateRequest {
    #[serde(rename = "walletAddress")]
    pub wallet_address: String,
}

pub async fn serve(cfg: Config) -> eyre::Result<()> {
    let state = Arc::new(AppState {
        provider: EtherscanProvider::new(cfg.provider_url.clone(), cfg.provider_api_key.clone())?,
        price_source: HttpPriceSource::new(cfg.price_url.clone())?,
        price_cache: PriceCache::new(),
        cfg,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let port = state.cfg.port;
    let app = Router::new()
        .route("/", get(|| async { "Chemo sessions API running" }))
        .route("/calculate-chemo-sessions", post(calculate))
        .with_state(state)
        .layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

async fn calculate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CalculateRequest>,
) -> Result<Json<SessionReport>, (StatusCode, Json<Value>)> {
    // reject malformed addresses before any provider call
    let address = pipeline::validate_address(&req.wallet_address).map_err(|e| {
        warn!("Rejected request: {}", e);
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": e.to_string() })),
        )
    })?;

    match pipeline::estimate_for_wallet(
        &state.cfg,
        &state.provider,
        &state.price_source,
        &state.price_cache,
        address,
    )
    .await
    {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            error!("Estimate failed for {}: {:?}", address, e);
            // keep the internal detail out of the response body
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to calculate" })),
            ))
        }
    }
}
