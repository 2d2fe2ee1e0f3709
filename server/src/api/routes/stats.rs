//! Dataset statistics endpoint

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::routing::get;
use axum::Router;

use crate::api::types::ApiError;
use crate::core::constants::VOTE_THRESHOLDS;
use crate::data::catalog::{CatalogService, CatalogStats};

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CatalogStats,
    /// Vote-count thresholds the UI slider indexes into
    pub vote_thresholds: Vec<i64>,
}

/// Dataset-wide aggregates for populating filter controls
#[utoipa::path(
    get,
    path = "/api/v1/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Catalog statistics", body = StatsResponse)
    )
)]
pub async fn stats(
    State(service): State<Arc<CatalogService>>,
) -> Result<Json<StatsResponse>, ApiError> {
    let stats = service.stats().await?;
    Ok(Json(StatsResponse {
        stats,
        vote_thresholds: VOTE_THRESHOLDS.to_vec(),
    }))
}

pub fn routes(service: Arc<CatalogService>) -> Router<()> {
    Router::new().route("/stats", get(stats)).with_state(service)
}
