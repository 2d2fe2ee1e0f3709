//! Movie search endpoint
//!
//! Accepts the same filter shape over GET (query string) and POST (JSON
//! body). The only request-level normalization done here is resolving the
//! vote-slider position to a vote count; everything else happens in the
//! catalog layer.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::types::ApiError;
use crate::core::constants::VOTE_THRESHOLDS;
use crate::data::catalog::{CatalogService, Movie, RawSearchRequest};

#[derive(Serialize, ToSchema)]
pub struct SearchResponse {
    pub count: usize,
    pub movies: Vec<Movie>,
}

/// Resolve a vote-slider position to its threshold value. An explicit
/// `votes_min` wins over the slider; out-of-range positions clamp.
fn resolve_votes_index(request: &mut RawSearchRequest) {
    if request.votes_min.is_some() {
        return;
    }
    if let Some(index) = request.votes_min_index.take().and_then(|i| i.as_i64()) {
        let index = index.clamp(0, VOTE_THRESHOLDS.len() as i64 - 1) as usize;
        request.votes_min = Some(crate::data::catalog::criteria::NumberParam::Number(
            VOTE_THRESHOLDS[index] as f64,
        ));
    }
}

async fn run_search(
    service: &CatalogService,
    mut request: RawSearchRequest,
) -> Result<Json<SearchResponse>, ApiError> {
    resolve_votes_index(&mut request);
    let movies = service.search(request).await?;
    Ok(Json(SearchResponse {
        count: movies.len(),
        movies,
    }))
}

/// Search the catalog via query-string filters
#[utoipa::path(
    get,
    path = "/api/v1/search",
    tag = "search",
    responses(
        (status = 200, description = "Matching movies", body = SearchResponse)
    )
)]
pub async fn search_get(
    State(service): State<Arc<CatalogService>>,
    Query(request): Query<RawSearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    run_search(&service, request).await
}

/// Search the catalog via a JSON filter body
#[utoipa::path(
    post,
    path = "/api/v1/search",
    tag = "search",
    request_body = RawSearchRequest,
    responses(
        (status = 200, description = "Matching movies", body = SearchResponse)
    )
)]
pub async fn search_post(
    State(service): State<Arc<CatalogService>>,
    Json(request): Json<RawSearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    run_search(&service, request).await
}

pub fn routes(service: Arc<CatalogService>) -> Router<()> {
    Router::new()
        .route("/search", get(search_get).post(search_post))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::catalog::criteria::NumberParam;

    #[test]
    fn test_votes_index_resolved() {
        let mut request = RawSearchRequest {
            votes_min_index: Some(NumberParam::Number(3.0)),
            ..Default::default()
        };
        resolve_votes_index(&mut request);
        assert_eq!(request.votes_min.and_then(|v| v.as_i64()), Some(1_000));
        assert!(request.votes_min_index.is_none());
    }

    #[test]
    fn test_votes_index_clamped() {
        let mut request = RawSearchRequest {
            votes_min_index: Some(NumberParam::Number(999.0)),
            ..Default::default()
        };
        resolve_votes_index(&mut request);
        assert_eq!(
            request.votes_min.and_then(|v| v.as_i64()),
            Some(*VOTE_THRESHOLDS.last().unwrap())
        );
    }

    #[test]
    fn test_explicit_votes_min_wins() {
        let mut request = RawSearchRequest {
            votes_min: Some(NumberParam::Number(42.0)),
            votes_min_index: Some(NumberParam::Number(5.0)),
            ..Default::default()
        };
        resolve_votes_index(&mut request);
        assert_eq!(request.votes_min.and_then(|v| v.as_i64()), Some(42));
    }
}
