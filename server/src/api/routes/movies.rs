//! Movie detail and director filmography endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::types::ApiError;
use crate::data::catalog::{CatalogService, Movie};

#[derive(Serialize, ToSchema)]
pub struct FilmographyResponse {
    pub director: String,
    pub count: usize,
    pub movies: Vec<Movie>,
}

/// Look up a single movie by IMDb identifier
#[utoipa::path(
    get,
    path = "/api/v1/movies/{imdb_id}",
    tag = "movies",
    params(("imdb_id" = String, Path, description = "IMDb identifier, e.g. tt0111161")),
    responses(
        (status = 200, description = "Movie details", body = Movie),
        (status = 404, description = "No movie with that identifier")
    )
)]
pub async fn get_movie(
    State(service): State<Arc<CatalogService>>,
    Path(imdb_id): Path<String>,
) -> Result<Json<Movie>, ApiError> {
    service
        .get_by_imdb_id(&imdb_id)
        .await?
        .map(Json)
        .ok_or_else(|| {
            ApiError::not_found("MOVIE_NOT_FOUND", format!("No movie with id {imdb_id}"))
        })
}

/// Best-rated films credited to a director
#[utoipa::path(
    get,
    path = "/api/v1/director/{name}",
    tag = "movies",
    params(("name" = String, Path, description = "Director name, matched as substring")),
    responses(
        (status = 200, description = "Filmography sorted by rating", body = FilmographyResponse)
    )
)]
pub async fn director_filmography(
    State(service): State<Arc<CatalogService>>,
    Path(name): Path<String>,
) -> Result<Json<FilmographyResponse>, ApiError> {
    let movies = service.director_filmography(&name).await?;
    Ok(Json(FilmographyResponse {
        director: name,
        count: movies.len(),
        movies,
    }))
}

pub fn routes(service: Arc<CatalogService>) -> Router<()> {
    Router::new()
        .route("/movies/{imdb_id}", get(get_movie))
        .route("/director/{name}", get(director_filmography))
        .with_state(service)
}
