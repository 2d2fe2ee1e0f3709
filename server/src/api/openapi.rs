//! OpenAPI specification and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{health, movies, search, stats};
use crate::data::catalog::criteria::{NumberParam, RawSearchRequest, StringOrArray};
use crate::data::catalog::{CatalogStats, CodeName, Movie};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Filmdex API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Searchable movie catalog"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "search", description = "Filtered movie search"),
        (name = "movies", description = "Movie details and filmographies"),
        (name = "stats", description = "Dataset statistics")
    ),
    paths(
        health::health,
        search::search_get,
        search::search_post,
        movies::get_movie,
        movies::director_filmography,
        stats::stats,
    ),
    components(schemas(
        health::HealthResponse,
        search::SearchResponse,
        movies::FilmographyResponse,
        stats::StatsResponse,
        RawSearchRequest,
        NumberParam,
        StringOrArray,
        Movie,
        CatalogStats,
        CodeName,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Filmdex API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/openapi.json",
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                deepLinking: true,
                showExtensions: true,
                showCommonExtensions: true
            });
        };
    </script>
</body>
</html>"#;
