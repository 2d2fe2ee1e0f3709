//! Catalog error types

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Dataset not found at {path} (run the ingestion pipeline first)")]
    DatasetMissing { path: PathBuf },

    #[error("Dataset has no 'movies' table: {path}")]
    DatasetInvalid { path: PathBuf },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
