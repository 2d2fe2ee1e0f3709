//! Read-only movie catalog over a SQLite dataset
//!
//! The dataset file is produced by an external ingestion pipeline; this
//! service never writes to it. Startup probes the schema (older dataset
//! files lack the language/country columns) and loads the genre
//! vocabulary once, then every request flows normalize -> compile ->
//! execute -> decorate.

pub mod compiler;
pub mod criteria;
pub mod display;
pub mod error;
pub mod models;
pub mod repository;

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use utoipa::ToSchema;

use crate::core::config::CatalogConfig;
use crate::core::constants::{
    FALLBACK_YEAR_MAX, FALLBACK_YEAR_MIN, SQLITE_BUSY_TIMEOUT_SECS, SQLITE_CACHE_SIZE,
    SQLITE_MAX_CONNECTIONS, SQLITE_MMAP_SIZE,
};

pub use criteria::{RawSearchRequest, SearchCriteria};
pub use error::CatalogError;
pub use models::Movie;

/// Which optional columns this dataset file carries
#[derive(Debug, Clone, Copy)]
pub struct CatalogSchema {
    pub has_language: bool,
    pub has_country: bool,
}

impl CatalogSchema {
    /// Probe the movies table for optional columns
    pub async fn probe(pool: &SqlitePool) -> Result<Self, CatalogError> {
        let rows = sqlx::query("PRAGMA table_info(movies)")
            .fetch_all(pool)
            .await?;
        let columns: HashSet<String> = rows
            .iter()
            .map(|row| row.get::<String, _>("name"))
            .collect();
        Ok(Self {
            has_language: columns.contains("language"),
            has_country: columns.contains("country"),
        })
    }
}

/// The set of genre names present in the dataset.
///
/// Doubles as the allow-list for genre filters: requested genres outside
/// the vocabulary are dropped during normalization.
#[derive(Debug, Clone, Default)]
pub struct GenreVocabulary {
    names: Vec<String>,
    set: HashSet<String>,
}

impl GenreVocabulary {
    pub fn from_names(names: Vec<String>) -> Self {
        let set = names.iter().cloned().collect();
        Self { names, set }
    }

    pub async fn load(pool: &SqlitePool) -> Result<Self, CatalogError> {
        Ok(Self::from_names(repository::distinct_genres(pool).await?))
    }

    pub fn contains(&self, genre: &str) -> bool {
        self.set.contains(genre)
    }

    /// Sorted genre names for presentation
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// A code column value with its display name
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct CodeName {
    pub code: String,
    pub name: String,
}

/// Dataset-wide aggregates for populating filter controls
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CatalogStats {
    pub total_movies: i64,
    pub year_min: i64,
    pub year_max: i64,
    pub genres: Vec<String>,
    pub languages: Vec<CodeName>,
    pub countries: Vec<CodeName>,
}

fn code_names(codes: Vec<String>, display: fn(&str) -> String) -> Vec<CodeName> {
    let mut out: Vec<CodeName> = codes
        .into_iter()
        .map(|code| CodeName {
            name: display(&code),
            code,
        })
        .collect();
    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}

/// Shared read-only catalog handle
#[derive(Debug)]
pub struct CatalogService {
    pool: SqlitePool,
    schema: CatalogSchema,
    vocabulary: GenreVocabulary,
}

impl CatalogService {
    /// Open the dataset, verify it, and load startup metadata
    pub async fn init(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let path = &config.dataset_path;
        if !path.exists() {
            return Err(CatalogError::DatasetMissing { path: path.clone() });
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .pragma("cache_size", SQLITE_CACHE_SIZE)
            .pragma("temp_store", "MEMORY")
            .pragma("synchronous", "NORMAL")
            .pragma("mmap_size", SQLITE_MMAP_SIZE)
            .busy_timeout(Duration::from_secs(SQLITE_BUSY_TIMEOUT_SECS));

        let pool = SqlitePoolOptions::new()
            .max_connections(SQLITE_MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        Self::verify_dataset(&pool, path).await?;
        let schema = CatalogSchema::probe(&pool).await?;
        let vocabulary = GenreVocabulary::load(&pool).await?;

        tracing::info!(
            path = %path.display(),
            genres = vocabulary.names().len(),
            has_language = schema.has_language,
            has_country = schema.has_country,
            "Catalog opened"
        );

        Ok(Self {
            pool,
            schema,
            vocabulary,
        })
    }

    async fn verify_dataset(pool: &SqlitePool, path: &Path) -> Result<(), CatalogError> {
        let table: Option<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'movies'",
        )
        .fetch_optional(pool)
        .await?;
        if table.is_none() {
            return Err(CatalogError::DatasetInvalid {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    pub fn vocabulary(&self) -> &GenreVocabulary {
        &self.vocabulary
    }

    /// Normalize a raw request and run the compiled search
    pub async fn search(&self, raw: RawSearchRequest) -> Result<Vec<Movie>, CatalogError> {
        let criteria = SearchCriteria::normalize(raw, &self.vocabulary);
        repository::search(&self.pool, &self.schema, &criteria).await
    }

    pub async fn get_by_imdb_id(&self, imdb_id: &str) -> Result<Option<Movie>, CatalogError> {
        repository::get_by_imdb_id(&self.pool, &self.schema, imdb_id).await
    }

    pub async fn director_filmography(&self, name: &str) -> Result<Vec<Movie>, CatalogError> {
        repository::director_filmography(&self.pool, &self.schema, name).await
    }

    /// Aggregate dataset facts for the filter UI
    pub async fn stats(&self) -> Result<CatalogStats, CatalogError> {
        let total_movies = repository::count_movies(&self.pool).await?;
        let (year_min, year_max) = repository::year_range(&self.pool)
            .await?
            .unwrap_or((FALLBACK_YEAR_MIN, FALLBACK_YEAR_MAX));

        let languages = if self.schema.has_language {
            code_names(
                repository::distinct_codes(&self.pool, "language").await?,
                display::language_name,
            )
        } else {
            Vec::new()
        };
        let countries = if self.schema.has_country {
            code_names(
                repository::distinct_codes(&self.pool, "country").await?,
                display::country_name,
            )
        } else {
            Vec::new()
        };

        Ok(CatalogStats {
            total_movies,
            year_min,
            year_max,
            genres: self.vocabulary.names().to_vec(),
            languages,
            countries,
        })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
