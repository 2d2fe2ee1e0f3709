//! Catalog query execution
//!
//! Thin layer between the compiler and sqlx: binds compiled parameters,
//! fetches rows, applies the post filter, and decorates rows into
//! `Movie` records. No SQL text is assembled here beyond the fixed
//! point-lookup and stats statements.

use sqlx::sqlite::SqlitePool;

use super::compiler::{compile, select_columns, SqlValue};
use super::criteria::SearchCriteria;
use super::error::CatalogError;
use super::models::{decode_list, Movie, MovieRow};
use super::CatalogSchema;
use crate::core::constants::FILMOGRAPHY_LIMIT;
use crate::utils::sql::escape_like_pattern;

fn bind_params<'q>(
    query: sqlx::query::QueryAs<'q, sqlx::Sqlite, MovieRow, sqlx::sqlite::SqliteArguments<'q>>,
    params: &'q [SqlValue],
) -> sqlx::query::QueryAs<'q, sqlx::Sqlite, MovieRow, sqlx::sqlite::SqliteArguments<'q>> {
    params.iter().fold(query, |q, value| match value {
        SqlValue::Int(v) => q.bind(*v),
        SqlValue::Real(v) => q.bind(*v),
        SqlValue::Text(v) => q.bind(v.as_str()),
    })
}

/// Run a compiled search and return decorated movies
pub async fn search(
    pool: &SqlitePool,
    schema: &CatalogSchema,
    criteria: &SearchCriteria,
) -> Result<Vec<Movie>, CatalogError> {
    let compiled = compile(criteria, schema);
    tracing::debug!(sql = %compiled.sql, params = compiled.params.len(), "executing search");

    let rows = bind_params(
        sqlx::query_as::<_, MovieRow>(&compiled.sql),
        &compiled.params,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .filter(|row| compiled.post_filter.matches(&row.genre_list()))
        .map(Movie::from)
        .collect())
}

/// Point lookup by IMDb identifier
pub async fn get_by_imdb_id(
    pool: &SqlitePool,
    schema: &CatalogSchema,
    imdb_id: &str,
) -> Result<Option<Movie>, CatalogError> {
    let sql = format!(
        "SELECT {} FROM movies WHERE imdb_id = ?",
        select_columns(schema)
    );
    let row = sqlx::query_as::<_, MovieRow>(&sql)
        .bind(imdb_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Movie::from))
}

/// Best-rated films credited to a director, matched by substring
pub async fn director_filmography(
    pool: &SqlitePool,
    schema: &CatalogSchema,
    name: &str,
) -> Result<Vec<Movie>, CatalogError> {
    let sql = format!(
        "SELECT {} FROM movies WHERE directors LIKE ? ESCAPE '\\' \
         ORDER BY rating DESC, votes DESC, imdb_id ASC LIMIT ?",
        select_columns(schema)
    );
    let rows = sqlx::query_as::<_, MovieRow>(&sql)
        .bind(format!("%{}%", escape_like_pattern(name)))
        .bind(FILMOGRAPHY_LIMIT)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Movie::from).collect())
}

/// Total row count
pub async fn count_movies(pool: &SqlitePool) -> Result<i64, CatalogError> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM movies")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

/// Min and max release year across the table, None when empty
pub async fn year_range(pool: &SqlitePool) -> Result<Option<(i64, i64)>, CatalogError> {
    let range: (Option<i64>, Option<i64>) =
        sqlx::query_as("SELECT MIN(year), MAX(year) FROM movies")
            .fetch_one(pool)
            .await?;
    Ok(match range {
        (Some(min), Some(max)) => Some((min, max)),
        _ => None,
    })
}

/// Distinct non-empty values of a single allow-listed code column
pub async fn distinct_codes(
    pool: &SqlitePool,
    column: &str,
) -> Result<Vec<String>, CatalogError> {
    debug_assert!(matches!(column, "language" | "country"));
    let sql = format!(
        "SELECT DISTINCT {column} FROM movies WHERE {column} IS NOT NULL AND {column} != ''"
    );
    let rows: Vec<(String,)> = sqlx::query_as(&sql).fetch_all(pool).await?;
    Ok(rows.into_iter().map(|(code,)| code).collect())
}

/// Distinct genre names decoded from every pipe-joined genres value
pub async fn distinct_genres(pool: &SqlitePool) -> Result<Vec<String>, CatalogError> {
    let rows: Vec<(Option<String>,)> =
        sqlx::query_as("SELECT DISTINCT genres FROM movies WHERE genres IS NOT NULL")
            .fetch_all(pool)
            .await?;
    let genres: std::collections::BTreeSet<String> = rows
        .into_iter()
        .flat_map(|(value,)| decode_list(value.as_deref()))
        .collect();
    Ok(genres.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::catalog::criteria::{GenreMode, SortColumn, SortDirection};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        // A single connection keeps every query on the same in-memory db
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query(
            r#"
            CREATE TABLE movies (
                id INTEGER PRIMARY KEY,
                imdb_id TEXT UNIQUE NOT NULL,
                title TEXT NOT NULL,
                original_title TEXT,
                year INTEGER NOT NULL,
                rating REAL NOT NULL,
                votes INTEGER NOT NULL,
                duration_mins INTEGER NOT NULL,
                duration_text TEXT NOT NULL,
                genres TEXT,
                directors TEXT,
                writers TEXT,
                "cast" TEXT,
                language TEXT,
                country TEXT
            )
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();
        pool
    }

    async fn insert(
        pool: &SqlitePool,
        imdb_id: &str,
        title: &str,
        year: i64,
        rating: f64,
        votes: i64,
        genres: &str,
        directors: &str,
    ) {
        sqlx::query(
            r#"
            INSERT INTO movies
                (imdb_id, title, year, rating, votes, duration_mins, duration_text,
                 genres, directors, writers, "cast", language, country)
            VALUES (?, ?, ?, ?, ?, 120, '120 mins.', ?, ?, 'Writer One', 'Actor One', 'en', 'US')
            "#,
        )
        .bind(imdb_id)
        .bind(title)
        .bind(year)
        .bind(rating)
        .bind(votes)
        .bind(genres)
        .bind(directors)
        .execute(pool)
        .await
        .unwrap();
    }

    async fn seeded_pool() -> SqlitePool {
        let pool = test_pool().await;
        insert(&pool, "tt001", "Alpha", 1994, 9.0, 50_000, "Drama", "Jane Doe").await;
        insert(
            &pool,
            "tt002",
            "Beta",
            1999,
            8.5,
            80_000,
            "Drama|Comedy",
            "Jane Doe|John Roe",
        )
        .await;
        insert(
            &pool,
            "tt003",
            "Gamma",
            2005,
            8.5,
            20_000,
            "Drama|Comedy|Crime",
            "John Roe",
        )
        .await;
        insert(&pool, "tt004", "Delta", 2010, 6.0, 500, "Horror", "Max Moe").await;
        pool
    }

    fn schema() -> CatalogSchema {
        CatalogSchema {
            has_language: true,
            has_country: true,
        }
    }

    #[tokio::test]
    async fn test_default_browse_sorted_with_tie_break() {
        let pool = seeded_pool().await;
        let movies = search(&pool, &schema(), &SearchCriteria::default())
            .await
            .unwrap();
        let ids: Vec<&str> = movies.iter().map(|m| m.imdb_id.as_str()).collect();
        // Equal ratings order by imdb_id ascending
        assert_eq!(ids, vec!["tt001", "tt002", "tt003", "tt004"]);
    }

    #[tokio::test]
    async fn test_title_substring_case_insensitive() {
        let pool = seeded_pool().await;
        let criteria = SearchCriteria {
            title: Some("bet".to_string()),
            ..Default::default()
        };
        let movies = search(&pool, &schema(), &criteria).await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Beta");
    }

    #[tokio::test]
    async fn test_genre_modes_against_rows() {
        let pool = seeded_pool().await;
        let base = SearchCriteria {
            genres_include: vec!["Drama".to_string(), "Comedy".to_string()],
            ..Default::default()
        };

        let any = search(
            &pool,
            &schema(),
            &SearchCriteria {
                genre_mode: GenreMode::Any,
                ..base.clone()
            },
        )
        .await
        .unwrap();
        assert_eq!(any.len(), 3);

        let all = search(
            &pool,
            &schema(),
            &SearchCriteria {
                genre_mode: GenreMode::All,
                ..base.clone()
            },
        )
        .await
        .unwrap();
        let ids: Vec<&str> = all.iter().map(|m| m.imdb_id.as_str()).collect();
        assert_eq!(ids, vec!["tt002", "tt003"]);

        let exact = search(
            &pool,
            &schema(),
            &SearchCriteria {
                genre_mode: GenreMode::Exact,
                ..base
            },
        )
        .await
        .unwrap();
        // tt003 carries Crime as well, so only tt002 matches exactly
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].imdb_id, "tt002");
    }

    #[tokio::test]
    async fn test_genre_exclusion() {
        let pool = seeded_pool().await;
        let criteria = SearchCriteria {
            genres_exclude: vec!["Comedy".to_string()],
            ..Default::default()
        };
        let movies = search(&pool, &schema(), &criteria).await.unwrap();
        let ids: Vec<&str> = movies.iter().map(|m| m.imdb_id.as_str()).collect();
        assert_eq!(ids, vec!["tt001", "tt004"]);
    }

    #[tokio::test]
    async fn test_exclusion_overrides_inclusion() {
        let pool = seeded_pool().await;
        insert(
            &pool,
            "tt005",
            "Epsilon",
            2015,
            7.0,
            9_000,
            "Drama|Horror",
            "Max Moe",
        )
        .await;

        // Epsilon matches the Drama include but carries Horror, so the
        // exclusion drops it
        let criteria = SearchCriteria {
            genres_include: vec!["Drama".to_string()],
            genre_mode: GenreMode::Any,
            genres_exclude: vec!["Horror".to_string()],
            ..Default::default()
        };
        let movies = search(&pool, &schema(), &criteria).await.unwrap();
        let ids: Vec<&str> = movies.iter().map(|m| m.imdb_id.as_str()).collect();
        assert_eq!(ids, vec!["tt001", "tt002", "tt003"]);
    }

    #[tokio::test]
    async fn test_director_negation_only() {
        let pool = seeded_pool().await;
        let criteria = SearchCriteria {
            director: Some("-Jane".to_string()),
            ..Default::default()
        };
        let movies = search(&pool, &schema(), &criteria).await.unwrap();
        let ids: Vec<&str> = movies.iter().map(|m| m.imdb_id.as_str()).collect();
        assert_eq!(ids, vec!["tt003", "tt004"]);
    }

    #[tokio::test]
    async fn test_director_alternatives() {
        let pool = seeded_pool().await;
        let criteria = SearchCriteria {
            director: Some("Jane,Max".to_string()),
            ..Default::default()
        };
        let movies = search(&pool, &schema(), &criteria).await.unwrap();
        assert_eq!(movies.len(), 3);
    }

    #[tokio::test]
    async fn test_limit_applied() {
        let pool = seeded_pool().await;
        let criteria = SearchCriteria {
            limit: 2,
            ..Default::default()
        };
        let movies = search(&pool, &schema(), &criteria).await.unwrap();
        assert_eq!(movies.len(), 2);
    }

    #[tokio::test]
    async fn test_sort_by_votes_ascending() {
        let pool = seeded_pool().await;
        let criteria = SearchCriteria {
            sort_by: SortColumn::Votes,
            sort_order: SortDirection::Asc,
            ..Default::default()
        };
        let movies = search(&pool, &schema(), &criteria).await.unwrap();
        let votes: Vec<i64> = movies.iter().map(|m| m.votes).collect();
        assert_eq!(votes, vec![500, 20_000, 50_000, 80_000]);
    }

    #[tokio::test]
    async fn test_point_lookup() {
        let pool = seeded_pool().await;
        let found = get_by_imdb_id(&pool, &schema(), "tt003").await.unwrap();
        assert_eq!(found.unwrap().title, "Gamma");
        let missing = get_by_imdb_id(&pool, &schema(), "tt999").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_director_filmography_ordering() {
        let pool = seeded_pool().await;
        let movies = director_filmography(&pool, &schema(), "John Roe")
            .await
            .unwrap();
        // Same rating: higher votes first
        let ids: Vec<&str> = movies.iter().map(|m| m.imdb_id.as_str()).collect();
        assert_eq!(ids, vec!["tt002", "tt003"]);
    }

    #[tokio::test]
    async fn test_stats_queries() {
        let pool = seeded_pool().await;
        assert_eq!(count_movies(&pool).await.unwrap(), 4);
        assert_eq!(year_range(&pool).await.unwrap(), Some((1994, 2010)));
        assert_eq!(
            distinct_codes(&pool, "language").await.unwrap(),
            vec!["en"]
        );
        let genres = distinct_genres(&pool).await.unwrap();
        assert_eq!(genres, vec!["Comedy", "Crime", "Drama", "Horror"]);
    }

    #[tokio::test]
    async fn test_empty_table_stats() {
        let pool = test_pool().await;
        assert_eq!(count_movies(&pool).await.unwrap(), 0);
        assert_eq!(year_range(&pool).await.unwrap(), None);
        assert!(distinct_genres(&pool).await.unwrap().is_empty());
    }
}
