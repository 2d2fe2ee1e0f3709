//! Movie record types
//!
//! The storage encoding keeps multi-valued fields (genres, directors,
//! writers, cast) as pipe-joined strings; records are decoded into real
//! lists as soon as they leave storage, and membership logic downstream
//! works on those lists rather than on substrings.

use serde::Serialize;
use utoipa::ToSchema;

use super::display::{country_name, language_name};

/// Delimiter used by the dataset for multi-valued fields
pub const LIST_DELIMITER: char = '|';

/// Raw row as stored in the `movies` table.
///
/// `language` and `country` are marked `default` because older dataset
/// files predate those columns; the compiler omits them from the SELECT
/// list when the schema probe says they are absent.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MovieRow {
    pub imdb_id: String,
    pub title: String,
    pub original_title: Option<String>,
    pub year: i64,
    pub rating: f64,
    pub votes: i64,
    pub duration_mins: i64,
    pub duration_text: String,
    pub genres: Option<String>,
    pub directors: Option<String>,
    pub writers: Option<String>,
    pub cast: Option<String>,
    #[sqlx(default)]
    pub language: Option<String>,
    #[sqlx(default)]
    pub country: Option<String>,
}

/// Split a pipe-joined field into its parts, dropping empty segments
pub fn decode_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(LIST_DELIMITER)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

impl MovieRow {
    pub fn genre_list(&self) -> Vec<String> {
        decode_list(self.genres.as_deref())
    }
}

/// Decorated movie record returned to the presentation layer.
///
/// Decoration is pure lookup (code -> display name, string -> list); it
/// never changes row count or order.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Movie {
    pub imdb_id: String,
    pub title: String,
    pub original_title: Option<String>,
    pub year: i64,
    pub rating: f64,
    pub votes: i64,
    pub duration_mins: i64,
    pub duration_text: String,
    pub genres: Vec<String>,
    pub directors: Vec<String>,
    pub writers: Vec<String>,
    pub cast: Vec<String>,
    pub language: Option<String>,
    pub language_name: Option<String>,
    pub country: Option<String>,
    pub country_name: Option<String>,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        let language_name = row.language.as_deref().map(language_name);
        let country_name = row.country.as_deref().map(country_name);
        Self {
            genres: decode_list(row.genres.as_deref()),
            directors: decode_list(row.directors.as_deref()),
            writers: decode_list(row.writers.as_deref()),
            cast: decode_list(row.cast.as_deref()),
            imdb_id: row.imdb_id,
            title: row.title,
            original_title: row.original_title,
            year: row.year,
            rating: row.rating,
            votes: row.votes,
            duration_mins: row.duration_mins,
            duration_text: row.duration_text,
            language: row.language,
            language_name,
            country: row.country,
            country_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(genres: Option<&str>) -> MovieRow {
        MovieRow {
            imdb_id: "tt0000001".to_string(),
            title: "Test".to_string(),
            original_title: None,
            year: 2000,
            rating: 7.5,
            votes: 1000,
            duration_mins: 120,
            duration_text: "120 mins.".to_string(),
            genres: genres.map(str::to_string),
            directors: Some("Jane Doe|John Roe".to_string()),
            writers: None,
            cast: Some("Actor One".to_string()),
            language: Some("en".to_string()),
            country: Some("US".to_string()),
        }
    }

    #[test]
    fn test_decode_list_splits_on_pipe() {
        assert_eq!(
            decode_list(Some("Drama|Comedy|Crime")),
            vec!["Drama", "Comedy", "Crime"]
        );
    }

    #[test]
    fn test_decode_list_drops_empty_segments() {
        assert_eq!(decode_list(Some("Drama||Comedy|")), vec!["Drama", "Comedy"]);
        assert!(decode_list(Some("")).is_empty());
        assert!(decode_list(None).is_empty());
    }

    #[test]
    fn test_decode_rejoin_round_trip() {
        // Wire compatibility: split + rejoin reproduces the stored string
        let stored = "Drama|Comedy|Crime";
        let decoded = decode_list(Some(stored));
        assert_eq!(decoded.join("|"), stored);
    }

    #[test]
    fn test_movie_decoration() {
        let movie: Movie = row(Some("Drama|Comedy")).into();
        assert_eq!(movie.genres, vec!["Drama", "Comedy"]);
        assert_eq!(movie.directors, vec!["Jane Doe", "John Roe"]);
        assert_eq!(movie.language_name.as_deref(), Some("English"));
        assert_eq!(movie.country_name.as_deref(), Some("United States"));
    }

    #[test]
    fn test_movie_decoration_without_codes() {
        let mut r = row(None);
        r.language = None;
        r.country = None;
        let movie: Movie = r.into();
        assert!(movie.genres.is_empty());
        assert!(movie.language_name.is_none());
        assert!(movie.country_name.is_none());
    }
}
