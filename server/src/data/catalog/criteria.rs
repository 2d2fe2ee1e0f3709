//! Filter request normalization
//!
//! Converts the raw, possibly malformed filter request from the boundary
//! layer into typed `SearchCriteria`. Bad individual values are dropped,
//! never fatal: a field that fails to parse simply means the filter is
//! not applied. Only a structurally invalid request body (non-object) is
//! a client error, and that is rejected by serde before this code runs.

use serde::Deserialize;
use utoipa::ToSchema;

use super::GenreVocabulary;
use crate::core::constants::{DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};

/// A numeric parameter that may arrive as a JSON number or a string
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum NumberParam {
    Number(f64),
    Text(String),
}

impl NumberParam {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n as i64),
            Self::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|v| v as i64))
            }
        }
    }
}

/// A list parameter that may arrive as a JSON array or a single string.
/// Single strings may carry comma-separated values (GET query form).
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum StringOrArray {
    One(String),
    Many(Vec<String>),
}

impl StringOrArray {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(s) => s
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            Self::Many(v) => v,
        }
    }
}

/// Raw filter request exactly as the presentation layer sends it
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct RawSearchRequest {
    pub title: Option<String>,
    pub year_from: Option<NumberParam>,
    pub year_to: Option<NumberParam>,
    pub rating_min: Option<NumberParam>,
    pub rating_max: Option<NumberParam>,
    pub votes_min: Option<NumberParam>,
    pub genres_include: Option<StringOrArray>,
    pub genres_exclude: Option<StringOrArray>,
    pub genre_mode: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub limit: Option<NumberParam>,
    /// Slider position into the vote-threshold table. Resolved to a
    /// numeric `votes_min` by the route layer, never read here.
    pub votes_min_index: Option<NumberParam>,
}

/// Genre inclusion semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenreMode {
    /// Row carries at least one requested genre
    #[default]
    Any,
    /// Row carries every requested genre
    All,
    /// Row carries exactly the requested genre set and nothing else
    Exact,
}

impl GenreMode {
    /// Accepts ANY/ALL/EXACT and the legacy OR/AND/ONLY wire values;
    /// anything else means Any.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "ALL" | "AND" => Self::All,
            "EXACT" | "ONLY" => Self::Exact,
            _ => Self::Any,
        }
    }
}

/// Allow-listed sort columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    Title,
    Year,
    #[default]
    Rating,
    Votes,
    Duration,
}

impl SortColumn {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "title" => Self::Title,
            "year" => Self::Year,
            "votes" => Self::Votes,
            "duration" => Self::Duration,
            _ => Self::Rating,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Year => "year",
            Self::Rating => "rating",
            Self::Votes => "votes",
            Self::Duration => "duration_mins",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "ASC" => Self::Asc,
            _ => Self::Desc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Normalized, typed search constraints for one request
#[derive(Debug, Clone)]
pub struct SearchCriteria {
    pub title: Option<String>,
    pub year_from: Option<i64>,
    pub year_to: Option<i64>,
    pub rating_min: Option<f64>,
    pub rating_max: Option<f64>,
    pub votes_min: Option<i64>,
    pub genres_include: Vec<String>,
    pub genre_mode: GenreMode,
    pub genres_exclude: Vec<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub sort_by: SortColumn,
    pub sort_order: SortDirection,
    pub limit: i64,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            title: None,
            year_from: None,
            year_to: None,
            rating_min: None,
            rating_max: None,
            votes_min: None,
            genres_include: Vec::new(),
            genre_mode: GenreMode::default(),
            genres_exclude: Vec::new(),
            director: None,
            cast: None,
            language: None,
            country: None,
            sort_by: SortColumn::default(),
            sort_order: SortDirection::default(),
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

/// Trim a text field; empty after trim means absent
fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Language/country dropdowns send the `(All)` sentinel for "no
/// selection"; only these code fields treat it as absent
fn normalize_code(value: Option<String>) -> Option<String> {
    normalize_text(value).filter(|s| s != "(All)")
}

/// Keep only genre names present in the known vocabulary. Unknown tokens
/// are dropped silently, which also shuts the door on crafted values
/// reaching the query layer.
fn filter_genres(value: Option<StringOrArray>, vocabulary: &GenreVocabulary) -> Vec<String> {
    value
        .map(StringOrArray::into_vec)
        .unwrap_or_default()
        .into_iter()
        .filter(|g| vocabulary.contains(g))
        .collect()
}

impl SearchCriteria {
    /// Normalize a raw request against the catalog's genre vocabulary
    pub fn normalize(raw: RawSearchRequest, vocabulary: &GenreVocabulary) -> Self {
        let limit = raw
            .limit
            .as_ref()
            .and_then(NumberParam::as_i64)
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .min(MAX_SEARCH_LIMIT);

        Self {
            title: normalize_text(raw.title),
            year_from: raw.year_from.as_ref().and_then(NumberParam::as_i64),
            year_to: raw.year_to.as_ref().and_then(NumberParam::as_i64),
            rating_min: raw.rating_min.as_ref().and_then(NumberParam::as_f64),
            rating_max: raw.rating_max.as_ref().and_then(NumberParam::as_f64),
            votes_min: raw.votes_min.as_ref().and_then(NumberParam::as_i64),
            genres_include: filter_genres(raw.genres_include, vocabulary),
            genre_mode: raw
                .genre_mode
                .as_deref()
                .map(GenreMode::parse)
                .unwrap_or_default(),
            genres_exclude: filter_genres(raw.genres_exclude, vocabulary),
            director: normalize_text(raw.director),
            cast: normalize_text(raw.cast),
            language: normalize_code(raw.language),
            country: normalize_code(raw.country),
            sort_by: raw
                .sort_by
                .as_deref()
                .map(SortColumn::parse)
                .unwrap_or_default(),
            sort_order: raw
                .sort_order
                .as_deref()
                .map(SortDirection::parse)
                .unwrap_or_default(),
            limit,
        }
    }
}
