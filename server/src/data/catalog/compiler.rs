//! Filter-to-SQL compilation
//!
//! Turns normalized `SearchCriteria` into a single parameterized SELECT.
//! Every user-supplied value travels as a bind parameter; identifiers
//! (columns, sort direction) come only from allow-lists, so the emitted
//! SQL text is a function of which filters are present, never of their
//! values. Clause order is fixed, which keeps query texts cacheable by
//! the prepared-statement layer.

use std::collections::BTreeSet;

use super::criteria::{GenreMode, SearchCriteria};
use super::CatalogSchema;
use crate::utils::sql::{escape_like_pattern, wildcard_to_like_pattern};

/// A positional bind parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i64),
    Real(f64),
    Text(String),
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Predicate applied to decoded rows after the database pass.
///
/// Substring matching over the pipe-joined genres column cannot express
/// exact set equality, so the EXACT genre mode narrows with ALL semantics
/// in SQL and finishes the job here.
#[derive(Debug, Clone, PartialEq)]
pub enum PostFilter {
    None,
    ExactGenres(BTreeSet<String>),
}

impl PostFilter {
    pub fn matches(&self, genre_list: &[String]) -> bool {
        match self {
            Self::None => true,
            Self::ExactGenres(wanted) => {
                // Set equality: a row storing a duplicated genre still
                // carries the same genre set
                let row: BTreeSet<&str> = genre_list.iter().map(String::as_str).collect();
                row.len() == wanted.len() && row.iter().all(|g| wanted.contains(*g))
            }
        }
    }
}

/// Compilation output: SQL text plus its bind parameters in order
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<SqlValue>,
    pub post_filter: PostFilter,
}

/// Accumulates WHERE fragments alongside their parameters so the two can
/// never drift out of sync
#[derive(Debug, Default)]
struct QueryBuilder {
    fragments: Vec<String>,
    params: Vec<SqlValue>,
}

impl QueryBuilder {
    fn push(&mut self, fragment: impl Into<String>, values: impl IntoIterator<Item = SqlValue>) {
        self.fragments.push(fragment.into());
        self.params.extend(values);
    }

    fn where_clause(&self) -> String {
        let mut clause = String::from("1=1");
        for fragment in &self.fragments {
            clause.push_str(" AND ");
            clause.push_str(fragment);
        }
        clause
    }
}

/// Pattern that matches a value anywhere inside a pipe-joined list column
fn list_contains_pattern(value: &str) -> String {
    format!("%{}%", escape_like_pattern(value))
}

/// Compile a comma-separated person filter (`director` / `cast`) against
/// one list column.
///
/// Grammar: comma separates alternatives; a leading `-` negates a term;
/// `*` is a wildcard. Positive terms OR together, negative terms all
/// apply. A term that is only `-` (or empty) is ignored.
fn push_person_filter(builder: &mut QueryBuilder, column: &str, input: &str) {
    let mut positive = Vec::new();
    let mut negative = Vec::new();

    for term in input.split(',') {
        let term = term.trim();
        if let Some(stripped) = term.strip_prefix('-') {
            let stripped = stripped.trim();
            if !stripped.is_empty() {
                negative.push(wildcard_to_like_pattern(stripped));
            }
        } else if !term.is_empty() {
            positive.push(wildcard_to_like_pattern(term));
        }
    }

    if !positive.is_empty() {
        let alternatives = positive
            .iter()
            .map(|_| format!("{column} LIKE ? ESCAPE '\\'"))
            .collect::<Vec<_>>()
            .join(" OR ");
        builder.push(
            format!("({alternatives})"),
            positive.into_iter().map(SqlValue::Text),
        );
    }

    for pattern in negative {
        builder.push(
            format!("{column} NOT LIKE ? ESCAPE '\\'"),
            [SqlValue::Text(pattern)],
        );
    }
}

/// Column list for search results. `cast` is a SQL keyword and must stay
/// quoted; `language`/`country` are omitted when the dataset predates them.
pub fn select_columns(schema: &CatalogSchema) -> String {
    let mut columns = vec![
        "imdb_id",
        "title",
        "original_title",
        "year",
        "rating",
        "votes",
        "duration_mins",
        "duration_text",
        "genres",
        "directors",
        "writers",
        "\"cast\"",
    ];
    if schema.has_language {
        columns.push("language");
    }
    if schema.has_country {
        columns.push("country");
    }
    columns.join(", ")
}

/// Compile normalized criteria into one parameterized query
pub fn compile(criteria: &SearchCriteria, schema: &CatalogSchema) -> CompiledQuery {
    let mut builder = QueryBuilder::default();

    if let Some(title) = &criteria.title {
        builder.push(
            "title LIKE ? ESCAPE '\\' COLLATE NOCASE",
            [SqlValue::Text(list_contains_pattern(title))],
        );
    }

    if let Some(year) = criteria.year_from {
        builder.push("year >= ?", [SqlValue::Int(year)]);
    }
    if let Some(year) = criteria.year_to {
        builder.push("year <= ?", [SqlValue::Int(year)]);
    }
    if let Some(rating) = criteria.rating_min {
        builder.push("rating >= ?", [SqlValue::Real(rating)]);
    }
    if let Some(rating) = criteria.rating_max {
        builder.push("rating <= ?", [SqlValue::Real(rating)]);
    }
    if let Some(votes) = criteria.votes_min.filter(|v| *v > 0) {
        builder.push("votes >= ?", [SqlValue::Int(votes)]);
    }

    let mut post_filter = PostFilter::None;
    if !criteria.genres_include.is_empty() {
        let patterns = criteria
            .genres_include
            .iter()
            .map(|g| SqlValue::Text(list_contains_pattern(g)));
        match criteria.genre_mode {
            GenreMode::Any => {
                let alternatives = criteria
                    .genres_include
                    .iter()
                    .map(|_| "genres LIKE ? ESCAPE '\\'")
                    .collect::<Vec<_>>()
                    .join(" OR ");
                builder.push(format!("({alternatives})"), patterns);
            }
            GenreMode::All | GenreMode::Exact => {
                // EXACT narrows with ALL semantics here; set equality is
                // checked on decoded rows after the fetch
                let conjunction = criteria
                    .genres_include
                    .iter()
                    .map(|_| "genres LIKE ? ESCAPE '\\'")
                    .collect::<Vec<_>>()
                    .join(" AND ");
                builder.push(format!("({conjunction})"), patterns);
                if criteria.genre_mode == GenreMode::Exact {
                    post_filter = PostFilter::ExactGenres(
                        criteria.genres_include.iter().cloned().collect(),
                    );
                }
            }
        }
    }

    for genre in &criteria.genres_exclude {
        builder.push(
            "genres NOT LIKE ? ESCAPE '\\'",
            [SqlValue::Text(list_contains_pattern(genre))],
        );
    }

    if let Some(director) = &criteria.director {
        push_person_filter(&mut builder, "directors", director);
    }
    if let Some(cast) = &criteria.cast {
        push_person_filter(&mut builder, "\"cast\"", cast);
    }

    if schema.has_language {
        if let Some(language) = &criteria.language {
            builder.push("language = ?", [SqlValue::Text(language.clone())]);
        }
    }
    if schema.has_country {
        if let Some(country) = &criteria.country {
            builder.push("country = ?", [SqlValue::Text(country.clone())]);
        }
    }

    let sql = format!(
        "SELECT {} FROM movies WHERE {} ORDER BY {} {}, imdb_id ASC LIMIT ?",
        select_columns(schema),
        builder.where_clause(),
        criteria.sort_by.as_sql(),
        criteria.sort_order.as_sql(),
    );
    let mut params = builder.params;
    params.push(SqlValue::Int(criteria.limit));

    CompiledQuery {
        sql,
        params,
        post_filter,
    }
}
