//! SQL utility functions

/// Escape SQL LIKE metacharacters (%, _, \) in user input
///
/// Use this when building LIKE patterns from user input to prevent
/// unintended pattern matching.
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Translate the user-facing `*` wildcard into a LIKE pattern
///
/// Real LIKE metacharacters in the input are escaped first, so only the
/// explicit `*` token matches arbitrary text. Input without any `*` is
/// wrapped in `%...%` for substring matching (the person-filter grammar:
/// `Sar*` matches prefixes, plain `Tom Hanks` matches anywhere).
pub fn wildcard_to_like_pattern(s: &str) -> String {
    if s.contains('*') {
        escape_like_pattern(s).replace('*', "%")
    } else {
        format!("%{}%", escape_like_pattern(s))
    }
}
