//! Display-name lookups for ISO language and country codes
//!
//! Unknown codes fall back to their uppercased form rather than erroring;
//! the codes participate in filtering as opaque strings either way.

/// ISO 639-1 language code to display name
pub fn language_name(code: &str) -> String {
    match code.to_lowercase().as_str() {
        "en" => "English",
        "es" => "Spanish",
        "fr" => "French",
        "de" => "German",
        "it" => "Italian",
        "ja" => "Japanese",
        "ko" => "Korean",
        "zh" => "Chinese",
        "ru" => "Russian",
        "pt" => "Portuguese",
        "hi" => "Hindi",
        "ar" => "Arabic",
        "tr" => "Turkish",
        "pl" => "Polish",
        "nl" => "Dutch",
        "sv" => "Swedish",
        "no" => "Norwegian",
        "da" => "Danish",
        "fi" => "Finnish",
        "cs" => "Czech",
        "hu" => "Hungarian",
        "ro" => "Romanian",
        "th" => "Thai",
        "vi" => "Vietnamese",
        "id" => "Indonesian",
        _ => return code.to_uppercase(),
    }
    .to_string()
}

/// ISO 3166-1 country code to display name
pub fn country_name(code: &str) -> String {
    match code.to_uppercase().as_str() {
        "US" => "United States",
        "GB" => "United Kingdom",
        "IN" => "India",
        "FR" => "France",
        "DE" => "Germany",
        "JP" => "Japan",
        "IT" => "Italy",
        "ES" => "Spain",
        "CA" => "Canada",
        "AU" => "Australia",
        "KR" => "South Korea",
        "CN" => "China",
        "RU" => "Russia",
        "BR" => "Brazil",
        "MX" => "Mexico",
        "NL" => "Netherlands",
        "SE" => "Sweden",
        "NO" => "Norway",
        "DK" => "Denmark",
        "FI" => "Finland",
        _ => return code.to_uppercase(),
    }
    .to_string()
}
