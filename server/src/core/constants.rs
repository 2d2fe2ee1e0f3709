//! Application-wide constants

// =============================================================================
// Application identity
// =============================================================================

pub const APP_NAME_LOWER: &str = "filmdex";

// =============================================================================
// Environment variables
// =============================================================================

pub const ENV_HOST: &str = "FILMDEX_HOST";
pub const ENV_PORT: &str = "FILMDEX_PORT";
pub const ENV_DATASET: &str = "FILMDEX_DATASET";
pub const ENV_CONFIG: &str = "FILMDEX_CONFIG";
pub const ENV_LOG: &str = "FILMDEX_LOG";

// =============================================================================
// Server defaults
// =============================================================================

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

/// JSON config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "filmdex.json";

// =============================================================================
// Catalog dataset
// =============================================================================

/// Default dataset filename, looked up in the working directory and its parent
pub const DATASET_FILE_NAME: &str = "imdb_dataset.db";

pub const SQLITE_MAX_CONNECTIONS: u32 = 8;
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 5;
/// 64MB page cache (negative value = KiB units)
pub const SQLITE_CACHE_SIZE: &str = "-64000";
/// 256MB memory-mapped reads
pub const SQLITE_MMAP_SIZE: &str = "268435456";

/// Year range reported when the table is empty
pub const FALLBACK_YEAR_MIN: i64 = 1900;
pub const FALLBACK_YEAR_MAX: i64 = 2030;

// =============================================================================
// Search limits
// =============================================================================

/// Rows returned when the request carries no usable limit
pub const DEFAULT_SEARCH_LIMIT: i64 = 100;
/// Hard cap on requested result size
pub const MAX_SEARCH_LIMIT: i64 = 500;
/// Rows returned by the director filmography endpoint
pub const FILMOGRAPHY_LIMIT: i64 = 20;

/// Logarithmically spaced vote-count thresholds for the UI slider.
/// A slider position indexes into this table; the resolved value is what
/// reaches the filter normalizer.
pub const VOTE_THRESHOLDS: &[i64] = &[
    0, 100, 500, 1_000, 5_000, 10_000, 25_000, 50_000, 100_000, 250_000, 500_000, 1_000_000,
];
