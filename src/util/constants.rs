// PaxView - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "PaxView";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "PaxView";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Loading limits
// =============================================================================

/// Maximum size of a dataset file in bytes. The engine holds the whole table
/// in memory, so anything beyond this is almost certainly the wrong file.
pub const MAX_DATASET_FILE_SIZE: u64 = 256 * 1024 * 1024; // 256 MB

/// Maximum number of row-level warnings kept from a single load.
/// Further malformed rows are still skipped and counted, just not described.
pub const MAX_LOAD_WARNINGS: usize = 1_000;

/// Cell values treated as "missing" by the CSV loader (compared
/// case-insensitively after trimming). The empty string is always missing.
pub const MISSING_MARKERS: &[&str] = &["na", "nan", "null", "none"];

/// Age substituted for every missing age when the source has no known ages at
/// all, so the median is undefined.
pub const FALLBACK_AGE: f64 = 0.0;

// =============================================================================
// View defaults
// =============================================================================

/// Default number of equal-width buckets for the age contingency table.
pub const DEFAULT_AGE_BINS: usize = 30;

/// Minimum user-configurable number of age buckets.
pub const MIN_AGE_BINS: usize = 1;

/// Maximum user-configurable number of age buckets.
pub const MAX_AGE_BINS: usize = 200;

/// Default number of filtered rows printed in the text report.
pub const DEFAULT_PREVIEW_ROWS: usize = 20;

/// Maximum user-configurable number of preview rows.
pub const MAX_PREVIEW_ROWS: usize = 100_000;

/// Placeholder shown for a metric that is undefined on an empty view.
pub const NOT_AVAILABLE: &str = "N/A";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Export
// =============================================================================

/// Maximum number of rows that can be exported in a single operation.
pub const MAX_EXPORT_ENTRIES: usize = 5_000_000;

/// Number of rows above which an export warning is logged.
pub const DEFAULT_LARGE_EXPORT_THRESHOLD: usize = 100_000;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
