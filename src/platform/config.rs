// PaxView - platform/config.rs
//
// Platform-specific directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for PaxView configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/paxview/ or %APPDATA%\PaxView\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[dataset]` section.
    pub dataset: DatasetSection,
    /// `[view]` section.
    pub view: ViewSection,
    /// `[export]` section.
    pub export: ExportSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[dataset]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DatasetSection {
    /// CSV file loaded when no path is given on the command line.
    pub path: Option<String>,
}

/// `[view]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ViewSection {
    /// Number of buckets in the age table.
    pub age_bins: Option<usize>,
    /// Filtered rows printed by the text report.
    pub preview_rows: Option<usize>,
}

/// `[export]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// Warn before exporting this many rows.
    pub large_export_warning_threshold: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Dataset to load when none is given on the command line.
    pub dataset_path: Option<PathBuf>,
    /// Number of age buckets.
    pub age_bins: usize,
    /// Rows shown in the text report.
    pub preview_rows: usize,
    /// Row count above which exports log a warning.
    pub large_export_threshold: usize,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            age_bins: constants::DEFAULT_AGE_BINS,
            preview_rows: constants::DEFAULT_PREVIEW_ROWS,
            large_export_threshold: constants::DEFAULT_LARGE_EXPORT_THRESHOLD,
            log_level: None,
            log_file: None,
        }
    }
}

/// Read and parse a config file. `Ok(None)` when the file does not exist.
pub fn read_config(path: &Path) -> Result<Option<RawConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let raw = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(Some(raw))
}

/// Load and validate `config.toml` leniently.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// A missing file yields defaults with no warnings (first run); an unreadable
/// or unparseable file yields defaults plus a warning.
pub fn load_config(path: &Path) -> (AppConfig, Vec<String>) {
    match read_config(path) {
        Ok(Some(raw)) => {
            tracing::info!(path = %path.display(), "Loaded config.toml");
            validate(raw)
        }
        Ok(None) => {
            tracing::debug!(path = %path.display(), "No config.toml found; using defaults");
            (AppConfig::default(), Vec::new())
        }
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            (AppConfig::default(), vec![msg])
        }
    }
}

fn out_of_range(field: &str, value: impl ToString, expected: String) -> String {
    ConfigError::ValueOutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        expected,
    }
    .to_string()
}

/// Validate each field against named constants, accumulating all warnings.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();

    // -- Dataset: path --
    if let Some(path) = raw.dataset.path.filter(|p| !p.is_empty()) {
        config.dataset_path = Some(PathBuf::from(path));
    }

    // -- View: age_bins --
    if let Some(bins) = raw.view.age_bins {
        if (constants::MIN_AGE_BINS..=constants::MAX_AGE_BINS).contains(&bins) {
            config.age_bins = bins;
        } else {
            warnings.push(out_of_range(
                "[view] age_bins",
                bins,
                format!(
                    "{}-{} (using default {})",
                    constants::MIN_AGE_BINS,
                    constants::MAX_AGE_BINS,
                    constants::DEFAULT_AGE_BINS
                ),
            ));
        }
    }

    // -- View: preview_rows --
    if let Some(rows) = raw.view.preview_rows {
        if rows <= constants::MAX_PREVIEW_ROWS {
            config.preview_rows = rows;
        } else {
            warnings.push(out_of_range(
                "[view] preview_rows",
                rows,
                format!(
                    "0-{} (using default {})",
                    constants::MAX_PREVIEW_ROWS,
                    constants::DEFAULT_PREVIEW_ROWS
                ),
            ));
        }
    }

    // -- Export: large_export_warning_threshold --
    if let Some(threshold) = raw.export.large_export_warning_threshold {
        if (1..=constants::MAX_EXPORT_ENTRIES).contains(&threshold) {
            config.large_export_threshold = threshold;
        } else {
            warnings.push(out_of_range(
                "[export] large_export_warning_threshold",
                threshold,
                format!(
                    "1-{} (using default {})",
                    constants::MAX_EXPORT_ENTRIES,
                    constants::DEFAULT_LARGE_EXPORT_THRESHOLD
                ),
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(out_of_range(
                "[logging] level",
                level,
                "one of error, warn, info, debug, trace (using default info)".to_string(),
            ));
        }
    }

    // -- Logging: file --
    if let Some(file) = raw.logging.file.filter(|f| !f.is_empty()) {
        config.log_file = Some(file);
    }

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    (config, warnings)
}
