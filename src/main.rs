// PaxView - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading (explicit --config is strict, the platform default is lenient)
// 3. Logging initialisation (debug mode support)
// 4. Dataset loading, view computation, report output and exports

use clap::{Parser, ValueEnum};
use paxview::app::explorer::{
    load_dataset, resolve_dataset_path, ExportFormat, Explorer, FilterRequest,
};
use paxview::app::report;
use paxview::core::view::ViewOptions;
use paxview::platform::config::{self, AppConfig, PlatformPaths};
use paxview::util::constants::{APP_NAME, APP_VERSION, MAX_AGE_BINS, MIN_AGE_BINS};
use paxview::util::error::{ConfigError, PaxViewError, Result};
use paxview::util::logging;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// How the computed view is printed on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// PaxView - Passenger survival explorer.
///
/// Load a passenger CSV, narrow it down by sex, class, port and age, and
/// print survival metrics and breakdowns for the selection.
#[derive(Parser, Debug)]
#[command(name = "PaxView", version, about)]
struct Cli {
    /// Passenger CSV to load (falls back to [dataset] path in config.toml).
    path: Option<PathBuf>,

    /// Keep only these sexes (repeatable).
    #[arg(short = 's', long = "sex")]
    sex: Vec<String>,

    /// Keep only these classes: First/Second/Third or 1/2/3 (repeatable).
    #[arg(short = 'c', long = "class")]
    class: Vec<String>,

    /// Keep only these ports: C/Q/S or town name (repeatable).
    #[arg(short = 'e', long = "embarked")]
    embarked: Vec<String>,

    /// Lower age bound, inclusive.
    #[arg(long = "age-min")]
    age_min: Option<f64>,

    /// Upper age bound, inclusive.
    #[arg(long = "age-max")]
    age_max: Option<f64>,

    /// Number of equal-width age buckets.
    #[arg(long = "age-bins")]
    age_bins: Option<usize>,

    /// Output format on stdout.
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Filtered rows to include in the output.
    #[arg(short = 'n', long = "rows")]
    rows: Option<usize>,

    /// Write the filtered rows to a CSV file.
    #[arg(long = "export-csv")]
    export_csv: Option<PathBuf>,

    /// Write the filtered rows to a JSON file.
    #[arg(long = "export-json")]
    export_json: Option<PathBuf>,

    /// Print the available filter values and exit.
    #[arg(long = "list-options")]
    list_options: bool,

    /// Config file to use instead of the platform default.
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn stdout_error(e: io::Error) -> PaxViewError {
    PaxViewError::Io {
        path: PathBuf::from("<stdout>"),
        operation: "write report",
        source: e,
    }
}

/// Load config.toml. An explicit path must exist and parse; the platform
/// default is optional and falls back to defaults on any problem.
fn load_config(explicit: Option<&Path>) -> Result<(AppConfig, Vec<String>)> {
    match explicit {
        Some(path) => match config::read_config(path)? {
            Some(raw) => Ok(config::validate(raw)),
            None => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "config file not found"),
            }
            .into()),
        },
        None => Ok(config::load_config(&PlatformPaths::resolve().config_file())),
    }
}

fn run(cli: Cli, app_config: AppConfig) -> Result<()> {
    let dataset_path =
        resolve_dataset_path(cli.path.as_deref(), app_config.dataset_path.as_deref())?;

    let loaded = load_dataset(&dataset_path)?;
    tracing::info!(
        path = %dataset_path.display(),
        rows = loaded.dataset.len(),
        skipped = loaded.skipped_rows,
        dropped = loaded.normalization.dropped_missing_embarked,
        imputed = loaded.normalization.ages_imputed,
        "Dataset ready"
    );
    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }

    let mut stdout = io::stdout().lock();

    if cli.list_options {
        report::write_options(&mut stdout, loaded.dataset.domain()).map_err(stdout_error)?;
        return Ok(());
    }

    let options = ViewOptions {
        age_bins: cli
            .age_bins
            .unwrap_or(app_config.age_bins)
            .clamp(MIN_AGE_BINS, MAX_AGE_BINS),
    };
    let explorer = Explorer::new(loaded.dataset.clone(), options)
        .with_large_export_threshold(app_config.large_export_threshold);

    let request = FilterRequest {
        sexes: cli.sex,
        classes: cli.class,
        ports: cli.embarked,
        age_min: cli.age_min,
        age_max: cli.age_max,
    };
    let view = explorer.compute_request(&request)?;
    let preview_rows = cli.rows.unwrap_or(app_config.preview_rows);

    match cli.format {
        OutputFormat::Text => {
            report::write_report(&mut stdout, &view, preview_rows).map_err(stdout_error)?;
        }
        OutputFormat::Json => {
            let snapshot = view.report(Some(preview_rows));
            serde_json::to_writer_pretty(&mut stdout, &snapshot)
                .map_err(|e| stdout_error(e.into()))?;
            writeln!(stdout).map_err(stdout_error)?;
        }
    }

    if cli.export_csv.is_some() || cli.export_json.is_some() {
        let rows = view.rows();
        if let Some(ref path) = cli.export_csv {
            let count = explorer.export(&rows, path, ExportFormat::Csv)?;
            eprintln!("Exported {count} rows to {}", path.display());
        }
        if let Some(ref path) = cli.export_json {
            let count = explorer.export(&rows, path, ExportFormat::Json)?;
            eprintln!("Exported {count} rows to {}", path.display());
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let (app_config, config_warnings) = match load_config(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            logging::init(cli.debug, None, None);
            tracing::error!(error = %e, "Failed to load config");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    // Initialise logging subsystem
    logging::init(
        cli.debug,
        app_config.log_level.as_deref(),
        app_config.log_file.as_deref(),
    );

    tracing::info!(version = APP_VERSION, debug = cli.debug, "{} starting", APP_NAME);
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    if let Err(e) = run(cli, app_config) {
        tracing::error!(error = %e, "{} failed", APP_NAME);
        eprintln!("Error: {e}");
        let code = match e {
            PaxViewError::Config(ConfigError::NoDatasetPath) => 2,
            _ => 1,
        };
        std::process::exit(code);
    }
}
