// PaxView - app/explorer.rs
//
// Orchestration: load + normalize the dataset once, then answer any number of
// filter requests against the shared immutable handle.

use crate::core::filter::{AgeRange, FilterState};
use crate::core::loader;
use crate::core::model::{Dataset, Port, Sex, TravelClass};
use crate::core::normalize::{normalize, NormalizationReport};
use crate::core::view::{compute_view, DashboardView, ViewOptions};
use crate::core::{export, model::PassengerRow};
use crate::platform::fs;
use crate::util::constants::DEFAULT_LARGE_EXPORT_THRESHOLD;
use crate::util::error::{ConfigError, FilterError, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Output format for row exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// A dataset ready for exploration, plus what happened while loading it.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: Arc<Dataset>,
    pub normalization: NormalizationReport,
    /// Source rows that could not be decoded.
    pub skipped_rows: usize,
    /// Row-level load warnings (capped).
    pub warnings: Vec<String>,
}

/// Read, decode and normalize a CSV dataset from disk.
pub fn load_dataset(path: &Path) -> Result<LoadedDataset> {
    let reader = fs::open_dataset(path)?;
    let outcome = loader::load_csv(reader, path)?;
    let (dataset, normalization) = normalize(outcome.records);

    Ok(LoadedDataset {
        dataset: Arc::new(dataset),
        normalization,
        skipped_rows: outcome.skipped_rows,
        warnings: outcome.warnings,
    })
}

/// Pick the dataset to load: the command-line path wins over the configured one.
pub fn resolve_dataset_path(cli: Option<&Path>, configured: Option<&Path>) -> Result<PathBuf> {
    cli.or(configured)
        .map(Path::to_path_buf)
        .ok_or_else(|| ConfigError::NoDatasetPath.into())
}

/// User selections as typed on the command line, before validation.
///
/// An empty list means "every observed value" for that field, and a missing
/// age bound means the observed minimum or maximum (moved past the given
/// bound when that bound lies outside the data).
#[derive(Debug, Clone, Default)]
pub struct FilterRequest {
    pub sexes: Vec<String>,
    pub classes: Vec<String>,
    pub ports: Vec<String>,
    pub age_min: Option<f64>,
    pub age_max: Option<f64>,
}

fn parse_all<T>(values: &[String]) -> std::result::Result<Vec<T>, FilterError>
where
    T: FromStr<Err = FilterError>,
{
    values.iter().map(|v| v.parse()).collect()
}

impl FilterRequest {
    /// Turn the request into a filter against a concrete dataset.
    pub fn resolve(&self, dataset: &Dataset) -> std::result::Result<FilterState, FilterError> {
        let mut filter = FilterState::identity(dataset);

        if !self.sexes.is_empty() {
            filter = filter.with_sexes(parse_all::<Sex>(&self.sexes)?);
        }
        if !self.classes.is_empty() {
            filter = filter.with_classes(parse_all::<TravelClass>(&self.classes)?);
        }
        if !self.ports.is_empty() {
            filter = filter.with_ports(parse_all::<Port>(&self.ports)?);
        }
        // A single bound keeps the observed edge on the other side, widened
        // so the range stays valid when the bound lies outside the data.
        let (seen_lo, seen_hi) = (filter.age.lo(), filter.age.hi());
        let bounds = match (self.age_min, self.age_max) {
            (Some(lo), Some(hi)) => Some((lo, hi)),
            (Some(lo), None) => Some((lo, seen_hi.max(lo))),
            (None, Some(hi)) => Some((seen_lo.min(hi), hi)),
            (None, None) => None,
        };
        if let Some((lo, hi)) = bounds {
            filter = filter.with_age(AgeRange::new(lo, hi)?);
        }

        Ok(filter)
    }
}

/// Shared read-only dataset plus the options every view is computed with.
#[derive(Debug, Clone)]
pub struct Explorer {
    dataset: Arc<Dataset>,
    options: ViewOptions,
    large_export_threshold: usize,
}

impl Explorer {
    pub fn new(dataset: Arc<Dataset>, options: ViewOptions) -> Self {
        Self {
            dataset,
            options,
            large_export_threshold: DEFAULT_LARGE_EXPORT_THRESHOLD,
        }
    }

    pub fn with_large_export_threshold(mut self, threshold: usize) -> Self {
        self.large_export_threshold = threshold;
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Recompute every output for a filter.
    pub fn compute(&self, filter: &FilterState) -> DashboardView<'_> {
        compute_view(&self.dataset, filter, &self.options)
    }

    /// Resolve a raw request and compute its view.
    pub fn compute_request(&self, request: &FilterRequest) -> Result<DashboardView<'_>> {
        let filter = request.resolve(&self.dataset)?;
        Ok(self.compute(&filter))
    }

    /// Write the rows of a view to a file. Returns the number of rows written.
    pub fn export(&self, rows: &[PassengerRow], path: &Path, format: ExportFormat) -> Result<usize> {
        if rows.len() > self.large_export_threshold {
            tracing::warn!(
                rows = rows.len(),
                threshold = self.large_export_threshold,
                "Large export"
            );
        }

        let writer = fs::create_export_file(path)?;
        let count = match format {
            ExportFormat::Csv => export::export_csv(rows, writer, path)?,
            ExportFormat::Json => export::export_json(rows, writer, path)?,
        };

        tracing::info!(path = %path.display(), rows = count, format = ?format, "Export complete");
        Ok(count)
    }
}
