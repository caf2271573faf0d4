// PaxView - core/normalize.rs
//
// Missing-value normalization: impute missing ages with the raw median,
// then drop rows with no port of embarkation.
// Core layer: pure logic, no I/O.

use crate::core::model::{Dataset, Passenger, RawPassenger};
use crate::util::constants::FALLBACK_AGE;
use serde::Serialize;

/// What normalization did to the raw records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizationReport {
    /// Rows handed to normalization.
    pub raw_rows: usize,
    /// Rows removed because `embarked` was missing.
    pub dropped_missing_embarked: usize,
    /// Ages filled in with `imputed_age`, counted before any row was dropped.
    pub ages_imputed: usize,
    /// Value substituted for missing ages; `None` when nothing was missing.
    pub imputed_age: Option<f64>,
}

/// Median of the given values, `None` when there are none.
/// An even count averages the two middle values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Normalize raw records into a [`Dataset`].
///
/// The median is taken over every raw row (including rows later dropped for a
/// missing port). If no age is known at all, [`FALLBACK_AGE`] is used.
/// Running this over an already-normalized dataset returns it unchanged.
pub fn normalize(raw: Vec<RawPassenger>) -> (Dataset, NormalizationReport) {
    let known_ages: Vec<f64> = raw.iter().filter_map(|r| r.age).collect();
    let missing_ages = raw.len() - known_ages.len();

    let imputed_age = if missing_ages == 0 {
        None
    } else {
        match median(&known_ages) {
            Some(m) => Some(m),
            None => {
                tracing::warn!(
                    rows = raw.len(),
                    fallback = FALLBACK_AGE,
                    "No known ages in dataset; median undefined, using fallback age"
                );
                Some(FALLBACK_AGE)
            }
        }
    };

    let raw_rows = raw.len();
    let mut dropped = 0usize;

    let records: Vec<Passenger> = raw
        .into_iter()
        .filter_map(|r| {
            let Some(embarked) = r.embarked else {
                dropped += 1;
                return None;
            };
            Some(Passenger {
                row: r.row,
                sex: r.sex,
                class: r.class,
                embarked,
                age: r.age.or(imputed_age).unwrap_or(FALLBACK_AGE),
                survived: r.survived,
            })
        })
        .collect();

    let report = NormalizationReport {
        raw_rows,
        dropped_missing_embarked: dropped,
        ages_imputed: missing_ages,
        imputed_age,
    };

    tracing::info!(
        raw_rows,
        kept = records.len(),
        dropped_missing_embarked = dropped,
        ages_imputed = missing_ages,
        imputed_age = ?imputed_age,
        "Dataset normalized"
    );

    (Dataset::from_records(records), report)
}
