// PaxView - core/view.rs
//
// The single entry point used by every caller: given a dataset and a filter,
// produce the filtered view, its summary metrics and its chart tables.
// Recomputed from scratch on every call; nothing is cached between calls.

use crate::core::contingency::ChartTables;
use crate::core::filter::{apply_filters, FilterState, FilteredView};
use crate::core::metrics::SummaryMetrics;
use crate::core::model::{Dataset, PassengerRow};
use crate::util::constants::DEFAULT_AGE_BINS;
use serde::Serialize;

/// Knobs that shape the derived outputs but not the filtering itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOptions {
    /// Number of equal-width buckets in the age table.
    pub age_bins: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            age_bins: DEFAULT_AGE_BINS,
        }
    }
}

/// Everything the presentation layer needs for one interaction.
#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    pub filter: FilterState,
    pub view: FilteredView<'a>,
    pub metrics: SummaryMetrics,
    pub tables: ChartTables,
}

impl DashboardView<'_> {
    /// Row projection for tabular display.
    pub fn rows(&self) -> Vec<PassengerRow> {
        self.view.rows()
    }

    /// Owned, serialisable snapshot. `max_rows` limits the row projection;
    /// `None` includes every row.
    pub fn report(&self, max_rows: Option<usize>) -> ViewReport {
        let rows: Vec<PassengerRow> = self
            .view
            .iter()
            .take(max_rows.unwrap_or(usize::MAX))
            .map(|p| p.to_row())
            .collect();
        ViewReport {
            dataset_rows: self.view.dataset().len(),
            filter: self.filter.clone(),
            metrics: self.metrics,
            tables: self.tables.clone(),
            rows_shown: rows.len(),
            rows,
        }
    }
}

/// Serialisable form of a [`DashboardView`].
#[derive(Debug, Clone, Serialize)]
pub struct ViewReport {
    /// Rows in the whole normalized dataset.
    pub dataset_rows: usize,
    pub filter: FilterState,
    pub metrics: SummaryMetrics,
    pub tables: ChartTables,
    pub rows_shown: usize,
    pub rows: Vec<PassengerRow>,
}

/// Filter the dataset and derive every output from the result.
pub fn compute_view<'a>(
    dataset: &'a Dataset,
    filter: &FilterState,
    options: &ViewOptions,
) -> DashboardView<'a> {
    let view = apply_filters(dataset, filter);
    let metrics = SummaryMetrics::compute(&view);
    let tables = ChartTables::compute(&view, options.age_bins);

    tracing::debug!(
        rows = metrics.total,
        survival_rate = ?metrics.survival_rate,
        female_pct = metrics.female_pct,
        "View computed"
    );

    DashboardView {
        filter: filter.clone(),
        view,
        metrics,
        tables,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::AgeRange;
    use crate::core::model::{Passenger, Port, Sex, TravelClass};

    fn sample() -> Dataset {
        let mk = |row, sex, age, survived| Passenger {
            row,
            sex,
            class: TravelClass::First,
            embarked: Port::Cherbourg,
            age,
            survived,
        };
        Dataset::from_records(vec![
            mk(0, Sex::Female, 30.0, true),
            mk(1, Sex::Male, 45.0, false),
            mk(2, Sex::Female, 18.0, false),
        ])
    }

    #[test]
    fn test_outputs_agree_with_each_other() {
        let ds = sample();
        let out = compute_view(&ds, &FilterState::identity(&ds), &ViewOptions::default());
        assert_eq!(out.metrics.total, 3);
        assert_eq!(out.rows().len(), 3);
        for table in out.tables.iter() {
            assert_eq!(table.total(), out.metrics.total);
        }
        assert_eq!(out.tables.by_age.rows.len(), DEFAULT_AGE_BINS);
    }

    #[test]
    fn test_report_limits_rows() {
        let ds = sample();
        let out = compute_view(&ds, &FilterState::identity(&ds), &ViewOptions { age_bins: 5 });
        let report = out.report(Some(2));
        assert_eq!(report.dataset_rows, 3);
        assert_eq!(report.rows_shown, 2);
        assert_eq!(report.metrics.total, 3);

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"by_embarked\""));
    }

    #[test]
    fn test_empty_view_does_not_fail() {
        let ds = sample();
        let filter = FilterState::identity(&ds).with_age(AgeRange::new(200.0, 300.0).unwrap());
        let out = compute_view(&ds, &filter, &ViewOptions::default());
        assert_eq!(out.metrics.total, 0);
        assert_eq!(out.metrics.female_pct, 0.0);
        assert!(out.report(None).rows.is_empty());
    }
}
