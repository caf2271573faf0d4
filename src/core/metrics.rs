// PaxView - core/metrics.rs
//
// Summary scalars over a filtered view.
// Core layer: pure logic, no I/O.

use crate::core::filter::FilteredView;
use crate::core::model::Sex;
use crate::util::constants::NOT_AVAILABLE;
use serde::Serialize;

/// The four headline numbers for a view.
///
/// `survival_rate` and `mean_age` are undefined on an empty view and are
/// `None` there; `female_pct` is defined as 0.0 instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryMetrics {
    /// Rows in the view.
    pub total: usize,
    /// Percentage of rows with `survived`, in [0, 100].
    pub survival_rate: Option<f64>,
    /// Mean age in years.
    pub mean_age: Option<f64>,
    /// Percentage of rows with `sex == female`, in [0, 100].
    pub female_pct: f64,
}

impl SummaryMetrics {
    pub fn compute(view: &FilteredView<'_>) -> Self {
        let mut total = 0usize;
        let mut survivors = 0usize;
        let mut females = 0usize;
        let mut age_sum = 0.0f64;

        for p in view.iter() {
            total += 1;
            survivors += usize::from(p.survived);
            females += usize::from(p.sex == Sex::Female);
            age_sum += p.age;
        }

        if total == 0 {
            return Self {
                total: 0,
                survival_rate: None,
                mean_age: None,
                female_pct: 0.0,
            };
        }

        let n = total as f64;
        Self {
            total,
            survival_rate: Some(survivors as f64 / n * 100.0),
            mean_age: Some(age_sum / n),
            female_pct: females as f64 / n * 100.0,
        }
    }

    /// e.g. `38.4%`, or `N/A` for an empty view.
    pub fn survival_rate_label(&self) -> String {
        self.survival_rate
            .map(|r| format!("{r:.1}%"))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    /// e.g. `29.7 yrs`, or `N/A` for an empty view.
    pub fn mean_age_label(&self) -> String {
        self.mean_age
            .map(|a| format!("{a:.1} yrs"))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn female_pct_label(&self) -> String {
        format!("{:.1}%", self.female_pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::{apply_filters, AgeRange, FilterState};
    use crate::core::model::{Dataset, Passenger, Port, TravelClass};

    fn make(sex: Sex, age: f64, survived: bool) -> Passenger {
        Passenger {
            row: 0,
            sex,
            class: TravelClass::Second,
            embarked: Port::Southampton,
            age,
            survived,
        }
    }

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            make(Sex::Female, 30.0, true),
            make(Sex::Male, 20.0, false),
            make(Sex::Male, 40.0, true),
            make(Sex::Female, 10.0, true),
        ])
    }

    #[test]
    fn test_metrics_over_full_view() {
        let ds = sample();
        let m = SummaryMetrics::compute(&apply_filters(&ds, &FilterState::identity(&ds)));
        assert_eq!(m.total, 4);
        assert_eq!(m.survival_rate, Some(75.0));
        assert_eq!(m.mean_age, Some(25.0));
        assert_eq!(m.female_pct, 50.0);
        assert_eq!(m.survival_rate_label(), "75.0%");
        assert_eq!(m.mean_age_label(), "25.0 yrs");
        assert_eq!(m.female_pct_label(), "50.0%");
    }

    #[test]
    fn test_female_only_view_is_exactly_100() {
        let ds = sample();
        let filter = FilterState::identity(&ds).with_sexes([Sex::Female]);
        let m = SummaryMetrics::compute(&apply_filters(&ds, &filter));
        assert_eq!(m.total, 2);
        assert_eq!(m.female_pct, 100.0);
    }

    #[test]
    fn test_empty_view_defaults() {
        let ds = sample();
        let filter = FilterState::identity(&ds).with_age(AgeRange::new(200.0, 300.0).unwrap());
        let m = SummaryMetrics::compute(&apply_filters(&ds, &filter));
        assert_eq!(m.total, 0);
        assert_eq!(m.survival_rate, None);
        assert_eq!(m.mean_age, None);
        assert_eq!(m.female_pct, 0.0);
        assert_eq!(m.survival_rate_label(), "N/A");
        assert_eq!(m.mean_age_label(), "N/A");
        assert_eq!(m.female_pct_label(), "0.0%");
    }

    #[test]
    fn test_one_decimal_rounding() {
        let ds = Dataset::from_records(vec![
            make(Sex::Female, 1.0, true),
            make(Sex::Male, 1.0, false),
            make(Sex::Male, 2.0, false),
        ]);
        let m = SummaryMetrics::compute(&apply_filters(&ds, &FilterState::all()));
        assert_eq!(m.survival_rate_label(), "33.3%");
        assert_eq!(m.mean_age_label(), "1.3 yrs");
    }
}
