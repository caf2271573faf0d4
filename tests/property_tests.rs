// PaxView - tests/property_tests.rs
//
// Property-based tests (proptest) over randomly generated manifests and
// filters. Checks the relationships between the derived outputs rather
// than specific numbers.

use paxview::core::contingency::{AgeBinning, GroupField, GroupKey};
use paxview::core::filter::{apply_filters, AgeRange, FilterState};
use paxview::core::model::{Dataset, Port, RawPassenger, Sex, TravelClass};
use paxview::core::normalize::normalize;
use paxview::core::view::{compute_view, DashboardView, ViewOptions};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn sex() -> impl Strategy<Value = Sex> {
    prop::sample::select(Sex::all().to_vec())
}

fn class() -> impl Strategy<Value = TravelClass> {
    prop::sample::select(TravelClass::all().to_vec())
}

fn port() -> impl Strategy<Value = Port> {
    prop::sample::select(Port::all().to_vec())
}

/// Ages as they appear in real manifests: infants in fractions of a year,
/// everyone else mostly whole or half years, sometimes unknown.
fn age() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        1 => Just(None),
        1 => (1u32..12).prop_map(|m| Some(f64::from(m) / 12.0)),
        6 => (0u32..160).prop_map(|h| Some(f64::from(h) / 2.0)),
    ]
}

fn raw_manifest(max_len: usize) -> impl Strategy<Value = Vec<RawPassenger>> {
    prop::collection::vec(
        (sex(), class(), prop::option::weighted(0.9, port()), age(), any::<bool>()),
        0..max_len,
    )
    .prop_map(|cols| {
        cols.into_iter()
            .enumerate()
            .map(|(row, (sex, class, embarked, age, survived))| RawPassenger {
                row,
                sex,
                class,
                embarked,
                age,
                survived,
            })
            .collect()
    })
}

fn group_keys(out: &DashboardView<'_>, field: GroupField) -> Vec<GroupKey> {
    out.tables
        .iter()
        .find(|table| table.field == field)
        .map(|table| table.rows.iter().map(|r| r.key).collect())
        .unwrap_or_default()
}

fn dataset() -> impl Strategy<Value = Dataset> {
    raw_manifest(200).prop_map(|raw| normalize(raw).0)
}

fn filter() -> impl Strategy<Value = FilterState> {
    (
        prop::sample::subsequence(Sex::all().to_vec(), 0..=Sex::all().len()),
        prop::sample::subsequence(TravelClass::all().to_vec(), 0..=TravelClass::all().len()),
        prop::sample::subsequence(Port::all().to_vec(), 0..=Port::all().len()),
        0.0..90.0f64,
        0.0..90.0f64,
    )
        .prop_map(|(sexes, classes, ports, a, b)| {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            FilterState::all()
                .with_sexes(sexes)
                .with_classes(classes)
                .with_ports(ports)
                .with_age(AgeRange::new(lo, hi).unwrap())
        })
}

// =============================================================================
// Normalization
// =============================================================================

proptest! {
    /// Normalized data has no gaps, and normalizing it again is a no-op.
    #[test]
    fn normalize_is_idempotent(raw in raw_manifest(200)) {
        let with_port = raw.iter().filter(|r| r.embarked.is_some()).count();
        let (ds, report) = normalize(raw);

        prop_assert_eq!(ds.len(), with_port);
        prop_assert_eq!(report.raw_rows - report.dropped_missing_embarked, ds.len());
        prop_assert!(ds.records().iter().all(|p| p.age.is_finite() && p.age >= 0.0));

        let (again, second) = normalize(ds.to_raw());
        prop_assert_eq!(&again, &ds);
        prop_assert_eq!(second.dropped_missing_embarked, 0);
        prop_assert_eq!(second.ages_imputed, 0);
    }
}

// =============================================================================
// Filtering
// =============================================================================

proptest! {
    /// A view only ever holds matching rows of its dataset, in dataset order,
    /// and holds every matching row.
    #[test]
    fn view_is_exact_ordered_subset(ds in dataset(), f in filter()) {
        let view = apply_filters(&ds, &f);

        prop_assert!(view.indices().windows(2).all(|w| w[0] < w[1]));
        prop_assert!(view.indices().iter().all(|&i| i < ds.len()));
        prop_assert!(view.iter().all(|p| f.matches(p)));

        let expected = ds.records().iter().filter(|p| f.matches(p)).count();
        prop_assert_eq!(view.len(), expected);
    }

    /// The identity filter keeps the whole dataset.
    #[test]
    fn identity_filter_keeps_everything(ds in dataset()) {
        let view = apply_filters(&ds, &FilterState::identity(&ds));
        prop_assert_eq!(view.len(), ds.len());
    }

    /// Narrowing a filter never grows the view.
    #[test]
    fn narrowing_is_monotonic(ds in dataset(), f in filter()) {
        let wide = apply_filters(&ds, &FilterState::identity(&ds)).len();
        let narrow = apply_filters(&ds, &f).len();
        prop_assert!(narrow <= wide);
    }
}

// =============================================================================
// Metrics and tables
// =============================================================================

proptest! {
    /// Metrics stay in range and every table accounts for every row once.
    #[test]
    fn outputs_are_consistent(ds in dataset(), f in filter(), bins in 1usize..40) {
        let out = compute_view(&ds, &f, &ViewOptions { age_bins: bins });
        let m = &out.metrics;

        prop_assert_eq!(m.total, out.view.len());
        prop_assert!((0.0..=100.0).contains(&m.female_pct));
        if m.total == 0 {
            prop_assert_eq!(m.survival_rate, None);
            prop_assert_eq!(m.mean_age, None);
            prop_assert_eq!(m.female_pct, 0.0);
        } else {
            let rate = m.survival_rate.unwrap();
            prop_assert!((0.0..=100.0).contains(&rate));
            let mean = m.mean_age.unwrap();
            let (lo, hi) = ds.domain().age_bounds().unwrap();
            prop_assert!(mean >= lo - 1e-9 && mean <= hi + 1e-9);
        }

        for table in out.tables.iter() {
            prop_assert_eq!(table.total(), m.total, "table {:?}", table.field);
            let survived: usize = table.rows.iter().map(|r| r.survived).sum();
            let expected = out.view.iter().filter(|p| p.survived).count();
            prop_assert_eq!(survived, expected);
        }
        let expected_bins = AgeBinning::over(ds.domain(), bins).bins();
        prop_assert!(expected_bins == bins || expected_bins == 1);
        prop_assert_eq!(out.tables.by_age.rows.len(), expected_bins);
    }

    /// Every observed age lands in a valid bucket.
    #[test]
    fn every_age_has_a_bucket(ds in dataset(), bins in 1usize..40) {
        let binning = AgeBinning::over(ds.domain(), bins);
        for p in ds.records() {
            prop_assert!(binning.bucket_of(p.age) < binning.bins());
        }
    }

    /// Table groups come from the dataset, whatever the filter.
    #[test]
    fn table_groups_do_not_depend_on_filter(ds in dataset(), f in filter()) {
        let full = compute_view(&ds, &FilterState::identity(&ds), &ViewOptions::default());
        let narrowed = compute_view(&ds, &f, &ViewOptions::default());

        for &field in GroupField::all() {
            prop_assert_eq!(group_keys(&full, field), group_keys(&narrowed, field));
        }
    }
}
