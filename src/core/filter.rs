// PaxView - core/filter.rs
//
// Composable filter engine for passenger records.
// All four predicates are AND-combined.
// Core layer: pure logic, no I/O.

use crate::core::model::{Dataset, Passenger, PassengerRow, Port, Sex, TravelClass};
use crate::util::error::FilterError;
use serde::Serialize;
use std::collections::BTreeSet;

/// Inclusive age interval `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgeRange {
    lo: f64,
    hi: f64,
}

impl AgeRange {
    /// Build a range, rejecting NaN bounds and `lo > hi`.
    ///
    /// A range that lies entirely outside the data is fine; it just matches
    /// nothing.
    pub fn new(lo: f64, hi: f64) -> Result<Self, FilterError> {
        if lo.is_nan() || hi.is_nan() || lo > hi {
            return Err(FilterError::InvalidAgeRange { lo, hi });
        }
        Ok(Self { lo, hi })
    }

    /// A range admitting every age.
    pub fn everything() -> Self {
        Self {
            lo: f64::NEG_INFINITY,
            hi: f64::INFINITY,
        }
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    pub fn contains(&self, age: f64) -> bool {
        self.lo <= age && age <= self.hi
    }
}

impl Default for AgeRange {
    fn default() -> Self {
        Self::everything()
    }
}

/// The user's current selections (the predicate set).
///
/// Each categorical set lists the values to keep; an empty set keeps nothing,
/// just like a multi-select with every option cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterState {
    pub sexes: BTreeSet<Sex>,
    pub classes: BTreeSet<TravelClass>,
    pub ports: BTreeSet<Port>,
    pub age: AgeRange,
}

impl FilterState {
    /// The identity filter: every observed value, the full observed age range.
    /// Applying it returns the whole dataset.
    pub fn identity(dataset: &Dataset) -> Self {
        let domain = dataset.domain();
        let age = match domain.age_bounds() {
            Some((lo, hi)) => AgeRange { lo, hi },
            None => AgeRange::everything(),
        };
        Self {
            sexes: domain.sexes.iter().copied().collect(),
            classes: domain.classes.iter().copied().collect(),
            ports: domain.ports.iter().copied().collect(),
            age,
        }
    }

    /// Every possible value of every field, any age. Matches any record.
    pub fn all() -> Self {
        Self {
            sexes: Sex::all().iter().copied().collect(),
            classes: TravelClass::all().iter().copied().collect(),
            ports: Port::all().iter().copied().collect(),
            age: AgeRange::everything(),
        }
    }

    pub fn with_sexes(mut self, sexes: impl IntoIterator<Item = Sex>) -> Self {
        self.sexes = sexes.into_iter().collect();
        self
    }

    pub fn with_classes(mut self, classes: impl IntoIterator<Item = TravelClass>) -> Self {
        self.classes = classes.into_iter().collect();
        self
    }

    pub fn with_ports(mut self, ports: impl IntoIterator<Item = Port>) -> Self {
        self.ports = ports.into_iter().collect();
        self
    }

    pub fn with_age(mut self, age: AgeRange) -> Self {
        self.age = age;
        self
    }

    /// Check if a single passenger satisfies all four predicates.
    pub fn matches(&self, p: &Passenger) -> bool {
        self.sexes.contains(&p.sex)
            && self.classes.contains(&p.class)
            && self.ports.contains(&p.embarked)
            && self.age.contains(p.age)
    }
}

/// The subset of a dataset that satisfies a [`FilterState`].
///
/// Holds indices into the borrowed dataset, so it is cheap to build and can
/// never contain a row the dataset does not have.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Positions of the matching rows in `dataset().records()`, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Passenger> + '_ {
        let records = self.dataset.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    /// The `{sex, age, class, embarked, survived}` projection of every row.
    pub fn rows(&self) -> Vec<PassengerRow> {
        self.iter().map(Passenger::to_row).collect()
    }
}

/// Apply a filter to the dataset. Never fails; an empty view is valid.
pub fn apply_filters<'a>(dataset: &'a Dataset, filter: &FilterState) -> FilteredView<'a> {
    let indices: Vec<usize> = dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, p)| filter.matches(p))
        .map(|(idx, _)| idx)
        .collect();

    tracing::debug!(
        total = dataset.len(),
        matched = indices.len(),
        "Filters applied"
    );

    FilteredView { dataset, indices }
}
