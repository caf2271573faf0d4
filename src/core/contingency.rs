// PaxView - core/contingency.rs
//
// Grouped survival counts (group value x survived) for each chart.
// Core layer: pure logic, no I/O.
//
// Groups come from the dataset's observed domain rather than the view, so a
// category with no rows in the view still appears with zero counts.

use crate::core::filter::FilteredView;
use crate::core::model::{ObservedDomain, Passenger, Port, Sex, TravelClass};
use serde::Serialize;
use std::collections::BTreeMap;

/// Field a contingency table is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupField {
    Sex,
    Class,
    Age,
    Embarked,
}

impl GroupField {
    pub fn all() -> &'static [GroupField] {
        &[
            GroupField::Sex,
            GroupField::Class,
            GroupField::Age,
            GroupField::Embarked,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            GroupField::Sex => "sex",
            GroupField::Class => "class",
            GroupField::Age => "age",
            GroupField::Embarked => "embarked",
        }
    }
}

/// One group value. Age groups are identified by bucket index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    Sex(Sex),
    Class(TravelClass),
    Port(Port),
    AgeBucket(usize),
}

// =============================================================================
// Age bucketing
// =============================================================================

/// Equal-width age buckets spanning the dataset's observed age range.
///
/// Bucket `i` covers `[lo + i*width, lo + (i+1)*width)`; the last bucket is
/// closed on the right so the maximum age lands in it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgeBinning {
    lo: f64,
    width: f64,
    bins: usize,
}

impl AgeBinning {
    /// Buckets over the domain's age range. An empty domain or a range of a
    /// single age collapses to one bucket. `bins` of zero is treated as one.
    pub fn over(domain: &ObservedDomain, bins: usize) -> Self {
        match domain.age_bounds() {
            Some((lo, hi)) if hi > lo => Self {
                lo,
                width: (hi - lo) / bins.max(1) as f64,
                bins: bins.max(1),
            },
            Some((lo, _)) => Self {
                lo,
                width: 0.0,
                bins: 1,
            },
            None => Self {
                lo: 0.0,
                width: 0.0,
                bins: 1,
            },
        }
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Index of the bucket holding `age`, clamped into range.
    pub fn bucket_of(&self, age: f64) -> usize {
        if self.width <= 0.0 {
            return 0;
        }
        let idx = ((age - self.lo) / self.width).floor().max(0.0) as usize;
        idx.min(self.bins - 1)
    }

    /// `(lower, upper)` edges of bucket `idx`.
    pub fn bounds(&self, idx: usize) -> (f64, f64) {
        let lo = self.lo + idx as f64 * self.width;
        (lo, lo + self.width)
    }
}

// =============================================================================
// Tables
// =============================================================================

/// Survival split for one group value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContingencyRow {
    pub key: GroupKey,
    /// Display label (`female`, `First`, `C`, `20.0-22.7`).
    pub label: String,
    pub survived: usize,
    pub perished: usize,
}

impl ContingencyRow {
    pub fn total(&self) -> usize {
        self.survived + self.perished
    }
}

/// Counts cross-tabulated by a grouping field and the survival outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContingencyTable {
    pub field: GroupField,
    /// One row per group value in display order.
    pub rows: Vec<ContingencyRow>,
}

impl ContingencyTable {
    /// Count for `(key, survived)`; any key not in the table counts as zero.
    pub fn count(&self, key: GroupKey, survived: bool) -> usize {
        self.rows
            .iter()
            .find(|r| r.key == key)
            .map_or(0, |r| if survived { r.survived } else { r.perished })
    }

    /// Sum of every cell; equals the number of rows in the view.
    pub fn total(&self) -> usize {
        self.rows.iter().map(ContingencyRow::total).sum()
    }

    /// The table as a `(group, survived) -> count` map, zero cells included.
    pub fn to_map(&self) -> BTreeMap<(GroupKey, bool), usize> {
        self.rows
            .iter()
            .flat_map(|r| [((r.key, true), r.survived), ((r.key, false), r.perished)])
            .collect()
    }
}

/// Build the contingency table for one grouping field.
pub fn contingency(
    view: &FilteredView<'_>,
    field: GroupField,
    binning: &AgeBinning,
) -> ContingencyTable {
    let domain = view.dataset().domain();

    let groups: Vec<(GroupKey, String)> = match field {
        GroupField::Sex => domain
            .sexes
            .iter()
            .map(|s| (GroupKey::Sex(*s), s.label().to_string()))
            .collect(),
        GroupField::Class => {
            let mut classes = domain.classes.clone();
            classes.sort();
            classes
                .into_iter()
                .map(|c| (GroupKey::Class(c), c.label().to_string()))
                .collect()
        }
        GroupField::Embarked => domain
            .ports
            .iter()
            .map(|p| (GroupKey::Port(*p), p.code().to_string()))
            .collect(),
        GroupField::Age => (0..binning.bins())
            .map(|i| {
                let (lo, hi) = binning.bounds(i);
                (GroupKey::AgeBucket(i), format!("{lo:.1}-{hi:.1}"))
            })
            .collect(),
    };

    let mut counts: BTreeMap<GroupKey, (usize, usize)> = BTreeMap::new();
    for p in view.iter() {
        let cell = counts.entry(key_of(p, field, binning)).or_default();
        if p.survived {
            cell.0 += 1;
        } else {
            cell.1 += 1;
        }
    }

    let rows = groups
        .into_iter()
        .map(|(key, label)| {
            let (survived, perished) = counts.get(&key).copied().unwrap_or_default();
            ContingencyRow {
                key,
                label,
                survived,
                perished,
            }
        })
        .collect();

    ContingencyTable { field, rows }
}

fn key_of(p: &Passenger, field: GroupField, binning: &AgeBinning) -> GroupKey {
    match field {
        GroupField::Sex => GroupKey::Sex(p.sex),
        GroupField::Class => GroupKey::Class(p.class),
        GroupField::Embarked => GroupKey::Port(p.embarked),
        GroupField::Age => GroupKey::AgeBucket(binning.bucket_of(p.age)),
    }
}

/// The four chart tables for one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartTables {
    pub by_sex: ContingencyTable,
    pub by_class: ContingencyTable,
    pub by_age: ContingencyTable,
    pub by_embarked: ContingencyTable,
}

impl ChartTables {
    pub fn compute(view: &FilteredView<'_>, age_bins: usize) -> Self {
        let binning = AgeBinning::over(view.dataset().domain(), age_bins);
        Self {
            by_sex: contingency(view, GroupField::Sex, &binning),
            by_class: contingency(view, GroupField::Class, &binning),
            by_age: contingency(view, GroupField::Age, &binning),
            by_embarked: contingency(view, GroupField::Embarked, &binning),
        }
    }

    /// Tables in chart order (sex, class, age, embarked).
    pub fn iter(&self) -> impl Iterator<Item = &ContingencyTable> {
        [&self.by_sex, &self.by_class, &self.by_age, &self.by_embarked].into_iter()
    }
}
