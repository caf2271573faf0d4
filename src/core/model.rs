// PaxView - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::error::FilterError;
use serde::Serialize;
use std::str::FromStr;

// =============================================================================
// Categorical fields
// =============================================================================

/// Passenger sex as recorded in the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Returns all variants in display order.
    pub fn all() -> &'static [Sex] {
        &[Sex::Male, Sex::Female]
    }

    /// Label as it appears in the source data.
    pub fn label(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl FromStr for Sex {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            _ => Err(FilterError::UnknownValue {
                field: "sex",
                value: s.to_string(),
            }),
        }
    }
}

/// Ordinal travel class. Ordering follows the class number (First < Third).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TravelClass {
    First,
    Second,
    Third,
}

impl TravelClass {
    /// Returns all variants in ordinal order.
    pub fn all() -> &'static [TravelClass] {
        &[TravelClass::First, TravelClass::Second, TravelClass::Third]
    }

    pub fn label(&self) -> &'static str {
        match self {
            TravelClass::First => "First",
            TravelClass::Second => "Second",
            TravelClass::Third => "Third",
        }
    }

    /// Numeric class as used by `pclass`-style columns.
    pub fn number(&self) -> u8 {
        match self {
            TravelClass::First => 1,
            TravelClass::Second => 2,
            TravelClass::Third => 3,
        }
    }
}

impl FromStr for TravelClass {
    type Err = FilterError;

    /// Accepts the class name (`First`) or number (`1`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TravelClass::all()
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(wanted) || c.number().to_string() == wanted)
            .ok_or_else(|| FilterError::UnknownValue {
                field: "class",
                value: s.to_string(),
            })
    }
}

/// Port of embarkation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Port {
    #[serde(rename = "C")]
    Cherbourg,
    #[serde(rename = "Q")]
    Queenstown,
    #[serde(rename = "S")]
    Southampton,
}

impl Port {
    pub fn all() -> &'static [Port] {
        &[Port::Cherbourg, Port::Queenstown, Port::Southampton]
    }

    /// Single-letter port code (`C`, `Q`, `S`).
    pub fn code(&self) -> &'static str {
        match self {
            Port::Cherbourg => "C",
            Port::Queenstown => "Q",
            Port::Southampton => "S",
        }
    }

    /// Full town name.
    pub fn town(&self) -> &'static str {
        match self {
            Port::Cherbourg => "Cherbourg",
            Port::Queenstown => "Queenstown",
            Port::Southampton => "Southampton",
        }
    }
}

impl FromStr for Port {
    type Err = FilterError;

    /// Accepts the port code or the town name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Port::all()
            .iter()
            .copied()
            .find(|p| {
                p.code().eq_ignore_ascii_case(wanted) || p.town().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| FilterError::UnknownValue {
                field: "port",
                value: s.to_string(),
            })
    }
}

macro_rules! display_via {
    ($ty:ty, $method:ident) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.$method())
            }
        }
    };
}

display_via!(Sex, label);
display_via!(TravelClass, label);
display_via!(Port, code);

// =============================================================================
// Passenger records
// =============================================================================

/// A passenger as decoded from the source, before normalization.
/// `embarked` and `age` may be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPassenger {
    /// Zero-based row number in the source file (data rows only).
    pub row: usize,
    pub sex: Sex,
    pub class: TravelClass,
    pub embarked: Option<Port>,
    pub age: Option<f64>,
    pub survived: bool,
}

/// A normalized passenger: every field is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Passenger {
    /// Zero-based row number in the source file, kept for provenance.
    pub row: usize,
    pub sex: Sex,
    pub class: TravelClass,
    pub embarked: Port,
    pub age: f64,
    pub survived: bool,
}

impl Passenger {
    /// Projection used by the tabular display and by exports.
    pub fn to_row(&self) -> PassengerRow {
        PassengerRow {
            sex: self.sex,
            age: self.age,
            class: self.class,
            embarked: self.embarked,
            survived: self.survived,
        }
    }
}

impl From<&Passenger> for RawPassenger {
    fn from(p: &Passenger) -> Self {
        RawPassenger {
            row: p.row,
            sex: p.sex,
            class: p.class,
            embarked: Some(p.embarked),
            age: Some(p.age),
            survived: p.survived,
        }
    }
}

/// The `{sex, age, class, embarked, survived}` projection of a passenger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PassengerRow {
    pub sex: Sex,
    pub age: f64,
    pub class: TravelClass,
    pub embarked: Port,
    pub survived: bool,
}

// =============================================================================
// Dataset
// =============================================================================

/// Values actually present in a dataset. These are the default choices for
/// each filter and the axis categories of each contingency table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObservedDomain {
    /// Distinct sexes in first-appearance order.
    pub sexes: Vec<Sex>,
    /// Distinct classes in first-appearance order.
    pub classes: Vec<TravelClass>,
    /// Distinct ports in first-appearance order.
    pub ports: Vec<Port>,
    /// Smallest age, `None` for an empty dataset.
    pub age_min: Option<f64>,
    /// Largest age, `None` for an empty dataset.
    pub age_max: Option<f64>,
}

impl ObservedDomain {
    fn scan(records: &[Passenger]) -> Self {
        let mut domain = ObservedDomain::default();
        for p in records {
            push_unique(&mut domain.sexes, p.sex);
            push_unique(&mut domain.classes, p.class);
            push_unique(&mut domain.ports, p.embarked);
            domain.age_min = Some(domain.age_min.map_or(p.age, |m| m.min(p.age)));
            domain.age_max = Some(domain.age_max.map_or(p.age, |m| m.max(p.age)));
        }
        domain
    }

    /// Inclusive `(min, max)` age bounds, if any rows exist.
    pub fn age_bounds(&self) -> Option<(f64, f64)> {
        self.age_min.zip(self.age_max)
    }
}

fn push_unique<T: PartialEq>(values: &mut Vec<T>, v: T) {
    if !values.contains(&v) {
        values.push(v);
    }
}

/// The normalized, immutable passenger table.
///
/// Construct it once (usually through `normalize::normalize`) and share it
/// behind an `Arc`; every view borrows it and nothing mutates it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Passenger>,
    domain: ObservedDomain,
}

impl Dataset {
    /// Build a dataset from already-normalized records.
    pub fn from_records(records: Vec<Passenger>) -> Self {
        let domain = ObservedDomain::scan(&records);
        Self { records, domain }
    }

    pub fn records(&self) -> &[Passenger] {
        &self.records
    }

    pub fn domain(&self) -> &ObservedDomain {
        &self.domain
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Re-expose the records in raw form (every field present).
    pub fn to_raw(&self) -> Vec<RawPassenger> {
        self.records.iter().map(RawPassenger::from).collect()
    }
}
