// PaxView - core/loader.rs
//
// CSV decoding of the raw passenger manifest.
// Core layer: reads from any Read trait object; opening files is the
// platform layer's job.
//
// Malformed rows are skipped and described in a warning list rather than
// aborting the load. Only an unreadable header, a missing required column or
// an I/O failure is fatal.

use crate::core::model::{Port, RawPassenger, Sex, TravelClass};
use crate::util::constants::{MAX_LOAD_WARNINGS, MISSING_MARKERS};
use crate::util::error::LoadError;
use std::io::Read;
use std::path::Path;

/// Raw records decoded from a source, plus the rows that were rejected.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub records: Vec<RawPassenger>,
    /// Number of data rows that could not be decoded.
    pub skipped_rows: usize,
    /// Descriptions of skipped rows (capped at `MAX_LOAD_WARNINGS`).
    pub warnings: Vec<String>,
}

/// Header positions of the fields the engine needs.
#[derive(Debug, Clone, Copy)]
struct Columns {
    survived: usize,
    sex: usize,
    /// `class` (names) if present, otherwise `pclass` (numbers).
    class: usize,
    age: Option<usize>,
    embarked: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord, source: &Path) -> Result<Self, LoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let missing = |column: &'static str| LoadError::MissingColumn {
            path: source.to_path_buf(),
            column,
        };

        Ok(Self {
            survived: find("survived").ok_or_else(|| missing("survived"))?,
            sex: find("sex").ok_or_else(|| missing("sex"))?,
            class: find("class")
                .or_else(|| find("pclass"))
                .ok_or_else(|| missing("class"))?,
            age: find("age"),
            embarked: find("embarked").or_else(|| find("embark_town")),
        })
    }
}

/// Decode a passenger manifest from CSV.
///
/// `source` is used only for error messages.
pub fn load_csv<R: Read>(reader: R, source: &Path) -> Result<LoadOutcome, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| LoadError::Header {
            path: source.to_path_buf(),
            source: e,
        })?
        .clone();

    // A zero-byte source is an empty dataset, not a schema error.
    if headers.is_empty() {
        tracing::warn!(path = %source.display(), "Dataset source is empty");
        return Ok(LoadOutcome::default());
    }
    let columns = Columns::resolve(&headers, source)?;

    tracing::debug!(
        path = %source.display(),
        columns = headers.len(),
        has_age = columns.age.is_some(),
        has_embarked = columns.embarked.is_some(),
        "CSV header resolved"
    );

    let mut outcome = LoadOutcome::default();

    for (row, result) in csv_reader.records().enumerate() {
        let decoded = match result {
            Ok(record) => decode_row(&record, &columns, row),
            Err(e) if e.is_io_error() => {
                return Err(LoadError::Csv {
                    path: source.to_path_buf(),
                    source: e,
                })
            }
            Err(e) => Err(e.to_string()),
        };

        match decoded {
            Ok(passenger) => outcome.records.push(passenger),
            Err(reason) => {
                outcome.skipped_rows += 1;
                if outcome.warnings.len() < MAX_LOAD_WARNINGS {
                    outcome.warnings.push(format!("row {row}: {reason}"));
                }
                tracing::debug!(row, reason = %reason, "Skipping malformed row");
            }
        }
    }

    if outcome.skipped_rows > 0 {
        tracing::warn!(
            path = %source.display(),
            skipped = outcome.skipped_rows,
            "Some rows could not be decoded and were skipped"
        );
    }
    tracing::info!(
        path = %source.display(),
        rows = outcome.records.len(),
        "Dataset decoded"
    );

    Ok(outcome)
}

/// A cell is missing when absent, empty, or one of the `MISSING_MARKERS`.
fn cell<'r>(record: &'r csv::StringRecord, idx: usize) -> Option<&'r str> {
    record.get(idx).filter(|v| {
        !v.is_empty()
            && !MISSING_MARKERS
                .iter()
                .any(|m| v.eq_ignore_ascii_case(m))
    })
}

fn required<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    name: &str,
) -> Result<&'r str, String> {
    cell(record, idx).ok_or_else(|| format!("missing {name}"))
}

fn decode_row(
    record: &csv::StringRecord,
    columns: &Columns,
    row: usize,
) -> Result<RawPassenger, String> {
    let survived = parse_flag(required(record, columns.survived, "survived")?)?;
    let sex = required(record, columns.sex, "sex")?
        .parse::<Sex>()
        .map_err(|e| e.to_string())?;
    let class = required(record, columns.class, "class")?
        .parse::<TravelClass>()
        .map_err(|e| e.to_string())?;

    let embarked = columns
        .embarked
        .and_then(|idx| cell(record, idx))
        .map(|v| v.parse::<Port>().map_err(|e| e.to_string()))
        .transpose()?;

    let age = columns
        .age
        .and_then(|idx| cell(record, idx))
        .map(parse_age)
        .transpose()?;

    Ok(RawPassenger {
        row,
        sex,
        class,
        embarked,
        age,
        survived,
    })
}

fn parse_flag(v: &str) -> Result<bool, String> {
    match v.to_lowercase().as_str() {
        "1" | "1.0" | "true" | "yes" => Ok(true),
        "0" | "0.0" | "false" | "no" => Ok(false),
        other => Err(format!("'{other}' is not a valid survived flag")),
    }
}

fn parse_age(v: &str) -> Result<f64, String> {
    let age: f64 = v
        .parse()
        .map_err(|_| format!("'{v}' is not a valid age"))?;
    if !age.is_finite() || age < 0.0 {
        return Err(format!("age {age} is out of range"));
    }
    Ok(age)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn load(text: &str) -> Result<LoadOutcome, LoadError> {
        load_csv(text.as_bytes(), &PathBuf::from("test.csv"))
    }

    #[test]
    fn test_decodes_seaborn_layout() {
        let text = "survived,pclass,sex,age,sibsp,parch,fare,embarked,class,who\n\
                    0,3,male,22.0,1,0,7.25,S,Third,man\n\
                    1,1,female,38.0,1,0,71.2833,C,First,woman\n\
                    1,3,female,,0,0,7.925,S,Third,woman\n\
                    1,1,female,62.0,0,0,80.0,,First,woman\n";
        let outcome = load(text).unwrap();
        assert_eq!(outcome.records.len(), 4);
        assert_eq!(outcome.skipped_rows, 0);

        let r = &outcome.records[1];
        assert_eq!(r.sex, Sex::Female);
        assert_eq!(r.class, TravelClass::First);
        assert_eq!(r.embarked, Some(Port::Cherbourg));
        assert_eq!(r.age, Some(38.0));
        assert!(r.survived);

        assert_eq!(outcome.records[2].age, None);
        assert_eq!(outcome.records[3].embarked, None);
        assert_eq!(outcome.records[3].row, 3);
    }

    #[test]
    fn test_pclass_used_when_class_absent() {
        let text = "Survived,Pclass,Sex,Age,Embarked\n1,2,female,29,S\n";
        let outcome = load(text).unwrap();
        assert_eq!(outcome.records[0].class, TravelClass::Second);
    }

    #[test]
    fn test_missing_markers_treated_as_absent() {
        let text = "survived,class,sex,age,embarked\n0,Third,male,NaN,NA\n";
        let outcome = load(text).unwrap();
        assert_eq!(outcome.records[0].age, None);
        assert_eq!(outcome.records[0].embarked, None);
    }

    #[test]
    fn test_optional_columns_may_be_absent() {
        let text = "survived,class,sex\n1,First,female\n";
        let outcome = load(text).unwrap();
        assert_eq!(outcome.records[0].age, None);
        assert_eq!(outcome.records[0].embarked, None);
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let err = load("survived,class,age\n1,First,20\n").unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { column: "sex", .. }));
    }

    #[test]
    fn test_malformed_rows_skipped_with_warning() {
        let text = "survived,class,sex,age,embarked\n\
                    maybe,First,female,20,S\n\
                    1,Fourth,female,20,S\n\
                    1,First,female,-3,S\n\
                    0,Second,male,40,Q\n";
        let outcome = load(text).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.skipped_rows, 3);
        assert_eq!(outcome.warnings.len(), 3);
        assert!(outcome.warnings[0].starts_with("row 0:"));
        assert_eq!(outcome.records[0].row, 3);
    }

    #[test]
    fn test_zero_byte_source_is_empty_dataset() {
        let outcome = load("").unwrap();
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.skipped_rows, 0);
    }

    #[test]
    fn test_empty_source_has_no_rows() {
        let outcome = load("survived,class,sex,age,embarked\n").unwrap();
        assert!(outcome.records.is_empty());
    }
}
