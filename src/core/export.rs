// PaxView - core/export.rs
//
// CSV and JSON export of the filtered row projection.
// Core layer: writes to any Write trait object.

use crate::core::model::PassengerRow;
use crate::util::constants::MAX_EXPORT_ENTRIES;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

fn check_size(rows: &[PassengerRow]) -> Result<(), ExportError> {
    if rows.len() > MAX_EXPORT_ENTRIES {
        return Err(ExportError::TooManyEntries {
            count: rows.len(),
            max: MAX_EXPORT_ENTRIES,
        });
    }
    Ok(())
}

/// Export rows to CSV format.
///
/// Writes: sex, age, class, embarked, survived (`0`/`1`)
pub fn export_csv<W: Write>(
    rows: &[PassengerRow],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    check_size(rows)?;
    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(["sex", "age", "class", "embarked", "survived"])
        .map_err(csv_err)?;

    let mut count = 0;
    for row in rows {
        let age = row.age.to_string();
        csv_writer
            .write_record([
                row.sex.label(),
                age.as_str(),
                row.class.label(),
                row.embarked.code(),
                if row.survived { "1" } else { "0" },
            ])
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Export rows to JSON format (array of objects).
pub fn export_json<W: Write>(
    rows: &[PassengerRow],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    check_size(rows)?;
    serde_json::to_writer_pretty(writer, rows).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Port, Sex, TravelClass};
    use std::path::PathBuf;

    fn make_row(sex: Sex, age: f64, survived: bool) -> PassengerRow {
        PassengerRow {
            sex,
            age,
            class: TravelClass::Third,
            embarked: Port::Queenstown,
            survived,
        }
    }

    #[test]
    fn test_csv_export() {
        let rows = vec![
            make_row(Sex::Female, 27.0, true),
            make_row(Sex::Male, 0.42, false),
        ];
        let mut buf = Vec::new();
        let count = export_csv(&rows, &mut buf, &PathBuf::from("out.csv")).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "sex,age,class,embarked,survived");
        assert_eq!(lines[1], "female,27,Third,Q,1");
        assert_eq!(lines[2], "male,0.42,Third,Q,0");
    }

    #[test]
    fn test_json_export() {
        let rows = vec![make_row(Sex::Female, 27.5, true)];
        let mut buf = Vec::new();
        let count = export_json(&rows, &mut buf, &PathBuf::from("out.json")).unwrap();
        assert_eq!(count, 1);

        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed[0]["sex"], "female");
        assert_eq!(parsed[0]["age"], 27.5);
        assert_eq!(parsed[0]["embarked"], "Q");
        assert_eq!(parsed[0]["survived"], true);
    }

    #[test]
    fn test_empty_export_writes_header_only() {
        let mut buf = Vec::new();
        let count = export_csv(&[], &mut buf, &PathBuf::from("out.csv")).unwrap();
        assert_eq!(count, 0);
        assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 1);
    }
}
