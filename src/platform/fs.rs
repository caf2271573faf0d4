// PaxView - platform/fs.rs
//
// Filesystem access for dataset input and export output.
// Core modules only see Read/Write trait objects handed out from here.

use crate::util::constants::MAX_DATASET_FILE_SIZE;
use crate::util::error::{ExportError, LoadError};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

/// Open a dataset file for reading after checking it exists and is not
/// unreasonably large.
pub fn open_dataset(path: &Path) -> Result<BufReader<File>, LoadError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            LoadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    if metadata.len() > MAX_DATASET_FILE_SIZE {
        return Err(LoadError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: MAX_DATASET_FILE_SIZE,
        });
    }

    let file = File::open(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), bytes = metadata.len(), "Dataset file opened");
    Ok(BufReader::new(file))
}

/// Create (or truncate) an export target.
pub fn create_export_file(path: &Path) -> Result<BufWriter<File>, ExportError> {
    let file = File::create(path).map_err(|e| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_open_missing_dataset_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_dataset(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn test_open_existing_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "survived,class,sex\n").unwrap();

        let mut text = String::new();
        open_dataset(&path).unwrap().read_to_string(&mut text).unwrap();
        assert!(text.starts_with("survived"));
    }

    #[test]
    fn test_create_export_in_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = create_export_file(&dir.path().join("no/such/dir/out.csv")).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
