//! Reading and writing the JSON documents the importer keeps between runs.
//!
//! Every document is a JSON object. Writes go to a sibling `.tmp` file that is
//! renamed over the target, so an interrupted run never leaves half a file.

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("not a mapping in {path}")]
    NotAMapping { path: PathBuf },

    #[error("unsupported format version {version} in {path}")]
    UnsupportedVersion { path: PathBuf, version: u64 },
}

impl PersistError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Plain,
    Gzip,
}

/// Read the document at `path`. `Ok(None)` when the file does not exist.
///
/// The top-level value must be an object carrying `"version": expected`.
pub fn read_document<T: DeserializeOwned>(
    path: &Path,
    encoding: Encoding,
    expected: u64,
) -> Result<Option<T>, PersistError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(PersistError::io(path, e)),
    };

    let mut raw = Vec::new();
    match encoding {
        Encoding::Plain => BufReader::new(file).read_to_end(&mut raw),
        Encoding::Gzip => GzDecoder::new(BufReader::new(file)).read_to_end(&mut raw),
    }
    .map_err(|e| PersistError::io(path, e))?;

    let value: Value = serde_json::from_slice(&raw).map_err(|e| PersistError::json(path, e))?;
    let Some(object) = value.as_object() else {
        return Err(PersistError::NotAMapping {
            path: path.to_path_buf(),
        });
    };

    let version = object.get("version").and_then(Value::as_u64).unwrap_or(0);
    if version != expected {
        return Err(PersistError::UnsupportedVersion {
            path: path.to_path_buf(),
            version,
        });
    }

    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| PersistError::json(path, e))
}

/// Serialize `value` to `path`, creating parent directories as needed.
pub fn write_document<T: Serialize>(
    path: &Path,
    encoding: Encoding,
    value: &T,
) -> Result<(), PersistError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| PersistError::io(dir, e))?;
    }

    let tmp = tmp_path(path);
    let file = File::create(&tmp).map_err(|e| PersistError::io(&tmp, e))?;
    let mut writer = BufWriter::new(file);

    match encoding {
        Encoding::Plain => {
            serde_json::to_writer_pretty(&mut writer, value)
                .map_err(|e| PersistError::json(path, e))?;
            writer.write_all(b"\n").map_err(|e| PersistError::io(&tmp, e))?;
        }
        Encoding::Gzip => {
            let mut encoder = GzEncoder::new(&mut writer, Compression::default());
            serde_json::to_writer(&mut encoder, value).map_err(|e| PersistError::json(path, e))?;
            encoder.finish().map_err(|e| PersistError::io(&tmp, e))?;
        }
    }

    writer.flush().map_err(|e| PersistError::io(&tmp, e))?;
    drop(writer);

    fs::rename(&tmp, path).map_err(|e| PersistError::io(path, e))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        version: u64,
        entries: BTreeMap<String, u64>,
    }

    fn doc() -> Doc {
        Doc {
            version: 1,
            entries: BTreeMap::from([("b".to_string(), 2), ("a".to_string(), 1)]),
        }
    }

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempdir().unwrap();

        let read: Option<Doc> =
            read_document(&dir.path().join("nope.json"), Encoding::Plain, 1).unwrap();

        assert!(read.is_none());
    }

    #[test]
    fn plain_and_gzip_documents_read_back() {
        // Arrange
        let dir = tempdir().unwrap();
        let plain = dir.path().join("nested/doc.json");
        let gzip = dir.path().join("doc.json.gz");

        // Act
        write_document(&plain, Encoding::Plain, &doc()).unwrap();
        write_document(&gzip, Encoding::Gzip, &doc()).unwrap();

        // Assert
        let a: Option<Doc> = read_document(&plain, Encoding::Plain, 1).unwrap();
        let b: Option<Doc> = read_document(&gzip, Encoding::Gzip, 1).unwrap();
        assert_eq!(a, Some(doc()));
        assert_eq!(b, Some(doc()));
        assert!(!dir.path().join("nested/doc.json.tmp").exists());
    }

    #[test]
    fn writes_are_byte_for_byte_reproducible() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");

        write_document(&path, Encoding::Plain, &doc()).unwrap();
        let first = fs::read(&path).unwrap();
        let read: Doc = read_document(&path, Encoding::Plain, 1).unwrap().unwrap();
        write_document(&path, Encoding::Plain, &read).unwrap();

        assert_eq!(first, fs::read(&path).unwrap());
    }

    #[test]
    fn non_mapping_content_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let err = read_document::<Doc>(&path, Encoding::Plain, 1).unwrap_err();

        assert!(matches!(err, PersistError::NotAMapping { .. }));
    }

    #[test]
    fn other_versions_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, r#"{"version": 7, "entries": {}}"#).unwrap();

        let err = read_document::<Doc>(&path, Encoding::Plain, 1).unwrap_err();

        assert!(matches!(
            err,
            PersistError::UnsupportedVersion { version: 7, .. }
        ));
    }

    #[test]
    fn garbage_is_a_json_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, "<?php return array();").unwrap();

        let err = read_document::<Doc>(&path, Encoding::Plain, 1).unwrap_err();

        assert!(matches!(err, PersistError::Json { .. }));
    }
}
