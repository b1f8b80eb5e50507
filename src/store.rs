//! Persistence of the fitted model.
//!
//! A bundle file is laid out as
//!
//! | bytes | content |
//! |---|---|
//! | `0..4` | magic `b"PSMB"` |
//! | `4..6` | format version, `u16` little-endian |
//! | `6..` | CBOR map `{ model, matrix, doc_count }` |
//!
//! `model` is `{ vocabulary: [term], idf: [f32] }` with columns in vocabulary
//! order, `matrix` is `{ n_cols, rows: [{ len, ind: [u32], val: [f32] }] }`.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{EngineError, Result};
use crate::vectorizer::{DocumentTermMatrix, TermWeightingModel};

pub const BUNDLE_MAGIC: [u8; 4] = *b"PSMB";
pub const BUNDLE_VERSION: u16 = 1;
const HEADER_LEN: usize = 6;

/// The unit of persistence: model, matrix and document count together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    pub model: TermWeightingModel,
    pub matrix: DocumentTermMatrix,
    pub doc_count: u64,
}

impl ModelBundle {
    pub fn new(model: TermWeightingModel, matrix: DocumentTermMatrix) -> Self {
        let doc_count = matrix.n_rows() as u64;
        ModelBundle { model, matrix, doc_count }
    }

    /// Check that the matrix still belongs to the model.
    pub fn validate(&self) -> Result<()> {
        self.model.check().map_err(EngineError::InvalidBundle)?;
        self.matrix.check().map_err(EngineError::InvalidBundle)?;
        if self.matrix.n_rows() as u64 != self.doc_count {
            return Err(EngineError::InvalidBundle(format!(
                "doc_count {} does not match {} matrix rows",
                self.doc_count,
                self.matrix.n_rows()
            )));
        }
        if self.matrix.n_cols() != self.model.vocab_size() {
            return Err(EngineError::InvalidBundle(format!(
                "matrix has {} columns but vocabulary has {} terms",
                self.matrix.n_cols(),
                self.model.vocab_size()
            )));
        }
        Ok(())
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        self.validate()?;
        let mut buf = Vec::with_capacity(HEADER_LEN + 1024);
        buf.extend_from_slice(&BUNDLE_MAGIC);
        buf.extend_from_slice(&BUNDLE_VERSION.to_le_bytes());
        serde_cbor::to_writer(&mut buf, self)?;
        Ok(buf)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN || bytes[..4] != BUNDLE_MAGIC {
            return Err(EngineError::InvalidBundle("missing bundle header".to_string()));
        }
        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != BUNDLE_VERSION {
            return Err(EngineError::InvalidBundle(format!(
                "unsupported bundle version {version}"
            )));
        }
        let bundle: ModelBundle = serde_cbor::from_slice(&bytes[HEADER_LEN..])?;
        bundle.validate()?;
        Ok(bundle)
    }
}

/// Where the bundle lives.
///
/// `load` reports a missing bundle as [`EngineError::NotFound`].
pub trait ModelStore: Send + Sync {
    fn save(&self, bundle: &ModelBundle) -> Result<()>;
    fn load(&self) -> Result<ModelBundle>;
    fn exists(&self) -> bool;
}

/// Single-file store. Saves go through a temp file in the same directory
/// and are renamed over the target.
#[derive(Debug, Clone)]
pub struct FileModelStore {
    path: PathBuf,
}

impl FileModelStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        FileModelStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Fill a temp file next to the target, fsync it and rename it over the
    /// target. On any error the temp file is removed and the target is untouched.
    fn replace_with<F>(&self, fill: F) -> io::Result<()>
    where
        F: FnOnce(&mut File) -> io::Result<()>,
    {
        let dir = self.parent_dir();
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        fill(tmp.as_file_mut())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl ModelStore for FileModelStore {
    fn save(&self, bundle: &ModelBundle) -> Result<()> {
        let bytes = bundle.encode()?;
        self.replace_with(|file| file.write_all(&bytes))?;

        info!(path = %self.path.display(), bytes = bytes.len(), doc_count = bundle.doc_count, "model bundle saved");
        Ok(())
    }

    fn load(&self) -> Result<ModelBundle> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(EngineError::NotFound(self.path.clone()))
            }
            Err(e) => return Err(e.into()),
        };
        ModelBundle::decode(&bytes)
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use serde_cbor::Value;

    use super::*;

    /// Encoded bundle with every matrix weight replaced by NaN.
    pub(crate) fn nan_poisoned_bytes(bundle: &ModelBundle) -> Vec<u8> {
        let mut value = serde_cbor::value::to_value(bundle).unwrap();
        let rows = field(field(&mut value, "matrix"), "rows");
        if let Value::Array(rows) = rows {
            for row in rows {
                if let Value::Array(vals) = field(row, "val") {
                    for v in vals.iter_mut() {
                        *v = Value::Float(f64::NAN);
                    }
                }
            }
        }
        let mut bytes = BUNDLE_MAGIC.to_vec();
        bytes.extend_from_slice(&BUNDLE_VERSION.to_le_bytes());
        bytes.extend(serde_cbor::to_vec(&value).unwrap());
        bytes
    }

    fn field<'a>(value: &'a mut Value, name: &str) -> &'a mut Value {
        match value {
            Value::Map(map) => map.get_mut(&Value::Text(name.to_string())).unwrap(),
            other => panic!("expected a map, got {other:?}"),
        }
    }
}
