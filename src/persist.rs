//! Model archive: a deflate zip holding the input schema and the model.
//!
//! ```text
//! CreditCardFraudDetection.zip
//! ├── schema.json   InputSchema (feature columns + label column)
//! └── model.json    format version, transform, forest, metadata
//! ```

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::data::InputSchema;
use crate::model::{FraudModel, ModelMeta, FORMAT_VERSION};
use crate::repr::{Forest, TreeValidationError};
use crate::transform::ConcatenateFeatures;

pub const SCHEMA_ENTRY: &str = "schema.json";
pub const MODEL_ENTRY: &str = "model.json";

/// Upper bound on the uncompressed size of one archive entry.
const MAX_ENTRY_BYTES: u64 = 256 * 1024 * 1024;

/// Errors that can occur while saving or loading a model archive.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to create {path}: {source}")]
    Create { path: PathBuf, source: std::io::Error },

    #[error("failed to open {path}: {source}")]
    Open { path: PathBuf, source: std::io::Error },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip archive error: {0}")]
    Zip(String),

    #[error("invalid {entry}: {source}")]
    Json {
        entry: &'static str,
        source: serde_json::Error,
    },

    #[error("archive has no {0} entry")]
    MissingEntry(&'static str),

    #[error("{entry} is larger than {limit} bytes")]
    EntryTooLarge { entry: &'static str, limit: u64 },

    #[error("unsupported model format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("invalid model structure: {0}")]
    InvalidModel(#[from] TreeValidationError),
}

#[derive(Serialize)]
struct ModelDocumentRef<'a> {
    format_version: u32,
    transform: &'a ConcatenateFeatures,
    forest: &'a Forest,
    meta: &'a ModelMeta,
}

#[derive(Deserialize)]
struct ModelDocument {
    format_version: u32,
    transform: ConcatenateFeatures,
    forest: Forest,
    meta: ModelMeta,
}

/// Write `model` and its schema to a new archive at `path`.
///
/// Parent directories are not created. Only models over the full feature
/// schema can be saved, since [`load`] accepts nothing else.
pub fn save(model: &FraudModel, path: &Path) -> Result<(), PersistError> {
    let input_schema = model.schema();
    if !input_schema.is_canonical() {
        return Err(PersistError::SchemaMismatch(format!(
            "model consumes columns {:?}; only the full feature schema can be saved",
            input_schema.feature_columns
        )));
    }
    let schema = serde_json::to_vec_pretty(&input_schema).map_err(|source| PersistError::Json {
        entry: SCHEMA_ENTRY,
        source,
    })?;
    let document = ModelDocumentRef {
        format_version: FORMAT_VERSION,
        transform: model.transform(),
        forest: model.forest(),
        meta: model.meta(),
    };
    let body = serde_json::to_vec(&document).map_err(|source| PersistError::Json {
        entry: MODEL_ENTRY,
        source,
    })?;

    let file = File::create(path).map_err(|source| PersistError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, data) in [(SCHEMA_ENTRY, &schema), (MODEL_ENTRY, &body)] {
        zip.start_file(name, options)
            .map_err(|err| PersistError::Zip(err.to_string()))?;
        zip.write_all(data)?;
    }
    zip.finish().map_err(|err| PersistError::Zip(err.to_string()))?;

    info!(path = %path.display(), n_trees = model.forest().n_trees(), "model saved");
    Ok(())
}

/// Read a model archive written by [`save`].
///
/// Returns the model and the stored input schema. Fails when the archive's
/// schema or transform does not list exactly this crate's feature columns.
pub fn load(path: &Path) -> Result<(FraudModel, InputSchema), PersistError> {
    let file = File::open(path).map_err(|source| PersistError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut archive = zip::ZipArchive::new(file).map_err(|err| PersistError::Zip(err.to_string()))?;

    let schema: InputSchema = read_json(&mut archive, SCHEMA_ENTRY)?;
    let document: ModelDocument = read_json(&mut archive, MODEL_ENTRY)?;

    if document.format_version != FORMAT_VERSION {
        return Err(PersistError::UnsupportedVersion {
            found: document.format_version,
            expected: FORMAT_VERSION,
        });
    }
    if !schema.is_canonical() {
        return Err(PersistError::SchemaMismatch(format!(
            "archive schema lists columns {:?} with label {:?}",
            schema.feature_columns, schema.label_column
        )));
    }
    if document.transform.input_columns() != schema.feature_columns.as_slice() {
        return Err(PersistError::SchemaMismatch(
            "transform columns differ from the stored schema".into(),
        ));
    }

    let model = FraudModel::from_parts(document.transform, document.forest, document.meta)?;
    debug!(path = %path.display(), n_trees = model.forest().n_trees(), "model loaded");
    Ok((model, schema))
}

fn read_json<T: for<'de> Deserialize<'de>>(
    archive: &mut zip::ZipArchive<File>,
    entry: &'static str,
) -> Result<T, PersistError> {
    let file = match archive.by_name(entry) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Err(PersistError::MissingEntry(entry)),
        Err(err) => return Err(PersistError::Zip(err.to_string())),
    };
    if file.size() > MAX_ENTRY_BYTES {
        return Err(PersistError::EntryTooLarge {
            entry,
            limit: MAX_ENTRY_BYTES,
        });
    }
    let mut bytes = Vec::with_capacity(file.size() as usize);
    file.take(MAX_ENTRY_BYTES).read_to_end(&mut bytes)?;
    serde_json::from_slice(&bytes).map_err(|source| PersistError::Json { entry, source })
}
