//! Reading a resolved schema description from JSON.

use crate::{node::Schema, validate::validate_schema};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

///
/// LoadError
///

#[derive(Debug, ThisError)]
pub enum LoadError {
    #[error("cannot read schema '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid schema json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a schema from JSON text.
pub fn from_str(text: &str) -> Result<Schema, LoadError> {
    let schema = serde_json::from_str(text)?;

    Ok(schema)
}

/// Read and parse a schema file.
pub fn from_path(path: impl AsRef<Path>) -> Result<Schema, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    from_str(&text)
}

/// Read, parse and consistency-check a schema file.
pub fn load_checked(path: impl AsRef<Path>) -> Result<Schema, crate::Error> {
    let schema = from_path(path)?;
    validate_schema(&schema).map_err(crate::Error::Inconsistent)?;

    Ok(schema)
}
