//! ## Crate layout
//! - `build`: the emission engine (`generate`, `write`, `make_rule`, `build!`).
//! - `config`: `wiregen.toml` options.
//! - `schema`: the resolved schema model, JSON loading and consistency checks.
//!
//! Generated units call into a wire runtime crate (`flatbuffers` unless
//! `runtime_crate` says otherwise); `wiregen` itself is only needed at
//! build time.

pub use wiregen_build as build;
pub use wiregen_config_build as config;
pub use wiregen_schema as schema;

mod error;

pub use error::Error;

use config::GenOptions;
use schema::node::Schema;
use std::path::{Path, PathBuf};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Macros
//

pub use wiregen_build::build;

/// Load a schema file and run the consistency checks on it.
pub fn load_schema(path: impl AsRef<Path>) -> Result<Schema, Error> {
    Ok(schema::load::load_checked(path)?)
}

/// Options from `file` when given, else `./wiregen.toml` or defaults.
pub fn load_options(file: Option<&Path>) -> Result<GenOptions, Error> {
    let options = match file {
        Some(path) => config::load(path)?,
        None => config::load_or_default(".")?,
    };

    Ok(options)
}

/// Load and check a schema file, then generate its unit.
pub fn generate_file(path: impl AsRef<Path>, options: &GenOptions) -> Result<String, Error> {
    let schema = load_schema(path)?;

    Ok(build::generate(&schema, options)?)
}

/// Load and check a schema file, then write its unit under `out_dir`.
pub fn write_file(
    path: impl AsRef<Path>,
    options: &GenOptions,
    out_dir: impl AsRef<Path>,
) -> Result<PathBuf, Error> {
    let schema = load_schema(path)?;

    Ok(build::write(&schema, options, out_dir)?)
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Error,
        build::{BuildError, generate, generated_file_name, make_rule, write},
        config::{Framework, GenOptions},
        schema::{
            node::*,
            types::{ScalarKind, Type},
        },
    };
}
