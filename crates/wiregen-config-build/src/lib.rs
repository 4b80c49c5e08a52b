//! `wiregen.toml` loading.
//!
//! Every key is optional; anything left out keeps the default from
//! `GenOptions::default()`.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

/// Name of the config file looked up next to a schema.
pub const CONFIG_FILE_NAME: &str = "wiregen.toml";

/// Runtime crate path the emitted code calls into by default.
pub const DEFAULT_RUNTIME_CRATE: &str = "flatbuffers";

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

///
/// Framework
///
/// Optional presentation-layer emission mode.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    #[default]
    None,
    Serde,
}

///
/// GenOptions
///
/// Flat, read-only option set for one generation pass.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct GenOptions {
    pub mutable_buffer: bool,
    pub object_api: bool,
    pub scoped_enums: bool,
    pub prefixed_enums: bool,
    pub name_strings: bool,
    pub framework: Framework,
    pub include_dependencies: bool,
    pub runtime_crate: String,

    /// Largest `range / count` ratio for which an enum still gets a
    /// dense name table.
    pub max_enum_sparseness: u64,

    pub honor_sort_by_size: bool,
    pub debug: bool,
}

impl Default for GenOptions {
    fn default() -> Self {
        Self {
            mutable_buffer: false,
            object_api: false,
            scoped_enums: true,
            prefixed_enums: false,
            name_strings: false,
            framework: Framework::None,
            include_dependencies: true,
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
            max_enum_sparseness: 5,
            honor_sort_by_size: true,
            debug: false,
        }
    }
}

impl GenOptions {
    /// Scoped and prefixed naming are the modes that get range constants.
    #[must_use]
    pub const fn has_enum_range_constants(&self) -> bool {
        self.scoped_enums || self.prefixed_enums
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.runtime_crate.trim().is_empty() {
            return Err(ConfigError::Invalid("runtime_crate must not be empty".into()));
        }
        if self.max_enum_sparseness == 0 {
            return Err(ConfigError::Invalid(
                "max_enum_sparseness must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

///
/// ConfigFile
///

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    options: GenOptions,
}

/// Parse `wiregen.toml` text.
pub fn parse(text: &str) -> Result<GenOptions, ConfigError> {
    let file: ConfigFile = toml::from_str(text)?;
    file.options.check()?;

    Ok(file.options)
}

/// Read and parse a config file.
pub fn load(path: impl AsRef<Path>) -> Result<GenOptions, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse(&text)
}

/// Load `wiregen.toml` from `dir` when present, defaults otherwise.
pub fn load_or_default(dir: impl AsRef<Path>) -> Result<GenOptions, ConfigError> {
    let path = dir.as_ref().join(CONFIG_FILE_NAME);
    if path.is_file() {
        load(path)
    } else {
        Ok(GenOptions::default())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(parse("").unwrap(), GenOptions::default());
    }

    #[test]
    fn partial_options_keep_defaults() {
        let opts = parse(
            r#"
            [options]
            object_api = true
            framework = "serde"
            runtime_crate = "::wire"
            "#,
        )
        .unwrap();

        assert!(opts.object_api);
        assert_eq!(opts.framework, Framework::Serde);
        assert_eq!(opts.runtime_crate, "::wire");
        assert!(opts.scoped_enums);
        assert_eq!(opts.max_enum_sparseness, 5);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse("[options]\nobject_apii = true\n").unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_sparseness_is_invalid() {
        let err = parse("[options]\nmax_enum_sparseness = 0\n").unwrap_err();

        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn missing_config_dir_falls_back_to_defaults() {
        let opts = load_or_default("/definitely/not/a/dir").unwrap();

        assert_eq!(opts, GenOptions::default());
    }
}
