use thiserror::Error as ThisError;
use wiregen_build::BuildError;
use wiregen_config_build::ConfigError;

///
/// Error
///
/// Anything that can stop a schema on its way to a written unit.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Schema(#[from] wiregen_schema::Error),
}
