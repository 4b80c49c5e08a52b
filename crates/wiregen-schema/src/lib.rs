pub mod error;
pub mod load;
pub mod node;
pub mod types;
pub mod validate;

/// Suffix of the discriminant field that accompanies every union field.
pub const UNION_TYPE_SUFFIX: &str = "_type";

/// Largest padding run a fixed record may carry after a single field.
pub const MAX_FIELD_PADDING: u8 = 15;

use crate::load::LoadError;
use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        err,
        error::ErrorTree,
        node::*,
        types::{ScalarKind, Type},
    };
    pub use serde::{Deserialize, Serialize};
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    LoadError(#[from] LoadError),

    #[error("schema is inconsistent:\n{0}")]
    Inconsistent(error::ErrorTree),
}
