use std::{io, path::PathBuf};
use thiserror::Error as ThisError;
use wiregen_schema::error::ErrorTree;

///
/// BuildError
///
/// Nothing is written when generation fails; a pass either produces the
/// whole unit or an error.
///

#[derive(Debug, ThisError)]
pub enum BuildError {
    #[error("schema is inconsistent:\n{0}")]
    Invariant(ErrorTree),

    #[error("invalid runtime crate path '{0}'")]
    RuntimePath(String),

    #[error("cannot write '{path}': {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BuildError {
    pub(crate) fn invariant(route: &str, msg: impl ToString) -> Self {
        let mut errs = ErrorTree::new();
        errs.add_for(route, msg);

        Self::Invariant(errs)
    }
}

impl From<ErrorTree> for BuildError {
    fn from(errs: ErrorTree) -> Self {
        Self::Invariant(errs)
    }
}
