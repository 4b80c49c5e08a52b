use derive_more::Deref;
use serde::{Deserialize, Serialize};

///
/// Namespace
///
/// Dotted scope of a definition, stored as its ordered components.
///

#[derive(Clone, Debug, Default, Deref, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Namespace {
    pub components: Vec<String>,
}

impl Namespace {
    #[must_use]
    pub fn new<S: Into<String>>(components: impl IntoIterator<Item = S>) -> Self {
        Self {
            components: components.into_iter().map(Into::into).collect(),
        }
    }

    /// `A.B.name`, or just `name` for the root namespace.
    #[must_use]
    pub fn fully_qualified_name(&self, name: &str) -> String {
        if self.components.is_empty() {
            return name.to_string();
        }

        format!("{}.{name}", self.components.join("."))
    }

    /// Length of the shared leading run of components.
    #[must_use]
    pub fn common_prefix_len(a: &[String], b: &[String]) -> usize {
        a.iter().zip(b).take_while(|(x, y)| x == y).count()
    }
}
