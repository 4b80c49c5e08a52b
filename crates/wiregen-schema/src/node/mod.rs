mod r#enum;
mod field;
mod namespace;
mod record;
mod schema;

pub use self::{field::*, namespace::*, r#enum::*, record::*, schema::*};

use serde::{Deserialize, Serialize};

///
/// Ids
///
/// Every definition is addressed by its index in the owning `Schema`, so
/// identity comparison is plain index equality.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct NamespaceId(pub usize);

#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct EnumId(pub usize);

#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct StructId(pub usize);
