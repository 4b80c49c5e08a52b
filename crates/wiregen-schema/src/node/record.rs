use crate::prelude::*;
use std::ops::Not;

///
/// StructDef
///
/// Either a fixed record (`fixed`, inline, padded to `bytesize`) or a
/// table (vtable-addressed, fields optional).
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct StructDef {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<NamespaceId>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub doc: Vec<String>,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub fixed: bool,

    #[serde(default)]
    pub fields: Vec<FieldDef>,

    #[serde(default = "default_minalign")]
    pub minalign: usize,

    #[serde(default)]
    pub bytesize: usize,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub sort_by_size: bool,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub included: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_in: Option<String>,
}

const fn default_minalign() -> usize {
    1
}

impl StructDef {
    #[must_use]
    pub fn table(name: &str, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.to_string(),
            namespace: None,
            doc: Vec::new(),
            fixed: false,
            fields,
            minalign: 1,
            bytesize: 0,
            sort_by_size: false,
            included: false,
            declared_in: None,
        }
    }

    #[must_use]
    pub fn fixed(name: &str, fields: Vec<FieldDef>, minalign: usize, bytesize: usize) -> Self {
        Self {
            fixed: true,
            minalign,
            bytesize,
            ..Self::table(name, fields)
        }
    }

    #[must_use]
    pub const fn in_namespace(mut self, ns: NamespaceId) -> Self {
        self.namespace = Some(ns);
        self
    }

    #[must_use]
    pub const fn sorted_by_size(mut self) -> Self {
        self.sort_by_size = true;
        self
    }

    #[must_use]
    pub fn with_doc(mut self, line: &str) -> Self {
        self.doc.push(line.to_string());
        self
    }

    /// Fields that still get accessors and builder slots.
    pub fn live_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| !f.deprecated)
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn key_field(&self) -> Option<&FieldDef> {
        self.live_fields().find(|f| f.key)
    }
}
