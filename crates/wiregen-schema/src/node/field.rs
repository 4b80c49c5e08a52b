use crate::prelude::*;
use std::ops::Not;

///
/// FieldDef
///
/// `offset` is the vtable slot for table fields and the byte offset for
/// fixed-record fields. `padding` only applies to fixed records and counts
/// the bytes that follow the field.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FieldDef {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: Type,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub doc: Vec<String>,

    #[serde(default)]
    pub offset: usize,

    #[serde(default)]
    pub padding: u8,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub deprecated: bool,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub key: bool,

    /// Root table of a buffer embedded in this `[ubyte]` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested_root: Option<StructId>,
}

impl FieldDef {
    #[must_use]
    pub fn new(name: &str, ty: Type) -> Self {
        Self {
            name: name.to_string(),
            ty,
            default: None,
            doc: Vec::new(),
            offset: 0,
            padding: 0,
            required: false,
            deprecated: false,
            key: false,
            nested_root: None,
        }
    }

    /// Declared default constant, `0` when none was given.
    #[must_use]
    pub fn default_constant(&self) -> &str {
        self.default.as_deref().unwrap_or("0")
    }

    #[must_use]
    pub fn with_default(mut self, value: &str) -> Self {
        self.default = Some(value.to_string());
        self
    }

    #[must_use]
    pub const fn at(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub const fn padded(mut self, padding: u8) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub const fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    #[must_use]
    pub const fn key(mut self) -> Self {
        self.key = true;
        self
    }

    #[must_use]
    pub const fn nested(mut self, root: StructId) -> Self {
        self.nested_root = Some(root);
        self
    }

    #[must_use]
    pub fn with_doc(mut self, line: &str) -> Self {
        self.doc.push(line.to_string());
        self
    }
}
