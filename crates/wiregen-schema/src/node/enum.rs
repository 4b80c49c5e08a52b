use crate::prelude::*;
use std::ops::Not;

///
/// EnumDef
///
/// A scalar enum or, when `is_union` is set, the discriminant set of a
/// tagged union. Values are kept in declaration order, which is also
/// ascending value order.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EnumDef {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<NamespaceId>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub doc: Vec<String>,

    pub underlying: ScalarKind,
    pub values: Vec<EnumVal>,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub is_union: bool,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub bit_flags: bool,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub included: bool,

    /// Schema file the definition came from, when it is not the current one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_in: Option<String>,
}

impl EnumDef {
    #[must_use]
    pub fn new(name: &str, underlying: ScalarKind, values: Vec<EnumVal>) -> Self {
        Self {
            name: name.to_string(),
            namespace: None,
            doc: Vec::new(),
            underlying,
            values,
            is_union: false,
            bit_flags: false,
            included: false,
            declared_in: None,
        }
    }

    /// A union discriminant set; `NONE = 0` comes first, members follow.
    #[must_use]
    pub fn union(name: &str, members: &[(&str, StructId)]) -> Self {
        let mut values = vec![EnumVal::new("NONE", 0)];
        for (i, (member, id)) in members.iter().enumerate() {
            let value = i64::try_from(i + 1).unwrap_or(i64::MAX);
            values.push(EnumVal::new(member, value).with_member(*id));
        }

        Self {
            is_union: true,
            ..Self::new(name, ScalarKind::UByte, values)
        }
    }

    #[must_use]
    pub const fn in_namespace(mut self, ns: NamespaceId) -> Self {
        self.namespace = Some(ns);
        self
    }

    #[must_use]
    pub const fn with_bit_flags(mut self) -> Self {
        self.bit_flags = true;
        self
    }

    #[must_use]
    pub fn with_doc(mut self, line: &str) -> Self {
        self.doc.push(line.to_string());
        self
    }

    #[must_use]
    pub fn first(&self) -> Option<&EnumVal> {
        self.values.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&EnumVal> {
        self.values.last()
    }

    #[must_use]
    pub fn min_value(&self) -> Option<&EnumVal> {
        self.values.iter().min_by_key(|v| v.value)
    }

    #[must_use]
    pub fn max_value(&self) -> Option<&EnumVal> {
        self.values.iter().max_by_key(|v| v.value)
    }

    /// Bitwise OR of every declared value.
    #[must_use]
    pub fn any_value(&self) -> i64 {
        self.values.iter().fold(0, |acc, v| acc | v.value)
    }

    /// First value declared with `value`.
    #[must_use]
    pub fn reverse_lookup(&self, value: i64) -> Option<&EnumVal> {
        self.values.iter().find(|v| v.value == value)
    }

    /// Union members, i.e. every value that names a table.
    pub fn members(&self) -> impl Iterator<Item = (&EnumVal, StructId)> {
        self.values
            .iter()
            .filter_map(|v| v.member.map(|id| (v, id)))
    }

    /// The zero value of a union, conventionally `NONE`.
    #[must_use]
    pub fn none_value(&self) -> Option<&EnumVal> {
        self.values
            .iter()
            .find(|v| v.value == 0 && v.member.is_none())
    }
}

///
/// EnumVal
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EnumVal {
    pub name: String,
    pub value: i64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub doc: Vec<String>,

    /// Table carried by this case when the owning enum is a union.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<StructId>,
}

impl EnumVal {
    #[must_use]
    pub fn new(name: &str, value: i64) -> Self {
        Self {
            name: name.to_string(),
            value,
            doc: Vec::new(),
            member: None,
        }
    }

    #[must_use]
    pub const fn with_member(mut self, id: StructId) -> Self {
        self.member = Some(id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags() -> EnumDef {
        EnumDef::new(
            "Perm",
            ScalarKind::UByte,
            vec![
                EnumVal::new("Read", 1),
                EnumVal::new("Write", 2),
                EnumVal::new("Exec", 4),
            ],
        )
        .with_bit_flags()
    }

    #[test]
    fn min_max_and_any() {
        let def = flags();

        assert_eq!(def.min_value().map(|v| v.value), Some(1));
        assert_eq!(def.max_value().map(|v| v.value), Some(4));
        assert_eq!(def.any_value(), 7);
    }

    #[test]
    fn union_builder_prepends_none() {
        let def = EnumDef::union("Equipment", &[("Weapon", StructId(3))]);

        assert!(def.is_union);
        assert_eq!(def.none_value().map(|v| v.name.as_str()), Some("NONE"));
        let members: Vec<_> = def.members().map(|(v, id)| (v.name.clone(), id)).collect();
        assert_eq!(members, vec![("Weapon".to_string(), StructId(3))]);
    }

    #[test]
    fn reverse_lookup_finds_first_declared() {
        let def = EnumDef::new(
            "Dup",
            ScalarKind::Byte,
            vec![EnumVal::new("A", 1), EnumVal::new("B", 1)],
        );

        assert_eq!(def.reverse_lookup(1).map(|v| v.name.as_str()), Some("A"));
        assert!(def.reverse_lookup(9).is_none());
    }
}
