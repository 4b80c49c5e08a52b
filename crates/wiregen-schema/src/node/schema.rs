use crate::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

///
/// Schema
///
/// Fully resolved input to one generation pass. Definitions appear in
/// declaration order and refer to each other by index.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Schema {
    pub file_name: String,

    #[serde(default)]
    pub namespaces: Vec<Namespace>,

    /// Root namespace of the file being generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<NamespaceId>,

    #[serde(default)]
    pub enums: Vec<EnumDef>,

    #[serde(default)]
    pub structs: Vec<StructDef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<StructId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_identifier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_extension: Option<String>,

    /// Direct includes of `file_name`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included_files: Vec<String>,

    /// Direct includes of every file the parser saw.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub include_graph: BTreeMap<String, Vec<String>>,
}

impl Schema {
    #[must_use]
    pub fn new(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            ..Self::default()
        }
    }

    /// Intern a namespace, returning the existing id for a repeated path.
    pub fn add_namespace<S: Into<String>>(
        &mut self,
        components: impl IntoIterator<Item = S>,
    ) -> NamespaceId {
        let ns = Namespace::new(components);
        if let Some(pos) = self.namespaces.iter().position(|n| *n == ns) {
            return NamespaceId(pos);
        }
        self.namespaces.push(ns);

        NamespaceId(self.namespaces.len() - 1)
    }

    pub fn add_enum(&mut self, def: EnumDef) -> EnumId {
        self.enums.push(def);

        EnumId(self.enums.len() - 1)
    }

    pub fn add_struct(&mut self, def: StructDef) -> StructId {
        self.structs.push(def);

        StructId(self.structs.len() - 1)
    }

    // ---------------------------------------------------------------------
    // Lookup
    //
    // The panicking accessors are only used after `validate_schema` has
    // confirmed every id resolves.
    // ---------------------------------------------------------------------

    #[must_use]
    pub fn get_enum(&self, id: EnumId) -> Option<&EnumDef> {
        self.enums.get(id.0)
    }

    #[must_use]
    pub fn get_struct(&self, id: StructId) -> Option<&StructDef> {
        self.structs.get(id.0)
    }

    #[must_use]
    pub fn get_namespace(&self, id: NamespaceId) -> Option<&Namespace> {
        self.namespaces.get(id.0)
    }

    #[must_use]
    pub fn enum_def(&self, id: EnumId) -> &EnumDef {
        &self.enums[id.0]
    }

    #[must_use]
    pub fn struct_def(&self, id: StructId) -> &StructDef {
        &self.structs[id.0]
    }

    /// Components of a namespace, empty for the root namespace.
    #[must_use]
    pub fn namespace_path(&self, id: Option<NamespaceId>) -> &[String] {
        id.and_then(|id| self.get_namespace(id))
            .map(|ns| ns.components.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn fully_qualified_name(&self, ns: Option<NamespaceId>, name: &str) -> String {
        let path = self.namespace_path(ns);
        if path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{name}", path.join("."))
        }
    }

    #[must_use]
    pub fn is_fixed(&self, id: StructId) -> bool {
        self.get_struct(id).is_some_and(|s| s.fixed)
    }

    /// Enums declared by this file, in declaration order.
    pub fn local_enums(&self) -> impl Iterator<Item = (EnumId, &EnumDef)> {
        self.enums
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.included)
            .map(|(i, e)| (EnumId(i), e))
    }

    /// Fixed records and tables declared by this file, in declaration order.
    pub fn local_structs(&self) -> impl Iterator<Item = (StructId, &StructDef)> {
        self.structs
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.included)
            .map(|(i, s)| (StructId(i), s))
    }

    /// Every file reachable through includes from `file`, excluding itself.
    #[must_use]
    pub fn included_files_recursive(&self, file: &str) -> BTreeSet<String> {
        let mut seen = BTreeSet::new();
        let mut stack: Vec<&str> = self.direct_includes(file).collect();

        while let Some(next) = stack.pop() {
            if next == file || !seen.insert(next.to_string()) {
                continue;
            }
            stack.extend(self.direct_includes(next));
        }

        seen
    }

    fn direct_includes<'a>(&'a self, file: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        let from_graph = self.include_graph.get(file).into_iter().flatten();
        let own = (file == self.file_name)
            .then_some(self.included_files.iter())
            .into_iter()
            .flatten();

        from_graph.chain(own).map(String::as_str)
    }
}
