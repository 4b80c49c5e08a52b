use crate::namespace::{NamespaceTracker, Transition};
use proc_macro2::TokenStream;
use wiregen_schema::node::{NamespaceId, Schema};

///
/// Item
///
/// One emitted fragment, tagged with the namespace it belongs to.
///

#[derive(Clone, Debug)]
pub struct Item {
    pub namespace: Option<NamespaceId>,
    pub label: String,
    pub tokens: TokenStream,
}

///
/// Unit
///
/// Everything produced for one schema file. Items keep their emission
/// order inside a namespace; rendering groups namespaces so that each
/// module is opened exactly once.
///

#[derive(Clone, Debug, Default)]
pub struct Unit {
    guard: String,
    header: Vec<String>,
    preamble: TokenStream,
    items: Vec<Item>,
}

impl Unit {
    #[must_use]
    pub fn new(guard: impl Into<String>) -> Self {
        Self {
            guard: guard.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn guard(&self) -> &str {
        &self.guard
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn add_header_line(&mut self, line: impl Into<String>) {
        self.header.push(line.into());
    }

    /// Root-level tokens emitted ahead of every namespace.
    pub fn extend_preamble(&mut self, tokens: TokenStream) {
        self.preamble.extend(tokens);
    }

    /// Queue a fragment; empty fragments are dropped.
    pub fn push(
        &mut self,
        namespace: Option<NamespaceId>,
        label: impl Into<String>,
        tokens: TokenStream,
    ) {
        if tokens.is_empty() {
            return;
        }

        self.items.push(Item {
            namespace,
            label: label.into(),
            tokens,
        });
    }

    /// Render to source text, returning the namespace transitions taken.
    #[must_use]
    pub fn render(mut self, schema: &Schema) -> (String, Vec<Transition>) {
        let mut out = String::new();
        out.push_str("// @generated by wiregen, do not edit\n");
        out.push_str(&format!("// unit: {}\n", self.guard));
        for line in &self.header {
            out.push_str(&format!("// {line}\n"));
        }
        out.push('\n');

        if !self.preamble.is_empty() {
            out.push_str(&self.preamble.to_string());
            out.push_str("\n\n");
        }

        // stable, so emission order survives inside each namespace
        self.items
            .sort_by(|a, b| schema.namespace_path(a.namespace).cmp(schema.namespace_path(b.namespace)));

        let mut tracker = NamespaceTracker::new();
        let mut steps = Vec::new();
        for item in &self.items {
            let path = schema.namespace_path(item.namespace);
            steps.push(tracker.enter(item.namespace, path, &mut out));
            out.push_str(&item.tokens.to_string());
            out.push_str("\n\n");
        }
        steps.push(tracker.flush(&mut out));

        (out, steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    #[test]
    fn interleaved_namespaces_open_once() {
        let mut schema = Schema::new("a.fbs");
        let a = schema.add_namespace(["A"]);
        let b = schema.add_namespace(["B"]);

        let mut unit = Unit::new("WIREGEN_A_");
        unit.push(Some(a), "one", quote!(pub struct One;));
        unit.push(Some(b), "two", quote!(pub struct Two;));
        unit.push(Some(a), "three", quote!(pub struct Three;));
        unit.push(None, "root", quote!(pub struct Root;));

        let (text, steps) = unit.render(&schema);

        assert_eq!(text.matches("pub mod a {").count(), 1);
        assert_eq!(text.matches("pub mod b {").count(), 1);
        let one = text.find("One").unwrap();
        let three = text.find("Three").unwrap();
        let two = text.find("Two").unwrap();
        assert!(text.find("Root").unwrap() < one);
        assert!(one < three && three < two);

        let opened: usize = steps.iter().map(|s| s.opened).sum();
        let closed: usize = steps.iter().map(|s| s.closed).sum();
        assert_eq!((opened, closed), (2, 2));
    }

    #[test]
    fn empty_fragments_are_skipped() {
        let mut unit = Unit::new("G");
        unit.push(None, "nothing", TokenStream::new());

        assert!(unit.items().is_empty());
    }

    #[test]
    fn header_carries_guard_and_preamble() {
        let mut unit = Unit::new("WIREGEN_MONSTER_");
        unit.add_header_line("schema: monster.fbs");
        unit.extend_preamble(quote!(use crate::other_generated::*;));

        let (text, _) = unit.render(&Schema::new("monster.fbs"));

        assert!(text.starts_with("// @generated by wiregen, do not edit\n// unit: WIREGEN_MONSTER_\n"));
        assert!(text.contains("// schema: monster.fbs"));
        assert!(text.contains("use crate :: other_generated :: * ;"));
    }
}
