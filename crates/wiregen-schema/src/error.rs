use std::{collections::BTreeMap, fmt};

///
/// ErrorTree
///
/// Route-aware error aggregation. Messages attach either to the root or to
/// a named child route (`Monster.hp`), so a single pass can report every
/// problem it finds instead of stopping at the first one.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ErrorTree {
    messages: Vec<String>,
    children: BTreeMap<String, Self>,
}

impl ErrorTree {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
            children: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, err: impl ToString) {
        self.messages.push(err.to_string());
    }

    pub fn add_for(&mut self, route: impl Into<String>, err: impl ToString) {
        self.children
            .entry(route.into())
            .or_default()
            .add(err);
    }

    /// Merge another tree underneath `route`.
    pub fn merge_for(&mut self, route: impl Into<String>, other: Self) {
        if other.is_empty() {
            return;
        }

        let child = self.children.entry(route.into()).or_default();
        child.messages.extend(other.messages);
        for (key, tree) in other.children {
            child.merge_for(key, tree);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.children.values().all(Self::is_empty)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len() + self.children.values().map(Self::len).sum::<usize>()
    }

    /// Flatten into `(route, message)` pairs, root messages first.
    #[must_use]
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);

        out
    }

    fn flatten_into(&self, prefix: &str, out: &mut Vec<(String, String)>) {
        for msg in &self.messages {
            out.push((prefix.to_string(), msg.clone()));
        }
        for (key, child) in &self.children {
            let route = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            child.flatten_into(&route, out);
        }
    }

    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (route, msg) in self.flatten() {
            if route.is_empty() {
                writeln!(f, "{msg}")?;
            } else {
                writeln!(f, "{route}: {msg}")?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for ErrorTree {}

///
/// err
///
/// Format a message straight into an `ErrorTree`.
///

#[macro_export]
macro_rules! err {
    ($errs:expr, $($arg:tt)*) => {{
        $errs.add(format!($($arg)*));
    }};
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tree_is_ok() {
        assert!(ErrorTree::new().result().is_ok());
    }

    #[test]
    fn routes_are_flattened_in_order() {
        let mut errs = ErrorTree::new();
        errs.add("root problem");
        errs.add_for("Monster", "bad field");

        let mut nested = ErrorTree::new();
        nested.add_for("hp", "padding too wide");
        errs.merge_for("Vec3", nested);

        let flat = errs.flatten();
        assert_eq!(
            flat,
            vec![
                (String::new(), "root problem".to_string()),
                ("Monster".to_string(), "bad field".to_string()),
                ("Vec3.hp".to_string(), "padding too wide".to_string()),
            ]
        );
        assert_eq!(errs.len(), 3);
    }

    #[test]
    fn err_macro_formats_into_tree() {
        let mut errs = ErrorTree::new();
        err!(errs, "value {} out of range", 42);

        let text = errs.clone().result().unwrap_err().to_string();
        assert_eq!(text, "value 42 out of range\n");
    }

    #[test]
    fn merging_empty_tree_adds_nothing() {
        let mut errs = ErrorTree::new();
        errs.merge_for("Color", ErrorTree::new());

        assert!(errs.is_empty());
        assert!(errs.flatten().is_empty());
    }
}
