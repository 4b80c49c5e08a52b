use crate::helper::module_ident;
use std::fmt::Write as _;
use wiregen_schema::node::{Namespace, NamespaceId};

// lints for every opened module; value constants keep their schema spelling
const MODULE_ALLOW: &str = "#[allow(unused_imports, dead_code, non_camel_case_types, \
                            non_snake_case, non_upper_case_globals, clippy::all)]";

///
/// NamespaceTracker
///
/// Remembers which modules are open in the output and moves between them
/// with the fewest closes and opens. One tracker belongs to one pass.
///

#[derive(Debug, Default)]
pub struct NamespaceTracker {
    current: Option<NamespaceId>,
    open: Vec<String>,
}

///
/// Transition
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Transition {
    pub closed: usize,
    pub opened: usize,
}

impl NamespaceTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: None,
            open: Vec::new(),
        }
    }

    #[must_use]
    pub const fn current(&self) -> Option<NamespaceId> {
        self.current
    }

    #[must_use]
    pub const fn depth(&self) -> usize {
        self.open.len()
    }

    /// Move to `target`, whose components are `path`.
    pub fn enter(
        &mut self,
        target: Option<NamespaceId>,
        path: &[String],
        out: &mut String,
    ) -> Transition {
        let mut step = Transition::default();
        if target == self.current {
            return step;
        }

        let common = Namespace::common_prefix_len(&self.open, path);

        // deepest first
        while self.open.len() > common {
            if let Some(component) = self.open.pop() {
                let _ = writeln!(out, "}}  // pub mod {}", module_ident(&component));
                step.closed += 1;
            }
        }
        if step.closed > 0 {
            out.push('\n');
        }

        for component in &path[common..] {
            let _ = writeln!(out, "{MODULE_ALLOW}\npub mod {} {{", module_ident(component));
            self.open.push(component.clone());
            step.opened += 1;
        }
        if step.opened > 0 {
            out.push('\n');
        }

        self.current = target;

        step
    }

    /// Close everything that is still open.
    pub fn flush(&mut self, out: &mut String) -> Transition {
        self.enter(None, &[], out)
    }
}

///
/// TESTS
///
