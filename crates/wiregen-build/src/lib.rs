mod enums;
mod error;
mod helper;
mod macros;
mod namespace;
mod object;
mod root;
mod rule;
mod structs;
mod tables;
mod ty;
mod unions;
mod unit;
mod verify;

#[cfg(test)]
mod test_fixtures;

pub use error::BuildError;
pub use namespace::{NamespaceTracker, Transition};
pub use rule::make_rule;
pub use unit::{Item, Unit};
pub use wiregen_config_build::{Framework, GenOptions};

use proc_macro2::TokenStream;
use quote::quote;
use std::{
    fs,
    path::{Path, PathBuf},
};
use wiregen_schema::{node::Schema, validate::validate_schema};

#[doc(hidden)]
pub mod __private {
    pub use wiregen_config_build::{CONFIG_FILE_NAME, load_or_default as load_options};
    pub use wiregen_schema::load::load_checked as load_schema;
}

/// Generate the source unit for `schema`.
pub fn generate(schema: &Schema, options: &GenOptions) -> Result<String, BuildError> {
    validate_schema(schema)?;

    CodeBuilder::new(schema, options)?.generate()
}

/// Generate and write `<out_dir>/<base>_generated.rs`, returning the path.
pub fn write(
    schema: &Schema,
    options: &GenOptions,
    out_dir: impl AsRef<Path>,
) -> Result<PathBuf, BuildError> {
    let code = generate(schema, options)?;
    let path = out_dir
        .as_ref()
        .join(generated_file_name(&schema.file_name));

    fs::write(&path, code).map_err(|source| BuildError::Persist {
        path: path.clone(),
        source,
    })?;

    if options.debug {
        println!("[debug] wrote {}", path.display());
    }

    Ok(path)
}

/// `monster.fbs` → `monster_generated.rs`.
#[must_use]
pub fn generated_file_name(file_name: &str) -> String {
    format!("{}_generated.rs", helper::file_base(file_name))
}

///
/// CodeBuilder
///
/// One generation pass over a validated schema.
///

pub struct CodeBuilder<'a> {
    pub(crate) schema: &'a Schema,
    pub(crate) options: &'a GenOptions,
    runtime: TokenStream,
}

impl<'a> CodeBuilder<'a> {
    /// The schema must already have passed `validate_schema`.
    pub fn new(schema: &'a Schema, options: &'a GenOptions) -> Result<Self, BuildError> {
        let runtime: syn::Path = syn::parse_str(&options.runtime_crate)
            .map_err(|_| BuildError::RuntimePath(options.runtime_crate.clone()))?;

        Ok(Self {
            schema,
            options,
            runtime: quote!(#runtime),
        })
    }

    pub fn generate(&self) -> Result<String, BuildError> {
        let unit = self.unit()?;
        let guard = unit.guard().to_string();
        let (code, steps) = unit.render(self.schema);

        let opened: usize = steps.iter().map(|s| s.opened).sum();
        self.debug_log(format!("{guard}: {opened} modules, {} bytes", code.len()));

        Ok(code)
    }

    /// Build the unit IR without rendering it.
    pub fn unit(&self) -> Result<Unit, BuildError> {
        let schema = self.schema;
        let mut unit = Unit::new(root::unit_guard(schema));
        unit.add_header_line(format!("schema: {}", schema.file_name));
        unit.extend_preamble(root::dependency_uses(self));

        // offset markers for every table up front
        for (_, def) in schema.local_structs().filter(|(_, s)| !s.fixed) {
            unit.push(def.namespace, &def.name, tables::offset_marker(def));
        }

        for (id, def) in schema.local_enums() {
            self.debug_log(format!("enum {}", def.name));
            unit.push(def.namespace, &def.name, enums::generate(self, id, def)?);
        }

        for (_, def) in schema.local_structs().filter(|(_, s)| s.fixed) {
            self.debug_log(format!("struct {}", def.name));
            unit.push(def.namespace, &def.name, structs::generate(self, def)?);
        }

        for (_, def) in schema.local_structs().filter(|(_, s)| !s.fixed) {
            self.debug_log(format!("table {}", def.name));
            unit.push(def.namespace, &def.name, tables::generate(self, def)?);
        }

        // second pass: bodies that refer to every table's declaration
        if self.options.object_api {
            for (_, def) in schema.local_structs().filter(|(_, s)| !s.fixed) {
                unit.push(def.namespace, &def.name, object::generate_post(self, def)?);
            }
        }

        for (id, def) in schema.local_enums().filter(|(_, e)| e.is_union) {
            unit.push(def.namespace, &def.name, unions::generate_post(self, id, def)?);
        }

        if let Some((ns, tokens)) = root::generate(self)? {
            unit.push(ns, "root", tokens);
        }

        Ok(unit)
    }

    /// Path of the wire runtime crate.
    pub(crate) const fn rt(&self) -> &TokenStream {
        &self.runtime
    }

    pub(crate) fn debug_log(&self, s: impl AsRef<str>) {
        if self.options.debug {
            println!("[debug] {}", s.as_ref());
        }
    }
}
