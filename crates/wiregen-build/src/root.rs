use crate::{
    BuildError, CodeBuilder,
    helper::{file_base, ident, snake, unit_module_ident, upper},
};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use std::collections::BTreeSet;
use wiregen_schema::node::{NamespaceId, Schema};

/// `WIREGEN_MONSTER_MYGAME_EXAMPLE_`: the file base with non-alphanumerics
/// stripped, then each root namespace component.
#[must_use]
pub fn unit_guard(schema: &Schema) -> String {
    let base: String = file_base(&schema.file_name)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();

    let mut guard = format!("WIREGEN_{}_", base.to_ascii_uppercase());
    for component in schema.namespace_path(schema.namespace) {
        guard.push_str(&component.to_ascii_uppercase());
        guard.push('_');
    }

    guard
}

/// Glob imports of every directly included unit, excluding this one.
pub fn dependency_uses(builder: &CodeBuilder) -> TokenStream {
    let schema = builder.schema;
    if !builder.options.include_dependencies {
        return quote!();
    }

    let own = unit_module_ident(&schema.file_name);
    let units: BTreeSet<String> = schema
        .included_files
        .iter()
        .map(|f| unit_module_ident(f).to_string())
        .filter(|m| *m != own.to_string())
        .collect();

    let uses = units.iter().map(|m| {
        let m = format_ident!("{m}");
        quote! {
            #[allow(unused_imports)]
            use crate::#m::*;
        }
    });

    quote!(#(#uses)*)
}

/// Buffer-level helpers bound to the root table, placed in its namespace.
pub fn generate(
    builder: &CodeBuilder,
) -> Result<Option<(Option<NamespaceId>, TokenStream)>, BuildError> {
    let schema = builder.schema;
    let Some(root) = schema.root else {
        return Ok(None);
    };
    let def = schema
        .get_struct(root)
        .ok_or_else(|| BuildError::invariant("root", "root names no table"))?;
    if def.fixed {
        return Err(BuildError::invariant("root", format!("'{}' is not a table", def.name)));
    }
    if def.included {
        return Ok(None);
    }

    let rt = builder.rt();
    let opts = builder.options;
    let name = ident(&def.name);
    let snake_name = snake(&def.name);
    let upper_name = upper(&def.name);

    let root_as = format_ident!("root_as_{snake_name}");
    let root_as_unchecked = format_ident!("root_as_{snake_name}_unchecked");
    let verify = format_ident!("verify_{snake_name}_buffer");
    let finish = format_ident!("finish_{snake_name}_buffer");

    let mut tokens = quote! {
        /// Verifies `buf` and returns its root table.
        #[inline]
        pub fn #root_as(buf: &[u8]) -> Result<#name<'_>, #rt::InvalidFlatbuffer> {
            #rt::root::<#name>(buf)
        }

        /// # Safety
        ///
        /// `buf` must hold a valid buffer with this root type.
        #[inline]
        #[must_use]
        pub unsafe fn #root_as_unchecked(buf: &[u8]) -> #name<'_> {
            unsafe { #rt::root_unchecked::<#name>(buf) }
        }
    };

    if opts.mutable_buffer {
        let mutable = format_ident!("get_mutable_root_as_{snake_name}");
        let name_mut = format_ident!("{}Mut", def.name);

        tokens.extend(quote! {
            /// Verifies `buf`, then hands back a view that can patch it in place.
            #[inline]
            pub fn #mutable(buf: &mut [u8]) -> Result<#name_mut<'_>, #rt::InvalidFlatbuffer> {
                #rt::root::<#name>(buf)?;
                let loc = buf
                    .get(..4)
                    .and_then(|b| <[u8; 4]>::try_from(b).ok())
                    .map_or(0, u32::from_le_bytes);

                Ok(#name_mut::init_from_buf(buf, loc as usize))
            }
        });
    }

    let identifier = schema.file_identifier.as_deref().map(|id| {
        let konst = format_ident!("{upper_name}_IDENTIFIER");
        let has = format_ident!("{snake_name}_buffer_has_identifier");

        tokens.extend(quote! {
            pub const #konst: &str = #id;

            #[inline]
            #[must_use]
            pub fn #has(buf: &[u8]) -> bool {
                buf.len() >= 8 && #rt::buffer_has_identifier(buf, #konst, false)
            }
        });

        konst
    });

    let (expected, stamped) = match &identifier {
        Some(konst) => {
            let has = format_ident!("{snake_name}_buffer_has_identifier");
            (quote!(Some(#konst)), quote!(#has(buf) &&))
        }
        None => (quote!(None), quote!()),
    };

    tokens.extend(quote! {
        /// `true` when `buf` verifies and carries this schema's identifier.
        #[inline]
        #[must_use]
        pub fn #verify(buf: &[u8]) -> bool {
            #stamped #root_as(buf).is_ok()
        }

        #[inline]
        pub fn #finish<'a>(
            fbb: &mut #rt::FlatBufferBuilder<'a>,
            root: #rt::WIPOffset<#name<'a>>,
        ) {
            fbb.finish(root, #expected);
        }
    });

    if let Some(ext) = schema.file_extension.as_deref() {
        let konst = format_ident!("{upper_name}_EXTENSION");
        tokens.extend(quote!(pub const #konst: &str = #ext;));
    }

    builder.debug_log(format!("root {}", def.name));

    Ok(Some((def.namespace, tokens)))
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        GenOptions,
        test_fixtures::{has, monster_schema},
    };

    #[test]
    fn guard_uses_file_and_namespace() {
        let mut schema = monster_schema();
        assert_eq!(unit_guard(&schema), "WIREGEN_MONSTER_MYGAME_EXAMPLE_");

        schema.file_name = "schemas/my-types.v2.fbs".into();
        schema.namespace = None;
        assert_eq!(unit_guard(&schema), "WIREGEN_MYTYPESV2_");
    }

    #[test]
    fn dependency_uses_skip_self() {
        let mut schema = monster_schema();
        schema.included_files = vec!["weapons.fbs".into(), "monster.fbs".into()];
        let opts = GenOptions::default();
        let cx = CodeBuilder::new(&schema, &opts).unwrap();

        let text = dependency_uses(&cx).to_string();
        assert!(has(&text, "use crate::weapons_generated::*;"));
        assert!(!has(&text, "monster_generated"));

        let opts = GenOptions {
            include_dependencies: false,
            ..GenOptions::default()
        };
        let cx = CodeBuilder::new(&schema, &opts).unwrap();
        assert!(dependency_uses(&cx).is_empty());
    }

    #[test]
    fn root_helpers_stamp_the_identifier() {
        let schema = monster_schema();
        let opts = GenOptions::default();
        let cx = CodeBuilder::new(&schema, &opts).unwrap();

        let (ns, tokens) = generate(&cx).unwrap().unwrap();
        let text = tokens.to_string();

        assert_eq!(ns, schema.namespace);
        assert!(has(&text, "pub fn root_as_monster(buf: &[u8]) -> Result<Monster<'_>, flatbuffers::InvalidFlatbuffer>"));
        assert!(has(&text, "pub const MONSTER_IDENTIFIER: &str = \"MONS\";"));
        assert!(has(&text, "pub fn verify_monster_buffer(buf: &[u8]) -> bool { monster_buffer_has_identifier(buf) && root_as_monster(buf).is_ok() }"));
        assert!(has(&text, "buf.len() >= 8 && flatbuffers::buffer_has_identifier(buf, MONSTER_IDENTIFIER, false)"));
        assert!(has(&text, "fbb.finish(root, Some(MONSTER_IDENTIFIER));"));
        assert!(has(&text, "pub const MONSTER_EXTENSION: &str = \"mon\";"));
        assert!(!has(&text, "get_mutable_root_as_monster"));
    }

    #[test]
    fn no_identifier_means_none() {
        let mut schema = monster_schema();
        schema.file_identifier = None;
        let opts = GenOptions {
            mutable_buffer: true,
            ..GenOptions::default()
        };
        let cx = CodeBuilder::new(&schema, &opts).unwrap();

        let text = generate(&cx).unwrap().unwrap().1.to_string();
        assert!(!has(&text, "_IDENTIFIER"));
        assert!(has(&text, "fbb.finish(root, None);"));
        assert!(has(&text, "pub fn get_mutable_root_as_monster(buf: &mut [u8])"));
        assert!(has(&text, "Ok(MonsterMut::init_from_buf(buf, loc as usize))"));
        assert!(has(&text, "pub fn verify_monster_buffer(buf: &[u8]) -> bool { root_as_monster(buf).is_ok() }"));
    }

    #[test]
    fn schema_without_root_has_no_helpers() {
        let mut schema = monster_schema();
        schema.root = None;
        let opts = GenOptions::default();
        let cx = CodeBuilder::new(&schema, &opts).unwrap();

        assert!(generate(&cx).unwrap().is_none());
    }
}
