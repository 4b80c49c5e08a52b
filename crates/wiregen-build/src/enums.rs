use crate::{
    BuildError, CodeBuilder, Framework,
    helper::{doc_attrs, ident, int_lit, snake, upper},
    unions,
};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use wiregen_schema::node::{EnumDef, EnumId, EnumVal};

///
/// NameTable
///
/// Dense value → name lookup for enums whose values are close together.
/// `names[i]` belongs to value `first + i`; gaps hold `""`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct NameTable {
    pub first: i64,
    pub names: Vec<String>,
}

/// Plan the name table, or `None` when the values are too spread out.
pub(crate) fn name_table(def: &EnumDef, max_sparseness: u64) -> Option<NameTable> {
    let first = def.first()?.value;
    let last = def.last()?.value;

    let range = i128::from(last) - i128::from(first) + 1;
    let count = i128::try_from(def.values.len()).ok()?;
    if range <= 0 || range / count >= i128::from(max_sparseness) {
        return None;
    }

    let mut names = vec![String::new(); usize::try_from(range).ok()?];
    // reversed so the first declared name wins on repeated values
    for val in def.values.iter().rev() {
        let index = usize::try_from(i128::from(val.value) - i128::from(first)).ok()?;
        names[index].clone_from(&val.name);
    }

    Some(NameTable { first, names })
}

pub fn generate(builder: &CodeBuilder, id: EnumId, def: &EnumDef) -> Result<TokenStream, BuildError> {
    let mut tokens = quote!();

    tokens.extend(declaration(builder, def));
    tokens.extend(values(builder, id, def));
    tokens.extend(inherent(builder, id, def));
    tokens.extend(debug_impl(def));
    tokens.extend(runtime_impls(builder, def));

    if def.bit_flags && builder.options.scoped_enums {
        tokens.extend(bitmask_ops(def));
    }

    if let Some(table) = name_table(def, builder.options.max_enum_sparseness) {
        tokens.extend(name_lookup(def, &table));
    }

    if def.is_union && builder.options.object_api {
        tokens.extend(unions::owned_declaration(builder, id, def)?);
    }

    Ok(tokens)
}

fn declaration(builder: &CodeBuilder, def: &EnumDef) -> TokenStream {
    let docs = doc_attrs(&def.doc);
    let name = ident(&def.name);
    let underlying = def.underlying.rust_type();
    let serde = (builder.options.framework == Framework::Serde)
        .then(|| quote!(#[derive(serde::Serialize, serde::Deserialize)]));

    quote! {
        #docs
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #serde
        #[repr(transparent)]
        pub struct #name(pub #underlying);
    }
}

// value constants plus the range constants of scoped / prefixed modes
fn values(builder: &CodeBuilder, id: EnumId, def: &EnumDef) -> TokenStream {
    let name = ident(&def.name);
    let opts = builder.options;

    let mut consts: Vec<(String, TokenStream)> = def
        .values
        .iter()
        .map(|v| {
            let lit = int_lit(i128::from(v.value));
            (v.name.clone(), quote!(#name(#lit)))
        })
        .collect();

    if opts.has_enum_range_constants() {
        let path = |v: &EnumVal| builder.enum_value(def.namespace, id, v);

        if def.bit_flags {
            if def.min_value().is_some_and(|v| v.value != 0) {
                consts.push(("NONE".into(), quote!(#name(0))));
            }
            let any = def.any_value();
            if def.max_value().is_some_and(|v| v.value != any) {
                let lit = int_lit(i128::from(any));
                consts.push(("ANY".into(), quote!(#name(#lit))));
            }
        } else if let (Some(min), Some(max)) = (def.min_value(), def.max_value()) {
            consts.push(("MIN".into(), path(min)));
            consts.push(("MAX".into(), path(max)));
        }
    }

    if opts.scoped_enums {
        let items = consts.iter().map(|(n, value)| {
            let n = ident(n);
            quote!(pub const #n: Self = #value;)
        });

        quote! {
            #[allow(non_upper_case_globals)]
            impl #name {
                #(#items)*
            }
        }
    } else {
        let items = consts.iter().map(|(n, value)| {
            let n = if opts.prefixed_enums {
                format_ident!("{}_{}", def.name, n)
            } else {
                ident(n)
            };
            quote! {
                #[allow(non_upper_case_globals)]
                pub const #n: #name = #value;
            }
        });

        quote!(#(#items)*)
    }
}

fn inherent(builder: &CodeBuilder, id: EnumId, def: &EnumDef) -> TokenStream {
    let name = ident(&def.name);
    let paths: Vec<_> = def
        .values
        .iter()
        .map(|v| builder.enum_value(def.namespace, id, v))
        .collect();
    let names = def.values.iter().map(|v| v.name.as_str());

    let fqn = builder.options.name_strings.then(|| {
        let fqn = builder.schema.fully_qualified_name(def.namespace, &def.name);
        quote! {
            pub const fn get_fully_qualified_name() -> &'static str {
                #fqn
            }
        }
    });

    quote! {
        impl #name {
            pub const ENUM_VALUES: &'static [Self] = &[#(#paths),*];

            /// Declared name of a known value.
            #[allow(unreachable_patterns)]
            #[must_use]
            pub fn variant_name(self) -> Option<&'static str> {
                match self {
                    #(#paths => Some(#names),)*
                    _ => None,
                }
            }

            #fqn
        }
    }
}

fn debug_impl(def: &EnumDef) -> TokenStream {
    let name = ident(&def.name);

    quote! {
        impl ::core::fmt::Debug for #name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
                if let Some(name) = self.variant_name() {
                    f.write_str(name)
                } else {
                    f.write_fmt(format_args!("<UNKNOWN {:?}>", self.0))
                }
            }
        }
    }
}

fn runtime_impls(builder: &CodeBuilder, def: &EnumDef) -> TokenStream {
    let rt = builder.rt();
    let name = ident(&def.name);
    let raw = def.underlying.rust_type();

    quote! {
        impl<'a> #rt::Follow<'a> for #name {
            type Inner = Self;
            #[inline]
            unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner {
                Self(unsafe { #rt::read_scalar_at::<#raw>(buf, loc) })
            }
        }

        impl #rt::Push for #name {
            type Output = #name;
            #[inline]
            unsafe fn push(&self, dst: &mut [u8], _written_len: usize) {
                unsafe { #rt::emplace_scalar::<#raw>(dst, self.0) };
            }
        }

        impl #rt::EndianScalar for #name {
            type Scalar = #raw;
            #[inline]
            fn to_little_endian(self) -> #raw {
                self.0.to_le()
            }
            #[inline]
            #[allow(clippy::wrong_self_convention)]
            fn from_little_endian(v: #raw) -> Self {
                Self(#raw::from_le(v))
            }
        }

        impl #rt::Verifiable for #name {
            #[inline]
            fn run_verifier(
                v: &mut #rt::Verifier,
                pos: usize,
            ) -> Result<(), #rt::InvalidFlatbuffer> {
                <#raw as #rt::Verifiable>::run_verifier(v, pos)
            }
        }

        impl #rt::SimpleToVerifyInSlice for #name {}
    }
}

fn bitmask_ops(def: &EnumDef) -> TokenStream {
    let name = ident(&def.name);

    quote! {
        impl ::core::ops::BitOr for #name {
            type Output = Self;
            #[inline]
            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl ::core::ops::BitAnd for #name {
            type Output = Self;
            #[inline]
            fn bitand(self, rhs: Self) -> Self {
                Self(self.0 & rhs.0)
            }
        }

        impl ::core::ops::BitXor for #name {
            type Output = Self;
            #[inline]
            fn bitxor(self, rhs: Self) -> Self {
                Self(self.0 ^ rhs.0)
            }
        }

        impl ::core::ops::Not for #name {
            type Output = Self;
            #[inline]
            fn not(self) -> Self {
                Self(!self.0)
            }
        }

        impl ::core::ops::BitOrAssign for #name {
            #[inline]
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl ::core::ops::BitAndAssign for #name {
            #[inline]
            fn bitand_assign(&mut self, rhs: Self) {
                self.0 &= rhs.0;
            }
        }

        impl ::core::ops::BitXorAssign for #name {
            #[inline]
            fn bitxor_assign(&mut self, rhs: Self) {
                self.0 ^= rhs.0;
            }
        }
    }
}

fn name_lookup(def: &EnumDef, table: &NameTable) -> TokenStream {
    let name = ident(&def.name);
    let names_const = format_ident!("ENUM_NAMES_{}", upper(&def.name));
    let lookup_fn = format_ident!("enum_name_{}", snake(&def.name));
    let len = table.names.len();
    let names = table.names.iter().map(String::as_str);
    let first = int_lit(i128::from(table.first));

    quote! {
        pub const #names_const: [&str; #len] = [#(#names),*];

        #[must_use]
        pub fn #lookup_fn(e: #name) -> &'static str {
            let index = i128::from(e.0) - #first;
            usize::try_from(index)
                .ok()
                .and_then(|i| #names_const.get(i))
                .copied()
                .unwrap_or("")
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        GenOptions,
        test_fixtures::{find_enum, has, monster_schema},
    };
    use wiregen_schema::types::ScalarKind;

    fn def(values: &[(&str, i64)]) -> EnumDef {
        EnumDef::new(
            "E",
            ScalarKind::Short,
            values.iter().map(|(n, v)| EnumVal::new(n, *v)).collect(),
        )
    }

    #[test]
    fn contiguous_values_get_a_dense_table() {
        let table = name_table(&def(&[("Red", 0), ("Green", 1), ("Blue", 2)]), 5).unwrap();

        assert_eq!(table.first, 0);
        assert_eq!(table.names, ["Red", "Green", "Blue"]);
    }

    #[test]
    fn gaps_are_filled_with_empty_names() {
        let table = name_table(&def(&[("A", 1), ("B", 3), ("C", 5)]), 5).unwrap();

        assert_eq!(table.first, 1);
        assert_eq!(table.names, ["A", "", "B", "", "C"]);
    }

    #[test]
    fn sparseness_threshold_is_exclusive() {
        // range 10 over 2 values = 5, not below the limit
        assert!(name_table(&def(&[("A", 0), ("B", 9)]), 5).is_none());
        // range 9 over 2 values = 4
        assert_eq!(name_table(&def(&[("A", 0), ("B", 8)]), 5).unwrap().names.len(), 9);
        // a looser policy admits the wide one
        assert!(name_table(&def(&[("A", 0), ("B", 9)]), 6).is_some());
    }

    #[test]
    fn negative_first_value_offsets_the_index() {
        let table = name_table(&def(&[("Neg", -2), ("Zero", 0)]), 5).unwrap();

        assert_eq!(table.first, -2);
        assert_eq!(table.names, ["Neg", "", "Zero"]);
    }

    #[test]
    fn repeated_values_keep_first_name() {
        let table = name_table(&def(&[("A", 0), ("Alias", 0), ("B", 1)]), 5).unwrap();

        assert_eq!(table.names, ["A", "B"]);
    }

    fn emit(name: &str, opts: &GenOptions) -> String {
        let schema = monster_schema();
        let cx = CodeBuilder::new(&schema, opts).unwrap();
        let id = find_enum(&schema, name);

        generate(&cx, id, schema.enum_def(id)).unwrap().to_string()
    }

    #[test]
    fn scoped_enum_has_associated_values_and_range() {
        let text = emit("Color", &GenOptions::default());

        assert!(has(&text, "pub struct Color(pub i8);"));
        assert!(has(&text, "pub const Red: Self = Color(0);"));
        assert!(has(&text, "pub const MIN: Self = Color::Red;"));
        assert!(has(&text, "pub const MAX: Self = Color::Blue;"));
        assert!(has(&text, "pub const ENUM_VALUES: &'static [Self] = &[Color::Red, Color::Green, Color::Blue];"));
        assert!(has(&text, "pub const ENUM_NAMES_COLOR: [&str; 3usize] = [\"Red\", \"Green\", \"Blue\"];"));
        assert!(has(&text, "#[doc = \" Composite colors\"]"));
    }

    #[test]
    fn wire_traits_use_the_underlying_scalar() {
        let text = emit("Color", &GenOptions::default());

        assert!(has(&text, "unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner { Self(unsafe { flatbuffers::read_scalar_at::<i8>(buf, loc) }) }"));
        assert!(has(&text, "type Scalar = i8;"));
        assert!(has(&text, "fn from_little_endian(v: i8) -> Self { Self(i8::from_le(v)) }"));
        assert!(has(&text, "unsafe { flatbuffers::emplace_scalar::<i8>(dst, self.0) };"));
    }

    #[test]
    fn bit_flags_get_none_any_and_operators() {
        let text = emit("Perm", &GenOptions::default());

        assert!(has(&text, "pub const NONE: Self = Perm(0);"));
        // 4 is the max, the OR of all values is 7
        assert!(has(&text, "pub const ANY: Self = Perm(7);"));
        assert!(!has(&text, "pub const MIN"));
        assert!(has(&text, "impl ::core::ops::BitOr for Perm"));
    }

    #[test]
    fn prefixed_mode_uses_module_constants() {
        let opts = GenOptions {
            scoped_enums: false,
            prefixed_enums: true,
            ..GenOptions::default()
        };
        let text = emit("Color", &opts);

        assert!(has(&text, "pub const Color_Green: Color = Color(1);"));
        assert!(has(&text, "pub const Color_MAX: Color = Color_Blue;"));
        assert!(has(&text, "Color_Red => Some(\"Red\")"));
    }

    #[test]
    fn flat_mode_has_no_range_constants() {
        let opts = GenOptions {
            scoped_enums: false,
            prefixed_enums: false,
            ..GenOptions::default()
        };
        let text = emit("Color", &opts);

        assert!(has(&text, "pub const Green: Color = Color(1);"));
        assert!(!text.contains("MIN"));
        assert!(!text.contains("MAX"));
    }

    #[test]
    fn sparse_enum_has_no_name_table() {
        let text = emit("Rank", &GenOptions::default());

        assert!(!text.contains("ENUM_NAMES_RANK"));
        assert!(has(&text, "Rank::High => Some(\"High\")"));
    }

    #[test]
    fn union_declares_owned_type_with_object_api() {
        let opts = GenOptions {
            object_api: true,
            ..GenOptions::default()
        };
        let text = emit("Equipment", &opts);

        assert!(has(&text, "pub enum EquipmentT"));
        assert!(!emit("Equipment", &GenOptions::default()).contains("EquipmentT"));
    }
}
