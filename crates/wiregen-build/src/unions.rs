use crate::{
    BuildError, CodeBuilder, Framework,
    helper::{ident, snake},
    verify::{UnionPlan, union_verifier},
};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use std::collections::BTreeSet;
use wiregen_schema::node::{EnumDef, EnumId, StructId};

///
/// Owned union
///
/// `EquipmentT` is a plain sum type: cloning deep-copies the live member,
/// assignment drops the old one, and `NONE` owns nothing.
///

pub fn owned_declaration(
    builder: &CodeBuilder,
    id: EnumId,
    def: &EnumDef,
) -> Result<TokenStream, BuildError> {
    let from = def.namespace;
    let owned = format_ident!("{}T", def.name);
    let none_val = def
        .none_value()
        .ok_or_else(|| BuildError::invariant(&def.name, "union has no NONE value"))?;
    let none = ident(&none_val.name);
    let none_tag = builder.enum_value(from, id, none_val);
    let serde = (builder.options.framework == Framework::Serde)
        .then(|| quote!(#[derive(serde::Serialize, serde::Deserialize)]));

    let plan = UnionPlan::of(def);
    if plan.members.is_empty() {
        return Err(BuildError::invariant(&def.name, "union has no members"));
    }

    let mut variants = Vec::new();
    let mut tags = Vec::new();
    let mut accessors = Vec::new();
    let mut conversions = Vec::new();
    let mut seen: BTreeSet<StructId> = BTreeSet::new();

    for (val, member) in &plan.members {
        let variant = ident(&val.name);
        let object = builder.object_path(from, *member);
        let tag = builder.enum_value(from, id, val);
        let as_ref = format_ident!("as_{}", snake(&val.name));
        let as_mut = format_ident!("as_{}_mut", snake(&val.name));
        let take = format_ident!("take_{}", snake(&val.name));

        variants.push(quote!(#variant(Box<#object>),));
        tags.push(quote!(Self::#variant(_) => #tag,));
        accessors.push(quote! {
            #[must_use]
            pub fn #as_ref(&self) -> Option<&#object> {
                if let Self::#variant(v) = self { Some(v.as_ref()) } else { None }
            }

            pub fn #as_mut(&mut self) -> Option<&mut #object> {
                if let Self::#variant(v) = self { Some(v.as_mut()) } else { None }
            }

            /// Moves the member out, leaving `NONE` behind.
            pub fn #take(&mut self) -> Option<Box<#object>> {
                match ::core::mem::take(self) {
                    Self::#variant(v) => Some(v),
                    other => {
                        *self = other;
                        None
                    }
                }
            }
        });

        // a table listed twice keeps its first case
        if seen.insert(*member) {
            conversions.push(quote! {
                impl From<#object> for #owned {
                    fn from(v: #object) -> Self {
                        Self::#variant(Box::new(v))
                    }
                }
            });
        }
    }

    let name = builder.enum_path(from, id);

    Ok(quote! {
        #[derive(Debug, Clone, PartialEq, Default)]
        #serde
        #[allow(non_camel_case_types)]
        pub enum #owned {
            #[default]
            #none,
            #(#variants)*
        }

        impl #owned {
            #[must_use]
            pub fn union_type(&self) -> #name {
                match self {
                    Self::#none => #none_tag,
                    #(#tags)*
                }
            }

            #(#accessors)*
        }

        #(#conversions)*
    })
}

/// Union items that name member tables: the verifier, and with the object
/// API the owned `pack` / `unpack`.
pub fn generate_post(
    builder: &CodeBuilder,
    id: EnumId,
    def: &EnumDef,
) -> Result<TokenStream, BuildError> {
    let mut tokens = union_verifier(builder, id, def);

    if builder.options.object_api {
        tokens.extend(owned_bridge(builder, id, def));
    }

    Ok(tokens)
}

fn owned_bridge(builder: &CodeBuilder, id: EnumId, def: &EnumDef) -> TokenStream {
    let rt = builder.rt();
    let from = def.namespace;
    let owned = format_ident!("{}T", def.name);
    let name = builder.enum_path(from, id);
    let plan = UnionPlan::of(def);
    let none = def.none_value().map_or_else(|| format_ident!("NONE"), |v| ident(&v.name));

    let packs = plan.members.iter().map(|(val, _)| {
        let variant = ident(&val.name);
        quote!(Self::#variant(v) => Some(v.pack(fbb).as_union_value()),)
    });
    let unpacks = plan.members.iter().map(|(val, member)| {
        let variant = ident(&val.name);
        let tag = builder.enum_value(from, id, val);
        let view = builder.struct_path(from, *member);
        quote! {
            (#tag, Some(t)) => Self::#variant(Box::new(#view::init_from_table(t).unpack())),
        }
    });

    quote! {
        impl #owned {
            pub fn pack<'b>(
                &self,
                fbb: &mut #rt::FlatBufferBuilder<'b>,
            ) -> Option<#rt::WIPOffset<#rt::UnionWIPOffset>> {
                match self {
                    Self::#none => None,
                    #(#packs)*
                }
            }

            /// Unknown tags, and known tags without a payload, give `NONE`.
            #[allow(unreachable_patterns)]
            #[must_use]
            pub fn unpack(table: Option<#rt::Table<'_>>, key: #name) -> Self {
                match (key, table) {
                    #(#unpacks)*
                    _ => Self::default(),
                }
            }
        }
    }
}

///
/// TESTS
///
