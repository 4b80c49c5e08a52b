//! Owned mirrors of tables (`MonsterT`) and the pack/unpack bridge.
//!
//! Union discriminant fields have no slot of their own in the mirror;
//! the owned union carries its tag.

use crate::{
    BuildError, CodeBuilder, Framework,
    helper::{field_ident, ident},
    tables::{Slot, slots},
    ty::Shape,
};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use wiregen_schema::{
    UNION_TYPE_SUFFIX,
    node::{FieldDef, StructDef},
};

fn object_ident(def: &StructDef) -> Ident {
    format_ident!("{}T", def.name)
}

fn is_union_tag(builder: &CodeBuilder, slot: &Slot) -> bool {
    matches!(slot.shape, Shape::Enum(_, id) if builder.schema.enum_def(id).is_union)
}

// the union field a discriminant belongs to, if it is still live
fn union_for_tag<'a>(def: &'a StructDef, slot: &Slot) -> Option<&'a FieldDef> {
    slot.field
        .name
        .strip_suffix(UNION_TYPE_SUFFIX)
        .and_then(|name| def.field(name))
}

pub fn declaration(builder: &CodeBuilder, def: &StructDef) -> Result<TokenStream, BuildError> {
    let from = def.namespace;
    let object = object_ident(def);
    let serde = (builder.options.framework == Framework::Serde)
        .then(|| quote!(#[derive(serde::Serialize, serde::Deserialize)]));

    let mut fields = Vec::new();
    let mut defaults = Vec::new();
    for slot in slots(builder, def) {
        if is_union_tag(builder, &slot) {
            continue;
        }
        let f = &slot.ident;
        let ty = builder.native_type(from, &slot.shape);
        let default = if slot.shape.is_scalar() {
            builder.logical_default(from, slot.field)?
        } else {
            quote!(Default::default())
        };

        fields.push(quote!(pub #f: #ty,));
        defaults.push(quote!(#f: #default,));
    }

    Ok(quote! {
        #[derive(Debug, Clone, PartialEq)]
        #serde
        pub struct #object {
            #(#fields)*
        }

        impl Default for #object {
            fn default() -> Self {
                Self {
                    #(#defaults)*
                }
            }
        }
    })
}

/// `unpack` / `unpack_to` on the view and `pack` on the mirror.
pub fn generate_post(builder: &CodeBuilder, def: &StructDef) -> Result<TokenStream, BuildError> {
    let rt = builder.rt();
    let from = def.namespace;
    let name = ident(&def.name);
    let object = object_ident(def);
    let args = format_ident!("{}Args", def.name);

    let mut unpacks = Vec::new();
    let mut builds = Vec::new();
    let mut forwards = Vec::new();

    for slot in slots(builder, def) {
        let f = &slot.ident;
        let required = slot.field.required;

        if is_union_tag(builder, &slot) {
            let union = union_for_tag(def, &slot).ok_or_else(|| {
                BuildError::invariant(&slot.field.name, "union discriminant without its union field")
            })?;
            if union.deprecated {
                forwards.push(quote!(#f: Default::default(),));
            } else {
                let union = field_ident(&union.name);
                forwards.push(quote!(#f: self.#union.union_type(),));
            }
            continue;
        }

        match &slot.shape {
            Shape::Scalar(_) | Shape::Enum(..) => {
                unpacks.push(quote!(o.#f = self.#f();));
                forwards.push(quote!(#f: self.#f,));
            }
            Shape::Struct(_) => {
                unpacks.push(if required {
                    quote!(o.#f = Some(*self.#f());)
                } else {
                    quote!(o.#f = self.#f().copied();)
                });
                forwards.push(quote!(#f: self.#f.as_ref(),));
            }
            Shape::String => {
                unpacks.push(if required {
                    quote!(o.#f = self.#f().to_owned();)
                } else {
                    quote!(o.#f = self.#f().map(str::to_owned).unwrap_or_default();)
                });
                builds.push(sequence(required, f, quote!(_fbb.create_string(&self.#f))));
                forwards.push(quote!(#f,));
            }
            Shape::Table(_) => {
                unpacks.push(if required {
                    quote!(o.#f = Some(Box::new(self.#f().unpack()));)
                } else {
                    quote!(o.#f = self.#f().map(|t| Box::new(t.unpack()));)
                });
                builds.push(quote!(let #f = self.#f.as_ref().map(|t| t.pack(_fbb));));
                forwards.push(quote!(#f,));
            }
            Shape::Union(id) => {
                let union_object = builder.enum_item_path(
                    from,
                    *id,
                    &format_ident!("{}T", builder.schema.enum_def(*id).name),
                );
                let tag = field_ident(&format!("{}{UNION_TYPE_SUFFIX}", slot.field.name));
                let table = if required {
                    quote!(Some(self.#f()))
                } else {
                    quote!(self.#f())
                };

                unpacks.push(quote!(o.#f = #union_object::unpack(#table, self.#tag());));
                builds.push(quote!(let #f = self.#f.pack(_fbb);));
                forwards.push(quote!(#f,));
            }
            Shape::Vector(elem) => {
                let (translate, pack) = match elem.as_ref() {
                    Shape::String => (
                        quote!(e.to_owned()),
                        Some(quote!(self.#f.iter().map(|s| _fbb.create_string(s)).collect())),
                    ),
                    Shape::Table(_) => (
                        quote!(e.unpack()),
                        Some(quote!(self.#f.iter().map(|t| t.pack(_fbb)).collect())),
                    ),
                    Shape::Struct(_) => (quote!(*e), None),
                    _ => (quote!(e), None),
                };

                let source = if required {
                    quote!(Some(self.#f()))
                } else {
                    quote!(self.#f())
                };
                unpacks.push(quote! {
                    o.#f.clear();
                    if let Some(v) = #source {
                        o.#f.reserve(v.len());
                        for e in v.iter() {
                            o.#f.push(#translate);
                        }
                    }
                });

                let create = match pack {
                    Some(offsets) => quote! {{
                        let offsets: Vec<_> = #offsets;
                        _fbb.create_vector(&offsets)
                    }},
                    None => quote!(_fbb.create_vector(&self.#f)),
                };
                builds.push(sequence(required, f, create));
                forwards.push(quote!(#f,));
            }
        }
    }

    Ok(quote! {
        impl #name<'_> {
            #[must_use]
            pub fn unpack(&self) -> #object {
                let mut o = #object::default();
                self.unpack_to(&mut o);
                o
            }

            /// Overwrite `o` with this table's contents, reusing its buffers.
            pub fn unpack_to(&self, o: &mut #object) {
                #(#unpacks)*
            }
        }

        impl #object {
            pub fn pack<'b>(
                &self,
                _fbb: &mut #rt::FlatBufferBuilder<'b>,
            ) -> #rt::WIPOffset<#name<'b>> {
                #(#builds)*
                #name::create(
                    _fbb,
                    &#args {
                        #(#forwards)*
                    },
                )
            }
        }
    })
}

// empty sequences pack to an unset offset unless the field is required
fn sequence(required: bool, f: &Ident, create: TokenStream) -> TokenStream {
    if required {
        quote!(let #f = Some(#create);)
    } else {
        quote!(let #f = (!self.#f.is_empty()).then(|| #create);)
    }
}

///
/// TESTS
///
