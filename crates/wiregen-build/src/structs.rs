use crate::{
    BuildError, CodeBuilder, Framework,
    helper::{doc_attrs, field_ident, ident},
    ty::Shape,
};
use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};
use wiregen_schema::{MAX_FIELD_PADDING, node::StructDef};

/// Byte widths of the synthetic fields that fill `padding` bytes: one
/// field per set bit, narrowest first.
pub(crate) fn padding_layout(padding: u8) -> Result<Vec<usize>, BuildError> {
    if padding > MAX_FIELD_PADDING {
        return Err(BuildError::invariant(
            "padding",
            format!("{padding} bytes exceeds the {MAX_FIELD_PADDING} byte limit"),
        ));
    }

    Ok((0..4)
        .filter(|bit| padding & (1 << bit) != 0)
        .map(|bit| 1usize << bit)
        .collect())
}

pub fn generate(builder: &CodeBuilder, def: &StructDef) -> Result<TokenStream, BuildError> {
    let mut tokens = quote!();

    tokens.extend(declaration(builder, def)?);
    tokens.extend(runtime_impls(builder, def));
    tokens.extend(inherent(builder, def));

    Ok(tokens)
}

fn declaration(builder: &CodeBuilder, def: &StructDef) -> Result<TokenStream, BuildError> {
    let docs = doc_attrs(&def.doc);
    let name = ident(&def.name);
    let size = Literal::usize_unsuffixed(def.bytesize);
    let serde = (builder.options.framework == Framework::Serde)
        .then(|| quote!(#[derive(serde::Serialize, serde::Deserialize)]));

    // every slot is a byte array, so the record has alignment 1 and can be
    // viewed in place at any buffer offset
    let mut fields = Vec::new();
    let mut pad = 0usize;
    for field in &def.fields {
        let slot = format_ident!("{}_", field_ident(&field.name));
        let ty = match builder.shape(&field.ty) {
            Shape::Struct(id) => builder.struct_path(def.namespace, id),
            other => {
                let width = Literal::usize_unsuffixed(builder.inline_width(&other));
                quote!([u8; #width])
            }
        };
        fields.push(quote!(#slot: #ty,));

        let widths = padding_layout(field.padding)
            .map_err(|_| BuildError::invariant(&format!("{}.{}", def.name, field.name), "padding out of range"))?;
        for width in widths {
            let pad_ident = format_ident!("padding{pad}__");
            let width = Literal::usize_unsuffixed(width);
            fields.push(quote!(#pad_ident: [u8; #width],));
            pad += 1;
        }
    }

    Ok(quote! {
        #docs
        #[derive(Clone, Copy, Default, PartialEq)]
        #serde
        #[repr(C)]
        pub struct #name {
            #(#fields)*
        }

        const _: () = assert!(::core::mem::size_of::<#name>() == #size);
    })
}

fn runtime_impls(builder: &CodeBuilder, def: &StructDef) -> TokenStream {
    let rt = builder.rt();
    let name = ident(&def.name);
    let align = Literal::usize_unsuffixed(def.minalign);

    quote! {
        impl<'a> #rt::Follow<'a> for #name {
            type Inner = &'a #name;
            #[inline]
            unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner {
                unsafe { <&'a #name as #rt::Follow<'a>>::follow(buf, loc) }
            }
        }

        impl<'a> #rt::Follow<'a> for &'a #name {
            type Inner = &'a #name;
            #[inline]
            unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner {
                unsafe { #rt::follow_cast_ref::<#name>(buf, loc) }
            }
        }

        impl #rt::Push for #name {
            type Output = #name;
            #[inline]
            unsafe fn push(&self, dst: &mut [u8], _written_len: usize) {
                // SAFETY: repr(C) over byte arrays, so every byte is initialized
                let src = unsafe {
                    ::core::slice::from_raw_parts(
                        (self as *const #name).cast::<u8>(),
                        ::core::mem::size_of::<#name>(),
                    )
                };
                dst.copy_from_slice(src);
            }
            #[inline]
            fn alignment() -> #rt::PushAlignment {
                #rt::PushAlignment::new(#align)
            }
        }

        impl #rt::Verifiable for #name {
            #[inline]
            fn run_verifier(
                v: &mut #rt::Verifier,
                pos: usize,
            ) -> Result<(), #rt::InvalidFlatbuffer> {
                v.in_buffer::<Self>(pos)
            }
        }

        impl #rt::SimpleToVerifyInSlice for #name {}
    }
}

fn inherent(builder: &CodeBuilder, def: &StructDef) -> TokenStream {
    let name = ident(&def.name);
    let label = def.name.as_str();
    let from = def.namespace;
    let opts = builder.options;

    let mut params = Vec::new();
    let mut inits = Vec::new();
    let mut accessors = Vec::new();
    let mut mutators = Vec::new();
    let mut debug_fields = Vec::new();

    let mut pad = 0usize;
    for field in &def.fields {
        let arg = field_ident(&field.name);
        let slot = format_ident!("{}_", arg);
        let docs = doc_attrs(&field.doc);
        let shape = builder.shape(&field.ty);
        let field_label = field.name.as_str();

        debug_fields.push(quote!(.field(#field_label, &self.#arg())));

        if let Shape::Struct(id) = shape {
            let path = builder.struct_path(from, id);
            let arg_mut = format_ident!("{}_mut", arg);

            params.push(quote!(#arg: &#path));
            inits.push(quote!(#slot: *#arg,));
            accessors.push(quote! {
                #docs
                #[must_use]
                pub const fn #arg(&self) -> &#path {
                    &self.#slot
                }
            });
            mutators.push(quote! {
                pub const fn #arg_mut(&mut self) -> &mut #path {
                    &mut self.#slot
                }
            });
        } else {
            let logical = builder.logical_type(from, &shape);
            let encoded = CodeBuilder::to_le_bytes(&shape, quote!(#arg));
            let decoded = builder.from_le_bytes(from, &shape, quote!(self.#slot));
            let setter = format_ident!("set_{}", arg);

            params.push(quote!(#arg: #logical));
            inits.push(quote!(#slot: #encoded,));
            accessors.push(quote! {
                #docs
                #[must_use]
                pub fn #arg(&self) -> #logical {
                    #decoded
                }
            });
            mutators.push(quote! {
                pub fn #setter(&mut self, #arg: #logical) {
                    self.#slot = #encoded;
                }
            });
        }

        // a field's padding is always in range once the declaration rendered
        for width in 0..4u32 {
            if field.padding & (1 << width) != 0 {
                let pad_ident = format_ident!("padding{pad}__");
                let width = Literal::usize_unsuffixed(1 << width);
                inits.push(quote!(#pad_ident: [0; #width],));
                pad += 1;
            }
        }
    }

    let mutators = (opts.mutable_buffer || opts.object_api).then(|| quote!(#(#mutators)*));
    let fqn = opts.name_strings.then(|| {
        let fqn = builder.schema.fully_qualified_name(def.namespace, &def.name);
        quote! {
            pub const fn get_fully_qualified_name() -> &'static str {
                #fqn
            }
        }
    });

    quote! {
        impl #name {
            #[allow(clippy::too_many_arguments)]
            #[must_use]
            pub fn new(#(#params),*) -> Self {
                Self {
                    #(#inits)*
                }
            }

            #fqn

            #(#accessors)*

            #mutators
        }

        impl ::core::fmt::Debug for #name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
                f.debug_struct(#label)
                    #(#debug_fields)*
                    .finish()
            }
        }
    }
}

///
/// TESTS
///
