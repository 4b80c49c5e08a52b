use crate::{
    BuildError, CodeBuilder,
    helper::{doc_attrs, field_ident, ident, lifetime, snake, vt_ident},
    object,
    ty::Shape,
    verify,
};
use proc_macro2::{Ident, Literal, TokenStream};
use quote::{format_ident, quote};
use std::cmp::Reverse;
use syn::Lifetime;
use wiregen_schema::{
    UNION_TYPE_SUFFIX,
    node::{FieldDef, NamespaceId, StructDef, StructId},
};

///
/// Slot
///
/// One live table field with its resolved shape and names.
///

pub(crate) struct Slot<'d> {
    pub field: &'d FieldDef,
    pub shape: Shape,
    pub ident: Ident,
    pub vt: Ident,
}

pub(crate) fn slots<'d>(builder: &CodeBuilder, def: &'d StructDef) -> Vec<Slot<'d>> {
    def.live_fields()
        .map(|field| Slot {
            field,
            shape: builder.shape(&field.ty),
            ident: field_ident(&field.name),
            vt: vt_ident(&field.name),
        })
        .collect()
}

/// Fields in the order `create` adds them: reverse declaration order,
/// widest first when the table asks for size sorting.
pub(crate) fn create_order(def: &StructDef, honor_sort_by_size: bool) -> Vec<&FieldDef> {
    let mut order: Vec<_> = def.live_fields().collect();
    order.reverse();

    if def.sort_by_size && honor_sort_by_size {
        order.sort_by_key(|f| Reverse(f.ty.slot_width()));
    }

    order
}

/// Uninhabited marker naming a finished table offset.
pub fn offset_marker(def: &StructDef) -> TokenStream {
    let marker = format_ident!("{}Offset", def.name);

    quote!(pub enum #marker {})
}

pub fn generate(builder: &CodeBuilder, def: &StructDef) -> Result<TokenStream, BuildError> {
    let slots = slots(builder, def);
    let mut tokens = quote!();

    tokens.extend(view(builder, def, &slots)?);
    if builder.options.mutable_buffer {
        tokens.extend(mutable_view(builder, def, &slots)?);
    }
    tokens.extend(verify::generate(builder, def));
    tokens.extend(args(builder, def, &slots)?);
    tokens.extend(table_builder(builder, def, &slots)?);

    if slots.iter().any(|s| matches!(s.shape, Shape::String | Shape::Vector(_))) {
        tokens.extend(direct(builder, def, &slots)?);
    }

    if builder.options.object_api {
        tokens.extend(object::declaration(builder, def)?);
    }

    Ok(tokens)
}

// ---------------------------------------------------------------------------
// Read view
// ---------------------------------------------------------------------------

fn view(builder: &CodeBuilder, def: &StructDef, slots: &[Slot]) -> Result<TokenStream, BuildError> {
    let rt = builder.rt();
    let docs = doc_attrs(&def.doc);
    let name = ident(&def.name);
    let lt = lifetime("a");

    let vts = slots.iter().map(|s| {
        let vt = &s.vt;
        let offset = Literal::usize_unsuffixed(s.field.offset);
        quote!(pub const #vt: #rt::VOffsetT = #offset;)
    });

    let mut accessors = Vec::new();
    for slot in slots {
        accessors.push(accessor(builder, def, slot, &lt)?);
        accessors.push(union_accessors(builder, def, slot, &lt));
        accessors.push(nested_accessor(builder, def, slot, &lt));
    }

    let key = slots
        .iter()
        .find(|s| s.field.key)
        .map(|s| key_compare(builder, def, s));

    let fqn = builder.options.name_strings.then(|| {
        let fqn = builder.schema.fully_qualified_name(def.namespace, &def.name);
        quote! {
            pub const fn get_fully_qualified_name() -> &'static str {
                #fqn
            }
        }
    });

    let create = create(builder, def, slots);

    Ok(quote! {
        #docs
        #[derive(Copy, Clone, PartialEq)]
        pub struct #name<#lt> {
            pub _tab: #rt::Table<#lt>,
        }

        impl<#lt> #rt::Follow<#lt> for #name<#lt> {
            type Inner = #name<#lt>;
            #[inline]
            unsafe fn follow(buf: &#lt [u8], loc: usize) -> Self::Inner {
                Self {
                    _tab: unsafe { #rt::Table::new(buf, loc) },
                }
            }
        }

        impl<#lt> #name<#lt> {
            #(#vts)*

            #fqn

            #[inline]
            #[must_use]
            pub const fn init_from_table(table: #rt::Table<#lt>) -> Self {
                Self { _tab: table }
            }

            #create

            #(#accessors)*

            #key
        }
    })
}

fn accessor(
    builder: &CodeBuilder,
    def: &StructDef,
    slot: &Slot,
    lt: &Lifetime,
) -> Result<TokenStream, BuildError> {
    let from = def.namespace;
    let (f, vt) = (&slot.ident, &slot.vt);
    let docs = doc_attrs(&slot.field.doc);

    if slot.shape.is_scalar() {
        let raw = CodeBuilder::raw_type(&slot.shape);
        let logical = builder.logical_type(from, &slot.shape);
        let default = CodeBuilder::raw_default(slot.field)?;
        let read = builder.cast_from(
            from,
            &slot.shape,
            quote!(unsafe { self._tab.get::<#raw>(Self::#vt, Some(#default)) }.unwrap_or(#default)),
        );

        return Ok(quote! {
            #docs
            #[inline]
            #[must_use]
            pub fn #f(&self) -> #logical {
                #read
            }
        });
    }

    let follow = builder.field_follow(from, &slot.shape, lt);
    let view = builder.view_type(from, &slot.shape, lt);

    Ok(if slot.field.required {
        quote! {
            #docs
            #[inline]
            #[must_use]
            pub fn #f(&self) -> #view {
                unsafe { self._tab.get::<#follow>(Self::#vt, None) }.unwrap()
            }
        }
    } else {
        quote! {
            #docs
            #[inline]
            #[must_use]
            pub fn #f(&self) -> Option<#view> {
                unsafe { self._tab.get::<#follow>(Self::#vt, None) }
            }
        }
    })
}

// `equipped_as_weapon()` per union member
fn union_accessors(builder: &CodeBuilder, def: &StructDef, slot: &Slot, lt: &Lifetime) -> TokenStream {
    let Shape::Union(union) = slot.shape else {
        return quote!();
    };
    let from = def.namespace;
    let f = &slot.ident;
    let tag = field_ident(&format!("{}{UNION_TYPE_SUFFIX}", slot.field.name));
    let value = if slot.field.required {
        quote!(Some(self.#f()))
    } else {
        quote!(self.#f())
    };

    let items = builder.schema.enum_def(union).members().map(|(val, member)| {
        let fn_name = format_ident!("{}_as_{}", snake(&slot.field.name), snake(&val.name));
        let member = builder.struct_path(from, member);
        let tag_value = builder.enum_value(from, union, val);

        quote! {
            #[inline]
            #[must_use]
            pub fn #fn_name(&self) -> Option<#member<#lt>> {
                if self.#tag() == #tag_value {
                    #value.map(#member::init_from_table)
                } else {
                    None
                }
            }
        }
    });

    quote!(#(#items)*)
}

// `<field>_nested_flatbuffer()` for byte vectors holding a whole buffer
fn nested_accessor(builder: &CodeBuilder, def: &StructDef, slot: &Slot, lt: &Lifetime) -> TokenStream {
    let Some(root) = slot.field.nested_root else {
        return quote!();
    };
    let rt = builder.rt();
    let f = &slot.ident;
    let fn_name = format_ident!("{}_nested_flatbuffer", f);
    let root = builder.struct_path(def.namespace, root);
    let read = if slot.field.required {
        quote!(#rt::root::<#root<#lt>>(self.#f().bytes()).ok())
    } else {
        quote!(self.#f().and_then(|data| #rt::root::<#root<#lt>>(data.bytes()).ok()))
    };

    quote! {
        /// The nested buffer, if present and valid.
        #[inline]
        #[must_use]
        pub fn #fn_name(&self) -> Option<#root<#lt>> {
            #read
        }
    }
}

fn key_compare(builder: &CodeBuilder, def: &StructDef, slot: &Slot) -> TokenStream {
    let name = ident(&def.name);
    let f = &slot.ident;
    let value = |owner: TokenStream| {
        if matches!(slot.shape, Shape::String) && !slot.field.required {
            quote!(#owner.#f().unwrap_or_default())
        } else {
            quote!(#owner.#f())
        }
    };
    let (mine, theirs) = (value(quote!(self)), value(quote!(o)));

    let (arg_ty, compare) = match &slot.shape {
        Shape::String => (quote!(&str), quote!(#mine.cmp(val))),
        Shape::Scalar(kind) if kind.is_float() => {
            let ty = kind.rust_type();
            (ty, quote!(#mine.total_cmp(&val)))
        }
        other => (
            builder.logical_type(def.namespace, other),
            quote!(#mine.cmp(&val)),
        ),
    };

    quote! {
        #[inline]
        #[must_use]
        pub fn key_compare_less_than(&self, o: &#name<'_>) -> bool {
            self.key_compare_with_value(#theirs) == ::core::cmp::Ordering::Less
        }

        #[inline]
        #[must_use]
        pub fn key_compare_with_value(&self, val: #arg_ty) -> ::core::cmp::Ordering {
            #compare
        }
    }
}

// ---------------------------------------------------------------------------
// Mutable view
// ---------------------------------------------------------------------------

fn mut_path(builder: &CodeBuilder, from: Option<NamespaceId>, id: StructId) -> TokenStream {
    let name = format_ident!("{}Mut", builder.schema.struct_def(id).name);

    builder.struct_item_path(from, id, &name)
}

fn mutable_view(
    builder: &CodeBuilder,
    def: &StructDef,
    slots: &[Slot],
) -> Result<TokenStream, BuildError> {
    let rt = builder.rt();
    let from = def.namespace;
    let name = ident(&def.name);
    let name_mut = format_ident!("{}Mut", def.name);

    let mut methods = Vec::new();
    for slot in slots {
        let (f, vt) = (&slot.ident, &slot.vt);
        let mutable = format_ident!("mutable_{}", f);

        match &slot.shape {
            Shape::Scalar(_) | Shape::Enum(..) => {
                let mutate = format_ident!("mutate_{}", f);
                let logical = builder.logical_type(from, &slot.shape);
                let bytes = CodeBuilder::to_le_bytes(&slot.shape, quote!(#f));
                let raw = CodeBuilder::cast_to(&slot.shape, quote!(#f));
                let default = CodeBuilder::raw_default(slot.field)?;

                methods.push(quote! {
                    /// Returns `false` when the field is absent and the value
                    /// is not its default.
                    #[inline]
                    pub fn #mutate(&mut self, #f: #logical) -> bool {
                        match self.field_loc(#name::#vt) {
                            Some(loc) => self.write(loc, #bytes),
                            None => #raw == #default,
                        }
                    }
                });
            }
            Shape::Struct(id) => {
                let path = builder.struct_path(from, *id);

                methods.push(quote! {
                    #[inline]
                    pub fn #mutable(&mut self) -> Option<&mut #path> {
                        let loc = self.field_loc(#name::#vt)?;
                        let end = loc.checked_add(::core::mem::size_of::<#path>())?;
                        let bytes = self.buf.get_mut(loc..end)?;
                        // SAFETY: fixed records are byte arrays, alignment 1
                        Some(unsafe { &mut *bytes.as_mut_ptr().cast::<#path>() })
                    }
                });
            }
            Shape::Table(id) => {
                let target = mut_path(builder, from, *id);

                methods.push(quote! {
                    #[inline]
                    pub fn #mutable(&mut self) -> Option<#target<'_>> {
                        let loc = self.deref_loc(#name::#vt)?;
                        Some(#target::init_from_buf(&mut *self.buf, loc))
                    }
                });
            }
            Shape::String => {
                methods.push(quote! {
                    /// The string's bytes, terminator excluded.
                    #[inline]
                    pub fn #mutable(&mut self) -> Option<&mut [u8]> {
                        let loc = self.deref_loc(#name::#vt)?;
                        self.string_bytes(loc)
                    }
                });
            }
            Shape::Union(union) => {
                let tag_vt = vt_ident(&format!("{}{UNION_TYPE_SUFFIX}", slot.field.name));

                for (val, member) in builder.schema.enum_def(*union).members() {
                    let fn_name = format_ident!(
                        "mutable_{}_as_{}",
                        snake(&slot.field.name),
                        snake(&val.name)
                    );
                    let target = mut_path(builder, from, member);
                    let tag = builder.enum_value(from, *union, val);

                    methods.push(quote! {
                        #[inline]
                        pub fn #fn_name(&mut self) -> Option<#target<'_>> {
                            let live = self
                                .field_loc(#name::#tag_vt)
                                .and_then(|loc| self.buf.get(loc).copied())
                                .unwrap_or(0);
                            if live != #tag.0 {
                                return None;
                            }
                            let loc = self.deref_loc(#name::#vt)?;
                            Some(#target::init_from_buf(&mut *self.buf, loc))
                        }
                    });
                }
            }
            Shape::Vector(elem) => match elem.as_ref() {
                Shape::Scalar(_) | Shape::Enum(..) => {
                    let mutate = format_ident!("mutate_{}", f);
                    let logical = builder.logical_type(from, elem);
                    let bytes = CodeBuilder::to_le_bytes(elem, quote!(value));
                    let width = Literal::usize_unsuffixed(builder.inline_width(elem));

                    methods.push(quote! {
                        /// Overwrites element `index`; `false` when the vector is
                        /// absent or shorter.
                        #[inline]
                        pub fn #mutate(&mut self, index: usize, value: #logical) -> bool {
                            self.element_loc(#name::#vt, index, #width)
                                .is_some_and(|loc| self.write(loc, #bytes))
                        }
                    });
                }
                Shape::Struct(id) => {
                    let path = builder.struct_path(from, *id);

                    methods.push(quote! {
                        #[inline]
                        pub fn #mutable(&mut self) -> Option<&mut [#path]> {
                            let loc = self.deref_loc(#name::#vt)?;
                            let len = self.len_at(loc)?;
                            let start = loc.checked_add(4)?;
                            let end = start.checked_add(len.checked_mul(::core::mem::size_of::<#path>())?)?;
                            let bytes = self.buf.get_mut(start..end)?;
                            // SAFETY: `len` byte-array records, alignment 1
                            Some(unsafe {
                                ::core::slice::from_raw_parts_mut(bytes.as_mut_ptr().cast::<#path>(), len)
                            })
                        }
                    });
                }
                Shape::String => {
                    methods.push(quote! {
                        /// Bytes of string `index`, terminator excluded.
                        #[inline]
                        pub fn #mutable(&mut self, index: usize) -> Option<&mut [u8]> {
                            let loc = self.element_loc(#name::#vt, index, 4)?;
                            let loc = self.follow_offset(loc)?;
                            self.string_bytes(loc)
                        }
                    });
                }
                Shape::Table(id) => {
                    let target = mut_path(builder, from, *id);

                    methods.push(quote! {
                        #[inline]
                        pub fn #mutable(&mut self, index: usize) -> Option<#target<'_>> {
                            let loc = self.element_loc(#name::#vt, index, 4)?;
                            let loc = self.follow_offset(loc)?;
                            Some(#target::init_from_buf(&mut *self.buf, loc))
                        }
                    });
                }
                // rejected by schema validation
                Shape::Union(_) | Shape::Vector(_) => {}
            },
        }
    }

    Ok(quote! {
        /// In-place editor over a finished buffer. Every access is
        /// bounds-checked; nothing can be resized or moved.
        pub struct #name_mut<'a> {
            buf: &'a mut [u8],
            loc: usize,
        }

        impl<'a> #name_mut<'a> {
            /// The table starting at `loc` in `buf`.
            #[inline]
            #[must_use]
            pub fn init_from_buf(buf: &'a mut [u8], loc: usize) -> Self {
                Self { buf, loc }
            }

            #(#methods)*
        }

        #[allow(dead_code)]
        impl #name_mut<'_> {
            #[inline]
            fn bytes<const N: usize>(&self, loc: usize) -> Option<[u8; N]> {
                self.buf.get(loc..loc.checked_add(N)?)?.try_into().ok()
            }

            #[inline]
            fn write<const N: usize>(&mut self, loc: usize, bytes: [u8; N]) -> bool {
                match loc.checked_add(N).and_then(|end| self.buf.get_mut(loc..end)) {
                    Some(dst) => {
                        dst.copy_from_slice(&bytes);
                        true
                    }
                    None => false,
                }
            }

            // position of a field that is present in the vtable
            fn field_loc(&self, slot: #rt::VOffsetT) -> Option<usize> {
                let soffset = i32::from_le_bytes(self.bytes(self.loc)?);
                let vtable = self
                    .loc
                    .checked_add_signed(isize::try_from(soffset).ok()?.checked_neg()?)?;
                if slot >= u16::from_le_bytes(self.bytes(vtable)?) {
                    return None;
                }
                let offset = u16::from_le_bytes(self.bytes(vtable + usize::from(slot))?);

                (offset != 0).then(|| self.loc + usize::from(offset))
            }

            fn follow_offset(&self, loc: usize) -> Option<usize> {
                let offset = u32::from_le_bytes(self.bytes(loc)?);

                loc.checked_add(usize::try_from(offset).ok()?)
            }

            fn deref_loc(&self, slot: #rt::VOffsetT) -> Option<usize> {
                self.follow_offset(self.field_loc(slot)?)
            }

            fn len_at(&self, loc: usize) -> Option<usize> {
                usize::try_from(u32::from_le_bytes(self.bytes(loc)?)).ok()
            }

            fn element_loc(&self, slot: #rt::VOffsetT, index: usize, width: usize) -> Option<usize> {
                let vector = self.deref_loc(slot)?;
                if index >= self.len_at(vector)? {
                    return None;
                }

                vector.checked_add(4)?.checked_add(index.checked_mul(width)?)
            }

            fn string_bytes(&mut self, loc: usize) -> Option<&mut [u8]> {
                let len = self.len_at(loc)?;
                let start = loc.checked_add(4)?;

                self.buf.get_mut(start..start.checked_add(len)?)
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

fn needs_lifetime(slots: &[Slot]) -> bool {
    slots.iter().any(|s| !s.shape.is_scalar())
}

fn args_ident(def: &StructDef) -> Ident {
    format_ident!("{}Args", def.name)
}

fn args(builder: &CodeBuilder, def: &StructDef, slots: &[Slot]) -> Result<TokenStream, BuildError> {
    let from = def.namespace;
    let args = args_ident(def);
    let lt = lifetime("a");
    let generics = needs_lifetime(slots).then(|| quote!(<#lt>));

    let mut fields = Vec::new();
    let mut defaults = Vec::new();
    for slot in slots {
        let f = &slot.ident;
        let (ty, default) = match &slot.shape {
            shape @ (Shape::Scalar(_) | Shape::Enum(..)) => (
                builder.logical_type(from, shape),
                builder.logical_default(from, slot.field)?,
            ),
            Shape::Struct(id) => {
                let path = builder.struct_path(from, *id);
                (quote!(Option<&#lt #path>), quote!(None))
            }
            shape => {
                let wip = builder.wip_type(from, shape, &lt);
                (quote!(Option<#wip>), quote!(None))
            }
        };
        fields.push(quote!(pub #f: #ty,));
        defaults.push(quote!(#f: #default,));
    }

    Ok(quote! {
        pub struct #args #generics {
            #(#fields)*
        }

        impl #generics Default for #args #generics {
            #[inline]
            fn default() -> Self {
                Self {
                    #(#defaults)*
                }
            }
        }
    })
}

// `Name::create`, emitted inside the view's impl block
fn create(builder: &CodeBuilder, def: &StructDef, slots: &[Slot]) -> TokenStream {
    let rt = builder.rt();
    let name = ident(&def.name);
    let builder_name = format_ident!("{}Builder", def.name);
    let args = args_ident(def);
    let args_ty = if needs_lifetime(slots) {
        quote!(#args<'args>)
    } else {
        quote!(#args)
    };

    let adds = create_order(def, builder.options.honor_sort_by_size)
        .into_iter()
        .map(|field| {
            let f = field_ident(&field.name);
            let add = format_ident!("add_{}", f);
            if builder.shape(&field.ty).is_scalar() {
                quote!(builder.#add(args.#f);)
            } else {
                quote! {
                    if let Some(x) = args.#f {
                        builder.#add(x);
                    }
                }
            }
        });

    quote! {
        #[allow(unused_mut, unused_variables)]
        pub fn create<'bldr: 'args, 'args: 'mut_bldr, 'mut_bldr>(
            _fbb: &'mut_bldr mut #rt::FlatBufferBuilder<'bldr>,
            args: &'args #args_ty,
        ) -> #rt::WIPOffset<#name<'bldr>> {
            let mut builder = #builder_name::new(_fbb);
            #(#adds)*
            builder.finish()
        }
    }
}

fn table_builder(
    builder: &CodeBuilder,
    def: &StructDef,
    slots: &[Slot],
) -> Result<TokenStream, BuildError> {
    let rt = builder.rt();
    let from = def.namespace;
    let name = ident(&def.name);
    let builder_name = format_ident!("{}Builder", def.name);
    let lt = lifetime("b");

    let mut adds = Vec::new();
    for slot in slots {
        let (f, vt) = (&slot.ident, &slot.vt);
        let add = format_ident!("add_{}", f);

        adds.push(match &slot.shape {
            shape @ (Shape::Scalar(_) | Shape::Enum(..)) => {
                let raw = CodeBuilder::raw_type(shape);
                let logical = builder.logical_type(from, shape);
                let value = CodeBuilder::cast_to(shape, quote!(#f));
                let default = CodeBuilder::raw_default(slot.field)?;
                quote! {
                    #[inline]
                    pub fn #add(&mut self, #f: #logical) {
                        self.fbb_.push_slot::<#raw>(#name::#vt, #value, #default);
                    }
                }
            }
            Shape::Struct(id) => {
                let path = builder.struct_path(from, *id);
                quote! {
                    #[inline]
                    pub fn #add(&mut self, #f: &#path) {
                        self.fbb_.push_slot_always::<#path>(#name::#vt, *#f);
                    }
                }
            }
            shape => {
                let wip = builder.wip_type(from, shape, &lt);
                quote! {
                    #[inline]
                    pub fn #add(&mut self, #f: #wip) {
                        self.fbb_.push_slot_always::<#wip>(#name::#vt, #f);
                    }
                }
            }
        });
    }

    let required = slots.iter().filter(|s| s.field.required).map(|s| {
        let vt = &s.vt;
        let label = &s.field.name;
        quote!(self.fbb_.required(o, #name::#vt, #label);)
    });

    Ok(quote! {
        pub struct #builder_name<'a: #lt, #lt> {
            fbb_: &#lt mut #rt::FlatBufferBuilder<'a>,
            start_: #rt::WIPOffset<#rt::TableUnfinishedWIPOffset>,
        }

        impl<'a: #lt, #lt> #builder_name<'a, #lt> {
            #(#adds)*

            #[inline]
            pub fn new(_fbb: &#lt mut #rt::FlatBufferBuilder<'a>) -> Self {
                let start = _fbb.start_table();
                Self {
                    fbb_: _fbb,
                    start_: start,
                }
            }

            #[inline]
            pub fn finish(self) -> #rt::WIPOffset<#name<'a>> {
                let o = self.fbb_.end_table(self.start_);
                #(#required)*
                #rt::WIPOffset::new(o.value())
            }
        }
    })
}

// `NameDirectArgs` and `Name::create_direct`
fn direct(builder: &CodeBuilder, def: &StructDef, slots: &[Slot]) -> Result<TokenStream, BuildError> {
    let rt = builder.rt();
    let from = def.namespace;
    let name = ident(&def.name);
    let args = args_ident(def);
    let direct_args = format_ident!("{}DirectArgs", def.name);
    let lt = lifetime("a");

    let mut fields = Vec::new();
    let mut defaults = Vec::new();
    let mut builds = Vec::new();
    let mut forwards = Vec::new();
    for slot in slots {
        let f = &slot.ident;
        let (ty, default) = match &slot.shape {
            shape @ (Shape::Scalar(_) | Shape::Enum(..)) => (
                builder.logical_type(from, shape),
                builder.logical_default(from, slot.field)?,
            ),
            Shape::Struct(id) => {
                let path = builder.struct_path(from, *id);
                (quote!(Option<&#lt #path>), quote!(None))
            }
            Shape::String => (quote!(Option<&#lt str>), quote!(None)),
            Shape::Vector(elem) => {
                let elem = builder.direct_element(from, elem, &lt);
                (quote!(Option<&#lt [#elem]>), quote!(None))
            }
            shape => {
                let wip = builder.wip_type(from, shape, &lt);
                (quote!(Option<#wip>), quote!(None))
            }
        };
        fields.push(quote!(pub #f: #ty,));
        defaults.push(quote!(#f: #default,));

        match slot.shape {
            Shape::String => {
                builds.push(quote!(let #f = args.#f.map(|v| _fbb.create_string(v));));
                forwards.push(quote!(#f,));
            }
            Shape::Vector(_) => {
                builds.push(quote!(let #f = args.#f.map(|v| _fbb.create_vector(v));));
                forwards.push(quote!(#f,));
            }
            _ => forwards.push(quote!(#f: args.#f,)),
        }
    }

    Ok(quote! {
        pub struct #direct_args<#lt> {
            #(#fields)*
        }

        impl<#lt> Default for #direct_args<#lt> {
            #[inline]
            fn default() -> Self {
                Self {
                    #(#defaults)*
                }
            }
        }

        impl #name<'_> {
            /// Like `create`, building strings and vectors from plain slices.
            pub fn create_direct<'bldr: 'args, 'args: 'mut_bldr, 'mut_bldr>(
                _fbb: &'mut_bldr mut #rt::FlatBufferBuilder<'bldr>,
                args: &'args #direct_args<'args>,
            ) -> #rt::WIPOffset<#name<'bldr>> {
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

///
/// TESTS
///
