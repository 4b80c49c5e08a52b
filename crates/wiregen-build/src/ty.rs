//! Type and path rendering shared by every emitter.
//!
//! Every function takes the namespace the code is emitted *from*, so a
//! reference to another namespace becomes a relative `super::` path and a
//! reference into another schema file goes through that file's unit.

use crate::{
    BuildError, CodeBuilder,
    helper::{float_lit, ident, int_lit, module_ident, unit_module_ident},
};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use syn::Lifetime;
use wiregen_schema::{
    node::{EnumId, EnumVal, FieldDef, Namespace, NamespaceId, StructId},
    types::{ScalarKind, ScalarValue, Type},
};

///
/// Shape
///
/// A field type with fixed records and tables told apart.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Shape {
    Scalar(ScalarKind),
    Enum(ScalarKind, EnumId),
    Struct(StructId),
    Table(StructId),
    Union(EnumId),
    String,
    Vector(Box<Self>),
}

impl Shape {
    pub(crate) const fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::Enum(..))
    }

    /// Stored behind an offset.
    pub(crate) const fn is_pointer(&self) -> bool {
        matches!(
            self,
            Self::Table(_) | Self::Union(_) | Self::String | Self::Vector(_)
        )
    }
}

impl CodeBuilder<'_> {
    pub(crate) fn shape(&self, ty: &Type) -> Shape {
        match ty {
            Type::Scalar(kind) => Shape::Scalar(*kind),
            Type::Enum(kind, id) => Shape::Enum(*kind, *id),
            Type::Struct(id) if self.schema.is_fixed(*id) => Shape::Struct(*id),
            Type::Struct(id) => Shape::Table(*id),
            Type::Union(id) => Shape::Union(*id),
            Type::String => Shape::String,
            Type::Vector(inner) => Shape::Vector(Box::new(self.shape(inner))),
        }
    }

    // ---------------------------------------------------------------------
    // Paths
    // ---------------------------------------------------------------------

    /// Path to `name` declared in namespace `to`, as seen from `from`.
    pub(crate) fn path_to(
        &self,
        from: Option<NamespaceId>,
        to: Option<NamespaceId>,
        declared_in: Option<&str>,
        name: &Ident,
    ) -> TokenStream {
        let target = self.schema.namespace_path(to);

        if let Some(file) = declared_in.filter(|f| *f != self.schema.file_name) {
            let unit = unit_module_ident(file);
            let mods = target.iter().map(|c| module_ident(c));
            return quote!(crate::#unit #(::#mods)* ::#name);
        }

        let here = self.schema.namespace_path(from);
        let common = Namespace::common_prefix_len(here, target);
        let ups = (common..here.len()).map(|_| quote!(super::));
        let downs = target[common..].iter().map(|c| {
            let m = module_ident(c);
            quote!(#m::)
        });

        quote!(#(#ups)* #(#downs)* #name)
    }

    pub(crate) fn struct_path(&self, from: Option<NamespaceId>, id: StructId) -> TokenStream {
        self.struct_item_path(from, id, &ident(&self.schema.struct_def(id).name))
    }

    /// Path to a module-level item that lives next to a struct or table.
    pub(crate) fn struct_item_path(
        &self,
        from: Option<NamespaceId>,
        id: StructId,
        item: &Ident,
    ) -> TokenStream {
        let def = self.schema.struct_def(id);

        self.path_to(from, def.namespace, def.declared_in.as_deref(), item)
    }

    /// `MonsterT`.
    pub(crate) fn object_path(&self, from: Option<NamespaceId>, id: StructId) -> TokenStream {
        let name = format_ident!("{}T", self.schema.struct_def(id).name);

        self.struct_item_path(from, id, &name)
    }

    pub(crate) fn enum_path(&self, from: Option<NamespaceId>, id: EnumId) -> TokenStream {
        self.enum_item_path(from, id, &ident(&self.schema.enum_def(id).name))
    }

    /// Path to a module-level item that lives next to an enum.
    pub(crate) fn enum_item_path(
        &self,
        from: Option<NamespaceId>,
        id: EnumId,
        item: &Ident,
    ) -> TokenStream {
        let def = self.schema.enum_def(id);

        self.path_to(from, def.namespace, def.declared_in.as_deref(), item)
    }

    /// Path to one enum value under the configured naming mode.
    pub(crate) fn enum_value(
        &self,
        from: Option<NamespaceId>,
        id: EnumId,
        val: &EnumVal,
    ) -> TokenStream {
        let def = self.schema.enum_def(id);

        if self.options.scoped_enums {
            let ty = self.enum_path(from, id);
            let value = ident(&val.name);
            quote!(#ty::#value)
        } else if self.options.prefixed_enums {
            self.enum_item_path(from, id, &format_ident!("{}_{}", def.name, val.name))
        } else {
            self.enum_item_path(from, id, &ident(&val.name))
        }
    }

    // ---------------------------------------------------------------------
    // Types
    // ---------------------------------------------------------------------

    /// Type stored in the buffer for a scalar slot.
    pub(crate) fn raw_type(shape: &Shape) -> TokenStream {
        match shape {
            Shape::Scalar(kind) => kind.raw_type(),
            Shape::Enum(kind, _) => kind.rust_type(),
            _ => quote!(u32),
        }
    }

    /// Type a caller sees for a scalar slot.
    pub(crate) fn logical_type(&self, from: Option<NamespaceId>, shape: &Shape) -> TokenStream {
        match shape {
            Shape::Scalar(kind) => kind.rust_type(),
            Shape::Enum(_, id) => self.enum_path(from, *id),
            _ => Self::raw_type(shape),
        }
    }

    fn table_view(&self, from: Option<NamespaceId>, id: StructId, lt: &Lifetime) -> TokenStream {
        let path = self.struct_path(from, id);
        quote!(#path<#lt>)
    }

    /// Vector element as followed from the buffer.
    pub(crate) fn element_follow(
        &self,
        from: Option<NamespaceId>,
        shape: &Shape,
        lt: &Lifetime,
    ) -> TokenStream {
        let rt = self.rt();
        match shape {
            Shape::Struct(id) => self.struct_path(from, *id),
            Shape::Table(id) => {
                let view = self.table_view(from, *id, lt);
                quote!(#rt::ForwardsUOffset<#view>)
            }
            Shape::String => quote!(#rt::ForwardsUOffset<&#lt str>),
            Shape::Union(_) => quote!(#rt::ForwardsUOffset<#rt::Table<#lt>>),
            Shape::Vector(_) => quote!(#rt::UOffsetT),
            scalar => self.logical_type(from, scalar),
        }
    }

    /// Follow type of a table slot holding `shape`.
    pub(crate) fn field_follow(
        &self,
        from: Option<NamespaceId>,
        shape: &Shape,
        lt: &Lifetime,
    ) -> TokenStream {
        let rt = self.rt();
        match shape {
            Shape::Vector(elem) => {
                let elem = self.element_follow(from, elem, lt);
                quote!(#rt::ForwardsUOffset<#rt::Vector<#lt, #elem>>)
            }
            other => self.element_follow(from, other, lt),
        }
    }

    /// What an accessor hands back for a non-scalar slot.
    pub(crate) fn view_type(
        &self,
        from: Option<NamespaceId>,
        shape: &Shape,
        lt: &Lifetime,
    ) -> TokenStream {
        let rt = self.rt();
        match shape {
            Shape::Struct(id) => {
                let path = self.struct_path(from, *id);
                quote!(&#lt #path)
            }
            Shape::Table(id) => self.table_view(from, *id, lt),
            Shape::String => quote!(&#lt str),
            Shape::Union(_) => quote!(#rt::Table<#lt>),
            Shape::Vector(elem) => {
                let elem = self.element_follow(from, elem, lt);
                quote!(#rt::Vector<#lt, #elem>)
            }
            scalar => self.logical_type(from, scalar),
        }
    }

    /// Offset handed to a builder for a pointer slot.
    pub(crate) fn wip_type(
        &self,
        from: Option<NamespaceId>,
        shape: &Shape,
        lt: &Lifetime,
    ) -> TokenStream {
        let rt = self.rt();
        match shape {
            Shape::Union(_) => quote!(#rt::WIPOffset<#rt::UnionWIPOffset>),
            other => {
                let view = self.view_type(from, other, lt);
                quote!(#rt::WIPOffset<#view>)
            }
        }
    }

    /// Element of a `create_direct` slice.
    pub(crate) fn direct_element(
        &self,
        from: Option<NamespaceId>,
        shape: &Shape,
        lt: &Lifetime,
    ) -> TokenStream {
        match shape {
            Shape::Struct(id) => self.struct_path(from, *id),
            Shape::Table(_) | Shape::String => self.wip_type(from, shape, lt),
            other => self.logical_type(from, other),
        }
    }

    /// Width type checked by the verifier for a slot's inline part.
    pub(crate) fn size_type(&self, from: Option<NamespaceId>, shape: &Shape) -> TokenStream {
        match shape {
            Shape::Scalar(_) | Shape::Enum(..) => Self::raw_type(shape),
            Shape::Struct(id) => self.struct_path(from, *id),
            _ => {
                let rt = self.rt();
                quote!(#rt::UOffsetT)
            }
        }
    }

    /// Owned mirror type used by the object API.
    pub(crate) fn native_type(&self, from: Option<NamespaceId>, shape: &Shape) -> TokenStream {
        match shape {
            Shape::String => quote!(String),
            Shape::Struct(id) => {
                let path = self.struct_path(from, *id);
                quote!(Option<#path>)
            }
            Shape::Table(id) => {
                let path = self.object_path(from, *id);
                quote!(Option<Box<#path>>)
            }
            Shape::Union(id) => {
                self.enum_item_path(from, *id, &format_ident!("{}T", self.schema.enum_def(*id).name))
            }
            Shape::Vector(elem) => {
                let elem = match elem.as_ref() {
                    Shape::String => quote!(String),
                    Shape::Struct(id) => self.struct_path(from, *id),
                    Shape::Table(id) => self.object_path(from, *id),
                    other => self.logical_type(from, other),
                };
                quote!(Vec<#elem>)
            }
            scalar => self.logical_type(from, scalar),
        }
    }

    // ---------------------------------------------------------------------
    // Casts
    // ---------------------------------------------------------------------

    /// Raw stored value to the type a caller sees.
    pub(crate) fn cast_from(
        &self,
        from: Option<NamespaceId>,
        shape: &Shape,
        val: TokenStream,
    ) -> TokenStream {
        match shape {
            Shape::Scalar(ScalarKind::Bool) => quote!(#val != 0),
            Shape::Enum(_, id) => {
                let ty = self.enum_path(from, *id);
                quote!(#ty(#val))
            }
            _ => val,
        }
    }

    /// Caller-facing value to the raw stored type.
    pub(crate) fn cast_to(shape: &Shape, val: TokenStream) -> TokenStream {
        match shape {
            Shape::Scalar(ScalarKind::Bool) => quote!(u8::from(#val)),
            Shape::Enum(..) => quote!(#val.0),
            _ => val,
        }
    }

    /// Little-endian bytes of a caller-facing scalar.
    pub(crate) fn to_le_bytes(shape: &Shape, val: TokenStream) -> TokenStream {
        match shape {
            Shape::Scalar(ScalarKind::Bool) => quote!([u8::from(#val)]),
            Shape::Enum(..) => quote!(#val.0.to_le_bytes()),
            _ => quote!(#val.to_le_bytes()),
        }
    }

    /// Caller-facing scalar decoded from a little-endian byte array.
    pub(crate) fn from_le_bytes(
        &self,
        from: Option<NamespaceId>,
        shape: &Shape,
        bytes: TokenStream,
    ) -> TokenStream {
        match shape {
            Shape::Scalar(ScalarKind::Bool) => quote!(#bytes[0] != 0),
            Shape::Scalar(kind) => {
                let ty = kind.rust_type();
                quote!(#ty::from_le_bytes(#bytes))
            }
            Shape::Enum(kind, id) => {
                let ty = self.enum_path(from, *id);
                let raw = kind.rust_type();
                quote!(#ty(#raw::from_le_bytes(#bytes)))
            }
            _ => bytes,
        }
    }

    /// Bytes one element of `shape` takes inline.
    pub(crate) fn inline_width(&self, shape: &Shape) -> usize {
        match shape {
            Shape::Scalar(kind) | Shape::Enum(kind, _) => kind.size(),
            Shape::Struct(id) => self.schema.struct_def(*id).bytesize,
            _ => 4,
        }
    }

    // ---------------------------------------------------------------------
    // Defaults
    // ---------------------------------------------------------------------

    fn default_value(field: &FieldDef) -> Result<(ScalarKind, ScalarValue), BuildError> {
        let kind = field
            .ty
            .scalar()
            .ok_or_else(|| BuildError::invariant(&field.name, "default requested for a non-scalar"))?;
        let value = kind.parse_value(field.default_constant()).ok_or_else(|| {
            BuildError::invariant(
                &field.name,
                format!("default '{}' is not a valid {kind}", field.default_constant()),
            )
        })?;

        Ok((kind, value))
    }

    /// Default in the raw stored type, as passed to `get` and `push_slot`.
    pub(crate) fn raw_default(field: &FieldDef) -> Result<TokenStream, BuildError> {
        let (kind, value) = Self::default_value(field)?;

        Ok(match value {
            ScalarValue::Bool(b) => int_lit(i128::from(u8::from(b))),
            ScalarValue::Int(v) => int_lit(v),
            ScalarValue::Float(v) => float_lit(&kind.rust_type(), v),
        })
    }

    /// Default in the caller-facing type; enum defaults name their value.
    pub(crate) fn logical_default(
        &self,
        from: Option<NamespaceId>,
        field: &FieldDef,
    ) -> Result<TokenStream, BuildError> {
        let (_, value) = Self::default_value(field)?;

        match (&field.ty, value) {
            (_, ScalarValue::Bool(b)) => Ok(quote!(#b)),
            (Type::Enum(_, id), ScalarValue::Int(v)) => {
                let def = self.schema.enum_def(*id);
                let found = i64::try_from(v).ok().and_then(|v| def.reverse_lookup(v));

                Ok(match found {
                    Some(val) => self.enum_value(from, *id, val),
                    None => {
                        let ty = self.enum_path(from, *id);
                        let lit = int_lit(v);
                        quote!(#ty(#lit))
                    }
                })
            }
            _ => Self::raw_default(field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        GenOptions,
        helper::lifetime,
        test_fixtures::{find_enum, find_struct, monster_schema, squash},
    };

    #[test]
    fn sibling_namespace_paths_go_through_super() {
        let schema = monster_schema();
        let opts = GenOptions::default();
        let cx = CodeBuilder::new(&schema, &opts).unwrap();

        let monster = find_struct(&schema, "Monster");
        let from = schema.struct_def(find_struct(&schema, "Referee")).namespace;

        let path = cx.struct_path(from, monster);
        assert_eq!(path.to_string(), "super :: example :: Monster");
    }

    #[test]
    fn same_namespace_path_is_bare() {
        let schema = monster_schema();
        let opts = GenOptions::default();
        let cx = CodeBuilder::new(&schema, &opts).unwrap();

        let id = find_struct(&schema, "Vec3");
        let from = schema.struct_def(id).namespace;

        assert_eq!(cx.struct_path(from, id).to_string(), "Vec3");
    }

    #[test]
    fn included_definitions_resolve_through_their_unit() {
        let mut schema = monster_schema();
        let id = find_struct(&schema, "Weapon");
        schema.structs[id.0].included = true;
        schema.structs[id.0].declared_in = Some("weapons.fbs".into());
        let opts = GenOptions::default();
        let cx = CodeBuilder::new(&schema, &opts).unwrap();

        let path = cx.struct_path(None, id);
        assert_eq!(
            squash(&path.to_string()),
            "crate::weapons_generated::my_game::example::Weapon"
        );
    }

    #[test]
    fn vector_of_tables_follows_through_offsets() {
        let schema = monster_schema();
        let opts = GenOptions::default();
        let cx = CodeBuilder::new(&schema, &opts).unwrap();

        let weapon = find_struct(&schema, "Weapon");
        let from = schema.struct_def(weapon).namespace;
        let shape = Shape::Vector(Box::new(Shape::Table(weapon)));

        let follow = cx.field_follow(from, &shape, &lifetime("a"));
        assert_eq!(
            squash(&follow.to_string()),
            "flatbuffers::ForwardsUOffset<flatbuffers::Vector<'a,flatbuffers::ForwardsUOffset<Weapon<'a>>>>"
        );
    }

    #[test]
    fn bool_and_enum_casts() {
        let schema = monster_schema();
        let opts = GenOptions::default();
        let cx = CodeBuilder::new(&schema, &opts).unwrap();
        let color = find_enum(&schema, "Color");
        let from = schema.enum_def(color).namespace;
        let shape = Shape::Enum(ScalarKind::Byte, color);

        assert_eq!(cx.cast_from(from, &shape, quote!(raw)).to_string(), "Color (raw)");
        assert_eq!(
            CodeBuilder::cast_to(&Shape::Scalar(ScalarKind::Bool), quote!(v)).to_string(),
            "u8 :: from (v)"
        );
    }

    #[test]
    fn byte_encoding_keeps_the_logical_type() {
        let schema = monster_schema();
        let opts = GenOptions::default();
        let cx = CodeBuilder::new(&schema, &opts).unwrap();
        let color = find_enum(&schema, "Color");
        let from = schema.enum_def(color).namespace;
        let shape = Shape::Enum(ScalarKind::Byte, color);

        assert_eq!(
            squash(&cx.from_le_bytes(from, &shape, quote!(self.c_)).to_string()),
            "Color(i8::from_le_bytes(self.c_))"
        );
        assert_eq!(
            squash(&CodeBuilder::to_le_bytes(&Shape::Scalar(ScalarKind::Bool), quote!(v)).to_string()),
            "[u8::from(v)]"
        );
        assert_eq!(
            squash(&cx.from_le_bytes(from, &Shape::Scalar(ScalarKind::Float), quote!(b)).to_string()),
            "f32::from_le_bytes(b)"
        );
        assert_eq!(cx.inline_width(&Shape::Struct(find_struct(&schema, "Vec3"))), 32);
        assert_eq!(cx.inline_width(&Shape::String), 4);
    }

    #[test]
    fn enum_default_names_its_value() {
        let schema = monster_schema();
        let opts = GenOptions::default();
        let cx = CodeBuilder::new(&schema, &opts).unwrap();
        let monster = schema.struct_def(find_struct(&schema, "Monster"));
        let from = monster.namespace;

        let color = monster.field("color").unwrap();
        assert_eq!(
            squash(&cx.logical_default(from, color).unwrap().to_string()),
            "Color::Blue"
        );

        // no value of Perm is zero
        let perms = monster.field("perms").unwrap();
        assert_eq!(
            squash(&cx.logical_default(from, perms).unwrap().to_string()),
            "Perm(0)"
        );

        let alive = monster.field("alive").unwrap();
        assert_eq!(CodeBuilder::raw_default(alive).unwrap().to_string(), "1");
        assert_eq!(cx.logical_default(from, alive).unwrap().to_string(), "true");
    }
}
