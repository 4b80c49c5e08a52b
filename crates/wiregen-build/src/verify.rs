use crate::{
    CodeBuilder,
    helper::{ident, lifetime, snake, vt_ident},
    ty::Shape,
};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use wiregen_schema::{
    UNION_TYPE_SUFFIX,
    node::{EnumDef, EnumId, EnumVal, FieldDef, StructDef, StructId},
};

///
/// Clause
///
/// One step of a table verifier. A field clause checks the slot and
/// everything it points at; fixed records are bounds-checked in place.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Clause<'d> {
    VisitTable,
    Field { field: &'d FieldDef, required: bool },
    Union { field: &'d FieldDef, tag: &'d FieldDef, union: EnumId },
    Finish,
}

/// Clauses for one table, in field order, short-circuiting on the first
/// failure when rendered.
pub(crate) fn table_clauses<'d>(builder: &CodeBuilder, def: &'d StructDef) -> Vec<Clause<'d>> {
    let mut clauses = vec![Clause::VisitTable];

    for field in def.live_fields() {
        if let Shape::Union(union) = builder.shape(&field.ty) {
            let companion = format!("{}{UNION_TYPE_SUFFIX}", field.name);
            if let Some(tag) = def.field(&companion) {
                clauses.push(Clause::Union { field, tag, union });
            }
            continue;
        }

        clauses.push(Clause::Field {
            field,
            required: field.required,
        });
    }

    clauses.push(Clause::Finish);

    clauses
}

/// `impl Verifiable` for a table.
pub fn generate(builder: &CodeBuilder, def: &StructDef) -> TokenStream {
    let rt = builder.rt();
    let name = ident(&def.name);
    let from = def.namespace;
    let lt = lifetime("_");

    let steps = table_clauses(builder, def).into_iter().map(|clause| match clause {
        Clause::VisitTable => quote!(v.visit_table(pos)?),
        Clause::Field { field, required } => {
            let follow = builder.field_follow(from, &builder.shape(&field.ty), &lt);
            let (label, vt) = (&field.name, vt_ident(&field.name));
            quote!(.visit_field::<#follow>(#label, Self::#vt, #required)?)
        }
        Clause::Union { field, tag, union } => {
            let union_ty = builder.enum_path(from, union);
            let verify_fn = builder.enum_item_path(from, union, &union_verifier_ident(builder.schema.enum_def(union)));
            let (label, vt, required) = (&field.name, vt_ident(&field.name), field.required);
            let (tag_label, tag_vt) = (&tag.name, vt_ident(&tag.name));
            quote! {
                .visit_union::<#union_ty, _>(
                    #tag_label,
                    Self::#tag_vt,
                    #label,
                    Self::#vt,
                    #required,
                    |key, v, pos| #verify_fn(v, key, pos),
                )?
            }
        }
        Clause::Finish => quote!(.finish();),
    });

    quote! {
        impl #rt::Verifiable for #name<'_> {
            #[inline]
            fn run_verifier(
                v: &mut #rt::Verifier,
                pos: usize,
            ) -> Result<(), #rt::InvalidFlatbuffer> {
                #(#steps)*
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Unions
// ---------------------------------------------------------------------------

///
/// UnionCheck
///
/// What the union verifier does with one discriminant value.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum UnionCheck {
    Accept,
    Verify(StructId),
    Reject,
}

///
/// UnionPlan
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct UnionPlan<'d> {
    pub none: Option<&'d EnumVal>,
    pub members: Vec<(&'d EnumVal, StructId)>,
}

impl<'d> UnionPlan<'d> {
    pub(crate) fn of(def: &'d EnumDef) -> Self {
        Self {
            none: def.none_value(),
            members: def.members().collect(),
        }
    }

    /// Any tag that is neither `NONE` nor a member is rejected.
    pub(crate) fn decide(&self, tag: i64) -> UnionCheck {
        if self.none.is_some_and(|v| v.value == tag) {
            return UnionCheck::Accept;
        }

        self.members
            .iter()
            .find(|(v, _)| v.value == tag)
            .map_or(UnionCheck::Reject, |(_, id)| UnionCheck::Verify(*id))
    }
}

/// `verify_equipment`, shared by the union post-pass and every table that
/// holds the union.
pub(crate) fn union_verifier_ident(def: &EnumDef) -> Ident {
    format_ident!("verify_{}", snake(&def.name))
}

/// Free verifier function for a union.
pub(crate) fn union_verifier(builder: &CodeBuilder, id: EnumId, def: &EnumDef) -> TokenStream {
    let rt = builder.rt();
    let from = def.namespace;
    let name = ident(&def.name);
    let fn_name = union_verifier_ident(def);
    let label = def.name.as_str();
    let unknown = format!("{} (unknown discriminant)", def.name);
    let plan = UnionPlan::of(def);

    let none = plan.none.map(|v| {
        let path = builder.enum_value(from, id, v);
        quote!(#path => Ok(()),)
    });
    let members = plan.members.iter().map(|(v, table)| {
        let path = builder.enum_value(from, id, v);
        let table = builder.struct_path(from, *table);
        let variant = format!("{}::{}", def.name, v.name);
        quote! {
            #path => v.verify_union_variant::<#rt::ForwardsUOffset<#table<'_>>>(#variant, pos),
        }
    });

    quote! {
        #[allow(unreachable_patterns)]
        pub fn #fn_name(
            v: &mut #rt::Verifier,
            key: #name,
            pos: usize,
        ) -> Result<(), #rt::InvalidFlatbuffer> {
            match key {
                #none
                #(#members)*
                _ => Err(#rt::InvalidFlatbuffer::InconsistentUnion {
                    field: #label.into(),
                    field_type: #unknown.into(),
                    error_trace: ::core::default::Default::default(),
                }),
            }
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
        test_fixtures::{find_enum, find_struct, has, monster_schema},
    };

    #[test]
    fn clauses_follow_field_order_and_skip_deprecated() {
        let schema = monster_schema();
        let opts = GenOptions::default();
        let cx = CodeBuilder::new(&schema, &opts).unwrap();
        let weapon = schema.struct_def(find_struct(&schema, "Weapon"));

        let clauses = table_clauses(&cx, weapon);
        let name = weapon.field("name").unwrap();
        let damage = weapon.field("damage").unwrap();
        assert_eq!(
            clauses,
            vec![
                Clause::VisitTable,
                Clause::Field { field: name, required: false },
                Clause::Field { field: damage, required: false },
                Clause::Finish,
            ]
        );

        let monster = schema.struct_def(find_struct(&schema, "Monster"));
        let clauses = table_clauses(&cx, monster);
        assert!(!clauses.iter().any(|c| matches!(c, Clause::Field { field, .. } if field.name == "friendly")));
        assert!(clauses.iter().any(|c| matches!(c, Clause::Field { field, required: true } if field.name == "name")));
        assert!(clauses.iter().any(|c| matches!(c, Clause::Union { tag, .. } if tag.name == "equipped_type")));
        // the payload is only reached through its union clause
        assert!(!clauses.iter().any(|c| matches!(c, Clause::Field { field, .. } if field.name == "equipped")));
    }

    #[test]
    fn union_plan_fails_closed() {
        let schema = monster_schema();
        let def = schema.enum_def(find_enum(&schema, "Equipment"));
        let plan = UnionPlan::of(def);

        assert_eq!(plan.decide(0), UnionCheck::Accept);
        assert_eq!(plan.decide(1), UnionCheck::Verify(find_struct(&schema, "Weapon")));
        assert_eq!(plan.decide(2), UnionCheck::Reject);
        assert_eq!(plan.decide(255), UnionCheck::Reject);
    }

    #[test]
    fn union_verifier_rejects_unknown_tags() {
        let schema = monster_schema();
        let opts = GenOptions::default();
        let cx = CodeBuilder::new(&schema, &opts).unwrap();
        let id = find_enum(&schema, "Equipment");

        let text = union_verifier(&cx, id, schema.enum_def(id)).to_string();
        assert!(has(&text, "pub fn verify_equipment("));
        assert!(has(&text, "Equipment::NONE => Ok(()),"));
        assert!(has(&text, "Equipment::Weapon => v.verify_union_variant::<flatbuffers::ForwardsUOffset<Weapon<'_>>>(\"Equipment::Weapon\", pos),"));
        assert!(has(&text, "_ => Err(flatbuffers::InvalidFlatbuffer::InconsistentUnion { field: \"Equipment\".into(),"));
    }

    #[test]
    fn table_verifier_is_a_short_circuit_chain() {
        let schema = monster_schema();
        let opts = GenOptions::default();
        let cx = CodeBuilder::new(&schema, &opts).unwrap();
        let monster = schema.struct_def(find_struct(&schema, "Monster"));

        let text = generate(&cx, monster).to_string();
        assert!(has(&text, "v.visit_table(pos)?"));
        assert!(has(&text, ".visit_field::<Vec3>(\"pos\", Self::VT_POS, false)?"));
        assert!(has(&text, ".visit_field::<flatbuffers::ForwardsUOffset<&'_ str>>(\"name\", Self::VT_NAME, true)?"));
        assert!(has(&text, ".visit_field::<flatbuffers::ForwardsUOffset<Monster<'_>>>(\"enemy\", Self::VT_ENEMY, false)?"));
        assert!(has(&text, ".visit_field::<flatbuffers::ForwardsUOffset<flatbuffers::Vector<'_, u8>>>(\"inventory\", Self::VT_INVENTORY, false)?"));
        assert!(has(&text, ".visit_field::<flatbuffers::ForwardsUOffset<flatbuffers::Vector<'_, flatbuffers::ForwardsUOffset<Weapon<'_>>>>>(\"weapons\", Self::VT_WEAPONS, false)?"));
        assert!(has(&text, ".visit_union::<Equipment, _>(\"equipped_type\", Self::VT_EQUIPPED_TYPE, \"equipped\", Self::VT_EQUIPPED, false, |key, v, pos| verify_equipment(v, key, pos),)?"));
        assert!(has(&text, ".finish(); Ok(())"));
    }
}
