//! Pre-emission consistency checks.
//!
//! These only reject states the emitters cannot express. Semantic
//! validation of user schemas belongs to the parser that produced them.

pub mod enums;
pub mod records;
pub mod reference;

use crate::{error::ErrorTree, node::Schema};

/// Run every check in a staged, deterministic order.
pub fn validate_schema(schema: &Schema) -> Result<(), ErrorTree> {
    // Phase 1: every id must resolve before anything dereferences it.
    let mut errs = ErrorTree::new();
    reference::validate_references(schema, &mut errs);
    if !errs.is_empty() {
        return errs.result();
    }

    // Phase 2: per-definition shape.
    enums::validate_enums(schema, &mut errs);
    records::validate_records(schema, &mut errs);

    errs.result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    fn monster() -> Schema {
        let mut schema = Schema::new("monster.fbs");
        let ns = schema.add_namespace(["MyGame"]);
        schema.namespace = Some(ns);

        let weapon = schema.add_struct(
            StructDef::table(
                "Weapon",
                vec![FieldDef::new("damage", Type::Scalar(ScalarKind::Short)).at(4)],
            )
            .in_namespace(ns),
        );
        let equipment = schema.add_enum(
            EnumDef::union("Equipment", &[("Weapon", weapon)]).in_namespace(ns),
        );
        let monster = schema.add_struct(
            StructDef::table(
                "Monster",
                vec![
                    FieldDef::new("hp", Type::Scalar(ScalarKind::Short))
                        .with_default("100")
                        .at(4),
                    FieldDef::new("equipped_type", Type::Enum(ScalarKind::UByte, equipment)).at(6),
                    FieldDef::new("equipped", Type::Union(equipment)).at(8),
                ],
            )
            .in_namespace(ns),
        );
        schema.root = Some(monster);

        schema
    }

    #[test]
    fn consistent_schema_passes() {
        validate_schema(&monster()).unwrap();
    }

    #[test]
    fn dangling_reference_stops_after_phase_one() {
        let mut schema = monster();
        schema.root = Some(StructId(99));
        schema.structs[1].fields[0].default = Some("not a number".into());

        let errs = validate_schema(&schema).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(errs.to_string().contains("root"));
    }

    #[test]
    fn shape_errors_are_all_reported() {
        let mut schema = monster();
        schema.enums[0].values.clear();
        schema.structs[1].fields[0].default = Some("70000".into());

        let errs = validate_schema(&schema).unwrap_err();
        assert_eq!(errs.len(), 2);
    }
}
