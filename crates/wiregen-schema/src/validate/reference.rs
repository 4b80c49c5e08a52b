use crate::prelude::*;

/// Every id in the schema must point at an existing definition.
pub fn validate_references(schema: &Schema, errs: &mut ErrorTree) {
    if let Some(ns) = schema.namespace
        && schema.get_namespace(ns).is_none()
    {
        err!(errs, "file namespace {} does not exist", ns.0);
    }

    match schema.root {
        Some(id) if schema.get_struct(id).is_none() => {
            err!(errs, "root type {} does not exist", id.0);
        }
        Some(id) if schema.is_fixed(id) => {
            err!(errs, "root type '{}' must be a table", schema.struct_def(id).name);
        }
        _ => {}
    }

    for def in &schema.enums {
        let mut local = ErrorTree::new();
        check_namespace(schema, def.namespace, &mut local);

        for val in &def.values {
            if let Some(member) = val.member
                && schema.get_struct(member).is_none()
            {
                local.add_for(&val.name, format!("union member {} does not exist", member.0));
            }
        }
        errs.merge_for(&def.name, local);
    }

    for def in &schema.structs {
        let mut local = ErrorTree::new();
        check_namespace(schema, def.namespace, &mut local);

        for field in &def.fields {
            check_type(schema, &field.ty, &field.name, &mut local);

            if let Some(root) = field.nested_root
                && schema.get_struct(root).is_none()
            {
                local.add_for(&field.name, format!("nested root {} does not exist", root.0));
            }
        }
        errs.merge_for(&def.name, local);
    }
}

fn check_namespace(schema: &Schema, ns: Option<NamespaceId>, errs: &mut ErrorTree) {
    if let Some(ns) = ns
        && schema.get_namespace(ns).is_none()
    {
        err!(errs, "namespace {} does not exist", ns.0);
    }
}

fn check_type(schema: &Schema, ty: &Type, field: &str, errs: &mut ErrorTree) {
    match ty {
        Type::Enum(_, id) | Type::Union(id) if schema.get_enum(*id).is_none() => {
            errs.add_for(field, format!("enum {} does not exist", id.0));
        }
        Type::Struct(id) if schema.get_struct(*id).is_none() => {
            errs.add_for(field, format!("struct {} does not exist", id.0));
        }
        Type::Vector(inner) => check_type(schema, inner, field, errs),
        _ => {}
    }
}
