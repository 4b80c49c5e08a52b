use crate::{MAX_FIELD_PADDING, UNION_TYPE_SUFFIX, prelude::*};

pub fn validate_records(schema: &Schema, errs: &mut ErrorTree) {
    for def in &schema.structs {
        let mut local = ErrorTree::new();
        if def.fixed {
            validate_fixed(schema, def, &mut local);
        } else {
            validate_table(schema, def, &mut local);
        }
        errs.merge_for(&def.name, local);
    }
}

fn validate_fixed(schema: &Schema, def: &StructDef, errs: &mut ErrorTree) {
    if !def.minalign.is_power_of_two() {
        err!(errs, "minalign {} is not a power of two", def.minalign);
    }

    for field in &def.fields {
        if field.padding > MAX_FIELD_PADDING {
            errs.add_for(
                &field.name,
                format!(
                    "padding of {} bytes exceeds {MAX_FIELD_PADDING}",
                    field.padding
                ),
            );
        }

        let inline = match &field.ty {
            Type::Scalar(_) | Type::Enum(..) => true,
            Type::Struct(id) => schema.is_fixed(*id),
            _ => false,
        };
        if !inline {
            errs.add_for(&field.name, "fixed records only hold scalars and fixed records");
        }

        check_default(field, errs);
    }
}

fn validate_table(schema: &Schema, def: &StructDef, errs: &mut ErrorTree) {
    let mut keys = 0;

    for field in &def.fields {
        match &field.ty {
            Type::Vector(inner) => match inner.as_ref() {
                Type::Vector(_) => errs.add_for(&field.name, "vectors of vectors are not supported"),
                Type::Union(_) => errs.add_for(&field.name, "vectors of unions are not supported"),
                _ => {}
            },
            Type::Union(id) => check_union_companion(def, field, *id, errs),
            _ => {}
        }
        check_enum_kind(schema, field, errs);

        if let Some(root) = field.nested_root {
            if field.ty != Type::Vector(Box::new(Type::Scalar(ScalarKind::UByte))) {
                errs.add_for(&field.name, "nested buffers must be stored in a [ubyte] field");
            }
            if schema.is_fixed(root) {
                errs.add_for(
                    &field.name,
                    format!("nested root '{}' must be a table", schema.struct_def(root).name),
                );
            }
        }

        if field.key && !field.deprecated {
            keys += 1;
            if !(field.ty.is_scalar() || field.ty.is_string()) {
                errs.add_for(&field.name, "key fields must be scalars or strings");
            }
        }

        check_default(field, errs);
    }

    if keys > 1 {
        err!(errs, "{keys} fields are marked as key");
    }
}

// A union field carries its tag in a sibling `<name>_type` slot.
fn check_union_companion(def: &StructDef, field: &FieldDef, union: EnumId, errs: &mut ErrorTree) {
    let companion = format!("{}{UNION_TYPE_SUFFIX}", field.name);

    match def.field(&companion) {
        Some(tag) if tag.ty.enum_def() == Some(union) => {}
        Some(_) => errs.add_for(
            &field.name,
            format!("'{companion}' is not the discriminant of this union"),
        ),
        None => errs.add_for(&field.name, format!("missing discriminant field '{companion}'")),
    }

    // A live payload needs a live tag; a dead payload with a live tag is fine.
    if let Some(tag) = def.field(&companion)
        && tag.deprecated
        && !field.deprecated
    {
        errs.add_for(&field.name, format!("discriminant '{companion}' is deprecated"));
    }
}

// The slot kind of an enum field must match the enum's declared underlying type.
fn check_enum_kind(schema: &Schema, field: &FieldDef, errs: &mut ErrorTree) {
    let mut ty = &field.ty;
    while let Type::Vector(inner) = ty {
        ty = inner;
    }

    if let Type::Enum(kind, id) = ty {
        let def = schema.enum_def(*id);
        if *kind != def.underlying {
            errs.add_for(
                &field.name,
                format!("stored as {kind} but '{}' is {}", def.name, def.underlying),
            );
        }
    }
}

fn check_default(field: &FieldDef, errs: &mut ErrorTree) {
    let Some(kind) = field.ty.scalar() else {
        return;
    };

    if kind.parse_value(field.default_constant()).is_none() {
        errs.add_for(
            &field.name,
            format!("default '{}' is not a valid {kind}", field.default_constant()),
        );
    }
}
