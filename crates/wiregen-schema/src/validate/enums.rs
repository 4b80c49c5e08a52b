use crate::prelude::*;

pub fn validate_enums(schema: &Schema, errs: &mut ErrorTree) {
    for def in &schema.enums {
        let mut local = ErrorTree::new();
        validate_enum(schema, def, &mut local);
        errs.merge_for(&def.name, local);
    }
}

fn validate_enum(schema: &Schema, def: &EnumDef, errs: &mut ErrorTree) {
    if def.values.is_empty() {
        err!(errs, "enum declares no values");
        return;
    }

    if !def.underlying.is_integer() {
        err!(errs, "underlying type {} is not an integer", def.underlying);
    }

    if let Some((min, max)) = def.underlying.int_range() {
        for val in &def.values {
            let value = i128::from(val.value);
            if value < min || value > max {
                errs.add_for(
                    &val.name,
                    format!("value {} does not fit {}", val.value, def.underlying),
                );
            }
        }
    }

    // name tables index by position, so values must not go backwards
    for pair in def.values.windows(2) {
        if pair[1].value < pair[0].value {
            err!(
                errs,
                "value '{}' ({}) is declared after larger value '{}' ({})",
                pair[1].name,
                pair[1].value,
                pair[0].name,
                pair[0].value
            );
        }
    }

    if def.bit_flags && def.values.iter().any(|v| v.value < 0) {
        err!(errs, "bit_flags enum has a negative value");
    }

    if def.is_union {
        validate_union(schema, def, errs);
    } else if def.values.iter().any(|v| v.member.is_some()) {
        err!(errs, "only unions may name member tables");
    }
}

fn validate_union(schema: &Schema, def: &EnumDef, errs: &mut ErrorTree) {
    if def.underlying != ScalarKind::UByte {
        err!(errs, "union discriminant must be ubyte, not {}", def.underlying);
    }

    if def.none_value().is_none() {
        err!(errs, "union has no NONE value at 0");
    }

    for val in def.values.iter().filter(|v| v.value != 0) {
        match val.member.map(|id| schema.struct_def(id)) {
            None => errs.add_for(&val.name, "union case names no table"),
            Some(s) if s.fixed => errs.add_for(
                &val.name,
                format!("union member '{}' must be a table", s.name),
            ),
            Some(_) => {}
        }
    }

    if def.members().next().is_none() {
        err!(errs, "union has no members");
    }
}
