use wiregen_schema::prelude::*;

/// Token text with all whitespace removed, for spacing-insensitive checks.
pub fn squash(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// `haystack` contains `needle`, ignoring whitespace on both sides.
pub fn has(haystack: &str, needle: &str) -> bool {
    squash(haystack).contains(&squash(needle))
}

pub fn find_struct(schema: &Schema, name: &str) -> StructId {
    StructId(
        schema
            .structs
            .iter()
            .position(|s| s.name == name)
            .unwrap_or_else(|| panic!("no struct {name}")),
    )
}

pub fn find_enum(schema: &Schema, name: &str) -> EnumId {
    EnumId(
        schema
            .enums
            .iter()
            .position(|e| e.name == name)
            .unwrap_or_else(|| panic!("no enum {name}")),
    )
}

/// The classic monster schema, spread over three namespaces.
pub fn monster_schema() -> Schema {
    let mut schema = Schema::new("monster.fbs");
    let game = schema.add_namespace(["MyGame"]);
    let example = schema.add_namespace(["MyGame", "Example"]);
    let other = schema.add_namespace(["MyGame", "Other"]);
    schema.namespace = Some(example);
    schema.file_identifier = Some("MONS".into());
    schema.file_extension = Some("mon".into());

    let color = schema.add_enum(
        EnumDef::new(
            "Color",
            ScalarKind::Byte,
            vec![
                EnumVal::new("Red", 0),
                EnumVal::new("Green", 1),
                EnumVal::new("Blue", 2),
            ],
        )
        .in_namespace(example)
        .with_doc("Composite colors"),
    );
    let perm = schema.add_enum(
        EnumDef::new(
            "Perm",
            ScalarKind::UByte,
            vec![
                EnumVal::new("Read", 1),
                EnumVal::new("Write", 2),
                EnumVal::new("Exec", 4),
            ],
        )
        .in_namespace(example)
        .with_bit_flags(),
    );
    schema.add_enum(
        EnumDef::new(
            "Rank",
            ScalarKind::Short,
            vec![EnumVal::new("Low", 0), EnumVal::new("High", 100)],
        )
        .in_namespace(example),
    );

    let test = schema.add_struct(
        StructDef::fixed(
            "Test",
            vec![
                FieldDef::new("a", Type::Scalar(ScalarKind::Short)),
                FieldDef::new("b", Type::Scalar(ScalarKind::Byte))
                    .at(2)
                    .padded(1),
            ],
            2,
            4,
        )
        .in_namespace(example),
    );
    let vec3 = schema.add_struct(
        StructDef::fixed(
            "Vec3",
            vec![
                FieldDef::new("x", Type::Scalar(ScalarKind::Float)),
                FieldDef::new("y", Type::Scalar(ScalarKind::Float)).at(4),
                FieldDef::new("z", Type::Scalar(ScalarKind::Float))
                    .at(8)
                    .padded(4),
                FieldDef::new("test1", Type::Scalar(ScalarKind::Double)).at(16),
                FieldDef::new("test2", Type::Enum(ScalarKind::Byte, color))
                    .at(24)
                    .padded(1),
                FieldDef::new("test3", Type::Struct(test))
                    .at(26)
                    .padded(2),
            ],
            8,
            32,
        )
        .in_namespace(example),
    );

    let weapon = schema.add_struct(
        StructDef::table(
            "Weapon",
            vec![
                FieldDef::new("name", Type::String).at(4).key(),
                FieldDef::new("damage", Type::Scalar(ScalarKind::Short)).at(6),
            ],
        )
        .in_namespace(example),
    );
    let equipment =
        schema.add_enum(EnumDef::union("Equipment", &[("Weapon", weapon)]).in_namespace(example));

    let monster_id = StructId(schema.structs.len());
    let ubytes = || Type::Vector(Box::new(Type::Scalar(ScalarKind::UByte)));
    let monster = schema.add_struct(
        StructDef::table(
            "Monster",
            vec![
                FieldDef::new("pos", Type::Struct(vec3)).at(4),
                FieldDef::new("mana", Type::Scalar(ScalarKind::Short))
                    .at(6)
                    .with_default("150"),
                FieldDef::new("hp", Type::Scalar(ScalarKind::Short))
                    .at(8)
                    .with_default("100"),
                FieldDef::new("name", Type::String)
                    .at(10)
                    .required()
                    .key(),
                FieldDef::new("friendly", Type::Scalar(ScalarKind::Bool))
                    .at(12)
                    .deprecated(),
                FieldDef::new("inventory", ubytes()).at(14),
                FieldDef::new("color", Type::Enum(ScalarKind::Byte, color))
                    .at(16)
                    .with_default("2"),
                FieldDef::new("weapons", Type::Vector(Box::new(Type::Struct(weapon)))).at(18),
                FieldDef::new("equipped_type", Type::Enum(ScalarKind::UByte, equipment)).at(20),
                FieldDef::new("equipped", Type::Union(equipment)).at(22),
                FieldDef::new("path", Type::Vector(Box::new(Type::Struct(vec3)))).at(24),
                FieldDef::new("names", Type::Vector(Box::new(Type::String))).at(26),
                FieldDef::new("enemy", Type::Struct(monster_id)).at(28),
                FieldDef::new("testnestedflatbuffer", ubytes())
                    .at(30)
                    .nested(monster_id),
                FieldDef::new("perms", Type::Enum(ScalarKind::UByte, perm)).at(32),
                FieldDef::new("testf", Type::Scalar(ScalarKind::Float))
                    .at(34)
                    .with_default("3.14"),
                FieldDef::new("alive", Type::Scalar(ScalarKind::Bool))
                    .at(36)
                    .with_default("true"),
            ],
        )
        .in_namespace(example)
        .with_doc("A monster in the game"),
    );
    schema.root = Some(monster);

    schema.add_struct(
        StructDef::table(
            "Stat",
            vec![
                FieldDef::new("id", Type::String).at(4),
                FieldDef::new("val", Type::Scalar(ScalarKind::Long)).at(6),
                FieldDef::new("count", Type::Scalar(ScalarKind::UShort)).at(8),
                FieldDef::new("flag", Type::Scalar(ScalarKind::Bool)).at(10),
            ],
        )
        .in_namespace(game)
        .sorted_by_size(),
    );
    schema.add_struct(
        StructDef::table(
            "Referee",
            vec![FieldDef::new("watched", Type::Struct(monster)).at(4)],
        )
        .in_namespace(other),
    );

    schema
}
