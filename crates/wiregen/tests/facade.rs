use std::fs;
use wiregen::prelude::*;

fn small_schema() -> Schema {
    let mut schema = Schema::new("small.fbs");
    let ns = schema.add_namespace(["Small"]);
    schema.namespace = Some(ns);

    let point = schema.add_struct(
        StructDef::table(
            "Point",
            vec![
                FieldDef::new("x", Type::Scalar(ScalarKind::Int)).at(4),
                FieldDef::new("label", Type::String).at(6),
            ],
        )
        .in_namespace(ns),
    );
    schema.root = Some(point);

    schema
}

#[test]
fn schema_file_round_trips_through_generation() {
    let dir = std::env::temp_dir().join(format!("wiregen-facade-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let schema = small_schema();
    let path = dir.join("small.json");
    fs::write(&path, serde_json::to_string_pretty(&schema).unwrap()).unwrap();

    let options = GenOptions::default();
    let code = wiregen::generate_file(&path, &options).unwrap();
    assert_eq!(code, generate(&schema, &options).unwrap());
    assert!(code.contains("pub mod small {"));

    let written = wiregen::write_file(&path, &options, &dir).unwrap();
    assert_eq!(written, dir.join(generated_file_name("small.fbs")));

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn inconsistent_schema_is_a_schema_error() {
    let dir = std::env::temp_dir().join(format!("wiregen-facade-bad-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let mut schema = small_schema();
    schema.root = Some(StructId(9));
    let path = dir.join("bad.json");
    fs::write(&path, serde_json::to_string(&schema).unwrap()).unwrap();

    let err = wiregen::generate_file(&path, &GenOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Schema(_)));

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn missing_config_means_defaults() {
    let options = wiregen::load_options(None).unwrap();

    assert_eq!(options, GenOptions::default());
}
