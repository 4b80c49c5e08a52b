use crate::generated_file_name;
use wiregen_schema::node::Schema;

/// Make-style dependency line for the unit generated from `file`: the
/// output path, then the schema file and everything it includes as one
/// sorted list.
#[must_use]
pub fn make_rule(schema: &Schema, out_dir: &str, file: &str) -> String {
    let mut deps = schema.included_files_recursive(file);
    deps.insert(file.to_string());

    let mut rule = format!("{out_dir}{}:", generated_file_name(file));
    for dep in deps {
        rule.push(' ');
        rule.push_str(&dep);
    }

    rule
}
