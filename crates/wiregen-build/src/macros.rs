//! Build-script helper that generates one schema into `OUT_DIR`.
//!
//! Options come from `wiregen.toml` in the given directory (the crate root
//! when omitted); a missing file means defaults. Call it from a `main`
//! returning `Result<(), Box<dyn std::error::Error>>`.
#[macro_export]
macro_rules! build {
    ($schema:expr) => {
        $crate::build!($schema, ".")
    };
    ($schema:expr, $config_dir:expr) => {
        //
        // CARGO
        //

        println!("cargo:rerun-if-changed=build.rs");
        println!("cargo:rerun-if-changed={}", $schema);
        println!(
            "cargo:rerun-if-changed={}",
            ::std::path::Path::new($config_dir)
                .join($crate::__private::CONFIG_FILE_NAME)
                .display()
        );

        let out_dir = ::std::env::var("OUT_DIR")?;

        //
        // GENERATED CODE
        //

        let schema = $crate::__private::load_schema($schema)?;
        let options = $crate::__private::load_options($config_dir)?;
        $crate::write(&schema, &options, &out_dir)?;
    };
}
