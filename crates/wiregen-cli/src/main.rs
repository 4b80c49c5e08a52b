use clap::{Args, Parser, Subcommand};
use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};
use thiserror::Error as ThisError;
use wiregen::{
    build::{generated_file_name, make_rule},
    config::{Framework, GenOptions},
};

///
/// CliError
///

#[derive(Debug, ThisError)]
enum CliError {
    #[error(transparent)]
    Wiregen(#[from] wiregen::Error),

    #[error("'{0}' is out of date")]
    Stale(PathBuf),
}

#[derive(Debug, Parser)]
#[command(name = "wiregen", version = wiregen::VERSION)]
#[command(about = "Generate Rust wire-format accessors from resolved schemas", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate `<base>_generated.rs` for a schema.
    Generate(GenerateArgs),
    /// Print the make-style dependency line for a schema.
    MakeRule(MakeRuleArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Resolved schema (JSON).
    #[arg(long, env = "WIREGEN_SCHEMA")]
    schema: PathBuf,

    /// Options file; `./wiregen.toml` is used when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Fail if the file on disk differs instead of writing it.
    #[arg(long, default_value_t = false)]
    check: bool,

    #[command(flatten)]
    flags: Flags,
}

///
/// Flags
///
/// Switches that override the options file when given.
///

#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
struct Flags {
    #[arg(long)]
    mutable_buffer: bool,
    #[arg(long)]
    object_api: bool,
    #[arg(long)]
    prefixed_enums: bool,
    #[arg(long)]
    unscoped_enums: bool,
    #[arg(long)]
    name_strings: bool,
    #[arg(long)]
    serde: bool,
    #[arg(long)]
    no_includes: bool,
    #[arg(long)]
    runtime_crate: Option<String>,
    #[arg(long)]
    debug: bool,
}

impl Flags {
    fn apply(&self, options: &mut GenOptions) {
        options.mutable_buffer |= self.mutable_buffer;
        options.object_api |= self.object_api;
        options.prefixed_enums |= self.prefixed_enums;
        options.name_strings |= self.name_strings;
        options.debug |= self.debug;

        if self.unscoped_enums {
            options.scoped_enums = false;
        }
        if self.serde {
            options.framework = Framework::Serde;
        }
        if self.no_includes {
            options.include_dependencies = false;
        }
        if let Some(path) = &self.runtime_crate {
            options.runtime_crate.clone_from(path);
        }
    }
}

#[derive(Debug, Args)]
struct MakeRuleArgs {
    /// Resolved schema (JSON).
    #[arg(long, env = "WIREGEN_SCHEMA")]
    schema: PathBuf,

    /// Prefix for the generated file, usually the output directory with a
    /// trailing separator.
    #[arg(long, default_value = "")]
    out: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("wiregen: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Generate(args) => generate(&args),
        Command::MakeRule(args) => {
            let schema = wiregen::load_schema(&args.schema)?;
            println!("{}", make_rule(&schema, &args.out, &schema.file_name));

            Ok(())
        }
    }
}

fn generate(args: &GenerateArgs) -> Result<(), CliError> {
    let mut options = wiregen::load_options(args.config.as_deref())?;
    args.flags.apply(&mut options);

    if !args.check {
        let path = wiregen::write_file(&args.schema, &options, &args.out)?;
        println!("{}", path.display());

        return Ok(());
    }

    let schema = wiregen::load_schema(&args.schema)?;
    let code = wiregen::build::generate(&schema, &options).map_err(wiregen::Error::from)?;
    let path = args.out.join(generated_file_name(&schema.file_name));

    if is_current(&path, &code) {
        Ok(())
    } else {
        Err(CliError::Stale(path))
    }
}

fn is_current(path: &Path, code: &str) -> bool {
    fs::read_to_string(path).is_ok_and(|on_disk| on_disk == code)
}
