//! # irgen
//!
//! CLI tool for generating Zod schemas, definition JSON and example payloads
//! from Rust service declarations.
//!
//! ## Usage
//!
//! ```bash
//! # Generate schemas for the package in ./services
//! irgen generate --input ./services
//!
//! # Leave an internal service out
//! irgen generate --input ./services --exclude Ignorer
//!
//! # Preview without writing
//! irgen generate --dry-run
//!
//! # Write the definition JSON for a template renderer
//! irgen definition --input ./services
//!
//! # Print an example payload
//! irgen example GreetResponse --input ./services
//!
//! # Check that generated schemas are up to date
//! irgen validate --path ./generated/schemas.gen.ts
//!
//! # Initialize configuration
//! irgen init
//! ```

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use irgen_cli::{
    config::{CliArgs, Config, ConfigManager, CONFIG_FILENAME},
    error::{CliError, LoadError},
    pipeline,
    writer::{FileWriter, WriteResult},
};

#[derive(Parser)]
#[command(name = "irgen")]
#[command(author, version, about = "Generate Zod schemas and examples from Rust service declarations", long_about = None)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that reads declarations.
#[derive(Args)]
struct SourceArgs {
    /// Directory holding the package's Rust source files
    #[arg(short, long, default_value = ".")]
    input: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Package name (defaults to the input directory name)
    #[arg(long)]
    package: Option<String>,

    /// Interfaces to leave out of the output
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<String>,

    /// Only read source files matching this glob
    #[arg(long)]
    filter: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the Zod schema file
    Generate {
        #[command(flatten)]
        source: SourceArgs,

        /// Output directory for generated files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Module that default-exports ZodTypes
        #[arg(long)]
        types_import: Option<String>,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Write the definition as JSON
    Definition {
        #[command(flatten)]
        source: SourceArgs,

        /// Output directory for generated files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Print an example JSON payload for an object
    Example {
        /// Object name, e.g. GreetResponse
        object: String,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Check that a generated schema file is up to date
    Validate {
        /// Path to the generated schema file
        #[arg(short, long)]
        path: PathBuf,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Initialize a new irgen configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = CONFIG_FILENAME)]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            match e {
                CliError::Validation(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Generate {
            source,
            output,
            types_import,
            dry_run,
        } => {
            let config = load_config(&source, output, types_import)?;
            cmd_generate(&source.input, &config, dry_run)
        }

        Commands::Definition {
            source,
            output,
            stdout,
            dry_run,
        } => {
            let config = load_config(&source, output, None)?;
            cmd_definition(&source.input, &config, stdout, dry_run)
        }

        Commands::Example { object, source } => {
            let config = load_config(&source, None, None)?;
            let def = pipeline::load_definition(&source.input, &config)?;
            println!("{}", pipeline::render_example(&def, &object)?);
            Ok(())
        }

        Commands::Validate { path, source } => {
            let config = load_config(&source, None, None)?;
            cmd_validate(&path, &source.input, &config)
        }

        Commands::Init { output, force } => cmd_init(&output, force),
    }
}

fn load_config(
    source: &SourceArgs,
    output: Option<PathBuf>,
    types_import: Option<String>,
) -> Result<Config, CliError> {
    let config = ConfigManager::load(source.config.as_deref())?;
    Ok(ConfigManager::merge_cli_args(
        config,
        &CliArgs {
            package_name: source.package.clone(),
            exclude: source.exclude.clone(),
            filter: source.filter.clone(),
            output,
            types_import,
        },
    ))
}

/// Generate command implementation.
fn cmd_generate(input: &Path, config: &Config, dry_run: bool) -> Result<(), CliError> {
    println!("{}", "Loading declarations...".cyan());
    let def = match pipeline::load_definition(input, config) {
        Ok(def) => def,
        Err(CliError::Load(e)) => {
            println!("{} load error(s):", "Error:".red());
            println!("  {}", format_load_error(&e));
            return Err(CliError::Load(e));
        }
        Err(e) => return Err(e),
    };
    println!(
        "  Found {} service(s) and {} object(s)",
        def.services.len().to_string().green(),
        def.objects.len().to_string().green()
    );

    println!("{}", "Generating Zod schemas...".cyan());
    let code = pipeline::render_zod(&def, config)?;

    let path = config.output.dir.join(&config.output.zod_file);
    report(FileWriter::new(dry_run).write(&path, &code)?);
    Ok(())
}

/// Definition command implementation.
fn cmd_definition(input: &Path, config: &Config, stdout: bool, dry_run: bool) -> Result<(), CliError> {
    let def = pipeline::load_definition(input, config)?;
    let json = pipeline::render_definition(&def)?;

    if stdout {
        print!("{json}");
        return Ok(());
    }

    let path = config.output.dir.join(&config.output.definition_file);
    report(FileWriter::new(dry_run).write(&path, &json)?);
    Ok(())
}

/// Validate command implementation.
fn cmd_validate(schema_path: &Path, input: &Path, config: &Config) -> Result<(), CliError> {
    println!("{}", "Validating schemas...".cyan());

    if !schema_path.exists() {
        return Err(CliError::Validation(format!(
            "Schema file not found: {}",
            schema_path.display()
        )));
    }
    let existing = std::fs::read_to_string(schema_path)?;

    let def = pipeline::load_definition(input, config)?;
    let code = pipeline::render_zod(&def, config)?;

    if existing.trim() == code.trim() {
        println!("{} Schemas are up-to-date", "✓".green());
        Ok(())
    } else {
        println!("{} Schemas are out of date", "✗".red());
        println!("  Run 'irgen generate' to update");
        Err(CliError::Validation("Schemas are out of date".to_string()))
    }
}

/// Init command implementation.
fn cmd_init(output: &Path, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        println!("  Use --force to overwrite");
        return Err(CliError::Validation(format!(
            "Configuration file already exists: {}",
            output.display()
        )));
    }

    std::fs::write(output, ConfigManager::default_config_content())?;
    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );
    Ok(())
}

fn report(result: WriteResult) {
    match result {
        WriteResult::Written { path, bytes } => {
            println!("{} Written {} bytes to {}", "✓".green(), bytes, path.display());
        }
        WriteResult::Unchanged { path } => {
            println!("{} {} is up to date", "✓".green(), path.display());
        }
        WriteResult::DryRun { content, path } => {
            println!("{} Would write to {}:", "[dry-run]".yellow(), path.display());
            println!("{}", "─".repeat(60).dimmed());
            println!("{}", content);
            println!("{}", "─".repeat(60).dimmed());
        }
    }
}

fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}

fn format_load_error(error: &LoadError) -> String {
    match error {
        LoadError::Multiple(errors) => errors
            .iter()
            .map(format_load_error)
            .collect::<Vec<_>>()
            .join("\n  "),
        other => other.to_string(),
    }
}
