//! # zodgen
//!
//! CLI tool for generating TypeScript Zod models from OpenAPI documents.
//!
//! ## Usage
//!
//! ```bash
//! # Generate modules from a document
//! zodgen generate --input openapi.yaml
//!
//! # Generate modules to a specific output directory
//! zodgen generate --input openapi.yaml --output ./src/models
//!
//! # Regenerate whenever the document is saved
//! zodgen generate --input openapi.yaml --watch
//!
//! # Print the modules instead of writing them
//! zodgen generate --input openapi.yaml --dry-run
//!
//! # Write a commented zodgen.toml
//! zodgen init
//!
//! # Check that generated modules are up-to-date
//! zodgen validate --input openapi.yaml
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use zodgen::report::GenerationReport;
use zodgen_cli::{
    config::{CliArgs, Config, ConfigManager, CONFIG_FILENAME},
    error::CliError,
    generator::SchemaGenerator,
    loader::DocumentLoader,
    watcher::{DocumentEvent, DocumentWatcher},
    writer::{outdated_files, ModuleWriter, WriteOutcome},
};

#[derive(Parser)]
#[command(name = "zodgen")]
#[command(author, version, about = "Generate TypeScript Zod models from OpenAPI documents", long_about = None)]
struct Cli {
    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one module per entity from an OpenAPI document
    Generate {
        /// OpenAPI document (JSON or YAML)
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for generated modules
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Watch the document and regenerate on change
        #[arg(short, long)]
        watch: bool,

        /// Print modules instead of writing them
        #[arg(long)]
        dry_run: bool,

        /// zodgen.toml to use instead of the one in the working directory
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Declare structural types instead of inferring them
        #[arg(long)]
        explicit_types: bool,

        /// Emit DTO classes with framework property decorators
        #[arg(long)]
        annotations: bool,

        /// Fail on schema shapes without a mapping rule
        #[arg(long)]
        strict: bool,
    },

    /// Initialize a new zodgen configuration file
    Init {
        /// Where to write the configuration
        #[arg(short, long, default_value = CONFIG_FILENAME)]
        output: PathBuf,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate that generated modules are up-to-date
    Validate {
        /// OpenAPI document (JSON or YAML)
        #[arg(short, long)]
        input: PathBuf,

        /// Directory holding the generated modules
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// zodgen.toml to use instead of the one in the working directory
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
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

/// Install the stderr log subscriber. `--verbose` wins over `RUST_LOG`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Generate {
            input,
            output,
            watch,
            dry_run,
            config,
            explicit_types,
            annotations,
            strict,
        } => {
            let args = CliArgs {
                output,
                prefer_explicit_typing: explicit_types.then_some(true),
                generate_framework_annotations: annotations.then_some(true),
                strict: strict.then_some(true),
            };
            cmd_generate(&input, &args, watch, dry_run, config.as_deref())
        }

        Commands::Init { output, force } => cmd_init(output, force),

        Commands::Validate {
            input,
            output,
            config,
        } => cmd_validate(&input, output, config.as_deref()),
    }
}

/// `zodgen generate`.
fn cmd_generate(
    input: &Path,
    args: &CliArgs,
    watch: bool,
    dry_run: bool,
    config_path: Option<&Path>,
) -> Result<(), CliError> {
    let config = ConfigManager::load(config_path)?;
    let config = ConfigManager::merge_cli_args(config, args);

    if watch {
        run_watch_mode(input, &config, dry_run)
    } else {
        run_generate(input, &config, dry_run)
    }
}

/// Run generation once.
fn run_generate(input: &Path, config: &Config, dry_run: bool) -> Result<(), CliError> {
    println!("{}", "Loading document...".cyan());

    let document = DocumentLoader::load(input)?;
    if let Some(title) = &document.title {
        println!("  Document: {}", title.bold());
    }
    println!(
        "  Found {} schema(s)",
        document.registry.len().to_string().green()
    );

    println!("{}", "Generating Zod models...".cyan());

    let generator = SchemaGenerator::new(config.clone());
    let generated = generator.generate(&document)?;

    print_warnings(&generated.output.report);
    println!(
        "  Generated {} model(s) in {} entity module(s)",
        generated.model_count().to_string().green(),
        generated.output.entities.len().to_string().green()
    );

    let writer = ModuleWriter::from_dry_run(dry_run);
    for outcome in writer.write_all(&generated.files)? {
        match outcome {
            WriteOutcome::Written { path, bytes } => {
                println!("{} {} ({} bytes)", "✓".green(), path.display(), bytes);
            }
            WriteOutcome::Unchanged { path } => {
                println!("{} Unchanged {}", "·".dimmed(), path.display());
            }
            WriteOutcome::Previewed { path, content } => {
                let rule = "─".repeat(60);
                println!("{} {}", "[dry-run]".yellow(), path.display());
                println!("{}\n{}{}", rule.dimmed(), content, rule.dimmed());
            }
        }
    }

    Ok(())
}

/// Generate once, then again after every save of the document.
fn run_watch_mode(input: &Path, config: &Config, dry_run: bool) -> Result<(), CliError> {
    println!(
        "{} {} (Ctrl+C to stop)\n",
        "Watching".cyan(),
        input.display()
    );

    // A broken document at startup should not end the session
    if let Err(e) = run_generate(input, config, dry_run) {
        println!("{} {}", "Generation error:".red(), e);
    }

    let session = DocumentWatcher::new(input).start()?;

    println!("\n{}", "Watching for changes...".cyan());

    while let Some(event) = session.next_event() {
        match event {
            DocumentEvent::Failed(message) => {
                println!("{} {}", "Watch error:".red(), message);
                continue;
            }
            // Replace-on-save editors remove the file first; the write follows
            DocumentEvent::Removed(_) => continue,
            DocumentEvent::Changed(path) => {
                println!("\n{} {}", "Document changed:".cyan(), path.display());
            }
        }

        if let Err(e) = run_generate(input, config, dry_run) {
            println!("{} {}", "Generation error:".red(), e);
        }

        println!("\n{}", "Watching for changes...".cyan());
    }

    Ok(())
}

/// `zodgen init`.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        return Err(CliError::Validation(format!(
            "{} already exists; pass --force to replace it",
            output.display()
        )));
    }

    std::fs::write(&output, ConfigManager::default_config_content())?;

    println!("{} Wrote {}", "✓".green(), output.display());

    Ok(())
}

/// `zodgen validate`: regenerate in memory and diff against the disk.
fn cmd_validate(
    input: &Path,
    output: Option<PathBuf>,
    config_path: Option<&Path>,
) -> Result<(), CliError> {
    println!("{}", "Validating generated modules...".cyan());

    let config = ConfigManager::load(config_path)?;
    let config = ConfigManager::merge_cli_args(
        config,
        &CliArgs {
            output,
            ..Default::default()
        },
    );

    let document = DocumentLoader::load(input)?;
    let generated = SchemaGenerator::new(config).generate(&document)?;

    let outdated = outdated_files(&generated.files);
    if outdated.is_empty() {
        println!("{} Modules are up-to-date", "✓".green());
        return Ok(());
    }

    println!("{} Modules are out of date:", "✗".red());
    for path in &outdated {
        println!("  {}", path.display());
    }
    println!("  Run 'zodgen generate' to update");
    Err(CliError::Validation(format!(
        "{} module(s) out of date",
        outdated.len()
    )))
}

/// Print degraded shapes; they do not fail a non-strict run.
fn print_warnings(report: &GenerationReport) {
    let shapes = report.unsupported_shapes();
    if shapes.is_empty() {
        return;
    }
    println!("{} {} unsupported shape(s):", "Warning:".yellow(), shapes.len());
    for shape in shapes {
        println!("  {}", shape);
    }
}

fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
