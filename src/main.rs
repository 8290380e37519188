//! sbom-compiler: compile SPDX documents from resolved build dependency graphs.

#![allow(clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use sbom_compiler::{
    cli,
    config::{self, AppConfig},
    pipeline::exit_codes,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sbom-compiler")]
#[command(author = "Binarly.io")]
#[command(version)]
#[command(about = "Compile SPDX 2.3 SBOMs from resolved build dependency graphs", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Document written
    1  Verification errors (with --fail-on-verification) / verify found errors
    3  Error occurred

EXAMPLES:
    # Compile a build snapshot to a file
    sbom-compiler compile build/sbom-snapshot.json -O build/app.spdx.json

    # Offline, with a local SPDX license list
    sbom-compiler compile snapshot.json --license-list licenses.json --offline

    # Check a document written earlier
    sbom-compiler verify app.spdx.json")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `compile` subcommand
#[derive(Parser)]
struct CompileArgs {
    /// Build snapshot exported by the build
    snapshot: PathBuf,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Local SPDX license list (licenses.json)
    #[arg(long)]
    license_list: Option<PathBuf>,

    /// Never download the SPDX license list
    #[arg(long)]
    offline: bool,

    /// Document name (defaults to the snapshot's project path)
    #[arg(long)]
    name: Option<String>,

    /// Document namespace URI (defaults to a random urn:uuid:)
    #[arg(long, env = "SBOM_COMPILER_NAMESPACE")]
    namespace: Option<String>,

    /// Extra document creator, e.g. "Organization: Example Inc."
    #[arg(long)]
    creator: Option<String>,

    /// Supplier of workspace project packages
    #[arg(long)]
    package_supplier: Option<String>,

    /// Skip external components without a Maven manifest instead of failing
    #[arg(long)]
    ignore_non_maven_dependencies: bool,

    /// Skip the structural verifier
    #[arg(long)]
    no_verify: bool,

    /// Exit with code 1 if the verifier reports errors
    #[arg(long)]
    fail_on_verification: bool,

    /// Write compact JSON
    #[arg(long)]
    compact: bool,
}

impl CompileArgs {
    /// CLI flags as a config layer to merge over the file config
    fn overrides(&self, quiet: bool) -> AppConfig {
        let mut overrides = AppConfig::builder()
            .ignore_non_maven_dependencies(self.ignore_non_maven_dependencies)
            .verify(!self.no_verify)
            .fail_on_verification(self.fail_on_verification)
            .quiet(quiet)
            .license_list(self.license_list.clone())
            .offline(self.offline)
            .output_file(self.output_file.clone())
            .compact(self.compact)
            .build();
        overrides.document.name.clone_from(&self.name);
        overrides.document.namespace.clone_from(&self.namespace);
        overrides.document.creator.clone_from(&self.creator);
        overrides.document.package_supplier.clone_from(&self.package_supplier);
        overrides
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a build snapshot into an SPDX JSON document
    Compile(CompileArgs),

    /// Verify a written SPDX JSON document
    Verify {
        /// SPDX JSON document
        document: PathBuf,

        /// Exit with code 1 on warnings as well
        #[arg(long)]
        fail_on_warning: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print the discovered config file
    Path,
    /// Print a commented example configuration
    Example,
    /// Print the JSON Schema of the config file format
    Schema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate an example .sbom-compiler.yaml in the current directory
    Init,
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
        .init();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Compile(args) => {
            let overrides = args.overrides(cli.quiet);
            let (config, loaded_from) =
                AppConfig::from_file_with_overrides(cli.config.as_deref(), &overrides);
            if let Some(path) = &loaded_from {
                tracing::debug!("Loaded config from {}", path.display());
            }
            cli::run_compile(cli::CompileConfig {
                snapshot_path: args.snapshot,
                config,
            })
        }

        Commands::Verify {
            document,
            fail_on_warning,
        } => cli::run_verify(&document, fail_on_warning, cli.quiet),

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "sbom-compiler", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => {
            run_config(action, cli.config.as_deref())?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn run_config(action: ConfigAction, explicit: Option<&std::path::Path>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let (config, loaded_from) = config::load_or_default(explicit);
            if let Some(path) = &loaded_from {
                eprintln!("# Loaded from: {}", path.display());
            } else {
                eprintln!("# No config file found; showing defaults");
            }
            let yaml = serde_yaml_ng::to_string(&config).context("failed to serialize config")?;
            print!("{yaml}");
        }
        ConfigAction::Path => match config::discover_config_file(explicit) {
            Some(path) => println!("{}", path.display()),
            None => eprintln!("No config file found."),
        },
        ConfigAction::Example => print!("{}", config::generate_full_example_config()),
        ConfigAction::Schema { output } => {
            let schema = config::generate_json_schema();
            match output {
                Some(path) => std::fs::write(&path, schema)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => println!("{schema}"),
            }
        }
        ConfigAction::Init => {
            let target = std::env::current_dir()
                .context("cannot determine current directory")?
                .join(".sbom-compiler.yaml");
            if target.exists() {
                anyhow::bail!(
                    "{} already exists. Remove it first to re-initialize.",
                    target.display()
                );
            }
            std::fs::write(&target, config::generate_full_example_config())
                .with_context(|| format!("failed to write {}", target.display()))?;
            eprintln!("Created {}", target.display());
        }
    }
    Ok(())
}
