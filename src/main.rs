//! sbom-analyzer: SBOM analysis tool
//!
//! Analyzes, verifies and queries SPDX, CycloneDX and SWID documents.

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use sbom_analyzer::{
    cli,
    config::{self, AppConfig, ConfigOverrides, Validatable},
    pipeline::exit_codes,
    reports::ReportFormat,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with format support info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nSupported SBOM Formats:",
        "\n  SPDX:      2.x (JSON, tag-value)",
        "\n  CycloneDX: 1.x (JSON, XML)",
        "\n  SWID:      ISO/IEC 19770-2 (XML, JSON)",
        "\n\nOutput Formats:",
        "\n  text, json, markdown, html"
    )
}

#[derive(Parser)]
#[command(name = "sbom-analyzer")]
#[command(version, long_version = build_long_version())]
#[command(about = "Analyze, verify and query SBOM documents", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  Verification failed / package not found
    3  Error occurred

EXAMPLES:
    # Completeness, licenses and vulnerabilities
    sbom-analyzer analyze bom.cdx.json

    # CI gate on structural problems
    sbom-analyzer verify sbom.spdx.json -t json

    # Dependency tree with cycles
    sbom-analyzer dep bom.cdx.xml

    # Look up a package (typos are tolerated)
    sbom-analyzer check-pkg bom.cdx.json reqeusts")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Largest SBOM file accepted, in bytes
    #[arg(long, global = true, env = "SBOM_MAX_FILE_SIZE")]
    max_file_size: Option<u64>,

    /// Minimum name similarity (0.0-1.0) for fuzzy package matches
    #[arg(long, global = true, env = "SBOM_FUZZY_CUTOFF")]
    fuzzy_cutoff: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

/// Output options shared by the report commands
#[derive(Args)]
struct OutputArgs {
    /// Report format (default: text, or the config file setting)
    #[arg(short = 't', long = "type", value_enum)]
    format: Option<ReportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze licenses, vulnerabilities, dependency depth and completeness
    Analyze {
        /// Path to the SBOM file
        file: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Verify document structure and package completeness
    Verify {
        /// Path to the SBOM file
        file: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show the dependency tree, depths and cycles
    Dep {
        /// Path to the SBOM file
        file: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Look up a package by name (exact, then fuzzy)
    CheckPkg {
        /// Path to the SBOM file
        file: PathBuf,

        /// Package name, or search term with --search
        name: String,

        /// List every package whose name or description contains NAME
        #[arg(short, long)]
        search: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the JSON schema of the configuration file
    ConfigSchema {
        /// Write the schema to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (defaults merged with the config file)
    Show,
    /// Write an example .sbom-analyzer.yaml to the current directory
    Init,
}

fn init_logging(cli: &Cli) {
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}

/// File configuration with command-line values layered on top
fn resolve_config(cli: &Cli, output: &OutputArgs) -> Result<AppConfig> {
    let (mut app_config, loaded_from) = config::load_config(cli.config.as_deref())?;
    if let Some(path) = &loaded_from {
        tracing::debug!("Loaded config from {}", path.display());
    }

    app_config.apply_overrides(&ConfigOverrides {
        max_file_size: cli.max_file_size,
        fuzzy_cutoff: cli.fuzzy_cutoff,
        format: output.format,
        output_file: output.output.clone(),
        no_color: cli.no_color,
    });

    for error in app_config.validate() {
        tracing::warn!("Invalid configuration: {}", error);
    }
    Ok(app_config)
}

fn run(cli: &Cli) -> Result<i32> {
    match &cli.command {
        Commands::Analyze { file, output } => {
            cli::run_analyze(file, &resolve_config(cli, output)?, cli.quiet)
        }
        Commands::Verify { file, output } => {
            cli::run_verify(file, &resolve_config(cli, output)?, cli.quiet)
        }
        Commands::Dep { file, output } => {
            cli::run_dep(file, &resolve_config(cli, output)?, cli.quiet)
        }
        Commands::CheckPkg {
            file,
            name,
            search,
            output,
        } => cli::run_check_pkg(file, name, *search, &resolve_config(cli, output)?, cli.quiet),

        Commands::Completions { shell } => {
            generate(*shell, &mut Cli::command(), "sbom-analyzer", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::ConfigSchema { output } => {
            let schema = config::generate_json_schema();
            match output {
                Some(path) => {
                    std::fs::write(path, &schema)?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (app_config, loaded_from) = config::load_config(cli.config.as_deref())?;
                match &loaded_from {
                    Some(path) => eprintln!("# Loaded from {}", path.display()),
                    None => eprintln!("# No config file found, showing defaults"),
                }
                print!("{}", serde_yaml::to_string(&app_config)?);
                Ok(exit_codes::SUCCESS)
            }
            ConfigAction::Init => {
                let dir = std::env::current_dir()?;
                let path = config::init_config_file(&dir)?;
                eprintln!("Created {}", path.display());
                Ok(exit_codes::SUCCESS)
            }
        },
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_codes::ERROR
        }
    };
    std::process::exit(code);
}
