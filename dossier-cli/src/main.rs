//! Dossier CLI - initiative scoring and portfolio balance checks

#![deny(warnings)]

// Global invariants enforced:
// - Deterministic output ordering
// - Identical input yields byte-for-byte identical output
// - Diagnostics go to stderr, results to stdout

use anyhow::Context;
use clap::{Parser, Subcommand};
use dossier_core::catalogue;
use dossier_core::config::{self, ResolvedConfig};
use dossier_core::portfolio;
use dossier_core::{
    load_initiatives, render_json, render_text, score_portfolio, ReportOptions, Scenario,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dossier")]
#[command(about = "Six-dimension initiative scoring, tiering and portfolio balance checks")]
#[command(version = env!("DOSSIER_VERSION"))]
struct Cli {
    /// Enable debug logging on stderr (overrides RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score and rank a batch of initiatives
    Score {
        /// Path to the initiatives JSON file
        file: PathBuf,

        /// Weighting scenario (overrides config file)
        #[arg(long, ignore_case = true)]
        scenario: Option<ScenarioArg>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Show only top N results (overrides config file)
        #[arg(long)]
        top: Option<usize>,

        /// Minimum final score (overrides config file)
        #[arg(long)]
        min_final_score: Option<f64>,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Check category and engine allocation against target bands
    Balance {
        /// Path to the initiatives JSON file
        file: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Exit with status 1 when any bucket is out of range
        #[arg(long)]
        strict: bool,
    },
    /// Print the criteria catalogue
    Catalogue {
        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Validate or show the configuration
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without scoring anything
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ScenarioArg {
    A,
    B,
    C,
}

impl From<ScenarioArg> for Scenario {
    fn from(arg: ScenarioArg) -> Self {
        match arg {
            ScenarioArg::A => Scenario::A,
            ScenarioArg::B => Scenario::B,
            ScenarioArg::C => Scenario::C,
        }
    }
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::new("dossier=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dossier=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {}", e))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Score {
            file,
            scenario,
            format,
            top,
            min_final_score,
            config: config_path,
        } => {
            let project_root = std::env::current_dir()?;
            let resolved = config::load_and_resolve_with_scenario(
                &project_root,
                config_path.as_deref(),
                scenario.map(Scenario::from),
            )
            .context("failed to load configuration")?;

            if let Some(config_path) = &resolved.config_path {
                eprintln!("Using config: {}", config_path.display());
            }
            tracing::debug!(
                scenario = %resolved.scenario,
                weights = ?resolved.weights,
                "resolved configuration"
            );

            config::validate_filters(min_final_score, top)
                .context("invalid --min-final-score or --top")?;

            // CLI flags override config file values
            let options = ReportOptions {
                min_final_score: min_final_score.or(resolved.min_final_score),
                top_n: top.or(resolved.top_n),
            };

            let initiatives = load_initiatives(&file)?;
            let reports = score_portfolio(&initiatives, &resolved.settings(), options)
                .with_context(|| format!("failed to score {}", file.display()))?;

            match format {
                OutputFormat::Text => print!("{}", render_text(&reports)),
                OutputFormat::Json => println!("{}", render_json(&reports)),
            }
        }
        Commands::Balance {
            file,
            format,
            strict,
        } => {
            let initiatives = load_initiatives(&file)?;
            let report = portfolio::validate_portfolio_balance(&initiatives)
                .with_context(|| format!("failed to validate {}", file.display()))?;

            match format {
                OutputFormat::Text => print!("{}", portfolio::render_balance_text(&report)),
                OutputFormat::Json => println!("{}", serde_json_pretty(&report)?),
            }

            if strict && !report.is_balanced() {
                let buckets: Vec<&str> =
                    report.out_of_range().map(|b| b.bucket.as_str()).collect();
                eprintln!("Portfolio out of balance: {}", buckets.join(", "));
                std::process::exit(1);
            }
        }
        Commands::Catalogue { format } => {
            let template = catalogue::template();
            match format {
                OutputFormat::Text => print!("{}", catalogue::render_catalogue_text(template)),
                OutputFormat::Json => println!("{}", serde_json_pretty(template)?),
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let project_root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&project_root, path.as_deref());

                match resolved {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let project_root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&project_root, path.as_deref())
                    .context("failed to load configuration")?;
                print_config(&resolved);
            }
        },
    }

    Ok(())
}

fn print_config(resolved: &ResolvedConfig) {
    println!("Configuration:");
    if let Some(ref p) = resolved.config_path {
        println!("  Source: {}", p.display());
    } else {
        println!("  Source: defaults (no config file found)");
    }
    println!("  Scenario: {}", resolved.scenario);
    println!();
    println!("Weights:");
    let w = &resolved.weights;
    for (i, value) in w.as_array().iter().enumerate() {
        println!("  d{}: {}", i + 1, value);
    }
    println!();
    println!("Quadrant modifiers:");
    let m = &resolved.quadrant_modifiers;
    println!("  quick_win: {}", m.quick_win);
    println!("  push_harder: {}", m.push_harder);
    println!("  transformational: {}", m.transformational);
    println!("  moonshot: {}", m.moonshot);
    println!();
    println!("Filters:");
    println!(
        "  min_final_score: {}",
        resolved
            .min_final_score
            .map(|v| v.to_string())
            .unwrap_or_else(|| "none".to_string())
    );
    println!(
        "  top: {}",
        resolved
            .top_n
            .map(|v| v.to_string())
            .unwrap_or_else(|| "none".to_string())
    );
}

fn serde_json_pretty<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize output")
}
