//! dha-audit - Inventory & Recipe Data Health Auditor
//!
//! Loads `items.csv` and `recipes.csv` from the data folder, audits them,
//! writes the report files into the output folder and prints a summary.
//! Exits with status 1 when the tables cannot be audited at all.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use dha_audit::{output, HealthAuditor};
use dha_common::config::{
    load_config, write_toml_config, FolderResolver, TomlConfig, CONFIG_ENV_VAR,
    DATA_FOLDER_ENV_VAR, OUTPUT_FOLDER_ENV_VAR,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for dha-audit
#[derive(Parser, Debug)]
#[command(name = "dha-audit")]
#[command(about = "Audit inventory and recipe tables for data-quality defects")]
#[command(version)]
struct Args {
    /// Folder containing items.csv and recipes.csv
    #[arg(long, env = DATA_FOLDER_ENV_VAR)]
    data_folder: Option<PathBuf>,

    /// Folder receiving the report files
    #[arg(long, env = OUTPUT_FOLDER_ENV_VAR)]
    output_folder: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(long, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Duplicate similarity threshold (0-100)
    #[arg(long)]
    threshold: Option<f64>,

    /// Run validators one after another instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Audit only, do not write report files
    #[arg(long)]
    no_write: bool,

    /// Print the full report as JSON instead of the summary
    #[arg(long)]
    json: bool,

    /// Write the effective configuration to PATH and exit
    #[arg(long, value_name = "PATH")]
    init_config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let loaded = match load_config(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\nERROR: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&loaded.config.logging.level);
    match (&loaded.source, &loaded.fallback) {
        (Some(path), _) => info!(path = %path.display(), "Using config file"),
        (None, Some(fallback)) => warn!(
            path = %fallback.path.display(),
            reason = %fallback.reason,
            "Ignoring unreadable config file, using compiled defaults"
        ),
        (None, None) => info!("No config file, using compiled defaults"),
    }
    let config = loaded.config;

    let data_folder = FolderResolver::data_folder(&config).resolve(args.data_folder.as_deref());

    match run(&args, config, &data_folder) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_troubleshooting(&e, &data_folder);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; RUST_LOG wins over the configured level
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args, mut config: TomlConfig, data_folder: &Path) -> Result<()> {
    if let Some(threshold) = args.threshold {
        config.rules.duplicate_threshold = threshold;
    }

    if let Some(target) = &args.init_config {
        config.rules = config.rules.validate()?;
        write_toml_config(&config, target)
            .with_context(|| format!("Failed to write config to {}", target.display()))?;
        println!("Configuration written to {}", target.display());
        return Ok(());
    }

    let output_folder =
        FolderResolver::output_folder(&config).resolve(args.output_folder.as_deref());
    info!(
        data_folder = %data_folder.display(),
        output_folder = %output_folder.display(),
        "Starting dha-audit v{}",
        env!("CARGO_PKG_VERSION")
    );

    let auditor = HealthAuditor::new(config.rules)?.parallel(!args.sequential);
    let report = auditor.audit_folder(data_folder)?;

    let written = if args.no_write {
        Vec::new()
    } else {
        output::write_reports(&report, &output_folder)
            .with_context(|| format!("Failed to write reports to {}", output_folder.display()))?
    };

    if args.json {
        let json = serde_json::to_string_pretty(&output::ReportEnvelope::new(&report))?;
        println!("{}", json);
    } else {
        print!("{}", output::render_summary(&report.summary(), &written));
    }

    Ok(())
}

fn print_troubleshooting(error: &anyhow::Error, data_folder: &Path) {
    eprintln!("\nERROR: {:#}", error);
    eprintln!("\nTROUBLESHOOTING:");
    eprintln!("1. Verify file structure:");
    eprintln!("   {}/", data_folder.display());
    eprintln!("   ├── items.csv");
    eprintln!("   └── recipes.csv");
    eprintln!("2. Check file extensions are .csv");
    eprintln!("3. Ensure files are not empty and have a header row");
    eprintln!(
        "4. Set the folder with --data-folder or {}",
        DATA_FOLDER_ENV_VAR
    );
}
