//! cvault: backup path and restore planning CLI
//!
//! Commands:
//!   path parse <repo-ref>      - decode a stored repo ref
//!   path build ...             - encode a data-layer path from its parts
//!   path drive <repo-ref>      - show the drive view of a drive item path
//!   restore-paths --details F  - compute restore paths for a backup's details
//!   config show               - display current configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use cvault_core::config::CvaultConfig;
use cvault_core::BackupVersion;
use cvault_path::{
    from_data_layer_path, new_service_resources, to_drive_path, Builder, CategoryType,
    ResourcePath, ServiceType,
};
use cvault_restore::{
    augment_restore_paths, Bus, DetailsFile, RestorePathTransformer, RestorePaths,
};

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "cvault",
    version,
    about = "cvault backup path tools",
    long_about = "cvault: encode, decode, and plan restores for backup resource paths"
)]
struct Cli {
    /// Path to cvault.toml configuration file
    #[arg(long, short = 'c', env = "CVAULT_CONFIG", default_value = "cvault.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, env = "CVAULT_LOG")]
    log: Option<String>,

    /// Log format (json, text); overrides the config file
    #[arg(long, env = "CVAULT_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resource path encoding and decoding
    Path {
        #[command(subcommand)]
        action: PathAction,
    },

    /// Compute restore paths for every entry in a details file
    ///
    /// Prints one JSON object per line. Failed entries are summarised on
    /// stderr and make the command exit non-zero.
    #[command(name = "restore-paths")]
    RestorePaths {
        /// Details JSON file (array of entries, or {"entries": [...]})
        #[arg(long, short = 'd')]
        details: PathBuf,
        /// Format version the backup was written with
        #[arg(long, default_value_t = BackupVersion::CURRENT.0)]
        backup_version: u32,
        /// Add folder metadata entries for drive items
        #[arg(long)]
        augment: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum PathAction {
    /// Decode a repo ref and print its parts as JSON
    Parse {
        /// Escaped data-layer path
        repo_ref: String,
        /// Treat the last element as an item
        #[arg(long)]
        item: bool,
        /// Print resource ids and folder names instead of concealing them
        #[arg(long)]
        plain: bool,
    },

    /// Encode a data-layer path from its parts
    Build {
        #[arg(long, short = 't')]
        tenant: String,
        /// SERVICE:ID, outermost first (repeatable)
        #[arg(long = "resource", short = 'r', required = true)]
        resources: Vec<String>,
        #[arg(long)]
        category: String,
        /// Mark the last element as an item
        #[arg(long)]
        item: bool,
        /// Raw folder (and item) elements
        elements: Vec<String>,
    },

    /// Show the drive view of a drive item path
    Drive {
        /// Escaped data-layer path of a drive item
        repo_ref: String,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active configuration (merged defaults + config file)
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CvaultConfig::load(&cli.config)
        .with_context(|| format!("loading config: {}", cli.config.display()))?;

    let level = cli.log.clone().unwrap_or_else(|| config.logging.level.clone());
    let format = match &cli.log_format {
        Some(f) => f.clone(),
        None if config.logging.format == "json" => LogFormat::Json,
        None => LogFormat::Text,
    };
    init_logging(&level, &format);

    if !cli.config.exists() {
        warn!(
            "config file not found: {}  (using defaults)",
            cli.config.display()
        );
    }

    match cli.command {
        Commands::Path { action } => match action {
            PathAction::Parse {
                repo_ref,
                item,
                plain,
            } => cmd_path_parse(&repo_ref, item, plain),
            PathAction::Build {
                tenant,
                resources,
                category,
                item,
                elements,
            } => cmd_path_build(&tenant, &resources, &category, item, &elements),
            PathAction::Drive { repo_ref } => cmd_path_drive(&repo_ref),
        },
        Commands::RestorePaths {
            details,
            backup_version,
            augment,
        } => cmd_restore_paths(&config, &details, BackupVersion(backup_version), augment),
        Commands::Config {
            action: ConfigAction::Show,
        } => cmd_config_show(&config, &cli.config),
    }
}

fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr so stdout stays machine-readable.
    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

// ── `cvault path` ─────────────────────────────────────────────────────────────

const CONCEALED: &str = "***";

fn path_summary(p: &ResourcePath, plain: bool) -> serde_json::Value {
    let show = |s: &str| {
        if plain {
            s.to_string()
        } else {
            CONCEALED.to_string()
        }
    };

    let resources: Vec<serde_json::Value> = p
        .service_resources()
        .iter()
        .map(|sr| {
            serde_json::json!({
                "service": sr.service,
                "protectedResource": show(&sr.protected_resource),
            })
        })
        .collect();

    let folders: Vec<String> = p.folders().iter().map(|f| show(f)).collect();

    serde_json::json!({
        "path": if plain { p.to_string() } else { p.conceal() },
        "tenant": show(p.tenant()),
        "serviceResources": resources,
        "category": p.category(),
        "folders": folders,
        "item": p.item().map(show),
        "shortRef": p.short_ref(),
    })
}

fn cmd_path_parse(repo_ref: &str, item: bool, plain: bool) -> Result<()> {
    let p = from_data_layer_path(repo_ref, item).context("parsing repo ref")?;
    println!("{}", serde_json::to_string_pretty(&path_summary(&p, plain))?);
    Ok(())
}

fn parse_resource(s: &str) -> Result<(ServiceType, String)> {
    let (service, id) = s
        .split_once(':')
        .with_context(|| format!("resource must be SERVICE:ID, got {s:?}"))?;
    let service: ServiceType = service.parse().context("parsing resource service")?;
    Ok((service, id.to_string()))
}

fn cmd_path_build(
    tenant: &str,
    resources: &[String],
    category: &str,
    item: bool,
    elements: &[String],
) -> Result<()> {
    let pairs = resources
        .iter()
        .map(|r| parse_resource(r))
        .collect::<Result<Vec<_>>>()?;
    let srs = new_service_resources(pairs).context("invalid resource chain")?;
    let category: CategoryType = category.parse().context("parsing category")?;

    let p = Builder::new()
        .append(elements)
        .to_data_layer_path(tenant, &srs, category, item)
        .context("building path")?;

    println!("{p}");
    Ok(())
}

fn cmd_path_drive(repo_ref: &str) -> Result<()> {
    let p = from_data_layer_path(repo_ref, true).context("parsing repo ref")?;
    let drive = to_drive_path(&p).context("extracting drive path")?;
    println!("{}", serde_json::to_string_pretty(&drive)?);
    Ok(())
}

// ── `cvault restore-paths` ────────────────────────────────────────────────────

fn restore_line(index: Option<usize>, paths: &RestorePaths) -> serde_json::Value {
    let mut line = serde_json::json!({
        "storagePath": paths.storage_path.to_string(),
        "restorePath": paths.restore_path.to_string(),
    });
    if let Some(i) = index {
        line["index"] = i.into();
    }
    line
}

fn cmd_restore_paths(
    config: &CvaultConfig,
    details: &Path,
    backup_version: BackupVersion,
    augment: bool,
) -> Result<()> {
    let transformer = RestorePathTransformer::from_config(config);
    let bus = Bus::new();
    let cancel = CancellationToken::new();

    let (entries, results) = transformer
        .transform_source(backup_version, &DetailsFile::new(details), &bus, &cancel)
        .with_context(|| format!("computing restore paths for {}", details.display()))?;

    if augment {
        let mut drive_paths = Vec::new();
        for (entry, result) in entries.iter().zip(&results) {
            match result {
                Some(paths) if entry.info.is_drive_item() => drive_paths.push(paths.clone()),
                Some(paths) => println!("{}", restore_line(None, paths)),
                None => {}
            }
        }

        let augmented =
            augment_restore_paths(backup_version, drive_paths).context("augmenting drive paths")?;
        for paths in &augmented {
            println!("{}", restore_line(None, paths));
        }
    } else {
        for (i, result) in results.iter().enumerate() {
            if let Some(paths) = result {
                println!("{}", restore_line(Some(i), paths));
            }
        }
    }

    let failed = bus.recovered();
    info!(
        entries = entries.len(),
        failed = failed.len(),
        "restore-paths finished"
    );

    if !failed.is_empty() {
        eprintln!("{} of {} entries failed:", failed.len(), entries.len());
        for msg in &failed {
            eprintln!("  {msg}");
        }
        anyhow::bail!("{} entries could not be mapped to a restore path", failed.len());
    }

    Ok(())
}

// ── `cvault config show` ──────────────────────────────────────────────────────

fn cmd_config_show(config: &CvaultConfig, config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!("# Configuration from: {}", config_path.display());
    } else {
        println!("# Configuration: defaults (no file at {})", config_path.display());
    }
    println!();
    let rendered = config.to_toml().context("serializing config to TOML")?;
    print!("{rendered}");
    Ok(())
}
