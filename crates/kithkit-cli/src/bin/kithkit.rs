// SPDX-License-Identifier: MIT OR Apache-2.0
//! `kithkit`: the consumer CLI. Installs, updates, and removes signed skill
//! packages from a local catalog root, and runs the screener's adversarial
//! self-test harness.

use anyhow::{Context, Result};
use chrono::{TimeDelta, Utc};
use clap::{Parser, Subcommand};
use kithkit_catalog::{search, verify_index, CatalogError, IndexCache, SearchQuery};
use kithkit_cli::commands::{read_index_optional, read_revocations_optional, resolve_public_key, schema_json, SchemaKind};
use kithkit_cli::config::{load_consumer_config, validate_consumer_config, ConsumerConfig, CONFIG_FILENAME};
use kithkit_cli::format::{format_installed_entries, format_search_hits, format_selftest_summary, OutputFormat};
use kithkit_core::SignedCatalogIndex;
use kithkit_install::{InstallOptions, UpdateOutcome};
use kithkit_screen::{run_selftest, PatternDetector};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(name = "kithkit", version, about = "Install and manage kithkit agent skills")]
struct Cli {
    /// Path to `kithkit.toml`.
    #[arg(long, global = true, default_value = "kithkit.toml")]
    config: PathBuf,
    /// Output format (`text` or `json`).
    #[arg(long, global = true, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Verbose logging.
    #[arg(long, global = true)]
    debug: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search the catalog index by free text, tag, or capability.
    Search {
        /// Case-insensitive substring match over skill name/description.
        query: Option<String>,
        /// Exact tag to require.
        #[arg(long)]
        tag: Option<String>,
        /// Exact required-or-optional capability to require.
        #[arg(long)]
        capability: Option<String>,
    },
    /// Verify and install a skill.
    Install {
        /// Skill name.
        skill: String,
        /// Specific version; defaults to the index's `latest`.
        version: Option<String>,
    },
    /// Update one installed skill, or every skill with an update available
    /// when no name is given.
    Update {
        /// Skill name; omit to update everything with a pending update.
        skill: Option<String>,
    },
    /// Remove an installed skill, backing up its config file first.
    Uninstall {
        /// Skill name.
        skill: String,
    },
    /// List installed skills.
    List,
    /// Run the adversarial self-test harness against the packaged detector.
    Selftest,
    /// Print the JSON schema for a kithkit data type.
    Schema {
        /// Which schema to print.
        kind: SchemaKind,
    },
}

fn main() {
    let cli = Cli::parse();
    let filter = if cli.debug { EnvFilter::new("kithkit=debug") } else { EnvFilter::new("kithkit=info") };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(EXIT_FAILURE);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Schema { kind } => {
            println!("{}", schema_json(kind)?);
            Ok(())
        }
        Command::Search { query, tag, capability } => cmd_search(&cli.config, cli.format, query, tag, capability),
        Command::Install { skill, version } => cmd_install(&cli.config, &skill, version.as_deref()),
        Command::Update { skill } => cmd_update(&cli.config, skill.as_deref()),
        Command::Uninstall { skill } => cmd_uninstall(&cli.config, &skill),
        Command::List => cmd_list(&cli.config, cli.format),
        Command::Selftest => cmd_selftest(cli.format),
    }
}

fn load_config(path: &Path) -> Result<ConsumerConfig> {
    let mut config = load_consumer_config(path)?;
    for warning in validate_consumer_config(&mut config) {
        tracing::warn!("{warning}");
    }
    Ok(config)
}

fn cache_path(config: &ConsumerConfig) -> PathBuf {
    config.skills_dir.join(".index-cache.json")
}

fn fetch_from(catalog_root: PathBuf) -> impl FnMut(&str) -> Result<Vec<u8>, String> {
    move |archive_path: &str| {
        let path = catalog_root.join(archive_path);
        std::fs::read(&path).map_err(|e| format!("read archive '{}': {e}", path.display()))
    }
}

/// Fetch (with TTL caching) and signature-verify the catalog index.
fn load_verified_index(config: &ConsumerConfig) -> Result<SignedCatalogIndex> {
    let cache = IndexCache::new(cache_path(config), TimeDelta::minutes(config.cache_ttl_minutes));
    let catalog_root = config.catalog_root.clone();
    let index = cache
        .get(Utc::now(), move || {
            let path = catalog_root.join("index.json");
            let content = std::fs::read_to_string(&path).map_err(CatalogError::from)?;
            serde_json::from_str(&content).map_err(CatalogError::from)
        })
        .context("fetch catalog index")?;

    let public_key = resolve_public_key(None, config.public_key.as_deref())?;
    if !verify_index(&index, &public_key) {
        anyhow::bail!("catalog index failed signature verification (integrity check failed)");
    }
    Ok(index)
}

fn cmd_search(config_path: &Path, format: OutputFormat, query: Option<String>, tag: Option<String>, capability: Option<String>) -> Result<()> {
    let config = load_config(config_path)?;
    let index = load_verified_index(&config)?;
    let hits = search(&index, &SearchQuery { text: query, tag, capability });
    println!("{}", format_search_hits(format, &hits));
    Ok(())
}

fn cmd_install(config_path: &Path, skill: &str, version: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;
    let index = load_verified_index(&config)?;
    let revocations = read_revocations_optional(&config.catalog_root.join("revocations.json"))?;
    let public_key = resolve_public_key(None, config.public_key.as_deref())?;
    let mut fetch = fetch_from(config.catalog_root.clone());

    let options = InstallOptions {
        name: skill,
        version,
        skills_dir: config.skills_dir.clone(),
        index: &index,
        revocations: revocations.as_ref(),
        public_key: &public_key,
        source: config.catalog_root.display().to_string(),
        config_filename: Some(CONFIG_FILENAME.to_string()),
    };
    let outcome = kithkit_install::install(options, &mut fetch)?;
    println!("installed {}@{} -> {}", outcome.metadata.name, outcome.metadata.version, outcome.install_dir.display());
    Ok(())
}

fn cmd_update(config_path: &Path, skill: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;
    let index = load_verified_index(&config)?;
    let revocations = read_revocations_optional(&config.catalog_root.join("revocations.json"))?;
    let public_key = resolve_public_key(None, config.public_key.as_deref())?;

    let targets: Vec<String> = match skill {
        Some(name) => vec![name.to_string()],
        None => kithkit_install::list(&config.skills_dir, Some(&index))?
            .into_iter()
            .filter(|e| e.has_update)
            .map(|e| e.name)
            .collect(),
    };
    if targets.is_empty() {
        println!("nothing to update");
        return Ok(());
    }

    for name in &targets {
        let mut fetch = fetch_from(config.catalog_root.clone());
        let options = InstallOptions {
            name: name.as_str(),
            version: None,
            skills_dir: config.skills_dir.clone(),
            index: &index,
            revocations: revocations.as_ref(),
            public_key: &public_key,
            source: config.catalog_root.display().to_string(),
            config_filename: Some(CONFIG_FILENAME.to_string()),
        };
        match kithkit_install::update(options, &mut fetch)? {
            UpdateOutcome::AlreadyUpToDate { version } => println!("{name}: already up to date ({version})"),
            UpdateOutcome::Updated { previous_version, outcome } => {
                println!("{name}: updated {previous_version} -> {}", outcome.metadata.version);
            }
        }
    }
    Ok(())
}

fn cmd_uninstall(config_path: &Path, skill: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let outcome = kithkit_install::uninstall(&config.skills_dir, skill, Some(CONFIG_FILENAME))?;
    if outcome.config_backed_up {
        println!("uninstalled {skill} (config backed up)");
    } else {
        println!("uninstalled {skill}");
    }
    Ok(())
}

fn cmd_list(config_path: &Path, format: OutputFormat) -> Result<()> {
    let config = load_config(config_path)?;
    let index = match load_verified_index(&config) {
        Ok(index) => Some(index),
        Err(e) => {
            tracing::warn!("listing without a verified index: {e:#}");
            read_index_optional(&config.catalog_root.join("index.json")).ok().flatten()
        }
    };
    let entries = kithkit_install::list(&config.skills_dir, index.as_ref())?;
    println!("{}", format_installed_entries(format, &entries));
    Ok(())
}

fn cmd_selftest(format: OutputFormat) -> Result<()> {
    let summary = run_selftest(&PatternDetector);
    println!("{}", format_selftest_summary(format, &summary));
    if !summary.passes_required_thresholds() {
        anyhow::bail!("one or more required self-test tier thresholds were not met");
    }
    Ok(())
}
