// SPDX-License-Identifier: MIT OR Apache-2.0
//! `kithkit-catalog`: the catalog authority CLI. Lints a skill source
//! directory, signs an archive into an index, builds a fresh index from an
//! archives tree, verifies a signed index, and generates keypairs.
//!
//! This binary is the only thing on the system with a reason to ever see
//! `KITHKIT_CATALOG_PRIVATE_KEY` — consumer-side verification (`kithkit`)
//! only ever needs the public half.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use kithkit_catalog::{build_index, update_index, verify_index};
use kithkit_cli::commands::{read_index, read_index_optional, resolve_private_key, resolve_public_key, schema_json, write_index, SchemaKind};
use kithkit_cli::config::{load_catalog_config, CatalogConfig};
use kithkit_cli::format::{format_lint_result, OutputFormat};
use kithkit_sign::{generate_keypair, hex, sha256_bytes, sign_bytes, SigningKey, VerifyingKey};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const EXIT_FAILURE: i32 = 1;
const DEFAULT_INDEX_PATH: &str = "index.json";

#[derive(Parser)]
#[command(name = "kithkit-catalog", version, about = "Sign and publish the kithkit skill catalog")]
struct Cli {
    /// Path to `kithkit-catalog.toml`.
    #[arg(long, global = true, default_value = "kithkit-catalog.toml")]
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
    /// Lint a skill's source directory by packing it in-memory and running
    /// every screener check against the result.
    Lint {
        /// Directory containing `manifest.yaml`, `SKILL.md`, and friends.
        dir: PathBuf,
        /// Fail the process (exit 1) if the lint result is not a pass.
        #[arg(long)]
        strict: bool,
    },
    /// Sign a single archive's hash and insert it into a signed index
    /// (creating one if `index` does not yet exist).
    Sign {
        /// Path to a `.tar.gz` archive already in its final published
        /// location.
        archive: PathBuf,
        /// Path to the signed index to update. Defaults to `index.json`.
        index: Option<PathBuf>,
        /// Private key override (base64 PKCS8 DER). Falls back to
        /// `KITHKIT_CATALOG_PRIVATE_KEY`, then `kithkit-catalog.toml`.
        #[arg(long)]
        private_key: Option<String>,
    },
    /// Rebuild a signed index from scratch from every archive under
    /// `archives-dir`.
    Build {
        /// Root directory of per-skill archive subdirectories.
        #[arg(value_name = "archives-dir")]
        archives_dir: PathBuf,
        /// Path to write the signed index to. Defaults to `index.json`.
        index: Option<PathBuf>,
        /// Private key override (base64 PKCS8 DER).
        #[arg(long)]
        private_key: Option<String>,
    },
    /// Verify a signed index's signature.
    Verify {
        /// Path to the signed index to check.
        index: PathBuf,
        /// Public key override (base64 SPKI DER).
        #[arg(long)]
        public_key: Option<String>,
    },
    /// Generate a fresh Ed25519 keypair.
    ///
    /// Prints `private` and `public` as base64(PKCS8 DER) / base64(SPKI DER)
    /// to stdout. The private half is a secret: this command never writes it
    /// anywhere but stdout, and callers are expected to route it into
    /// whatever platform-specific secure store they use (spec §1's
    /// credential-storage non-goal — this binary only names that hand-off
    /// point, it does not implement one).
    Keygen,
    /// Print the JSON schema for a kithkit data type.
    Schema {
        /// Which schema to print.
        kind: SchemaKind,
    },
}

fn main() {
    let cli = Cli::parse();
    let filter = if cli.debug { EnvFilter::new("kithkit_catalog=debug") } else { EnvFilter::new("kithkit_catalog=info") };
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
        Command::Keygen => cmd_keygen(),
        Command::Lint { dir, strict } => cmd_lint(&dir, strict, cli.format),
        Command::Sign { archive, index, private_key } => cmd_sign(&cli.config, &archive, index.as_deref(), private_key.as_deref()),
        Command::Build { archives_dir, index, private_key } => {
            cmd_build(&cli.config, &archives_dir, index.as_deref(), private_key.as_deref())
        }
        Command::Verify { index, public_key } => cmd_verify(&index, public_key.as_deref()),
    }
}

fn load_config(path: &Path) -> Result<CatalogConfig> {
    load_catalog_config(path)
}

fn index_path_or_default(path: Option<&Path>, config: &CatalogConfig) -> PathBuf {
    path.map(Path::to_path_buf)
        .or_else(|| config.index_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INDEX_PATH))
}

fn private_key_for(config_path: &Path, flag: Option<&str>) -> Result<SigningKey> {
    let config = load_config(config_path)?;
    resolve_private_key(flag, config.private_key.as_deref())
}

fn cmd_keygen() -> Result<()> {
    let signing_key = generate_keypair();
    let private = kithkit_sign::encode_private_key(&signing_key).context("encode private key")?;
    let public = kithkit_sign::encode_public_key(&signing_key.verifying_key()).context("encode public key")?;
    println!("private: {private}");
    println!("public:  {public}");
    Ok(())
}

fn cmd_lint(dir: &Path, strict: bool, format: OutputFormat) -> Result<()> {
    let manifest_path = dir.join("manifest.yaml");
    let skill_name = {
        let content = std::fs::read_to_string(&manifest_path)
            .with_context(|| format!("read manifest '{}'", manifest_path.display()))?;
        let manifest: kithkit_core::Manifest =
            serde_yaml::from_str(&content).with_context(|| format!("parse manifest '{}'", manifest_path.display()))?;
        manifest.name
    };

    let archive = kithkit_archive::build_archive(dir, &skill_name).with_context(|| format!("pack '{}'", dir.display()))?;
    let result = kithkit_screen::lint_archive(&archive, &[]).context("lint archive")?;

    let pass = result.pass;
    let error_count = result.score.error;
    println!("{}", format_lint_result(format, &result));

    if strict && !pass {
        anyhow::bail!("lint failed with {error_count} error-severity finding(s)");
    }
    Ok(())
}

fn cmd_sign(config_path: &Path, archive_path: &Path, index_path: Option<&Path>, private_key_flag: Option<&str>) -> Result<()> {
    let private_key = private_key_for(config_path, private_key_flag)?;
    let config = load_config(config_path)?;
    let index_path = index_path_or_default(index_path, &config);

    let archive_bytes = std::fs::read(archive_path).with_context(|| format!("read archive '{}'", archive_path.display()))?;
    let digest = sha256_bytes(&archive_bytes);
    let signature = sign_bytes(&digest, &private_key);
    println!("sha256: {}", hex(&digest));
    println!("signature: {signature}");

    let updated = match read_index_optional(&index_path)? {
        Some(existing) => update_index(&existing, &archive_bytes, &private_key, Utc::now())?,
        None => {
            // No existing index: bootstrap one from the archive's whole
            // `archives_dir/<skill>/<skill>-<version>.tar.gz` tree rather
            // than just this one file.
            let skill_dir = archive_path.parent().unwrap_or(Path::new("."));
            let archives_dir = skill_dir.parent().unwrap_or(Path::new("."));
            build_index(archives_dir, &private_key, Utc::now())?
        }
    };
    write_index(&index_path, &updated).with_context(|| format!("write index '{}'", index_path.display()))?;
    println!("updated index '{}' ({} skills)", index_path.display(), updated.skills.len());
    Ok(())
}

fn cmd_build(config_path: &Path, archives_dir: &Path, index_path: Option<&Path>, private_key_flag: Option<&str>) -> Result<()> {
    let private_key = private_key_for(config_path, private_key_flag)?;
    let config = load_config(config_path)?;
    let index_path = index_path_or_default(index_path, &config);

    let index = build_index(archives_dir, &private_key, Utc::now())
        .with_context(|| format!("build index from '{}'", archives_dir.display()))?;
    write_index(&index_path, &index).with_context(|| format!("write index '{}'", index_path.display()))?;
    println!("built index '{}' ({} skills)", index_path.display(), index.skills.len());
    Ok(())
}

fn cmd_verify(index_path: &Path, public_key_flag: Option<&str>) -> Result<()> {
    let index = read_index(index_path)?;
    let public_key: VerifyingKey = resolve_public_key(public_key_flag, None)?;
    if verify_index(&index, &public_key) {
        println!("OK: index '{}' signature verifies ({} skills)", index_path.display(), index.skills.len());
        Ok(())
    } else {
        anyhow::bail!("signature verification failed (integrity check failed) for '{}'", index_path.display());
    }
}
