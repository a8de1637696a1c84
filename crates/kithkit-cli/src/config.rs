// SPDX-License-Identifier: MIT OR Apache-2.0
//! Configuration loading for both kithkit binaries.
//!
//! Every field is optional in the TOML file; an absent `kithkit.toml` or
//! `kithkit-catalog.toml` is not an error, only the built-in defaults.

use schemars::JsonSchema;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

fn default_catalog_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_skills_dir() -> PathBuf {
    PathBuf::from(".kithkit/skills")
}

fn default_cache_ttl_minutes() -> i64 {
    15
}

/// The skill-installed config file's conventional name. Neither the
/// manifest nor the index records a per-skill filename, so `update` and
/// `uninstall` preserve/back up whatever lives at this path.
pub const CONFIG_FILENAME: &str = "config.json";

/// Settings for the `kithkit` consumer binary, loaded from `kithkit.toml`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ConsumerConfig {
    /// Directory containing `index.json`, an optional `revocations.json`,
    /// and an `archives/` tree. Local-filesystem stand-in for the registry
    /// transport, which is an external collaborator's concern.
    #[serde(default = "default_catalog_root")]
    pub catalog_root: PathBuf,
    /// Root directory every skill is installed beneath.
    #[serde(default = "default_skills_dir")]
    pub skills_dir: PathBuf,
    /// How long a fetched index is considered fresh before `search`/`install`
    /// refetch it.
    #[serde(default = "default_cache_ttl_minutes")]
    pub cache_ttl_minutes: i64,
    /// Base64(SPKI DER) authority public key. Overridden by
    /// `KITHKIT_CATALOG_PUBLIC_KEY` when that variable is set.
    #[serde(default)]
    pub public_key: Option<String>,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            catalog_root: default_catalog_root(),
            skills_dir: default_skills_dir(),
            cache_ttl_minutes: default_cache_ttl_minutes(),
            public_key: None,
        }
    }
}

/// Settings for the `kithkit-catalog` authority binary, loaded from
/// `kithkit-catalog.toml`.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct CatalogConfig {
    /// Base64(PKCS8 DER) authority private key. Overridden by
    /// `KITHKIT_CATALOG_PRIVATE_KEY` when that variable is set.
    #[serde(default)]
    pub private_key: Option<String>,
    /// Default index path used when a subcommand's `[index]` argument is
    /// omitted.
    #[serde(default)]
    pub index_path: Option<PathBuf>,
}

/// A problem found while validating an otherwise successfully parsed
/// config. Advisory: the affected field falls back to its default rather
/// than aborting the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// `cache_ttl_minutes` was zero or negative.
    InvalidTtl {
        /// The offending value.
        value: i64,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::InvalidTtl { value } => write!(
                f,
                "cache_ttl_minutes {value} is not positive, falling back to {}",
                default_cache_ttl_minutes()
            ),
        }
    }
}

/// Load `path` as a [`ConsumerConfig`]. A missing file is not an error: it
/// yields [`ConsumerConfig::default`].
pub fn load_consumer_config(path: &Path) -> anyhow::Result<ConsumerConfig> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            toml::from_str(&content).map_err(|e| anyhow::anyhow!("failed to parse '{}': {e}", path.display()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConsumerConfig::default()),
        Err(e) => Err(anyhow::anyhow!("failed to read '{}': {e}", path.display())),
    }
}

/// Load `path` as a [`CatalogConfig`]. A missing file is not an error: it
/// yields [`CatalogConfig::default`].
pub fn load_catalog_config(path: &Path) -> anyhow::Result<CatalogConfig> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            toml::from_str(&content).map_err(|e| anyhow::anyhow!("failed to parse '{}': {e}", path.display()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CatalogConfig::default()),
        Err(e) => Err(anyhow::anyhow!("failed to read '{}': {e}", path.display())),
    }
}

/// Validate advisory fields of a [`ConsumerConfig`], clamping in place and
/// returning one warning per field that was out of range.
pub fn validate_consumer_config(config: &mut ConsumerConfig) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();
    if config.cache_ttl_minutes <= 0 {
        warnings.push(ConfigWarning::InvalidTtl { value: config.cache_ttl_minutes });
        config.cache_ttl_minutes = default_cache_ttl_minutes();
    }
    warnings
}
