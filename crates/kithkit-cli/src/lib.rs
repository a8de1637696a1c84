// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]

/// Key resolution, index/revocation I/O, and schema printing shared by
/// both binaries.
pub mod commands;
/// TOML configuration for both binaries.
pub mod config;
/// Text/JSON output rendering.
pub mod format;

pub use commands::SchemaKind;
pub use config::{CatalogConfig, ConfigWarning, ConsumerConfig, CONFIG_FILENAME};
pub use format::OutputFormat;
