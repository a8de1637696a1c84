// SPDX-License-Identifier: MIT OR Apache-2.0
//! Archive engine: pack, inspect, and safely unpack kithkit skill archives.

pub mod build;
pub mod extract;
pub mod inspect;

pub use build::{build_archive, MAX_FILE_BYTES, MAX_TOTAL_BYTES};
pub use extract::{extract_archive, ExtractError};
pub use inspect::{extract_manifest, extract_parsed_manifest, list_entries, read_entry};
