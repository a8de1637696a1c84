// SPDX-License-Identifier: MIT OR Apache-2.0
//! Read/write the `.kithkit-install.json` commit marker.

use kithkit_core::{InstallMetadata, KithkitError, Result, METADATA_FILENAME};
use std::path::Path;

/// Read the sidecar metadata from `install_dir`, if present.
///
/// Returns `Ok(None)` (not an error) when the directory or the sidecar
/// file is simply absent — that is the "not installed" state, not a
/// failure.
pub(crate) fn read(install_dir: &Path) -> Result<Option<InstallMetadata>> {
    let path = install_dir.join(METADATA_FILENAME);
    match std::fs::read_to_string(&path) {
        Ok(content) => {
            let metadata: InstallMetadata =
                serde_json::from_str(&content).map_err(|e| KithkitError::Invalid(e.to_string()))?;
            Ok(Some(metadata))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write `metadata` as the install directory's commit marker. This must be
/// the last write of a successful install — its presence is what makes the
/// directory "installed".
pub(crate) fn write(install_dir: &Path, metadata: &InstallMetadata) -> Result<()> {
    let path = install_dir.join(METADATA_FILENAME);
    std::fs::write(&path, metadata.to_sidecar_json()?)?;
    Ok(())
}
