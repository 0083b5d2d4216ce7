// Copyright 2026 Oxide Computer Company

//! Applying local patches to the fetched tree.

use crate::{ConfigError, PatchError, SourceControl};
use camino::{Utf8Path, Utf8PathBuf};
use std::io;
use tracing::info;

/// A patch reference from the configuration, resolved to an existing file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedPatch {
    reference: Utf8PathBuf,
    path: Utf8PathBuf,
}

impl ResolvedPatch {
    /// The reference as written in the configuration.
    pub fn reference(&self) -> &Utf8Path {
        &self.reference
    }

    /// The absolute path of the patch file.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

/// Resolves each reference against `config_dir`, preserving order.
///
/// Every reference is checked before any patch is applied. The resolved
/// paths are absolute, since patches are applied with the workspace as the
/// working directory.
pub fn resolve_patches(
    config_dir: &Utf8Path,
    references: &[Utf8PathBuf],
) -> Result<Vec<ResolvedPatch>, ConfigError> {
    references
        .iter()
        .map(|reference| {
            let joined = config_dir.join(reference);
            match joined.canonicalize_utf8() {
                Ok(path) => {
                    Ok(ResolvedPatch { reference: reference.clone(), path })
                }
                Err(error) if error.kind() == io::ErrorKind::NotFound => {
                    Err(ConfigError::MissingPatch {
                        patch: reference.clone(),
                        resolved: joined,
                    })
                }
                Err(error) => {
                    Err(ConfigError::PatchIo { resolved: joined, error })
                }
            }
        })
        .collect()
}

/// Applies `patches` to `workdir` one at a time, in order.
///
/// Stops at the first patch that does not apply; later patches may depend
/// on the state left by earlier ones.
pub fn apply_patches<V: SourceControl + ?Sized>(
    vcs: &V,
    workdir: &Utf8Path,
    patches: &[ResolvedPatch],
) -> Result<(), PatchError> {
    for patch in patches {
        info!("Applying patch {}", patch.path);
        vcs.apply_patch(&patch.path, workdir)?;
    }
    Ok(())
}
