// Copyright 2026 Oxide Computer Company

//! Moving configured paths from the workspace into the target checkout.

use crate::RelocationError;
use camino::Utf8Path;
use cube_checkout_types::{PathMapping, PathMappings};
use fs_err as fs;
use std::{
    fs::FileType,
    io,
    path::{Path, PathBuf},
};
use tracing::{debug, info};
use walkdir::WalkDir;

/// A path mapping that was moved into the target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelocatedPath {
    /// The mapping that was applied.
    pub mapping: PathMapping,
    /// Whether something already existed at the destination and was
    /// removed.
    pub replaced: bool,
}

/// Moves every mapping's source from `workspace_root` to its destination
/// under `target_root`, in declaration order.
///
/// Each destination is removed before its source is moved in. Entries are
/// not reordered: a later entry whose source was consumed by an earlier
/// one fails, and a later entry whose destination overlaps an earlier one
/// replaces it. On error, entries that were already moved stay in the
/// target.
pub fn relocate_paths(
    workspace_root: &Utf8Path,
    target_root: &Utf8Path,
    mappings: &PathMappings,
) -> Result<Vec<RelocatedPath>, RelocationError> {
    let mut relocated = Vec::with_capacity(mappings.len());
    for mapping in mappings {
        let (source, destination) =
            mapping.resolve(workspace_root, target_root);

        match fs::symlink_metadata(&source) {
            Ok(_) => {}
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Err(RelocationError::MissingSource { path: source });
            }
            Err(error) => {
                return Err(RelocationError::InspectSource {
                    path: source,
                    error,
                });
            }
        }

        info!("Moving '{source}' to '{destination}'");
        let replaced = remove_existing(&destination)?;
        if replaced {
            debug!("replaced existing {destination}");
        }

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|error| {
                RelocationError::CreateParent { path: parent.to_owned(), error }
            })?;
        }

        move_path(&source, &destination).map_err(|error| {
            RelocationError::Move {
                from: source.clone(),
                to: destination.clone(),
                error,
            }
        })?;

        relocated.push(RelocatedPath { mapping: mapping.clone(), replaced });
    }
    Ok(relocated)
}

/// Removes whatever is at `path`. Returns false if nothing was there.
fn remove_existing(path: &Utf8Path) -> Result<bool, RelocationError> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            return Ok(false);
        }
        Err(error) => {
            return Err(RelocationError::RemoveDestination {
                path: path.to_owned(),
                error,
            });
        }
    };

    let result = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|error| RelocationError::RemoveDestination {
        path: path.to_owned(),
        error,
    })?;
    Ok(true)
}

/// Moves `from` to `to`, which must not exist.
///
/// Renames when possible. The system temporary directory is often on a
/// different filesystem than the target, so a cross-device rename falls
/// back to copying and then removing the source.
fn move_path(from: &Utf8Path, to: &Utf8Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::CrossesDevices => {
            debug!("{from} and {to} are on different devices, copying");
            copy_tree(from.as_std_path(), to.as_std_path())?;
            remove_tree(from.as_std_path())
        }
        Err(error) => Err(error),
    }
}

/// Recursively copies `from` to `to` without following symlinks.
pub(crate) fn copy_tree(from: &Path, to: &Path) -> io::Result<()> {
    let root_type = fs::symlink_metadata(from)?.file_type();
    if !root_type.is_dir() {
        return copy_entry(from, to, root_type);
    }

    for entry in WalkDir::new(from).follow_links(false) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(io::Error::other)?;
        let dest: PathBuf = if relative.as_os_str().is_empty() {
            to.to_path_buf()
        } else {
            to.join(relative)
        };
        copy_entry(entry.path(), &dest, entry.file_type())?;
    }
    Ok(())
}

fn copy_entry(from: &Path, to: &Path, file_type: FileType) -> io::Result<()> {
    if file_type.is_dir() {
        fs::create_dir_all(to)
    } else if file_type.is_symlink() {
        copy_symlink(from, to)
    } else {
        fs::copy(from, to).map(|_| ())
    }
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> io::Result<()> {
    let link = fs::read_link(from)?;
    fs_err::os::unix::fs::symlink(link, to)
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to).map(|_| ())
}

fn remove_tree(path: &Path) -> io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
