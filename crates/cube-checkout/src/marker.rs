// Copyright 2026 Oxide Computer Company

//! The `VERSION` marker: checkout validation and version stamping.

use crate::{AtomicWriteError, StampError, ValidationError};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use camino::{Utf8Path, Utf8PathBuf};
use cube_checkout_types::CubeVersion;
use fs_err as fs;
use std::io::{self, Write};
use tracing::{info, warn};

/// The name of the marker file at the root of a checkout.
pub const MARKER_FILE_NAME: &str = "VERSION";

/// Returns the marker path for a target directory.
pub fn marker_path(target_dir: &Utf8Path) -> Utf8PathBuf {
    target_dir.join(MARKER_FILE_NAME)
}

/// What [`validate_target`] found in a target directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetState {
    /// Whether the marker file exists. A target without one is only
    /// accepted when the run is forced.
    pub has_marker: bool,
    /// The version recorded in the marker, if it could be read.
    pub previous_version: Option<String>,
}

/// Reads the version recorded in `target_dir`, if there is a marker.
///
/// Surrounding whitespace is trimmed.
pub fn read_version(target_dir: &Utf8Path) -> io::Result<Option<String>> {
    match fs::read_to_string(marker_path(target_dir)) {
        Ok(contents) => Ok(Some(contents.trim().to_owned())),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(error),
    }
}

/// Checks that `target_dir` is a managed checkout.
///
/// A target is a checkout if and only if its marker exists; the marker's
/// contents are only read for logging. A target without a marker is an
/// error unless `force` is set, in which case a warning is logged. Nothing
/// is modified.
pub fn validate_target(
    target_dir: &Utf8Path,
    force: bool,
) -> Result<TargetState, ValidationError> {
    let path = marker_path(target_dir);
    let has_marker = match fs::metadata(&path) {
        Ok(_) => true,
        Err(error) if error.kind() == io::ErrorKind::NotFound => false,
        Err(error) if force => {
            warn!("{error}");
            false
        }
        Err(error) => return Err(ValidationError::Io { path, error }),
    };

    if !has_marker {
        if !force {
            return Err(ValidationError::NotACheckout {
                target_dir: target_dir.to_owned(),
                marker: MARKER_FILE_NAME.into(),
            });
        }
        warn!("Target directory does not contain a valid checkout");
        return Ok(TargetState { has_marker, previous_version: None });
    }

    let previous_version = match read_version(target_dir) {
        Ok(Some(version)) => {
            info!("Target directory currently holds {version}");
            Some(version)
        }
        Ok(None) => None,
        Err(error) => {
            warn!("Could not read the recorded version: {error}");
            None
        }
    };
    Ok(TargetState { has_marker, previous_version })
}

/// Records `version` as the sole content of the marker, replacing any
/// previous content. Creates `target_dir` if needed.
pub fn write_version(
    target_dir: &Utf8Path,
    version: &CubeVersion,
) -> Result<Utf8PathBuf, StampError> {
    fs::create_dir_all(target_dir).map_err(|error| StampError::CreateDir {
        path: target_dir.to_owned(),
        error,
    })?;

    let path = marker_path(target_dir);
    AtomicFile::new(&path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(version.as_str().as_bytes()))
        .map_err(|error| {
            let error = match error {
                atomicwrites::Error::Internal(e) => AtomicWriteError::Rename(e),
                atomicwrites::Error::User(e) => AtomicWriteError::Write(e),
            };
            StampError::Write { path: path.clone(), error }
        })?;
    Ok(path)
}
