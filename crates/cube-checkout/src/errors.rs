// Copyright 2026 Oxide Computer Company

//! Error types for the checkout pipeline.
//!
//! Each pipeline stage has its own error type. [`CheckoutError`] wraps them
//! so callers can tell which class of failure ended a run.

use camino::Utf8PathBuf;
use cube_checkout_types::{
    CommitHashParseError, ConfigParseError, CubeVersion,
};
use std::{ffi::OsString, io};
use thiserror::Error;

// ---- Environment ----

/// An error from reading the git binary path from the environment.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GitEnvError {
    /// The environment variable is set but is not valid UTF-8.
    #[error(
        "${var} environment variable is not valid \
         UTF-8: {value:?}"
    )]
    NonUtf8 {
        /// The environment variable name.
        var: &'static str,
        /// The non-UTF-8 value.
        value: OsString,
    },
}

// ---- Stage errors ----

/// The target directory is not a managed checkout.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// The target has no marker file and the run was not forced.
    #[error(
        "{target_dir} does not contain a valid checkout \
         (no {marker} file); use --force to continue"
    )]
    NotACheckout {
        /// The target directory.
        target_dir: Utf8PathBuf,
        /// The marker file that was looked for.
        marker: Utf8PathBuf,
    },

    /// An I/O error occurred while probing for the marker file.
    #[error("I/O error while checking the marker file at {path}")]
    Io {
        /// The marker path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },
}

/// The configuration could not be loaded, or references a missing patch.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration file is missing or unreadable.
    #[error("failed to read configuration file {path}")]
    Read {
        /// The configuration file path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// The configuration file is not a valid checkout configuration.
    #[error("invalid configuration file {path}")]
    Parse {
        /// The configuration file path.
        path: Utf8PathBuf,
        /// Details about the parse error.
        #[source]
        error: ConfigParseError,
    },

    /// A patch named in the configuration does not exist.
    #[error("patch {patch} not found (looked for {resolved})")]
    MissingPatch {
        /// The patch reference as written in the configuration.
        patch: Utf8PathBuf,
        /// The path the reference resolved to.
        resolved: Utf8PathBuf,
    },

    /// A patch path could not be resolved for a reason other than it
    /// being absent.
    #[error("failed to resolve patch {resolved}")]
    PatchIo {
        /// The path the reference resolved to.
        resolved: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },
}

/// The upstream snapshot could not be fetched.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// Failed to spawn git.
    #[error("failed to run git at {binary_path:?}")]
    SpawnFailed {
        /// The path to the git executable.
        binary_path: String,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// `git clone` exited unsuccessfully.
    #[error(
        "git failed to clone {version} from {url} ({exit_status}): {stderr}"
    )]
    CloneFailed {
        /// The repository location.
        url: String,
        /// The requested ref.
        version: CubeVersion,
        /// A human-readable description of the exit status.
        exit_status: String,
        /// The stderr output from git.
        stderr: String,
    },

    /// `git rev-parse HEAD` exited unsuccessfully.
    #[error("git failed to resolve HEAD in {repo} ({exit_status}): {stderr}")]
    HeadFailed {
        /// The fetched repository.
        repo: Utf8PathBuf,
        /// A human-readable description of the exit status.
        exit_status: String,
        /// The stderr output from git.
        stderr: String,
    },

    /// `git rev-parse HEAD` printed something that is not a commit hash.
    #[error("git returned unexpected output for HEAD: {stdout:?}")]
    InvalidHead {
        /// The trimmed stdout.
        stdout: String,
        /// Details about the parse error.
        #[source]
        error: CommitHashParseError,
    },
}

/// A patch could not be applied to the workspace.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PatchError {
    /// Failed to spawn git.
    #[error("failed to run git at {binary_path:?} to apply {patch}")]
    SpawnFailed {
        /// The path to the git executable.
        binary_path: String,
        /// The patch being applied.
        patch: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// `git apply` rejected the patch.
    #[error("patch {patch} does not apply ({exit_status}): {stderr}")]
    ApplyFailed {
        /// The patch being applied.
        patch: Utf8PathBuf,
        /// A human-readable description of the exit status.
        exit_status: String,
        /// The stderr output from git.
        stderr: String,
    },
}

/// A configured path could not be moved into the target.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RelocationError {
    /// The configured source does not exist in the workspace.
    #[error("source {path} not found in the fetched tree")]
    MissingSource {
        /// The resolved source path.
        path: Utf8PathBuf,
    },

    /// Probing the source failed for a reason other than it being absent.
    #[error("failed to inspect source {path}")]
    InspectSource {
        /// The resolved source path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// The existing destination could not be removed.
    #[error("failed to remove existing destination {path}")]
    RemoveDestination {
        /// The resolved destination path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// The destination's parent directories could not be created.
    #[error("failed to create directory {path}")]
    CreateParent {
        /// The directory path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// The move itself failed.
    #[error("failed to move {from} to {to}")]
    Move {
        /// The resolved source path.
        from: Utf8PathBuf,
        /// The resolved destination path.
        to: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },
}

/// The marker file could not be written.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StampError {
    /// Failed to create the target directory.
    #[error("failed to create target directory {path}")]
    CreateDir {
        /// The directory path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// Failed to write the marker file.
    #[error("failed to write marker file {path}")]
    Write {
        /// The marker path.
        path: Utf8PathBuf,
        /// The underlying write error.
        #[source]
        error: AtomicWriteError,
    },
}

/// An error that occurred during an atomic file write.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AtomicWriteError {
    /// Writing contents to the temporary file failed.
    #[error("writing file contents failed")]
    Write(#[source] io::Error),

    /// The atomic write infrastructure failed (e.g., creating the
    /// temporary file, or renaming it into place).
    #[error("atomic create or rename failed")]
    Rename(#[source] io::Error),
}

/// The ephemeral workspace could not be created or removed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WorkspaceError {
    /// Failed to create the temporary directory.
    #[error("failed to create workspace directory")]
    Create(#[source] io::Error),

    /// Failed to remove the temporary directory.
    #[error("failed to remove workspace directory {path}")]
    Release {
        /// The workspace path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },
}

// ---- Pipeline error ----

/// The error returned by [`Checkout::run`](crate::Checkout::run).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CheckoutError {
    /// The target directory is not a managed checkout.
    #[error("target validation failed")]
    Validation(#[from] ValidationError),

    /// The configuration is missing, malformed, or references a missing
    /// patch.
    #[error("configuration error")]
    Config(#[from] ConfigError),

    /// The upstream snapshot could not be fetched.
    #[error("fetch failed")]
    Fetch(#[from] FetchError),

    /// A patch did not apply.
    #[error("patching failed")]
    Patch(#[from] PatchError),

    /// A configured path could not be relocated. Earlier entries may
    /// already have been moved into the target.
    #[error("relocation failed")]
    Relocation(#[from] RelocationError),

    /// The marker file could not be written.
    #[error("version stamp failed")]
    Stamp(#[from] StampError),

    /// The ephemeral workspace could not be created or removed.
    #[error("workspace error")]
    Workspace(#[from] WorkspaceError),
}
