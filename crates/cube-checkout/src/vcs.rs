// Copyright 2026 Oxide Computer Company

//! Version control operations used by the checkout pipeline.

use crate::{FetchError, GitEnvError, PatchError};
use camino::Utf8Path;
use cube_checkout_types::{CubeVersion, GitCommitHash};
use std::{
    ffi::OsString,
    process::{Command, Output},
};
use tracing::debug;

/// The version control capabilities the pipeline needs.
///
/// [`Git`] is the implementation used by the command-line tool. Other
/// implementations can stand in for it, e.g. to run the pipeline against a
/// local fixture.
pub trait SourceControl {
    /// Fetches a single-revision snapshot of `version` from `url` into the
    /// existing, empty directory `dest`.
    fn clone_shallow(
        &self,
        url: &str,
        version: &CubeVersion,
        dest: &Utf8Path,
    ) -> Result<(), FetchError>;

    /// Returns the commit checked out in `repo`.
    fn head_commit(&self, repo: &Utf8Path) -> Result<GitCommitHash, FetchError>;

    /// Applies the patch file at `patch` to the working tree at `workdir`.
    fn apply_patch(
        &self,
        patch: &Utf8Path,
        workdir: &Utf8Path,
    ) -> Result<(), PatchError>;
}

/// Resolves the git binary from the value of `var`, falling back to
/// `default` if the variable is unset or blank.
///
/// The value is trimmed of leading and trailing whitespace.
fn binary_from_env(
    var: &'static str,
    value: Option<OsString>,
    default: &str,
) -> Result<String, GitEnvError> {
    let Some(value) = value else {
        return Ok(default.to_owned());
    };
    match value.into_string() {
        Ok(s) if s.trim().is_empty() => Ok(default.to_owned()),
        Ok(s) => Ok(s.trim().to_owned()),
        Err(value) => Err(GitEnvError::NonUtf8 { var, value }),
    }
}

/// Git, invoked as an external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Git {
    binary: String,
}

impl Git {
    /// Uses the `$GIT` environment variable, or `"git"` if it is unset or
    /// blank.
    ///
    /// Returns an error if `$GIT` is set but is not valid UTF-8.
    pub fn from_env() -> Result<Self, GitEnvError> {
        let binary = binary_from_env("GIT", std::env::var_os("GIT"), "git")?;
        Ok(Git { binary })
    }

    /// Uses the given git binary.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Git { binary: binary.into() }
    }

    /// Returns the path to the git binary.
    pub fn binary(&self) -> &str {
        &self.binary
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        // Fail instead of prompting for credentials.
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        cmd
    }
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

impl SourceControl for Git {
    /// Runs `git clone --depth=1 --branch <version> -- <url> <dest>`.
    fn clone_shallow(
        &self,
        url: &str,
        version: &CubeVersion,
        dest: &Utf8Path,
    ) -> Result<(), FetchError> {
        let mut cmd = self.command();
        cmd.args(["clone", "--depth=1", "--branch"])
            .arg(version.as_str())
            .arg("--")
            .arg(url)
            .arg(dest.as_str());
        debug!(?cmd, "running git clone");

        let output =
            cmd.output().map_err(|error| FetchError::SpawnFailed {
                binary_path: self.binary.clone(),
                error,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(FetchError::CloneFailed {
                url: url.to_owned(),
                version: version.clone(),
                exit_status: output.status.to_string(),
                stderr: stderr_of(&output),
            })
        }
    }

    /// Runs `git rev-parse HEAD`.
    fn head_commit(&self, repo: &Utf8Path) -> Result<GitCommitHash, FetchError> {
        let output = self
            .command()
            .current_dir(repo)
            .args(["rev-parse", "HEAD"])
            .output()
            .map_err(|error| FetchError::SpawnFailed {
                binary_path: self.binary.clone(),
                error,
            })?;

        if !output.status.success() {
            return Err(FetchError::HeadFailed {
                repo: repo.to_owned(),
                exit_status: output.status.to_string(),
                stderr: stderr_of(&output),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout = stdout.trim();
        stdout.parse().map_err(|error| FetchError::InvalidHead {
            stdout: stdout.to_owned(),
            error,
        })
    }

    /// Runs `git apply <patch>` in `workdir`.
    fn apply_patch(
        &self,
        patch: &Utf8Path,
        workdir: &Utf8Path,
    ) -> Result<(), PatchError> {
        let output = self
            .command()
            .current_dir(workdir)
            .arg("apply")
            .arg(patch.as_str())
            .output()
            .map_err(|error| PatchError::SpawnFailed {
                binary_path: self.binary.clone(),
                patch: patch.to_owned(),
                error,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(PatchError::ApplyFailed {
                patch: patch.to_owned(),
                exit_status: output.status.to_string(),
                stderr: stderr_of(&output),
            })
        }
    }
}
