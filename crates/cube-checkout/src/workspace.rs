// Copyright 2026 Oxide Computer Company

//! The ephemeral directory the upstream tree is fetched into.

use crate::WorkspaceError;
use camino::Utf8Path;
use camino_tempfile::Utf8TempDir;

const PREFIX: &str = "cube-checkout-";

/// A temporary directory that lives for one checkout run.
///
/// Release it with [`Workspace::close`] to observe removal errors. If it is
/// dropped instead, removal is attempted and errors are ignored.
#[derive(Debug)]
pub struct Workspace {
    dir: Utf8TempDir,
}

impl Workspace {
    /// Creates an empty workspace in the system temporary directory.
    pub fn acquire() -> Result<Self, WorkspaceError> {
        let dir = Utf8TempDir::with_prefix(PREFIX)
            .map_err(WorkspaceError::Create)?;
        Ok(Workspace { dir })
    }

    /// Creates an empty workspace inside `parent`.
    pub fn acquire_in(parent: &Utf8Path) -> Result<Self, WorkspaceError> {
        let dir = Utf8TempDir::with_prefix_in(PREFIX, parent)
            .map_err(WorkspaceError::Create)?;
        Ok(Workspace { dir })
    }

    /// Returns the workspace root.
    pub fn path(&self) -> &Utf8Path {
        self.dir.path()
    }

    /// Recursively removes the workspace.
    pub fn close(self) -> Result<(), WorkspaceError> {
        let path = self.dir.path().to_owned();
        self.dir
            .close()
            .map_err(|error| WorkspaceError::Release { path, error })
    }
}
