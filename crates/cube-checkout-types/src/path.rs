// Copyright 2026 Oxide Computer Company

//! Relative paths used in the `paths` section of a checkout configuration.

use crate::RelativePathError;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::{fmt, str::FromStr};

/// A path that stays inside the directory it is joined to.
///
/// Used for both sides of a [`PathMapping`](crate::PathMapping): the
/// destination within the target checkout and the source within the
/// fetched workspace.
///
/// # Invariants
///
/// - The path is non-empty.
/// - The path uses forward slashes (backslashes are normalized on
///   construction).
/// - Every component is a normal file or directory name (no `..`, `.`, root
///   `/`, or Windows prefixes), so joining it to a root can never escape
///   that root.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct RelativePath(Utf8PathBuf);

impl RelativePath {
    /// Creates a new `RelativePath`, normalizing backslashes to forward
    /// slashes and dropping trailing or repeated separators.
    pub fn new(path: impl AsRef<str>) -> Result<Self, RelativePathError> {
        let normalized = path.as_ref().replace('\\', "/");
        if normalized.is_empty() {
            return Err(RelativePathError::Empty);
        }
        if normalized.contains('\n') {
            return Err(RelativePathError::Newline(normalized));
        }
        let path = Utf8PathBuf::from(normalized);
        if let Some(component) = find_non_normal_component(&path) {
            return Err(RelativePathError::InvalidComponent { path, component });
        }
        // A trailing slash would make the OS treat a file as a directory.
        Ok(RelativePath(path.components().collect()))
    }

    /// Returns the path as a [`Utf8Path`].
    pub fn as_path(&self) -> &Utf8Path {
        &self.0
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Joins this path onto `root`.
    pub fn under(&self, root: &Utf8Path) -> Utf8PathBuf {
        root.join(&self.0)
    }
}

impl AsRef<Utf8Path> for RelativePath {
    fn as_ref(&self) -> &Utf8Path {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for RelativePath {
    type Err = RelativePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelativePath::new(s)
    }
}

impl TryFrom<String> for RelativePath {
    type Error = RelativePathError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        RelativePath::new(s)
    }
}

/// Returns the first non-normal component in the path, if any.
fn find_non_normal_component(path: &Utf8Path) -> Option<String> {
    path.components().find_map(|component| match component {
        Utf8Component::Normal(_) => None,
        Utf8Component::Prefix(_)
        | Utf8Component::RootDir
        | Utf8Component::CurDir
        | Utf8Component::ParentDir => Some(component.as_str().to_owned()),
    })
}
