// Copyright 2026 Oxide Computer Company

//! Checkout configuration: which patches to apply and which paths to import.

use crate::{ConfigParseError, RelativePath};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{
    Deserialize, Deserializer,
    de::{self, MapAccess, Visitor},
};
use std::{collections::BTreeSet, fmt};

/// The parsed contents of a checkout configuration file.
///
/// Both fields are optional in the JSON input and default to empty. A
/// configuration with neither only fetches the upstream tree and stamps
/// the version. Unknown top-level keys are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CheckoutConfig {
    patches: Vec<Utf8PathBuf>,
    paths: PathMappings,
}

impl CheckoutConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigParseError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Patch file references, in application order.
    ///
    /// References are relative to the directory containing the
    /// configuration file. They are not restricted to that directory.
    pub fn patches(&self) -> &[Utf8PathBuf] {
        &self.patches
    }

    /// Destination-to-source path mappings, in relocation order.
    pub fn paths(&self) -> &PathMappings {
        &self.paths
    }
}

/// A single `"destination": "source"` entry of the `paths` section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathMapping {
    destination: RelativePath,
    source: RelativePath,
}

impl PathMapping {
    /// Creates a new mapping.
    pub fn new(destination: RelativePath, source: RelativePath) -> Self {
        PathMapping { destination, source }
    }

    /// The path within the target checkout.
    pub fn destination(&self) -> &RelativePath {
        &self.destination
    }

    /// The path within the fetched workspace.
    pub fn source(&self) -> &RelativePath {
        &self.source
    }

    /// Returns the resolved `(source, destination)` pair.
    pub fn resolve(
        &self,
        workspace_root: &Utf8Path,
        target_root: &Utf8Path,
    ) -> (Utf8PathBuf, Utf8PathBuf) {
        (self.source.under(workspace_root), self.destination.under(target_root))
    }
}

impl fmt::Display for PathMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <- {}", self.destination, self.source)
    }
}

/// The ordered `paths` section of a configuration.
///
/// Order is taken from the JSON text and is significant: entries are
/// relocated one after the other, each one replacing whatever is at its
/// destination, so nested or overlapping entries resolve by position.
/// Destinations are unique.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathMappings(Vec<PathMapping>);

impl PathMappings {
    /// Builds mappings from `(destination, source)` pairs.
    ///
    /// Returns the first duplicated destination as an error.
    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (RelativePath, RelativePath)>,
    ) -> Result<Self, RelativePath> {
        let mut seen = BTreeSet::new();
        let mut mappings = Vec::new();
        for (destination, source) in pairs {
            if !seen.insert(destination.clone()) {
                return Err(destination);
            }
            mappings.push(PathMapping::new(destination, source));
        }
        Ok(PathMappings(mappings))
    }

    /// Iterates over the mappings in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, PathMapping> {
        self.0.iter()
    }

    /// Returns the number of mappings.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no mappings.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a PathMappings {
    type Item = &'a PathMapping;
    type IntoIter = std::slice::Iter<'a, PathMapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for PathMappings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(PathMappingsVisitor)
    }
}

// serde_json's default map type is sorted, so the entries are visited
// directly to keep the order they were written in.
struct PathMappingsVisitor;

impl<'de> Visitor<'de> for PathMappingsVisitor {
    type Value = PathMappings;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of destination paths to source paths")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(pair) =
            access.next_entry::<RelativePath, RelativePath>()?
        {
            pairs.push(pair);
        }
        PathMappings::from_pairs(pairs).map_err(|destination| {
            de::Error::custom(format!(
                "duplicate destination path {destination:?}"
            ))
        })
    }
}
