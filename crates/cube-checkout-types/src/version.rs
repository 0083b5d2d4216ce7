// Copyright 2026 Oxide Computer Company

//! The upstream ref a checkout is imported at.

use crate::VersionParseError;
use std::{fmt, str::FromStr};

/// An STM32CubeWB tag or branch name, such as `v1.15.0`.
///
/// The version is an opaque token: it is passed to `git clone --branch` as
/// is and written verbatim to the `VERSION` marker. No semantic versioning
/// is applied. Parsing only rejects values that could not round-trip
/// through either of those uses:
///
/// - empty input,
/// - whitespace or control characters (the marker is a single line),
/// - a leading `-` (it would be read as a `git` option).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CubeVersion(String);

impl CubeVersion {
    /// Returns the version as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CubeVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(VersionParseError::Empty);
        }
        if s.starts_with('-') {
            return Err(VersionParseError::LeadingDash(s.to_owned()));
        }
        if let Some(ch) = s.chars().find(|c| c.is_whitespace() || c.is_control())
        {
            return Err(VersionParseError::InvalidChar {
                version: s.to_owned(),
                ch,
            });
        }
        Ok(CubeVersion(s.to_owned()))
    }
}

impl fmt::Display for CubeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
