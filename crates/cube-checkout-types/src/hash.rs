// Copyright 2026 Oxide Computer Company

//! Git commit hash types.

use crate::CommitHashParseError;
use std::{fmt, str::FromStr};

/// The commit a checkout was fetched at.
///
/// Either a SHA-1 (20 bytes, 40 hex characters) or SHA-256 (32 bytes, 64
/// hex characters) object name. Display is always lowercase hex.
///
/// ```
/// use cube_checkout_types::GitCommitHash;
///
/// let hash: GitCommitHash =
///     "0123456789abcdef0123456789abcdef01234567".parse().unwrap();
/// assert_eq!(hash.short(), "0123456789ab");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GitCommitHash {
    /// A SHA-1 object name.
    Sha1([u8; 20]),
    /// A SHA-256 object name.
    Sha256([u8; 32]),
}

impl GitCommitHash {
    /// Returns the raw bytes of the hash.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            GitCommitHash::Sha1(bytes) => bytes,
            GitCommitHash::Sha256(bytes) => bytes,
        }
    }

    /// Returns the first 12 hex characters, for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.as_bytes()[..6])
    }
}

fn decode<const N: usize>(s: &str) -> Result<[u8; N], CommitHashParseError> {
    let mut bytes = [0; N];
    hex::decode_to_slice(s, &mut bytes)
        .map_err(CommitHashParseError::InvalidHex)?;
    Ok(bytes)
}

impl FromStr for GitCommitHash {
    type Err = CommitHashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.len() {
            40 => decode(s).map(GitCommitHash::Sha1),
            64 => decode(s).map(GitCommitHash::Sha256),
            len => Err(CommitHashParseError::InvalidLength(len)),
        }
    }
}

impl fmt::Display for GitCommitHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.as_bytes()))
    }
}
