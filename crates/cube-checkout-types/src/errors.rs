// Copyright 2026 Oxide Computer Company

//! Error types for checkout configuration and version parsing.

use camino::Utf8PathBuf;
use thiserror::Error;

/// An error that occurs while parsing a
/// [`GitCommitHash`](crate::GitCommitHash).
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum CommitHashParseError {
    /// The commit hash has an invalid length.
    #[error(
        "invalid length: expected 40 (SHA-1) or 64 (SHA-256) hex characters, \
         got {0}"
    )]
    InvalidLength(usize),

    /// The commit hash is not valid hexadecimal.
    #[error("invalid hexadecimal")]
    InvalidHex(hex::FromHexError),
}

/// An error that occurs while constructing a
/// [`RelativePath`](crate::RelativePath).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum RelativePathError {
    /// The path was empty.
    #[error("path is empty")]
    Empty,

    /// The path contains a newline character.
    #[error("path {0:?} contains a newline character")]
    Newline(String),

    /// The path contains a non-normal component (e.g., `..`, `.`, `/`, or a
    /// Windows prefix). Only plain file and directory names are allowed.
    #[error(
        "path {path:?} contains non-normal component {component:?} \
         (only plain file/directory names are allowed)"
    )]
    InvalidComponent {
        /// The full path that failed validation.
        path: Utf8PathBuf,
        /// The non-normal component that was found (e.g., `..`, `.`, `/`).
        component: String,
    },
}

/// An error that occurs while parsing a [`CubeVersion`](crate::CubeVersion).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum VersionParseError {
    /// The version was empty.
    #[error("version is empty")]
    Empty,

    /// The version starts with `-` and would be read as a command-line
    /// option.
    #[error("version {0:?} must not start with '-'")]
    LeadingDash(String),

    /// The version contains whitespace or a control character.
    #[error("version {version:?} contains invalid character {ch:?}")]
    InvalidChar {
        /// The version that failed validation.
        version: String,
        /// The offending character.
        ch: char,
    },
}

/// An error that occurs while parsing a
/// [`CheckoutConfig`](crate::CheckoutConfig).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigParseError {
    /// The input is not well-formed JSON, or does not match the expected
    /// shape (including invalid or duplicate paths).
    #[error("invalid checkout configuration")]
    Json(#[from] serde_json::Error),
}
