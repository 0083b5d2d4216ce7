// Copyright 2026 Oxide Computer Company

//! Parsing types for STM32CubeWB checkouts.
//!
//! A *checkout* is a directory holding a subset of the STM32CubeWB SDK,
//! imported at a pinned upstream ref and recorded in a `VERSION` marker.
//! What gets imported is described by a JSON configuration:
//!
//! ```json
//! {
//!   "patches": ["patches/0001-fix-startup.patch"],
//!   "paths": { "Drivers/Vendor": "Drivers/CMSIS/Device/ST" }
//! }
//! ```
//!
//! This crate contains the types that describe a checkout, without any of
//! the machinery that performs one. The main entry points are
//! [`CheckoutConfig`] and [`CubeVersion`].
//!
//! # Examples
//!
//! ```
//! use cube_checkout_types::{CheckoutConfig, CubeVersion};
//!
//! let config = CheckoutConfig::from_json_str(
//!     r#"{"paths": {"Drivers/Vendor": "Drivers/CMSIS/Device/ST"}}"#,
//! )
//! .unwrap();
//! assert!(config.patches().is_empty());
//!
//! let mapping = config.paths().iter().next().unwrap();
//! assert_eq!(mapping.destination().as_str(), "Drivers/Vendor");
//! assert_eq!(mapping.source().as_str(), "Drivers/CMSIS/Device/ST");
//!
//! let version: CubeVersion = "v1.15.0".parse().unwrap();
//! assert_eq!(version.as_str(), "v1.15.0");
//! ```
//!
//! # Related crates
//!
//! To run a checkout, see the `cube-checkout` crate.

#![deny(missing_docs)]

mod config;
mod errors;
mod hash;
mod path;
mod version;

pub use config::{CheckoutConfig, PathMapping, PathMappings};
pub use errors::{
    CommitHashParseError, ConfigParseError, RelativePathError,
    VersionParseError,
};
pub use hash::GitCommitHash;
pub use path::RelativePath;
pub use version::CubeVersion;
