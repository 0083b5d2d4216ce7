// Copyright 2026 Oxide Computer Company

//! Loading the checkout configuration from disk.

use crate::ConfigError;
use camino::Utf8Path;
use cube_checkout_types::CheckoutConfig;
use fs_err as fs;

/// Reads and parses the configuration file at `path`.
pub fn load_config(path: &Utf8Path) -> Result<CheckoutConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|error| {
        ConfigError::Read { path: path.to_owned(), error }
    })?;
    CheckoutConfig::from_json_str(&contents)
        .map_err(|error| ConfigError::Parse { path: path.to_owned(), error })
}

/// Returns the directory patch references are resolved against.
pub fn config_dir(path: &Utf8Path) -> &Utf8Path {
    path.parent().unwrap_or(Utf8Path::new(""))
}
