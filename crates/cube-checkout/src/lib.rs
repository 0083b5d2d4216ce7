// Copyright 2026 Oxide Computer Company

//! Fetch, patch and relocate a pinned STM32CubeWB snapshot into a checkout.
//!
//! A run is a fixed sequence of stages:
//!
//! 1. **Validate** the target: it must contain a `VERSION` marker unless the
//!    run is forced.
//! 2. **Load** the [`CheckoutConfig`](cube_checkout_types::CheckoutConfig).
//! 3. **Fetch** a depth-one clone of the requested ref into an ephemeral
//!    [`Workspace`].
//! 4. **Patch** the workspace, one patch at a time, in declared order.
//! 5. **Relocate** each configured path from the workspace into the target,
//!    replacing what was there.
//! 6. **Stamp** the target's `VERSION` marker.
//!
//! The first failing stage ends the run, and the workspace is removed on
//! every path. Up to the relocation stage the target is left untouched;
//! a relocation failure leaves earlier entries in place.
//!
//! # Usage
//!
//! ```no_run
//! use cube_checkout::{Checkout, Git};
//!
//! let git = Git::from_env().expect("$GIT is valid UTF-8");
//! let checkout = Checkout::new(
//!     ".",
//!     "v1.15.0".parse().unwrap(),
//!     cube_checkout::DEFAULT_GIT_URL,
//!     "config.json",
//! )
//! .force(true);
//! checkout.run(&git).expect("checkout succeeded");
//! ```

#![deny(missing_docs)]

mod config;
mod errors;
mod marker;
mod patch;
mod pipeline;
mod relocate;
mod vcs;
mod workspace;

pub use config::{config_dir, load_config};
pub use errors::{
    AtomicWriteError, CheckoutError, ConfigError, FetchError, GitEnvError,
    PatchError, RelocationError, StampError, ValidationError, WorkspaceError,
};
pub use marker::{
    MARKER_FILE_NAME, TargetState, marker_path, read_version,
    validate_target, write_version,
};
pub use patch::{ResolvedPatch, apply_patches, resolve_patches};
pub use pipeline::{Checkout, CheckoutSummary, DEFAULT_GIT_URL, DEFAULT_VERSION};
pub use relocate::{RelocatedPath, relocate_paths};
pub use vcs::{Git, SourceControl};
pub use workspace::Workspace;
