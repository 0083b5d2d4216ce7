// Copyright 2026 Oxide Computer Company

//! The checkout pipeline: validate, fetch, patch, relocate, stamp.

use crate::{
    CheckoutError, RelocatedPath, SourceControl, TargetState, Workspace,
    config, marker, patch,
};
use camino::Utf8PathBuf;
use cube_checkout_types::{CheckoutConfig, CubeVersion, GitCommitHash};
use tracing::{info, warn};

/// The STM32CubeWB repository.
pub const DEFAULT_GIT_URL: &str =
    "https://github.com/STMicroelectronics/STM32CubeWB.git";

/// The version imported when none is given.
pub const DEFAULT_VERSION: &str = "v1.15.0";

/// Imports a pinned STM32CubeWB snapshot into a target directory.
///
/// # Examples
///
/// ```no_run
/// use cube_checkout::{Checkout, DEFAULT_GIT_URL, Git};
///
/// let git = Git::from_env().expect("$GIT is valid UTF-8");
/// let summary = Checkout::new(
///     "third_party/STM32CubeWB",
///     "v1.15.0".parse().unwrap(),
///     DEFAULT_GIT_URL,
///     "tools/cube/config.json",
/// )
/// .run(&git)
/// .expect("checkout succeeded");
/// println!("imported {} at {}", summary.version, summary.commit);
/// ```
#[derive(Clone, Debug)]
pub struct Checkout {
    target_dir: Utf8PathBuf,
    version: CubeVersion,
    git_url: String,
    config_path: Utf8PathBuf,
    force: bool,
}

/// What a successful [`Checkout::run`] did.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct CheckoutSummary {
    /// The version that was imported and stamped.
    pub version: CubeVersion,
    /// The commit the version resolved to.
    pub commit: GitCommitHash,
    /// The version recorded in the target before the run, if any.
    pub previous_version: Option<String>,
    /// True if the target had no marker and the run was forced.
    pub forced: bool,
    /// The patches that were applied, in order, as written in the
    /// configuration.
    pub patches: Vec<Utf8PathBuf>,
    /// The paths that were moved into the target, in order.
    pub relocated: Vec<RelocatedPath>,
    /// The marker file that was written.
    pub marker: Utf8PathBuf,
}

impl Checkout {
    /// Creates a checkout of `version` from `git_url` into `target_dir`,
    /// driven by the configuration file at `config_path`.
    pub fn new(
        target_dir: impl Into<Utf8PathBuf>,
        version: CubeVersion,
        git_url: impl Into<String>,
        config_path: impl Into<Utf8PathBuf>,
    ) -> Self {
        Checkout {
            target_dir: target_dir.into(),
            version,
            git_url: git_url.into(),
            config_path: config_path.into(),
            force: false,
        }
    }

    /// Allows importing into a directory that has no `VERSION` marker.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Runs the pipeline, stopping at the first failure.
    ///
    /// Nothing in the target is touched until the workspace has been
    /// fetched and fully patched. The workspace is removed whether or not
    /// the run succeeds.
    pub fn run<V: SourceControl + ?Sized>(
        &self,
        vcs: &V,
    ) -> Result<CheckoutSummary, CheckoutError> {
        info!("Target directory: {}", self.target_dir);
        let state = marker::validate_target(&self.target_dir, self.force)?;

        info!("Loading config file {}", self.config_path);
        let config = config::load_config(&self.config_path)?;

        let workspace = Workspace::acquire()?;
        let result =
            self.run_in_workspace(vcs, &config, &workspace, state);

        let release = workspace.close();
        match (result, release) {
            (Ok(summary), Ok(())) => Ok(summary),
            (Ok(_), Err(error)) => Err(error.into()),
            (Err(error), Ok(())) => Err(error),
            (Err(error), Err(release_error)) => {
                warn!("{release_error}");
                Err(error)
            }
        }
    }

    fn run_in_workspace<V: SourceControl + ?Sized>(
        &self,
        vcs: &V,
        config: &CheckoutConfig,
        workspace: &Workspace,
        state: TargetState,
    ) -> Result<CheckoutSummary, CheckoutError> {
        let root = workspace.path();

        info!(
            "Cloning STM32CubeWB, {} from {}",
            self.version, self.git_url
        );
        vcs.clone_shallow(&self.git_url, &self.version, root)?;
        let commit = vcs.head_commit(root)?;
        info!("Fetched {} at commit {}", self.version, commit.short());

        let patches = patch::resolve_patches(
            config::config_dir(&self.config_path),
            config.patches(),
        )?;
        patch::apply_patches(vcs, root, &patches)?;

        let relocated = crate::relocate_paths(
            root,
            &self.target_dir,
            config.paths(),
        )?;

        let marker = marker::write_version(&self.target_dir, &self.version)?;
        info!("Done");

        Ok(CheckoutSummary {
            version: self.version.clone(),
            commit,
            previous_version: state.previous_version,
            forced: !state.has_marker,
            patches: config.patches().to_vec(),
            relocated,
            marker,
        })
    }
}
