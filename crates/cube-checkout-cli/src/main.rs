// Copyright 2026 Oxide Computer Company

//! Command-line entry point: vendors a pinned STM32CubeWB snapshot into a
//! target directory.

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use cube_checkout::{
    Checkout, CheckoutSummary, DEFAULT_GIT_URL, DEFAULT_VERSION, Git,
};
use cube_checkout_types::CubeVersion;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

#[derive(Debug, Parser)]
#[command(
    name = "cube-checkout",
    version,
    about = "Import a pinned STM32CubeWB snapshot into a checkout directory"
)]
struct Args {
    /// Output directory [default: current directory]
    target_dir: Option<Utf8PathBuf>,

    /// STM32CubeWB version to use. Must be a tag or branch name
    #[arg(long, short = 'v', default_value = DEFAULT_VERSION)]
    cube_version: CubeVersion,

    /// STM32CubeWB git repository
    #[arg(long, default_value = DEFAULT_GIT_URL)]
    cube_git_url: String,

    /// Configuration file listing patches and paths [default: config.json
    /// next to this executable]
    #[arg(long, short = 'p')]
    config: Option<Utf8PathBuf>,

    /// Skip target directory checks
    #[arg(long, short = 'f')]
    force: bool,

    /// Log level, used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,
}

impl Args {
    fn target_dir(&self) -> Result<Utf8PathBuf> {
        match &self.target_dir {
            Some(dir) => Ok(dir.clone()),
            None => {
                let cwd = std::env::current_dir()
                    .context("failed to read the current directory")?;
                Utf8PathBuf::try_from(cwd)
                    .context("current directory is not valid UTF-8")
            }
        }
    }

    fn config_path(&self) -> Result<Utf8PathBuf> {
        if let Some(config) = &self.config {
            return Ok(config.clone());
        }
        let exe = std::env::current_exe()
            .context("failed to locate the running executable")?;
        let exe = Utf8PathBuf::try_from(exe)
            .context("executable path is not valid UTF-8")?;
        let dir = exe.parent().context("executable path has no parent")?;
        Ok(dir.join("config.json"))
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(args.log_level).into())
        .from_env_lossy();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::with_default(subscriber, || match run(&args) {
        Ok(summary) => {
            info!(
                "Imported {} ({}) with {} patches and {} paths",
                summary.version,
                summary.commit.short(),
                summary.patches.len(),
                summary.relocated.len(),
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    })
}

fn run(args: &Args) -> Result<CheckoutSummary> {
    let git = Git::from_env()?;
    let checkout = Checkout::new(
        args.target_dir()?,
        args.cube_version.clone(),
        args.cube_git_url.clone(),
        args.config_path()?,
    )
    .force(args.force);
    Ok(checkout.run(&git)?)
}
