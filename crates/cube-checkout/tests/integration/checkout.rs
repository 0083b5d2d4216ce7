// Copyright 2026 Oxide Computer Company

//! End-to-end checkout runs using the real git binary.

use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use camino_tempfile::Utf8TempDir;
use cube_checkout::{
    Checkout, CheckoutError, ConfigError, Git, PatchError, RelocationError,
    SourceControl,
};
use std::{collections::BTreeMap, fs, process::Command};
use walkdir::WalkDir;

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Returns a `Command` for git, respecting the `$GIT` environment variable.
fn git_command() -> Command {
    let bin = std::env::var("GIT").unwrap_or_else(|_| "git".to_string());
    Command::new(bin)
}

fn git(repo: &Utf8Path, args: &[&str]) -> Result<()> {
    let output = git_command().args(args).current_dir(repo).output()?;
    anyhow::ensure!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(())
}

fn write_file(path: &Utf8Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// Reads every file under `root` into a map keyed by relative path.
fn snapshot(root: &Utf8Path) -> Result<BTreeMap<String, String>> {
    let mut files = BTreeMap::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            let relative = entry.path().strip_prefix(root)?;
            files.insert(
                relative.to_string_lossy().replace('\\', "/"),
                fs::read_to_string(entry.path())?,
            );
        }
    }
    Ok(files)
}

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

const VERSION: &str = "v1.15.0";

const FIRST_PATCH: &str = "\
diff --git a/Drivers/BSP/board.c b/Drivers/BSP/board.c
--- a/Drivers/BSP/board.c
+++ b/Drivers/BSP/board.c
@@ -1 +1 @@
-int clock = 32;
+int clock = 64;
";

const SECOND_PATCH: &str = "\
diff --git a/Drivers/BSP/board.c b/Drivers/BSP/board.c
--- a/Drivers/BSP/board.c
+++ b/Drivers/BSP/board.c
@@ -1 +1 @@
-int clock = 64;
+int clock = 96;
";

/// A local upstream repository, a target checkout, and a tools directory
/// holding the configuration and patches.
struct Fixture {
    temp: Utf8TempDir,
}

impl Fixture {
    fn new() -> Result<Self> {
        let temp = Utf8TempDir::with_prefix("cube-checkout-it-")?;
        let fixture = Fixture { temp };

        let upstream = fixture.upstream();
        fs::create_dir_all(&upstream)?;
        git(&upstream, &["init", "--quiet"])?;
        git(&upstream, &["config", "user.email", "test@example.com"])?;
        git(&upstream, &["config", "user.name", "Test User"])?;
        git(&upstream, &["config", "commit.gpgsign", "false"])?;

        write_file(
            &upstream.join("Drivers/CMSIS/Device/ST/STM32WBxx/Include/stm32wbxx.h"),
            "#define STM32WB 1\n",
        )?;
        write_file(
            &upstream.join("Drivers/CMSIS/Device/ST/STM32WBxx/Source/system.c"),
            "void SystemInit(void) {}\n",
        )?;
        write_file(&upstream.join("Drivers/BSP/board.c"), "int clock = 32;\n")?;
        write_file(&upstream.join("Middlewares/ST/ble.h"), "/* ble */\n")?;
        git(&upstream, &["add", "."])?;
        git(&upstream, &["commit", "--quiet", "-m", "Import v1.15.0"])?;
        git(&upstream, &["tag", VERSION])?;
        git(&upstream, &["branch", "stable"])?;

        // A later commit, so a shallow clone of the tag has to pick the
        // older one.
        write_file(&upstream.join("Drivers/BSP/board.c"), "int clock = 0;\n")?;
        git(&upstream, &["commit", "--quiet", "-am", "Work in progress"])?;

        fs::create_dir_all(fixture.target())?;
        write_file(&fixture.tools().join("0001-first.patch"), FIRST_PATCH)?;
        write_file(&fixture.tools().join("0002-second.patch"), SECOND_PATCH)?;

        Ok(fixture)
    }

    fn upstream(&self) -> Utf8PathBuf {
        self.temp.path().join("upstream")
    }

    fn url(&self) -> String {
        format!("file://{}", self.upstream())
    }

    fn target(&self) -> Utf8PathBuf {
        self.temp.path().join("target")
    }

    fn tools(&self) -> Utf8PathBuf {
        self.temp.path().join("tools")
    }

    fn write_config(&self, config: &str) -> Result<Utf8PathBuf> {
        let path = self.tools().join("config.json");
        write_file(&path, config)?;
        Ok(path)
    }

    fn stamp(&self, version: &str) -> Result<()> {
        write_file(&self.target().join("VERSION"), version)
    }

    fn checkout(&self, version: &str, config: &Utf8Path) -> Result<Checkout> {
        Ok(Checkout::new(self.target(), version.parse()?, self.url(), config))
    }

    fn marker(&self) -> Result<String> {
        Ok(fs::read_to_string(self.target().join("VERSION"))?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn test_clone_is_shallow_and_pinned() -> Result<()> {
    let fixture = Fixture::new()?;
    let dest = Utf8TempDir::with_prefix("cube-checkout-it-clone-")?;
    let git = Git::from_env()?;

    git.clone_shallow(&fixture.url(), &VERSION.parse()?, dest.path())?;

    let output = git_command()
        .args(["rev-parse", "--is-shallow-repository"])
        .current_dir(dest.path())
        .output()?;
    assert_eq!(String::from_utf8(output.stdout)?.trim(), "true");
    assert_eq!(
        fs::read_to_string(dest.path().join("Drivers/BSP/board.c"))?,
        "int clock = 32;\n",
        "the tag, not the branch tip, should be checked out"
    );

    let output = git_command()
        .args(["rev-parse", VERSION])
        .current_dir(fixture.upstream())
        .output()?;
    let expected = String::from_utf8(output.stdout)?;
    assert_eq!(git.head_commit(dest.path())?.to_string(), expected.trim());

    Ok(())
}

#[test]
fn test_end_to_end() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.stamp("v1.14.0")?;
    let config = fixture.write_config(
        r#"{"patches": [], "paths": {"Drivers/Vendor": "Drivers/CMSIS/Device/ST"}}"#,
    )?;

    let summary = fixture.checkout(VERSION, &config)?.run(&Git::from_env()?)?;

    assert_eq!(summary.version.as_str(), VERSION);
    assert_eq!(summary.previous_version.as_deref(), Some("v1.14.0"));
    assert_eq!(fixture.marker()?, VERSION);
    assert_eq!(
        snapshot(&fixture.target().join("Drivers/Vendor"))?,
        snapshot(&fixture.upstream().join("Drivers/CMSIS/Device/ST"))?,
    );
    assert!(!fixture.target().join("Drivers/BSP").exists());

    Ok(())
}

#[test]
fn test_fetch_by_branch() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.stamp("v1.14.0")?;
    let config =
        fixture.write_config(r#"{"paths": {"board.c": "Drivers/BSP/board.c"}}"#)?;

    fixture.checkout("stable", &config)?.run(&Git::from_env()?)?;

    assert_eq!(fixture.marker()?, "stable");
    assert_eq!(
        fs::read_to_string(fixture.target().join("board.c"))?,
        "int clock = 32;\n"
    );
    Ok(())
}

#[test]
fn test_unknown_ref_is_fetch_error() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.stamp("v1.14.0")?;
    let config = fixture.write_config("{}")?;

    let err = fixture
        .checkout("v9.99.0", &config)?
        .run(&Git::from_env()?)
        .unwrap_err();

    assert!(matches!(err, CheckoutError::Fetch(_)), "{err:?}");
    assert_eq!(fixture.marker()?, "v1.14.0");
    Ok(())
}

#[test]
fn test_patches_in_declared_order() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.stamp("v1.14.0")?;
    let config = fixture.write_config(
        r#"{
            "patches": ["0001-first.patch", "0002-second.patch"],
            "paths": {"Drivers/BSP": "Drivers/BSP"}
        }"#,
    )?;

    let summary = fixture.checkout(VERSION, &config)?.run(&Git::from_env()?)?;

    assert_eq!(summary.patches.len(), 2);
    assert_eq!(
        fs::read_to_string(fixture.target().join("Drivers/BSP/board.c"))?,
        "int clock = 96;\n"
    );
    Ok(())
}

#[test]
fn test_patches_in_reverse_order_fail() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.stamp("v1.14.0")?;
    let config = fixture.write_config(
        r#"{
            "patches": ["0002-second.patch", "0001-first.patch"],
            "paths": {"Drivers/BSP": "Drivers/BSP"}
        }"#,
    )?;

    let err = fixture
        .checkout(VERSION, &config)?
        .run(&Git::from_env()?)
        .unwrap_err();

    match err {
        CheckoutError::Patch(PatchError::ApplyFailed { patch, stderr, .. }) => {
            assert_eq!(patch.file_name(), Some("0002-second.patch"));
            assert!(!stderr.is_empty(), "git's diagnostic should be kept");
        }
        other => panic!("expected ApplyFailed, got {other:?}"),
    }
    assert_eq!(fixture.marker()?, "v1.14.0");
    assert!(!fixture.target().join("Drivers").exists());
    Ok(())
}

#[test]
fn test_missing_patch_leaves_target_unchanged() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.stamp("v1.14.0")?;
    write_file(&fixture.target().join("Drivers/Vendor/keep.h"), "keep\n")?;
    let before = snapshot(&fixture.target())?;
    let config = fixture.write_config(
        r#"{
            "patches": ["0001-first.patch", "0003-missing.patch"],
            "paths": {"Drivers/Vendor": "Drivers/CMSIS/Device/ST"}
        }"#,
    )?;

    let err = fixture
        .checkout(VERSION, &config)?
        .run(&Git::from_env()?)
        .unwrap_err();

    assert!(
        matches!(err, CheckoutError::Config(ConfigError::MissingPatch { .. })),
        "{err:?}"
    );
    assert_eq!(snapshot(&fixture.target())?, before);
    Ok(())
}

#[test]
fn test_missing_source_keeps_earlier_entries() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.stamp("v1.14.0")?;
    let config = fixture.write_config(
        r#"{"paths": {
            "Drivers/Vendor": "Drivers/CMSIS/Device/ST",
            "Drivers/HAL": "Drivers/STM32WBxx_HAL_Driver"
        }}"#,
    )?;

    let err = fixture
        .checkout(VERSION, &config)?
        .run(&Git::from_env()?)
        .unwrap_err();

    match err {
        CheckoutError::Relocation(RelocationError::MissingSource { path }) => {
            assert!(path.ends_with("Drivers/STM32WBxx_HAL_Driver"), "{path}");
        }
        other => panic!("expected MissingSource, got {other:?}"),
    }
    assert!(
        fixture
            .target()
            .join("Drivers/Vendor/STM32WBxx/Include/stm32wbxx.h")
            .exists()
    );
    assert_eq!(fixture.marker()?, "v1.14.0");
    Ok(())
}

#[test]
fn test_repeated_runs_are_idempotent() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.stamp("v1.14.0")?;
    write_file(&fixture.target().join("Middlewares/stale.h"), "stale\n")?;
    let config = fixture.write_config(
        r#"{
            "patches": ["0001-first.patch"],
            "paths": {
                "Drivers/Vendor": "Drivers/CMSIS/Device/ST",
                "Middlewares": "Middlewares/ST",
                "Drivers/board.c": "Drivers/BSP/board.c"
            }
        }"#,
    )?;
    let git = Git::from_env()?;

    fixture.checkout(VERSION, &config)?.run(&git)?;
    let first = snapshot(&fixture.target())?;
    fixture.checkout(VERSION, &config)?.run(&git)?;
    let second = snapshot(&fixture.target())?;

    assert_eq!(first, second);
    assert!(!first.contains_key("Middlewares/stale.h"), "replaced, not merged");
    assert_eq!(first.get("VERSION").map(String::as_str), Some(VERSION));
    assert_eq!(
        first.get("Drivers/board.c").map(String::as_str),
        Some("int clock = 64;\n")
    );
    Ok(())
}

#[test]
fn test_forced_run_into_new_directory() -> Result<()> {
    let fixture = Fixture::new()?;
    let config = fixture.write_config(
        r#"{"paths": {"Drivers/Vendor": "Drivers/CMSIS/Device/ST"}}"#,
    )?;
    let git = Git::from_env()?;

    let err = fixture.checkout(VERSION, &config)?.run(&git).unwrap_err();
    assert!(matches!(err, CheckoutError::Validation(_)), "{err:?}");

    let summary = fixture.checkout(VERSION, &config)?.force(true).run(&git)?;
    assert!(summary.forced);
    assert_eq!(fixture.marker()?, VERSION);
    Ok(())
}
