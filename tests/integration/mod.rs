//! Integration test suite for provgen
//!
//! End-to-end tests of the library pipeline and the `provgen` binary.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **pipeline**: walk, grouping and generation through the library API
//! - **generate**: `provgen generate` output formats and exit status
//! - **inspect**: `provgen sites` and `provgen tree`
//! - **expand**: `provgen expand` and configuration loading

mod expand;
mod generate;
mod inspect;
mod pipeline;

use assert_cmd::Command;
use provgen::test_utils::{ModelFixture, write_fixture};
use std::path::PathBuf;
use tempfile::TempDir;

/// A temp directory holding `model.toml` with `content`.
pub fn model_dir(content: &str) -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let path = write_fixture(temp.path(), "model.toml", content);
    (temp, path)
}

/// The app fixture written to a temp directory.
pub fn app_model() -> (TempDir, PathBuf) {
    model_dir(ModelFixture::APP)
}

/// `provgen` running in `dir` with no ambient configuration.
pub fn provgen(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("provgen").unwrap();
    cmd.current_dir(dir.path()).env_remove("PROVGEN_CONFIG").env_remove("RUST_LOG");
    cmd
}
