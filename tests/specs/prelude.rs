//! Test helpers for the end-to-end cli-replay specs.
//!
//! Thin DSL over `assert_cmd`, in the style of a real-command harness: a
//! scratch `Project` directory holding a scenario file, and a `clr()`
//! builder for running the binary against it.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;

/// A scratch directory holding one scenario plus whatever else a test needs.
pub struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `contents` at `name` (relative to the project root) and
    /// returns its absolute path.
    pub fn scenario(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, contents).expect("write scenario");
        path
    }

    pub fn clr(&self) -> Command {
        let mut cmd = Command::cargo_bin("clr").expect("clr binary");
        cmd.current_dir(self.dir.path());
        cmd
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}
