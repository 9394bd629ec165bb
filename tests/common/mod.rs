//! Shared helpers for integration tests.
//!
//! [`FakeContainerCli`] is a shell script standing in for `docker`. It appends
//! each argv to `calls.log`, stores what `login` receives on stdin, and can be
//! told to fail one subcommand with exit status 7.
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

pub const FAKE_FAILURE_STATUS: i32 = 7;

pub struct FakeContainerCli {
    dir: TempDir,
    program: PathBuf,
}

impl FakeContainerCli {
    pub fn new() -> Self {
        Self::failing_on("")
    }

    pub fn failing_on(subcommand: &str) -> Self {
        let dir = TempDir::new().expect("Should create temporary directory");
        let program = dir.path().join("fake-docker");
        let script = format!(
            r#"#!/bin/sh
printf '%s\n' "$*" >> '{dir}/calls.log'
if [ "$1" = "login" ]; then
  cat > '{dir}/login.stdin'
fi
if [ "$1" = "{fail}" ]; then
  echo "fake $1 failure" >&2
  exit {status}
fi
echo "fake $1 ok"
"#,
            dir = dir.path().display(),
            fail = subcommand,
            status = FAKE_FAILURE_STATUS,
        );

        fs::write(&program, script).expect("Should write fake container CLI");
        fs::set_permissions(&program, fs::Permissions::from_mode(0o755))
            .expect("Should make fake container CLI executable");

        Self { dir, program }
    }

    pub fn program(&self) -> String {
        self.program.display().to_string()
    }

    /// Argument lists the fake CLI was called with, in order.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("calls.log"))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// What `login` read from its standard input, if it ran.
    pub fn login_input(&self) -> Option<String> {
        fs::read_to_string(self.dir.path().join("login.stdin")).ok()
    }
}
