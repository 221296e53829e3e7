#![allow(dead_code)]

pub mod mock_gateway;

use std::process::{Command, Output};
use tempfile::TempDir;

/// Runs the termbase binary in an isolated temp directory, so each test
/// gets its own `.termbase/config.yaml`.
pub struct TermbaseTest {
    pub temp_dir: TempDir,
}

impl TermbaseTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TermbaseTest { temp_dir }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.run_with_env(args, &[])
    }

    /// Run with the given environment on top of a clean one: any
    /// TERMBASE_* variables of the outer shell are removed first.
    pub fn run_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> Output {
        let mut command = Command::new(env!("CARGO_BIN_EXE_termbase"));
        command
            .args(args)
            .current_dir(self.temp_dir.path())
            .env_remove("TERMBASE_BASE_URL")
            .env_remove("TERMBASE_AUTH_USER")
            .env_remove("TERMBASE_AUTH_TOKEN")
            .env("NO_COLOR", "1");
        for (key, value) in env {
            command.env(key, value);
        }
        command.output().expect("Failed to execute termbase command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if output.status.success() {
            panic!(
                "Command {:?} should have failed\nstdout: {}",
                args,
                String::from_utf8_lossy(&output.stdout)
            );
        }
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn config_path(&self) -> std::path::PathBuf {
        self.temp_dir.path().join(".termbase").join("config.yaml")
    }
}
