#![allow(dead_code)]

pub mod mock_data;

use std::process::{Command, Output};
use tempfile::TempDir;

/// Nothing listens here, so every backend request fails fast.
pub const UNREACHABLE_API: &str = "http://127.0.0.1:9/api";

/// Path of the compiled `idsdash` binary.
pub fn idsdash_binary() -> &'static str {
    env!("CARGO_BIN_EXE_idsdash")
}

/// Runs idsdash commands against an isolated config root.
pub struct IdsDashTest {
    pub temp_dir: TempDir,
    api_url: String,
}

impl IdsDashTest {
    /// Isolated root, backend unreachable.
    pub fn new() -> Self {
        Self::with_api(UNREACHABLE_API)
    }

    pub fn with_api(api_url: &str) -> Self {
        IdsDashTest {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
            api_url: api_url.to_string(),
        }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(idsdash_binary())
            .args(args)
            .env("IDSDASH_ROOT", self.temp_dir.path())
            .env("IDSDASH_API_URL", &self.api_url)
            .env("NO_COLOR", "1")
            .env_remove("IDSDASH_LOG")
            .env_remove("RUST_LOG")
            .current_dir(self.temp_dir.path())
            .output()
            .expect("Failed to execute idsdash command")
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
        assert!(
            !output.status.success(),
            "Command {:?} should have failed\nstdout: {}",
            args,
            String::from_utf8_lossy(&output.stdout)
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.temp_dir.path().join(name)).expect("Failed to read file")
    }
}
