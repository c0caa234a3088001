//! Common test utilities for CLI integration tests.
//!
//! Every `TestEnv` gets its own temporary data directory, so tests can run
//! in parallel without seeing each other's bookings.

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Environment variables the binary reads; cleared so the host cannot leak in.
const FIELDBOOK_ENV_VARS: [&str; 8] = [
    "FIELDBOOK_DATA_DIR",
    "FIELDBOOK_BUSY_TIMEOUT",
    "FIELDBOOK_DISABLE_AUTOINIT",
    "FIELDBOOK_RECURRING_SESSIONS",
    "FIELDBOOK_PENDING_MAX_AGE_HOURS",
    "FIELDBOOK_MAXIMUM_LOCK_WAIT_SECONDS",
    "FIELDBOOK_OUTPUT_FORMAT",
    "FIELDBOOK_LOG_MODE",
];

/// Test environment with an isolated data directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
    /// Path to the fieldbook data directory (not created until first use)
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let data_dir = temp_path.join("fieldbook-data");

        Self {
            temp_dir,
            temp_path,
            data_dir,
        }
    }

    /// The binary with a clean environment and no flags.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("fieldbook").expect("Failed to find fieldbook binary");
        for var in FIELDBOOK_ENV_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// The binary pointed at this environment's data directory.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// Write `config.yaml` into the data directory.
    pub fn write_config(&self, content: &str) {
        std::fs::create_dir_all(&self.data_dir).expect("Failed to create data dir");
        std::fs::write(self.data_dir.join("config.yaml"), content)
            .expect("Failed to write config");
    }

    /// Register a field and return its id.
    pub fn add_field(&self, name: &str, rate: &str) -> i64 {
        let output = self
            .command()
            .args(["add-field", "--name", name, "--rate", rate])
            .output()
            .expect("Failed to run add-field");

        assert!(
            output.status.success(),
            "add-field failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        String::from_utf8(output.stdout)
            .expect("Invalid UTF-8 in output")
            .trim()
            .parse()
            .expect("Output is not a field id")
    }

    /// Book a field and return the stored session ids, session 0 first.
    ///
    /// # Panics
    /// Panics if the booking is rejected.
    pub fn book(&self, field: i64, start: &str, end: &str, extra: &[&str]) -> Vec<i64> {
        let output = self
            .command()
            .args(["book", "--field", &field.to_string(), "--requester", "1"])
            .args(["--start", start, "--end", end])
            .args(extra)
            .output()
            .expect("Failed to run book");

        assert!(
            output.status.success(),
            "book failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        parse_ids(&String::from_utf8(output.stdout).expect("Invalid UTF-8 in output"))
    }

    /// Run `list --format json` with extra filters and parse the result.
    pub fn list_json(&self, extra: &[&str]) -> Vec<serde_json::Value> {
        let output = self
            .command()
            .args(["list", "--format", "json"])
            .args(extra)
            .output()
            .expect("Failed to run list");

        assert!(
            output.status.success(),
            "list failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        serde_json::from_slice(&output.stdout).expect("list output is not a JSON array")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one id per line.
#[allow(dead_code)]
pub fn parse_ids(output: &str) -> Vec<i64> {
    output
        .lines()
        .map(|line| line.trim().parse().expect("line is not an id"))
        .collect()
}
