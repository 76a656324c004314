use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Run the CLI binary with an isolated HOME and data directory.
pub fn run_cli_with_env(args: &[&str], home: &Path, api_url: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tally"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env("TALLY_API_URL", api_url);
    cmd.env_remove("RUST_LOG");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI with an isolated HOME and expect success.
pub fn run_cli_with_env_success(args: &[&str], home: &Path, api_url: &str) -> String {
    let output = run_cli_with_env(args, home, api_url);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Location of the session file for a given HOME.
pub fn session_file(home: &Path) -> PathBuf {
    home.join("data").join("tally").join("session.json")
}

/// Read the persisted session as JSON.
pub fn read_session(home: &Path) -> serde_json::Value {
    let json = std::fs::read_to_string(session_file(home)).expect("session file missing");
    serde_json::from_str(&json).expect("session file is not JSON")
}
