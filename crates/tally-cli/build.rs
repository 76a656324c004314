//! Embeds the version shown by `tally --version`.
//!
//! Release packaging sets `TALLY_BUILD_VERSION`; source builds fall back to
//! the crate version tagged with the short commit they were built from.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-env-changed=TALLY_BUILD_VERSION");
    println!("cargo:rerun-if-changed=.git/HEAD");

    let version = env::var("TALLY_BUILD_VERSION")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| match short_commit() {
            Some(commit) => format!("{} ({commit})", env!("CARGO_PKG_VERSION")),
            None => env!("CARGO_PKG_VERSION").to_string(),
        });

    println!("cargo:rustc-env=TALLY_VERSION={version}");
}

fn short_commit() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=10", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())?;

    let commit = String::from_utf8(output.stdout).ok()?;
    let commit = commit.trim();
    (!commit.is_empty()).then(|| commit.to_string())
}
