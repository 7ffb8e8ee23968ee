//! Common test helpers for CLI integration tests.

#![allow(dead_code)] // Functions used across different test binaries

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Run embedgen in a directory and capture combined stdout/stderr plus the
/// exit code.
pub fn run_embedgen(dir: &Path, args: &[&str]) -> (String, i32) {
    let result = Command::new(env!("CARGO_BIN_EXE_embedgen"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run embedgen");

    let mut output = String::new();
    output.push_str(&String::from_utf8_lossy(&result.stdout));
    output.push_str(&String::from_utf8_lossy(&result.stderr));

    (output, result.status.code().unwrap_or(-1))
}

/// Create the standard fixture tree:
/// `assets/a.txt` (3 bytes) and `assets/sub/b.txt` (5 bytes).
pub fn write_assets(dir: &Path) {
    std::fs::create_dir_all(dir.join("assets/sub")).expect("mkdir assets/sub");
    std::fs::write(dir.join("assets/a.txt"), "abc").expect("write a.txt");
    std::fs::write(dir.join("assets/sub/b.txt"), "hello").expect("write b.txt");
}

/// Temp project directory pre-populated with the standard fixture tree
pub fn asset_project() -> TempDir {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    write_assets(temp_dir.path());
    temp_dir
}
