//! Embeds the commit, build date and cargo profile into `build_info.rs`.
//!
//! `BRICKRPG_BUILD_COMMIT` and `BRICKRPG_BUILD_DATE` override the values
//! read from git and the clock, so packaged builds are reproducible.

use std::env;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

const UNKNOWN: &str = "unknown";

fn git_commit() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let commit = String::from_utf8(output.stdout).ok()?.trim().to_string();
    (!commit.is_empty()).then_some(commit)
}

fn main() -> Result<(), Box<dyn Error>> {
    let commit = env::var("BRICKRPG_BUILD_COMMIT")
        .ok()
        .or_else(git_commit)
        .unwrap_or_else(|| UNKNOWN.to_string());
    let date = env::var("BRICKRPG_BUILD_DATE")
        .unwrap_or_else(|_| chrono::Utc::now().format("%Y-%m-%d").to_string());
    let profile = env::var("PROFILE").unwrap_or_else(|_| UNKNOWN.to_string());

    let out_dir = env::var("OUT_DIR").map_err(|e| format!("OUT_DIR not set: {e}"))?;
    let dest = PathBuf::from(out_dir).join("build_info.rs");
    let body = format!(
        "pub const BUILD_COMMIT: &str = {commit:?};\n\
         pub const BUILD_DATE: &str = {date:?};\n\
         pub const BUILD_PROFILE: &str = {profile:?};\n"
    );
    fs::write(&dest, body).map_err(|e| format!("writing {}: {e}", dest.display()))?;

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=BRICKRPG_BUILD_COMMIT");
    println!("cargo:rerun-if-env-changed=BRICKRPG_BUILD_DATE");
    Ok(())
}
