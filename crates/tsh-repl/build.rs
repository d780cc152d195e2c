//! Stamps the `tsh --version` line with the source revision and build date.

use std::path::Path;
use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn main() {
    println!("cargo::rerun-if-changed=build.rs");
    // Source tarballs have no .git to watch.
    if Path::new("../../.git/HEAD").exists() {
        println!("cargo::rerun-if-changed=../../.git/HEAD");
        println!("cargo::rerun-if-changed=../../.git/index");
    }

    let revision = git(&["describe", "--always", "--dirty"]).unwrap_or_else(|| "unknown".into());
    let build_date = chrono::Utc::now().date_naive();

    println!("cargo:rustc-env=TSH_GIT_HASH={revision}");
    println!("cargo:rustc-env=TSH_BUILD_DATE={build_date}");
}
