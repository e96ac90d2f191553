//! Build identification for demandgen-ai
//!
//! Exposes to the crate at compile time:
//! - `DEMANDGEN_GIT_REV`: short commit, `-dirty` when the tree has changes
//! - `DEMANDGEN_BUILT_AT`: UTC build time, RFC 3339
//! - `DEMANDGEN_PROFILE`: cargo profile

use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}

fn main() {
    let revision = match git(&["rev-parse", "--short=8", "HEAD"]) {
        Some(rev) => {
            let dirty = git(&["status", "--porcelain", "--untracked-files=no"])
                .is_some_and(|status| !status.is_empty());
            if dirty {
                format!("{}-dirty", rev)
            } else {
                rev
            }
        }
        None => "unknown".to_string(),
    };

    let built_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=DEMANDGEN_GIT_REV={}", revision);
    println!("cargo:rustc-env=DEMANDGEN_BUILT_AT={}", built_at);
    println!("cargo:rustc-env=DEMANDGEN_PROFILE={}", profile);
}
