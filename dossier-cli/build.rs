// Injects DOSSIER_VERSION from `git describe`, falling back to the crate version
// when git or tags are unavailable (e.g. building from a source tarball).

use std::process::Command;

fn main() {
    let version = git_version().unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=DOSSIER_VERSION={}", version);
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/tags");
}

fn git_version() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let described = String::from_utf8(output.stdout).ok()?;
    Some(normalize(described.trim(), env!("CARGO_PKG_VERSION")))
}

/// "v0.3.0" -> "0.3.0"; "v0.3.0-4-gabc123" -> "0.3.0"; "abc123-dirty" -> "<pkg>-abc123-dirty"
fn normalize(described: &str, pkg_version: &str) -> String {
    match described.strip_prefix('v') {
        Some(tagged) => tagged.split('-').next().unwrap_or(tagged).to_string(),
        None => format!("{}-{}", pkg_version, described),
    }
}
