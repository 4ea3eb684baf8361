#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Exposes the short git sha as `BG_GIT_SHA` when building from a checkout.
fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").map_or_else(|_| PathBuf::from("."), PathBuf::from);
    let Some(git_dir) = locate_git_dir(&manifest_dir) else {
        return;
    };

    let head_path = git_dir.join("HEAD");
    println!("cargo:rerun-if-changed={}", head_path.display());
    let Ok(head) = fs::read_to_string(&head_path) else {
        return;
    };

    let sha = match head.trim().strip_prefix("ref:") {
        Some(reference) => read_ref(&git_dir, reference.trim()),
        None => Some(head.trim().to_string()),
    };
    if let Some(sha) = sha.filter(|sha| !sha.is_empty()) {
        let short = sha.chars().take(12).collect::<String>();
        println!("cargo:rustc-env=BG_GIT_SHA={short}");
    }
}

fn locate_git_dir(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        let dot_git = dir.join(".git");
        if dot_git.is_dir() {
            return Some(dot_git);
        }
        // Worktrees and submodules: `.git` is a file with `gitdir: <path>`.
        let text = fs::read_to_string(&dot_git).ok()?;
        let target = text.lines().next()?.trim().strip_prefix("gitdir:")?;
        Some(dir.join(target.trim()))
    })
}

fn read_ref(git_dir: &Path, reference: &str) -> Option<String> {
    let loose = git_dir.join(reference);
    if let Ok(text) = fs::read_to_string(&loose) {
        println!("cargo:rerun-if-changed={}", loose.display());
        return Some(text.trim().to_string());
    }

    let packed = git_dir.join("packed-refs");
    println!("cargo:rerun-if-changed={}", packed.display());
    let text = fs::read_to_string(&packed).ok()?;
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('^'))
        .filter_map(|line| line.split_once(' '))
        .find(|(_, name)| *name == reference)
        .map(|(sha, _)| sha.trim().to_string())
}
