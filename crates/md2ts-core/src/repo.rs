//! Enclosing repository detection.
//!
//! Root-relative links that point outside the documentation tree but at
//! a file of the enclosing repository are rewritten to a repository
//! browse URL. Both the repository root and the browse URL come from
//! `git`; outside a checkout they are absent and such links classify as
//! invalid instead.

use std::path::PathBuf;
use std::process::Command;

/// Version-control context used by root-relative link classification.
#[derive(Clone, Debug, Default)]
pub struct RepoInfo {
    /// Repository root directory.
    pub root: Option<PathBuf>,
    /// Protocol-relative browse URL (`//host/org/repo/blob/branch`).
    pub browse_url: Option<String>,
}

impl RepoInfo {
    /// Detect the enclosing git repository, if any.
    #[must_use]
    pub fn detect() -> Self {
        let root = git(&["rev-parse", "--show-toplevel"]).map(PathBuf::from);
        let browse_url = git(&["remote", "get-url", "origin"]).and_then(|remote| {
            git(&["rev-parse", "--abbrev-ref", "HEAD"])
                .map(|branch| browse_url(&remote, &branch))
        });

        if root.is_none() {
            tracing::debug!("No enclosing git repository detected");
        }

        Self { root, browse_url }
    }
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8(output.stdout).ok()?;
    let trimmed = stdout.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Normalize a git remote URL into a protocol-relative browse URL for
/// the given branch.
///
/// Handles both `https://host/org/repo(.git)` and `git@host:org/repo.git`
/// remote forms.
#[must_use]
pub fn browse_url(remote: &str, branch: &str) -> String {
    let host_path = match remote.split_once("//") {
        Some((_, rest)) => rest.to_owned(),
        None => remote.replace("git@", "").replacen(':', "/", 1),
    };

    format!("//{}/blob/{branch}", host_path.trim_end_matches(".git"))
}
