//! Link and image source classification.
//!
//! Every href/src in a document resolves to exactly one
//! [`PathClassification`] against the documentation source tree: a
//! rewritten in-tree target, an external URL, or an invalid reference
//! with a reportable reason. Classification is pure given a filesystem
//! snapshot and a [`ResolveContext`].

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// Case-insensitive `/README.md` path segment.
static README_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/readme\.md").expect("valid readme regex"));

/// Classification of one href/src against the documentation tree.
///
/// Matched exhaustively at every call site; exactly one variant per
/// input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathClassification {
    /// Target lives inside the documentation tree.
    Internal {
        /// Rewritten href, rooted at the viewer base path.
        path: String,
        /// Location of the target on disk.
        location: PathBuf,
    },
    /// Target is outside the documentation tree.
    External {
        /// Href to emit, byte-identical for foreign URLs.
        path: String,
        /// Whether the target is a file of the enclosing repository
        /// (rewritten to a repository browse URL).
        own: bool,
    },
    /// Target could not be resolved.
    Invalid {
        /// The offending href as written.
        path: String,
        /// Human-readable reason, without the common prefix.
        reason: String,
    },
}

/// Context for classifying one document's references.
#[derive(Clone, Debug)]
pub struct ResolveContext {
    /// Viewer base path internal links are rooted at (e.g. `/docs`).
    pub base_path: String,
    /// Document directory relative to the source root (`.` at the root).
    pub sub_path: String,
    /// Documentation source root.
    pub source_dir: PathBuf,
    /// Enclosing repository root, when inside a checkout.
    pub repo_root: Option<PathBuf>,
    /// Repository browse URL (`//host/org/repo/blob/branch`).
    pub repo_url: Option<String>,
    /// Maximum number of leading `../` segments a backward-relative
    /// reference may use (the document's directory depth).
    pub max_depth: usize,
}

/// Classify an href/src string.
///
/// Rules, in order: `/README.md` segments are rejected (directory links
/// are canonical); root-relative paths resolve against the source tree,
/// then against the repository; other relative paths resolve against the
/// document's directory with bounded backward traversal; everything else
/// (absolute URLs, `//`, `#`, `mailto:`) is external.
#[must_use]
pub fn classify(href: &str, ctx: &ResolveContext) -> PathClassification {
    if README_SEGMENT.is_match(href) {
        return invalid(href, r#"Remove the "/README.md" from path."#);
    }

    if href.starts_with('/') && !href.starts_with("//") {
        return classify_root_relative(href, ctx);
    }

    if is_relative(href) {
        return classify_relative(href, ctx);
    }

    PathClassification::External {
        path: href.to_owned(),
        own: false,
    }
}

/// Whether an href is a candidate for in-tree resolution.
fn is_relative(href: &str) -> bool {
    !href.starts_with("http")
        && !href.starts_with("//")
        && !href.starts_with('#')
        && !href.starts_with("mailto")
}

/// Resolve a `/...` href: first as a path inside the documentation tree
/// (with the tree's own absolute prefix stripped), then as a repository
/// file rewritten to a browse URL.
fn classify_root_relative(href: &str, ctx: &ResolveContext) -> PathClassification {
    let mut chunks: Vec<&str> = href.split('/').collect();

    // Strip the source directory's own absolute path segments from the
    // front, so `/docs/guide` resolves as `guide` when the tree lives at
    // `<repo>/docs`.
    let canonical = ctx
        .source_dir
        .canonicalize()
        .unwrap_or_else(|_| ctx.source_dir.clone());
    let canonical = canonical.to_string_lossy();
    for segment in canonical.split('/') {
        if chunks.first() == Some(&segment) {
            chunks.remove(0);
        }
    }

    let location = join_location(&ctx.source_dir, &chunks);
    if target_exists(&location) {
        return PathClassification::Internal {
            path: join_path(&ctx.base_path, &chunks),
            location,
        };
    }

    if let (Some(root), Some(url)) = (&ctx.repo_root, &ctx.repo_url) {
        let repo_location = PathBuf::from(format!("{}{href}", root.display()));
        if target_exists(&repo_location) {
            return PathClassification::External {
                path: format!("{url}{href}"),
                own: true,
            };
        }
    }

    invalid(href, "The file/dir does not exist.")
}

/// Resolve a document-relative href, with bounded backward traversal.
fn classify_relative(href: &str, ctx: &ResolveContext) -> PathClassification {
    let mut chunks: Vec<String> = Vec::new();

    if href.starts_with("..") {
        let parts: Vec<&str> = href.split('/').collect();
        let back_depth = parts.iter().take_while(|part| **part == "..").count();

        if back_depth > ctx.max_depth {
            return invalid(
                href,
                &format!(
                    "The back depth of a path is {back_depth} while the max is {}.",
                    ctx.max_depth
                ),
            );
        }

        let remainder = &parts[back_depth..];
        // A `..` past the leading run would splice a literal dot-dot
        // segment into the rewritten path.
        if remainder.contains(&"..") {
            return invalid(href, "The file/dir does not exist.");
        }

        let sub: Vec<&str> = ctx.sub_path.split('/').collect();
        let keep = sub.len().saturating_sub(back_depth);
        chunks.extend(sub[..keep].iter().map(|s| (*s).to_owned()));
        chunks.extend(remainder.iter().map(|s| (*s).to_owned()));
    } else {
        if ctx.sub_path != "." {
            chunks.push(ctx.sub_path.clone());
        }
        if !href.is_empty() {
            chunks.push(href.to_owned());
        }
    }

    let borrowed: Vec<&str> = chunks.iter().map(String::as_str).collect();
    let location = join_location(&ctx.source_dir, &borrowed);
    if target_exists(&location) {
        PathClassification::Internal {
            path: join_path(&ctx.base_path, &borrowed),
            location,
        }
    } else {
        invalid(href, "The file/dir does not exist.")
    }
}

fn invalid(href: &str, reason: &str) -> PathClassification {
    PathClassification::Invalid {
        path: href.to_owned(),
        reason: reason.to_owned(),
    }
}

/// Join path chunks below the source directory.
fn join_location(dir: &Path, chunks: &[&str]) -> PathBuf {
    let mut location = dir.to_string_lossy().into_owned();
    for chunk in chunks {
        location.push('/');
        location.push_str(chunk);
    }
    PathBuf::from(location)
}

/// Join path chunks below the viewer base path.
fn join_path(base: &str, chunks: &[&str]) -> String {
    let mut path = base.to_owned();
    for chunk in chunks {
        path.push('/');
        path.push_str(chunk);
    }
    path
}

/// Existence check, ignoring any `#fragment` or `?query` suffix.
fn target_exists(location: &Path) -> bool {
    let raw = location.to_string_lossy();
    let trimmed = raw.split(['#', '?']).next().unwrap_or_default();
    Path::new(trimmed).exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Fixture tree:
    ///
    /// ```text
    /// <repo>/
    /// ├── LICENSE
    /// └── docs/
    ///     ├── README.md
    ///     ├── pic.png
    ///     └── guide/
    ///         ├── README.md
    ///         ├── diagram.png
    ///         └── intro/
    ///             └── README.md
    /// ```
    fn fixture() -> tempfile::TempDir {
        let repo = tempfile::tempdir().unwrap();
        fs::create_dir_all(repo.path().join("docs/guide/intro")).unwrap();
        fs::write(repo.path().join("LICENSE"), "mit").unwrap();
        fs::write(repo.path().join("docs/README.md"), "# Root").unwrap();
        fs::write(repo.path().join("docs/pic.png"), "png").unwrap();
        fs::write(repo.path().join("docs/guide/README.md"), "# Guide").unwrap();
        fs::write(repo.path().join("docs/guide/diagram.png"), "png").unwrap();
        fs::write(repo.path().join("docs/guide/intro/README.md"), "# Intro").unwrap();
        repo
    }

    fn context(repo: &tempfile::TempDir, sub_path: &str) -> ResolveContext {
        ResolveContext {
            base_path: "/docs".to_owned(),
            sub_path: sub_path.to_owned(),
            source_dir: repo.path().join("docs"),
            repo_root: Some(repo.path().to_path_buf()),
            repo_url: Some("//github.com/acme/widgets/blob/main".to_owned()),
            max_depth: sub_path.split('/').count(),
        }
    }

    #[test]
    fn test_readme_segment_is_invalid() {
        let repo = fixture();
        let ctx = context(&repo, "guide");
        let result = classify("./intro/README.md", &ctx);
        assert_eq!(
            result,
            PathClassification::Invalid {
                path: "./intro/README.md".to_owned(),
                reason: r#"Remove the "/README.md" from path."#.to_owned(),
            }
        );
    }

    #[test]
    fn test_readme_segment_case_insensitive() {
        let repo = fixture();
        let ctx = context(&repo, "guide");
        assert!(matches!(
            classify("./intro/readme.MD", &ctx),
            PathClassification::Invalid { .. }
        ));
    }

    #[test]
    fn test_forward_relative_existing() {
        let repo = fixture();
        let ctx = context(&repo, "guide");
        let result = classify("intro", &ctx);
        assert_eq!(
            result,
            PathClassification::Internal {
                path: "/docs/guide/intro".to_owned(),
                location: repo.path().join("docs/guide/intro"),
            }
        );
    }

    #[test]
    fn test_forward_relative_from_root_omits_dot() {
        let repo = fixture();
        let ctx = context(&repo, ".");
        let result = classify("guide", &ctx);
        assert_eq!(
            result,
            PathClassification::Internal {
                path: "/docs/guide".to_owned(),
                location: repo.path().join("docs/guide"),
            }
        );
    }

    #[test]
    fn test_forward_relative_missing() {
        let repo = fixture();
        let ctx = context(&repo, "guide");
        let result = classify("nonsense", &ctx);
        assert_eq!(
            result,
            PathClassification::Invalid {
                path: "nonsense".to_owned(),
                reason: "The file/dir does not exist.".to_owned(),
            }
        );
    }

    #[test]
    fn test_backward_relative_within_depth() {
        let repo = fixture();
        let ctx = context(&repo, "guide/intro");
        let result = classify("../diagram.png", &ctx);
        assert_eq!(
            result,
            PathClassification::Internal {
                path: "/docs/guide/diagram.png".to_owned(),
                location: repo.path().join("docs/guide/diagram.png"),
            }
        );
    }

    #[test]
    fn test_backward_relative_at_exact_max_depth() {
        let repo = fixture();
        let ctx = context(&repo, "guide/intro");
        // Two levels up from depth two is accepted.
        let result = classify("../../pic.png", &ctx);
        assert_eq!(
            result,
            PathClassification::Internal {
                path: "/docs/pic.png".to_owned(),
                location: repo.path().join("docs/pic.png"),
            }
        );
    }

    #[test]
    fn test_backward_relative_exceeding_max_depth() {
        let repo = fixture();
        let ctx = context(&repo, "guide");
        let result = classify("../../outside", &ctx);
        assert_eq!(
            result,
            PathClassification::Invalid {
                path: "../../outside".to_owned(),
                reason: "The back depth of a path is 2 while the max is 1.".to_owned(),
            }
        );
    }

    #[test]
    fn test_backward_relative_with_interior_dotdot() {
        let repo = fixture();
        let ctx = context(&repo, "guide/intro");
        assert!(matches!(
            classify("../intro/../diagram.png", &ctx),
            PathClassification::Invalid { .. }
        ));
    }

    #[test]
    fn test_internal_path_never_contains_dotdot() {
        let repo = fixture();
        let ctx = context(&repo, "guide/intro");
        for href in ["../diagram.png", "../../pic.png", "../../guide"] {
            if let PathClassification::Internal { path, .. } = classify(href, &ctx) {
                assert!(!path.split('/').any(|s| s == ".."), "{path}");
                assert!(path.starts_with("/docs"), "{path}");
            }
        }
    }

    #[test]
    fn test_root_relative_inside_docs() {
        let repo = fixture();
        let ctx = context(&repo, "guide");
        let result = classify("/docs/guide/intro", &ctx);
        assert_eq!(
            result,
            PathClassification::Internal {
                path: "/docs/guide/intro".to_owned(),
                location: repo.path().join("docs/guide/intro"),
            }
        );
    }

    #[test]
    fn test_root_relative_repo_file_becomes_browse_url() {
        let repo = fixture();
        let ctx = context(&repo, "guide");
        let result = classify("/LICENSE", &ctx);
        assert_eq!(
            result,
            PathClassification::External {
                path: "//github.com/acme/widgets/blob/main/LICENSE".to_owned(),
                own: true,
            }
        );
    }

    #[test]
    fn test_root_relative_missing_everywhere() {
        let repo = fixture();
        let ctx = context(&repo, "guide");
        let result = classify("/no/such/file", &ctx);
        assert_eq!(
            result,
            PathClassification::Invalid {
                path: "/no/such/file".to_owned(),
                reason: "The file/dir does not exist.".to_owned(),
            }
        );
    }

    #[test]
    fn test_root_relative_without_repo_context() {
        let repo = fixture();
        let mut ctx = context(&repo, "guide");
        ctx.repo_root = None;
        ctx.repo_url = None;
        assert!(matches!(
            classify("/LICENSE", &ctx),
            PathClassification::Invalid { .. }
        ));
    }

    #[test]
    fn test_fragment_ignored_for_existence() {
        let repo = fixture();
        let ctx = context(&repo, "guide");
        let result = classify("intro#setup", &ctx);
        assert_eq!(
            result,
            PathClassification::Internal {
                path: "/docs/guide/intro#setup".to_owned(),
                location: repo.path().join("docs/guide/intro#setup"),
            }
        );
    }

    #[test]
    fn test_absolute_urls_are_external() {
        let repo = fixture();
        let ctx = context(&repo, "guide");
        for href in [
            "https://example.com/page",
            "http://example.com",
            "//cdn.example.com/lib.js",
            "mailto:docs@example.com",
        ] {
            assert_eq!(
                classify(href, &ctx),
                PathClassification::External {
                    path: href.to_owned(),
                    own: false,
                },
                "{href}"
            );
        }
    }

    #[test]
    fn test_classification_is_total() {
        let repo = fixture();
        let ctx = context(&repo, "guide");
        // Odd inputs still map to exactly one variant instead of
        // panicking.
        for href in ["", "..", "...", "a b c", "?query", "data:image/png;base64,AAAA"] {
            let _ = classify(href, &ctx);
        }
    }
}
