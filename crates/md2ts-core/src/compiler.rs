//! Two-pass compilation pipeline.
//!
//! Pass 1 renders every discovered document (front matter, HTML,
//! link/image rewriting, navigation, route registration), accumulating
//! per-file errors along the way. Pass 2 runs once the route index is
//! complete: it computes each page's breadcrumb chain, copies referenced
//! images, and writes the generated modules. Deferring breadcrumbs to the
//! second pass means a page never misses an ancestor that happens to be
//! discovered after it.
//!
//! Classification and title errors never abort the run; they are
//! collected per source file and reported together. I/O errors are fatal
//! and propagate immediately.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use md2ts_renderer::{CodeHighlighter, ImageRewrite, LinkRewrite, MarkdownRenderer, RenderHooks};
use serde_json::{Map, Value};

use crate::frontmatter;
use crate::module::{self, PageModule};
use crate::navigation::{self, Anchor};
use crate::repo::RepoInfo;
use crate::resolver::{PathClassification, ResolveContext, classify};
use crate::structure::{DuplicateRoute, RouteIndex, RouteLink, RoutePolicy};

/// Non-fatal error recorded against one source document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// No front-matter title and no `h1` heading.
    #[error(r#"The file must either provide a title via metadata or contain an "h1" element."#)]
    MissingTitle,

    /// An anchor href failed classification.
    #[error(r#"The "{path}" path is invalid. {reason}"#)]
    InvalidLink { path: String, reason: String },

    /// An image source failed classification.
    #[error(r#"The "{path}" path is invalid. {reason}"#)]
    InvalidImage { path: String, reason: String },

    /// The leading front-matter block could not be parsed.
    #[error("The front matter block is malformed: {0}.")]
    FrontMatter(String),

    /// Two documents registered conflicting markers for one route
    /// (strict policy only).
    #[error("{0}")]
    DuplicateRoute(#[from] DuplicateRoute),
}

/// Fatal error aborting the whole run.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Pattern(#[from] glob::PatternError),

    #[error("{0}")]
    Glob(#[from] glob::GlobError),

    #[error("{0}")]
    Serialize(#[from] serde_json::Error),
}

/// All errors accumulated for one source file.
#[derive(Debug)]
pub struct FileErrors {
    /// Source file the errors belong to.
    pub source: PathBuf,
    /// One message per error, in occurrence order.
    pub messages: Vec<String>,
}

/// Outcome of a compilation run.
#[derive(Debug)]
pub struct CompileReport {
    /// Number of documents processed (with or without errors).
    pub processed: usize,
    /// Per-file error groups, in discovery order.
    pub errors: Vec<FileErrors>,
}

impl CompileReport {
    /// Whether the run finished without document errors.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Compiler options.
#[derive(Clone, Debug, Default)]
pub struct CompileOptions {
    /// Conflict policy for route markers.
    pub route_policy: RoutePolicy,
}

/// A document rendered in pass 1, waiting for breadcrumbs and output.
struct PendingPage {
    dest: PathBuf,
    html: String,
    images: Vec<(String, String)>,
    copies: Vec<(PathBuf, PathBuf)>,
    fields: Map<String, Value>,
    navigation: Vec<Anchor>,
    route_location: Vec<String>,
}

/// Markdown-to-module compiler.
///
/// Holds the state shared across documents: the syntax highlighter
/// (expensive to load), the enclosing repository context, and options.
pub struct Compiler {
    highlighter: Arc<CodeHighlighter>,
    repo: RepoInfo,
    options: CompileOptions,
}

impl Compiler {
    /// Create a compiler, detecting the enclosing repository.
    #[must_use]
    pub fn new(options: CompileOptions) -> Self {
        Self {
            highlighter: Arc::new(CodeHighlighter::new()),
            repo: RepoInfo::detect(),
            options,
        }
    }

    /// Override the detected repository context.
    #[must_use]
    pub fn with_repo(mut self, repo: RepoInfo) -> Self {
        self.repo = repo;
        self
    }

    /// Compile every `**/README.md` under `src` into a mirrored module
    /// tree under `dest`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] on unreadable sources, unwritable
    /// destinations, or discovery failures. Per-document errors do not
    /// abort the run; they are collected in the returned report.
    pub fn compile(&self, src: &Path, dest: &Path) -> Result<CompileReport, CompileError> {
        let base_path = format!(
            "/{}",
            dest.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
        );

        let pattern = format!("{}/**/README.md", src.display());
        let mut sources = Vec::new();
        for entry in glob::glob(&pattern)? {
            sources.push(entry?);
        }

        let mut index = RouteIndex::new(self.options.route_policy);
        let mut pending = Vec::with_capacity(sources.len());
        let mut errors = Vec::new();

        // Pass 1: render everything and fill the route index.
        for source in sources {
            let page = self.render_document(src, dest, &base_path, &source, &mut index, &mut errors)?;
            pending.push(page);
        }

        // Pass 2: breadcrumbs from the completed index, then output.
        let processed = pending.len();
        for page in pending {
            let breadcrumbs = index.breadcrumbs(&page.route_location);
            let metadata = module::build_metadata(page.fields, &breadcrumbs, &page.navigation)?;

            for (from, to) in &page.copies {
                ensure_parent(to)?;
                fs::copy(from, to)?;
            }

            let rendered = module::render_module(&PageModule {
                html: page.html,
                images: page.images,
                metadata,
            })?;
            ensure_parent(&page.dest)?;
            fs::write(&page.dest, rendered)?;
        }

        Ok(CompileReport { processed, errors })
    }

    /// Render one source document (pass 1).
    fn render_document(
        &self,
        src: &Path,
        dest: &Path,
        base_path: &str,
        source: &Path,
        index: &mut RouteIndex,
        errors: &mut Vec<FileErrors>,
    ) -> Result<PendingPage, CompileError> {
        let mut messages = Vec::new();
        let raw = fs::read_to_string(source)?;

        let slug = source
            .strip_prefix(src)
            .unwrap_or(source)
            .to_string_lossy()
            .into_owned();
        let sub_path = Path::new(&slug)
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| ".".to_owned());

        let (block, body) = frontmatter::split(&raw);
        let mut fields = Map::new();
        if let Some(block) = block {
            match frontmatter::parse_fields(block) {
                Ok(parsed) => fields = parsed,
                Err(e) => messages.push(DocumentError::FrontMatter(e.to_string()).to_string()),
            }
        }

        let route_path = match sub_path.as_str() {
            "." => base_path.to_owned(),
            sub => format!("{base_path}/{sub}"),
        };
        let route_location: Vec<String> = route_path
            .trim_start_matches('/')
            .split('/')
            .map(str::to_owned)
            .collect();

        let ctx = ResolveContext {
            base_path: base_path.to_owned(),
            sub_path: sub_path.clone(),
            source_dir: src.to_path_buf(),
            repo_root: self.repo.root.clone(),
            repo_url: self.repo.browse_url.clone(),
            max_depth: sub_path.split('/').count(),
        };
        let mut hooks = DocumentHooks {
            ctx: &ctx,
            src_root: src,
            dest_root: dest,
            images: Vec::new(),
            copies: Vec::new(),
            errors: Vec::new(),
        };

        let mut renderer =
            MarkdownRenderer::new().with_highlighter(Arc::clone(&self.highlighter));
        let result = renderer.render_markdown(body, &mut hooks);
        messages.extend(hooks.errors.iter().map(ToString::to_string));

        let title = frontmatter::title(&fields)
            .map(str::to_owned)
            .or(result.title);
        let title = match title {
            Some(title) => title,
            None => {
                messages.push(DocumentError::MissingTitle.to_string());
                String::new()
            }
        };

        let navigation = navigation::build_navigation(&result.headings, 2);

        if let Err(e) = index.insert(
            &route_location,
            RouteLink {
                path: route_path,
                title,
            },
        ) {
            messages.push(DocumentError::from(e).to_string());
        }

        if !messages.is_empty() {
            errors.push(FileErrors {
                source: source.to_path_buf(),
                messages,
            });
        }

        let dest_slug = slug.strip_suffix(".md").map_or_else(
            || format!("{slug}.ts"),
            |stem| format!("{stem}.ts"),
        );

        Ok(PendingPage {
            dest: dest.join(dest_slug),
            html: result.html,
            images: hooks.images,
            copies: hooks.copies,
            fields,
            navigation,
            route_location,
        })
    }
}

/// Hooks wiring the renderer's links and images to classification.
struct DocumentHooks<'a> {
    ctx: &'a ResolveContext,
    src_root: &'a Path,
    dest_root: &'a Path,
    /// Image map as `(source attribute, generated id)` pairs.
    images: Vec<(String, String)>,
    /// Image copy jobs `(from, to)`, deferred to pass 2.
    copies: Vec<(PathBuf, PathBuf)>,
    errors: Vec<DocumentError>,
}

impl RenderHooks for DocumentHooks<'_> {
    fn link(&mut self, href: &str) -> LinkRewrite {
        // Fragment and pseudo-URL anchors are left entirely untouched.
        if href.starts_with('#') || href.starts_with("about:") {
            return LinkRewrite::passthrough(href);
        }

        match classify(href, self.ctx) {
            PathClassification::Internal { path, .. } => LinkRewrite {
                href: path,
                class: Some("inlink".to_owned()),
                external: false,
            },
            PathClassification::External { path, .. } => LinkRewrite {
                href: path,
                class: Some("extlink".to_owned()),
                external: true,
            },
            PathClassification::Invalid { path, reason } => {
                self.errors.push(DocumentError::InvalidLink {
                    path: path.clone(),
                    reason,
                });
                LinkRewrite {
                    href: path,
                    class: Some("extlink".to_owned()),
                    external: true,
                }
            }
        }
    }

    fn image(&mut self, src: &str) -> ImageRewrite {
        match classify(src, self.ctx) {
            PathClassification::Internal { location, .. } => {
                let existing = self
                    .images
                    .iter()
                    .find_map(|(s, id)| (s == src).then(|| id.clone()));
                let id = match existing {
                    Some(id) => id,
                    None => {
                        let id = format!("img_{}", self.images.len());
                        self.images.push((src.to_owned(), id.clone()));
                        // Mirror the image's source-relative location in
                        // the destination tree.
                        let relative = location
                            .strip_prefix(self.src_root)
                            .unwrap_or(&location)
                            .to_path_buf();
                        self.copies
                            .push((location, self.dest_root.join(relative)));
                        id
                    }
                };
                ImageRewrite {
                    id: Some(id),
                    lazy: true,
                }
            }
            PathClassification::External { .. } => ImageRewrite::default(),
            PathClassification::Invalid { path, reason } => {
                self.errors
                    .push(DocumentError::InvalidImage { path, reason });
                ImageRewrite::default()
            }
        }
    }
}

/// Create the parent directory of a destination path.
fn ensure_parent(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
