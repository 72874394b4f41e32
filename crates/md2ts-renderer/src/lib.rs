//! Markdown rendering for md2ts page modules.
//!
//! Converts a markdown body into the HTML fragment embedded in a generated
//! page module, in a single pass over [`pulldown_cmark`] events. Alongside
//! the HTML the renderer reports the page title (first `h1`) and a flat,
//! ordered list of annotated headings from which the navigation tree is
//! built.
//!
//! # Post-processing
//!
//! Beyond plain HTML emission the renderer applies the transformations the
//! documentation viewer relies on:
//!
//! - fenced code blocks are syntax highlighted via [`CodeHighlighter`],
//!   with auto-detection and graceful fallback; `mermaid` sources pass
//!   through for client-side rendering;
//! - `$...$` / `$$...$$` math renders to MathML, never failing the build;
//! - GitHub-style `[!TYPE]` blockquote alerts get a heading and an
//!   `alert-{type}` class;
//! - everything between `<!-- private -->` and `<!-- /private -->` is
//!   removed;
//! - navigation headings (`h2`/`h3`) receive collision-safe ids.
//!
//! # Hooks
//!
//! Link hrefs and image sources are routed through a caller-supplied
//! [`RenderHooks`] implementation so the compiler can classify and rewrite
//! them against the documentation tree without the renderer knowing about
//! filesystems.

mod highlight;
mod hooks;
mod math;
mod renderer;
mod state;

pub use highlight::CodeHighlighter;
pub use hooks::{ImageRewrite, LinkRewrite, PassthroughHooks, RenderHooks};
pub use renderer::{MarkdownRenderer, RenderResult};
pub use state::{HeadingRef, escape_html, slugify};
