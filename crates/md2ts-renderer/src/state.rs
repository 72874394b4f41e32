//! Shared state structs for markdown rendering.
//!
//! These structs track context during event processing: code block and
//! image buffering, table alignment, and heading capture with navigation
//! id assignment.

use pulldown_cmark::Alignment;

/// State for tracking code block rendering.
#[derive(Default)]
pub struct CodeBlockState {
    /// Whether we're inside a code block.
    active: bool,
    /// Language of current code block (e.g., "rust", "mermaid").
    language: Option<String>,
    /// Buffer for code block content.
    buffer: String,
}

impl CodeBlockState {
    /// Start a new code block with optional language.
    pub fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    /// End the current code block and return (language, content).
    pub fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.buffer))
    }

    /// Check if we're inside a code block.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Append text to the code block buffer.
    pub fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Append a newline to the code block buffer.
    pub fn push_newline(&mut self) {
        self.buffer.push('\n');
    }
}

/// State for tracking table rendering.
#[derive(Default)]
pub struct TableState {
    /// Whether we're inside the table header row.
    in_head: bool,
    /// Column alignments for current table.
    alignments: Vec<Alignment>,
    /// Current column index in table row.
    cell_index: usize,
}

impl TableState {
    /// Start a new table with column alignments.
    pub fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    /// Start the table header row.
    pub fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    /// End the table header row.
    pub fn end_head(&mut self) {
        self.in_head = false;
    }

    /// Start a new table row.
    pub fn start_row(&mut self) {
        self.cell_index = 0;
    }

    /// Move to the next cell.
    pub fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    /// Check if we're in the table header.
    pub fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Get the alignment style for the current cell.
    pub fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// State for tracking image alt text capture.
#[derive(Default)]
pub struct ImageState {
    /// Whether we're inside an image tag.
    active: bool,
    /// Buffer for alt text.
    alt_text: String,
}

impl ImageState {
    /// Start capturing image alt text.
    pub fn start(&mut self) {
        self.active = true;
        self.alt_text.clear();
    }

    /// End image capture and return the alt text.
    pub fn end(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.alt_text)
    }

    /// Check if we're inside an image.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Append text to the alt text buffer.
    pub fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

/// An annotated heading reported by the renderer.
///
/// Headings are listed in document order; only navigation levels
/// (`h2`/`h3` with the default stop level) carry generated ids and appear
/// here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeadingRef {
    /// Heading level (2 or 3 with the default stop level).
    pub level: u8,
    /// Generated anchor id, as emitted in the HTML.
    pub id: String,
    /// Heading plain text.
    pub title: String,
}

/// State for tracking headings, title extraction, and anchor ids.
///
/// Navigation headings (levels in `[nav_root, nav_stop)`) receive an id
/// derived from their text (or explicit `{#id}` attribute), prefixed with
/// the id of the enclosing navigation heading: an `h3` under
/// `<h2 id="intro">` becomes `intro--setup`. The prefix keeps ids unique
/// when the same heading text recurs at a deeper nesting level. Other
/// headings are rendered without an id.
pub struct HeadingState {
    /// Navigation root level (headings below this get no id).
    nav_root: u8,
    /// Stop level: headings at or above this level get no id.
    nav_stop: u8,
    /// Title captured from the first H1.
    title: Option<String>,
    /// Current heading being captured (level, explicit id).
    current: Option<(u8, Option<String>)>,
    /// Buffer for heading plain text.
    text: String,
    /// Buffer for heading HTML (with inline formatting).
    html: String,
    /// Annotated headings in document order.
    headings: Vec<HeadingRef>,
    /// Stack of enclosing navigation heading (level, id) pairs.
    parents: Vec<(u8, String)>,
}

impl HeadingState {
    /// Create a new heading state assigning ids to levels in
    /// `[nav_root, nav_stop)`.
    pub fn new(nav_root: u8, nav_stop: u8) -> Self {
        Self {
            nav_root,
            nav_stop,
            title: None,
            current: None,
            text: String::new(),
            html: String::new(),
            headings: Vec::new(),
            parents: Vec::new(),
        }
    }

    /// Check if we're currently inside a heading.
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Start tracking a heading.
    pub fn start_heading(&mut self, level: u8, explicit_id: Option<String>) {
        self.current = Some((level, explicit_id));
        self.text.clear();
        self.html.clear();
    }

    /// Complete the current heading.
    ///
    /// Returns `(level, id, html)` where `id` is `None` for headings
    /// outside the navigation range. The first H1's text is captured as
    /// the page title (the heading is still rendered).
    pub fn complete_heading(&mut self) -> Option<(u8, Option<String>, String)> {
        let (level, explicit_id) = self.current.take()?;
        let text = std::mem::take(&mut self.text);
        let html = std::mem::take(&mut self.html);

        if level == 1 && self.title.is_none() {
            self.title = Some(text.trim().to_owned());
        }

        let id = (self.nav_root..self.nav_stop).contains(&level).then(|| {
            let slug = explicit_id.unwrap_or_else(|| slugify(&text));

            while self.parents.last().is_some_and(|(l, _)| *l >= level) {
                self.parents.pop();
            }

            let id = match self.parents.last() {
                Some((_, parent)) if level > self.nav_root => format!("{parent}--{slug}"),
                _ => slug,
            };

            self.parents.push((level, id.clone()));
            self.headings.push(HeadingRef {
                level,
                id: id.clone(),
                title: text.trim().to_owned(),
            });
            id
        });

        Some((level, id, html))
    }

    /// Append text to the heading plain-text buffer.
    pub fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Append HTML to the heading html buffer.
    pub fn push_html(&mut self, html: &str) {
        self.html.push_str(html);
    }

    /// Get the heading HTML buffer reference.
    pub fn html_buffer(&mut self) -> &mut String {
        &mut self.html
    }

    /// Take the extracted title.
    pub fn take_title(&mut self) -> Option<String> {
        self.title.take()
    }

    /// Take the annotated heading list.
    pub fn take_headings(&mut self) -> Vec<HeadingRef> {
        std::mem::take(&mut self.headings)
    }
}

/// Convert heading text to an anchor slug.
///
/// Lower-cases the text, collapses whitespace runs into single dashes,
/// and strips characters that are neither word characters nor dashes.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.trim().chars() {
        if c.is_whitespace() {
            pending_dash = true;
        } else if c.is_alphanumeric() || c == '_' || c == '-' {
            if pending_dash {
                slug.push('-');
                pending_dash = false;
            }
            slug.extend(c.to_lowercase());
        }
    }

    slug
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
