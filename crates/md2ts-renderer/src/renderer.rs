//! Single-pass markdown renderer.

use std::fmt::Write;
use std::sync::{Arc, LazyLock};

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::Regex;

use crate::highlight::CodeHighlighter;
use crate::hooks::RenderHooks;
use crate::math;
use crate::state::{CodeBlockState, HeadingRef, HeadingState, ImageState, TableState, escape_html};

/// Opening marker of a stripped section.
const PRIVATE_OPEN: &str = "<!-- private -->";
/// Closing marker of a stripped section.
const PRIVATE_CLOSE: &str = "<!-- /private -->";

/// GitHub-style alert marker at the start of a blockquote paragraph.
static ALERT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[!([A-Za-z][\w-]*)\]\n?").expect("valid alert regex"));

/// Result of rendering markdown.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered HTML content.
    pub html: String,
    /// Title taken from the first H1 heading, if any.
    pub title: Option<String>,
    /// Annotated navigation headings in document order.
    pub headings: Vec<HeadingRef>,
}

/// Alert detection progress for one open blockquote.
#[derive(Clone, Copy, PartialEq, Eq)]
enum AlertScan {
    /// Waiting for the blockquote's first child to be a paragraph.
    AwaitParagraph,
    /// Accumulating the first paragraph's leading text.
    AwaitText,
    /// Scan settled; the blockquote is either transformed or ordinary.
    Done,
}

/// Per-blockquote state for the alert transform.
///
/// The marker text can be split across several text events (brackets are
/// potential link delimiters), so the leading text is accumulated and the
/// decision deferred until the first non-text event or the paragraph end.
/// `class_pos`/`text_pos` remember where the already-written output can
/// be patched.
struct BlockquoteFrame {
    class_pos: usize,
    text_pos: usize,
    text: String,
    scan: AlertScan,
}

/// Single-pass markdown renderer.
///
/// Processes [`pulldown_cmark`] events into an HTML fragment, assigning
/// navigation heading ids, applying alert and private-section transforms,
/// and routing links/images through the caller's [`RenderHooks`].
///
/// A renderer instance is built per document; the (expensive to load)
/// [`CodeHighlighter`] is shared between instances via `Arc`.
pub struct MarkdownRenderer {
    output: String,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    heading: HeadingState,
    pending_image: Option<(String, String)>,
    blockquotes: Vec<BlockquoteFrame>,
    in_private: bool,
    highlighter: Option<Arc<CodeHighlighter>>,
}

impl MarkdownRenderer {
    /// Create a renderer with navigation ids on `h2`/`h3` and no
    /// highlighter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            heading: HeadingState::new(2, 4),
            pending_image: None,
            blockquotes: Vec::new(),
            in_private: false,
            highlighter: None,
        }
    }

    /// Set the syntax highlighter used for fenced code blocks.
    ///
    /// Without one, code blocks are emitted as escaped plain text.
    #[must_use]
    pub fn with_highlighter(mut self, highlighter: Arc<CodeHighlighter>) -> Self {
        self.highlighter = Some(highlighter);
        self
    }

    /// Set the heading levels that receive navigation ids.
    ///
    /// Ids are assigned to levels in `[root, stop)`; `stop` is the
    /// recursion floor of the navigation tree.
    #[must_use]
    pub fn with_navigation_levels(mut self, root: u8, stop: u8) -> Self {
        self.heading = HeadingState::new(root, stop);
        self
    }

    /// Parser options for the markdown grammar.
    ///
    /// Tables, strikethrough, task lists, typographic substitutions,
    /// `$`-delimited math, and `{#id}` heading attributes. Raw HTML passes
    /// through untouched.
    #[must_use]
    pub fn parser_options() -> Options {
        Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_MATH
            | Options::ENABLE_HEADING_ATTRIBUTES
    }

    /// Render markdown text.
    pub fn render_markdown(&mut self, markdown: &str, hooks: &mut dyn RenderHooks) -> RenderResult {
        let parser = Parser::new_ext(markdown, Self::parser_options());
        self.render(parser, hooks)
    }

    /// Render a stream of markdown events.
    pub fn render<'a, I>(&mut self, events: I, hooks: &mut dyn RenderHooks) -> RenderResult
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.process_event(event, hooks);
        }

        RenderResult {
            html: std::mem::take(&mut self.output),
            title: self.heading.take_title(),
            headings: self.heading.take_headings(),
        }
    }

    /// Push content to output or heading buffer based on context.
    fn push_inline(&mut self, content: &str) {
        if self.heading.is_active() {
            self.heading.push_html(content);
        } else {
            self.output.push_str(content);
        }
    }

    /// Settle the innermost alert scan, applying the transform when the
    /// accumulated leading text carries a `[!TYPE]` marker.
    fn finalize_alert_scan(&mut self) {
        let Some(frame) = self.blockquotes.last_mut() else {
            return;
        };
        if frame.scan != AlertScan::AwaitText {
            frame.scan = AlertScan::Done;
            return;
        }
        frame.scan = AlertScan::Done;

        let Some(captures) = ALERT_MARKER.captures(&frame.text) else {
            return;
        };
        let kind = captures[1].to_lowercase();
        let rest = frame.text[captures.get(0).map_or(0, |m| m.end())..].to_owned();
        let class_pos = frame.class_pos;
        let text_pos = frame.text_pos;

        // Re-emit the paragraph lead: drop the marker, splice the class
        // into the open blockquote tag, and inject the alert heading.
        self.output.truncate(text_pos);
        self.output
            .insert_str(class_pos, &format!(r#" class="alert-{kind}""#));

        let mut title = kind;
        if let Some(first) = title.get_mut(..1) {
            first.make_ascii_uppercase();
        }
        write!(
            self.output,
            r#"<span class="alert-heading"><i class="alert-icon"></i>{title}</span>"#
        )
        .unwrap();
        self.output.push_str(&escape_html(&rest));
    }

    /// Drop events inside a `<!-- private -->` section, both markers
    /// included. Returns `true` when the event was consumed.
    fn skip_private(&mut self, event: &Event<'_>) -> bool {
        let comment = match event {
            Event::Html(html) | Event::InlineHtml(html) => html.trim(),
            _ => "",
        };

        if self.in_private {
            if comment == PRIVATE_CLOSE {
                self.in_private = false;
            }
            true
        } else if comment == PRIVATE_OPEN {
            self.in_private = true;
            true
        } else {
            false
        }
    }

    fn process_event(&mut self, event: Event<'_>, hooks: &mut dyn RenderHooks) {
        if self.skip_private(&event) {
            return;
        }

        match event {
            Event::Start(tag) => self.start_tag(tag, hooks),
            Event::End(tag) => self.end_tag(tag, hooks),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => {
                self.finalize_alert_scan();
                self.output.push_str(&html);
            }
            Event::InlineMath(tex) => {
                self.finalize_alert_scan();
                let rendered = math::render_inline(&tex);
                self.push_inline(&rendered);
            }
            Event::DisplayMath(tex) => {
                self.finalize_alert_scan();
                let rendered = math::render_display(&tex);
                self.output.push_str(&rendered);
            }
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => {
                self.finalize_alert_scan();
                self.push_inline("<br>");
            }
            Event::Rule => self.output.push_str("<hr>"),
            Event::TaskListMarker(checked) => self.task_list_marker(checked),
            Event::FootnoteReference(_) => {
                // Footnotes require multi-pass rendering; not supported.
            }
        }
    }

    /// Advance the innermost alert scan for a start tag.
    fn advance_alert_scan(&mut self, tag: &Tag<'_>) {
        let Some(scan) = self.blockquotes.last().map(|frame| frame.scan) else {
            return;
        };

        match scan {
            AlertScan::AwaitParagraph => {
                let next = if matches!(tag, Tag::Paragraph) {
                    AlertScan::AwaitText
                } else {
                    AlertScan::Done
                };
                if let Some(frame) = self.blockquotes.last_mut() {
                    frame.scan = next;
                }
            }
            // An inline element interrupts the leading text; decide now.
            AlertScan::AwaitText => self.finalize_alert_scan(),
            AlertScan::Done => {}
        }
    }

    #[allow(clippy::too_many_lines)]
    fn start_tag(&mut self, tag: Tag<'_>, hooks: &mut dyn RenderHooks) {
        self.advance_alert_scan(&tag);

        match tag {
            Tag::Paragraph => {
                if !self.code.is_active() {
                    self.output.push_str("<p>");
                }
                if let Some(frame) = self.blockquotes.last_mut() {
                    if frame.scan == AlertScan::AwaitText {
                        frame.text_pos = self.output.len();
                    }
                }
            }
            Tag::Heading { level, id, .. } => {
                // Opening tag is written in end_tag once the id is known.
                self.heading
                    .start_heading(heading_level_to_num(level), id.map(|s| s.into_string()));
            }
            Tag::BlockQuote(_) => {
                self.blockquotes.push(BlockquoteFrame {
                    class_pos: self.output.len() + "<blockquote".len(),
                    text_pos: 0,
                    text: String::new(),
                    scan: AlertScan::AwaitParagraph,
                });
                self.output.push_str("<blockquote>");
            }
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .filter(|token| !token.is_empty())
                        .map(str::to_owned),
                    CodeBlockKind::Indented => None,
                };
                self.code.start(lang);
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => write!(self.output, r#"<ol start="{n}">"#).unwrap(),
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => {
                self.output.push_str("<li>");
            }
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => {
                self.output.push_str("<dl>");
            }
            Tag::DefinitionListTitle => {
                self.output.push_str("<dt>");
            }
            Tag::DefinitionListDefinition => {
                self.output.push_str("<dd>");
            }
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                let tag = if self.table.is_in_head() { "th" } else { "td" };
                write!(self.output, "<{tag}{align}>").unwrap();
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Link { dest_url, .. } => {
                let rewrite = hooks.link(&dest_url);
                let mut anchor = format!(r#"<a href="{}""#, escape_html(&rewrite.href));
                if let Some(class) = &rewrite.class {
                    write!(anchor, r#" class="{class}""#).unwrap();
                }
                if rewrite.external {
                    anchor.push_str(r#" rel="noopener noreferrer nofollow" target="_blank""#);
                }
                anchor.push('>');
                self.push_inline(&anchor);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Start collecting alt text; image is rendered in end_tag.
                self.image.start();
                self.pending_image = Some((dest_url.to_string(), title.to_string()));
            }
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
        }
    }

    #[allow(clippy::too_many_lines)]
    fn end_tag(&mut self, tag: TagEnd, hooks: &mut dyn RenderHooks) {
        match tag {
            TagEnd::Paragraph => {
                self.finalize_alert_scan();
                if !self.code.is_active() {
                    self.output.push_str("</p>");
                }
            }
            TagEnd::Heading(_) => {
                if let Some((level, id, html)) = self.heading.complete_heading() {
                    match id {
                        Some(id) => write!(
                            self.output,
                            r#"<h{level} id="{id}">{}</h{level}>"#,
                            html.trim()
                        )
                        .unwrap(),
                        None => {
                            write!(self.output, "<h{level}>{}</h{level}>", html.trim()).unwrap();
                        }
                    }
                }
            }
            TagEnd::BlockQuote(_) => {
                self.blockquotes.pop();
                self.output.push_str("</blockquote>");
            }
            TagEnd::CodeBlock => {
                let (lang, content) = self.code.end();
                let body = self
                    .highlighter
                    .as_ref()
                    .and_then(|h| h.highlight(lang.as_deref(), &content))
                    .unwrap_or_else(|| escape_html(&content));
                match lang.as_deref() {
                    Some(lang) => write!(
                        self.output,
                        r#"<pre><code class="language-{}">{body}</code></pre>"#,
                        escape_html(lang)
                    )
                    .unwrap(),
                    None => write!(self.output, "<pre><code>{body}</code></pre>").unwrap(),
                }
            }
            TagEnd::List(ordered) => {
                self.output
                    .push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => {
                self.output.push_str("</li>");
            }
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::Image => {
                // Render image with collected alt text.
                let alt = self.image.end();
                if let Some((src, title)) = self.pending_image.take() {
                    let rewrite = hooks.image(&src);
                    let mut img = format!(r#"<img src="{}""#, escape_html(&src));
                    if !title.is_empty() {
                        write!(img, r#" title="{}""#, escape_html(&title)).unwrap();
                    }
                    write!(img, r#" alt="{}""#, escape_html(&alt)).unwrap();
                    if let Some(id) = &rewrite.id {
                        write!(img, r#" id="{id}""#).unwrap();
                    }
                    if rewrite.lazy {
                        img.push_str(r#" loading="lazy""#);
                    }
                    img.push('>');
                    self.push_inline(&img);
                }
            }
            TagEnd::DefinitionList => {
                self.output.push_str("</dl>");
            }
            TagEnd::DefinitionListTitle => {
                self.output.push_str("</dt>");
            }
            TagEnd::DefinitionListDefinition => {
                self.output.push_str("</dd>");
            }
            TagEnd::Table => {
                self.output.push_str("</tbody></table>");
            }
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => {
                self.output.push_str("</tr>");
            }
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() {
                    "</th>"
                } else {
                    "</td>"
                });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.is_active() {
            self.code.push_str(text);
        } else if self.image.is_active() {
            self.image.push_str(text);
        } else if self.heading.is_active() {
            self.heading.push_text(text);
            let escaped = escape_html(text);
            self.heading.push_html(&escaped);
        } else {
            if let Some(frame) = self.blockquotes.last_mut() {
                if frame.scan == AlertScan::AwaitText {
                    frame.text.push_str(text);
                }
            }
            self.output.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        self.finalize_alert_scan();
        if self.heading.is_active() {
            self.heading.push_text(code);
            write!(
                self.heading.html_buffer(),
                "<code>{}</code>",
                escape_html(code)
            )
            .unwrap();
        } else {
            write!(self.output, "<code>{}</code>", escape_html(code)).unwrap();
        }
    }

    fn soft_break(&mut self) {
        if self.code.is_active() {
            self.code.push_newline();
        } else if self.image.is_active() {
            self.image.push_str(" ");
        } else {
            if let Some(frame) = self.blockquotes.last_mut() {
                if frame.scan == AlertScan::AwaitText {
                    frame.text.push('\n');
                }
            }
            self.push_inline("\n");
        }
    }

    fn task_list_marker(&mut self, checked: bool) {
        self.output.push_str(if checked {
            r#"<input type="checkbox" checked disabled> "#
        } else {
            r#"<input type="checkbox" disabled> "#
        });
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a [`HeadingLevel`] to its numeric level.
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::{ImageRewrite, LinkRewrite, PassthroughHooks};
    use pretty_assertions::assert_eq;

    fn render(markdown: &str) -> RenderResult {
        MarkdownRenderer::new().render_markdown(markdown, &mut PassthroughHooks)
    }

    #[test]
    fn test_basic_paragraph() {
        let result = render("Hello, world!");
        assert_eq!(result.html, "<p>Hello, world!</p>");
    }

    #[test]
    fn test_heading_with_id() {
        let result = render("## Section Title");
        assert_eq!(result.html, r#"<h2 id="section-title">Section Title</h2>"#);
        assert_eq!(result.headings.len(), 1);
        assert_eq!(result.headings[0].level, 2);
        assert_eq!(result.headings[0].title, "Section Title");
        assert_eq!(result.headings[0].id, "section-title");
    }

    #[test]
    fn test_title_from_first_h1() {
        let result = render("# My Title\n\nSome content\n\n## Section");
        assert_eq!(result.title, Some("My Title".to_owned()));
        // H1 is rendered without an id and excluded from navigation.
        assert!(result.html.contains("<h1>My Title</h1>"));
        assert_eq!(result.headings.len(), 1);
        assert_eq!(result.headings[0].level, 2);
    }

    #[test]
    fn test_nested_heading_id_parent_prefixed() {
        let result = render("## Guide\n\n### Setup\n\n#### Too Deep");
        assert!(result.html.contains(r#"<h2 id="guide">"#));
        assert!(result.html.contains(r#"<h3 id="guide--setup">"#));
        assert!(result.html.contains("<h4>Too Deep</h4>"));
        assert_eq!(result.headings.len(), 2);
    }

    #[test]
    fn test_duplicate_heading_text_at_deeper_level() {
        let result = render("## Setup\n\n## Guide\n\n### Setup");
        assert!(result.html.contains(r#"<h2 id="setup">"#));
        assert!(result.html.contains(r#"<h3 id="guide--setup">"#));
    }

    #[test]
    fn test_explicit_heading_id_kept() {
        let result = render("## Section {#custom-id}");
        assert!(result.html.contains(r#"<h2 id="custom-id">"#));
        assert_eq!(result.headings[0].id, "custom-id");
    }

    #[test]
    fn test_code_block_without_highlighter() {
        let result = render("```rust\nfn main() {}\n```");
        assert!(result.html.contains(r#"class="language-rust""#));
        assert!(result.html.contains("fn main() {}"));
    }

    #[test]
    fn test_code_block_highlighted() {
        let highlighter = Arc::new(CodeHighlighter::new());
        let mut renderer = MarkdownRenderer::new().with_highlighter(highlighter);
        let result = renderer.render_markdown("```rust\nfn main() {}\n```", &mut PassthroughHooks);
        assert!(result.html.contains(r#"class="language-rust""#));
        assert!(result.html.contains("<span"));
    }

    #[test]
    fn test_mermaid_block_passes_through() {
        let highlighter = Arc::new(CodeHighlighter::new());
        let mut renderer = MarkdownRenderer::new().with_highlighter(highlighter);
        let result =
            renderer.render_markdown("```mermaid\ngraph TD;\nA-->B;\n```", &mut PassthroughHooks);
        assert!(result.html.contains(r#"class="language-mermaid""#));
        assert!(result.html.contains("A--&gt;B;"));
        assert!(!result.html.contains("<span"));
    }

    #[test]
    fn test_alert_blockquote() {
        let result = render("> [!WARNING]\nBe careful");
        assert!(result.html.contains(r#"<blockquote class="alert-warning">"#));
        assert!(
            result
                .html
                .contains(r#"<span class="alert-heading"><i class="alert-icon"></i>Warning</span>"#)
        );
        assert!(result.html.contains("Be careful"));
        assert!(!result.html.contains("[!WARNING]"));
    }

    #[test]
    fn test_alert_type_is_case_insensitive() {
        let result = render("> [!note]\nRemember this");
        assert!(result.html.contains(r#"class="alert-note""#));
        assert!(result.html.contains(">Note</span>"));
    }

    #[test]
    fn test_alert_custom_type() {
        let result = render("> [!Danger]\nHigh voltage");
        assert!(result.html.contains(r#"class="alert-danger""#));
        assert!(result.html.contains(">Danger</span>"));
    }

    #[test]
    fn test_ordinary_blockquote_untouched() {
        let result = render("> Just a quote");
        assert_eq!(result.html, "<blockquote><p>Just a quote</p></blockquote>");
    }

    #[test]
    fn test_blockquote_with_mid_text_marker_untouched() {
        let result = render("> Not [!WARNING] a marker");
        assert!(!result.html.contains("alert"));
    }

    #[test]
    fn test_private_section_stripped() {
        let markdown = "Before\n\n<!-- private -->\n\nSecret paragraph\n\n<!-- /private -->\n\nAfter";
        let result = render(markdown);
        assert!(result.html.contains("Before"));
        assert!(result.html.contains("After"));
        assert!(!result.html.contains("Secret"));
        assert!(!result.html.contains("private"));
    }

    #[test]
    fn test_inline_math() {
        let result = render("Euler: $e^x$");
        assert!(result.html.contains("<math"));
    }

    #[test]
    fn test_display_math_with_label() {
        let result = render("$$E = mc^2 \\label{energy}$$");
        assert!(result.html.contains(r#"<span class="equation" id="energy">"#));
        assert!(result.html.contains("mathlabel"));
    }

    #[test]
    fn test_link_passthrough() {
        let result = render("[Docs](./guide)");
        assert!(result.html.contains(r#"<a href="./guide">Docs</a>"#));
    }

    #[test]
    fn test_image_with_alt() {
        let result = render("![Alt text](image.png)");
        assert!(result.html.contains(r#"<img src="image.png" alt="Alt text">"#));
    }

    #[test]
    fn test_table() {
        let result = render("| A | B |\n|---|---|\n| 1 | 2 |");
        assert!(result.html.contains("<table>"));
        assert!(result.html.contains("<thead>"));
        assert!(result.html.contains("<tbody>"));
    }

    #[test]
    fn test_task_list() {
        let result = render("- [ ] Open\n- [x] Done");
        assert!(result.html.contains(r#"<input type="checkbox" disabled>"#));
        assert!(result.html.contains(r#"<input type="checkbox" checked disabled>"#));
    }

    #[test]
    fn test_raw_html_passthrough() {
        let result = render("Text with <kbd>Ctrl</kbd> inline");
        assert!(result.html.contains("<kbd>Ctrl</kbd>"));
    }

    struct RecordingHooks {
        links: Vec<String>,
        images: Vec<String>,
    }

    impl RenderHooks for RecordingHooks {
        fn link(&mut self, href: &str) -> LinkRewrite {
            self.links.push(href.to_owned());
            LinkRewrite {
                href: format!("/docs/{href}"),
                class: Some("inlink".to_owned()),
                external: false,
            }
        }

        fn image(&mut self, src: &str) -> ImageRewrite {
            self.images.push(src.to_owned());
            ImageRewrite {
                id: Some("img_0".to_owned()),
                lazy: true,
            }
        }
    }

    #[test]
    fn test_hooks_rewrite_links_and_images() {
        let mut hooks = RecordingHooks {
            links: Vec::new(),
            images: Vec::new(),
        };
        let result =
            MarkdownRenderer::new().render_markdown("[a](guide)\n\n![p](pic.png)", &mut hooks);

        assert_eq!(hooks.links, vec!["guide"]);
        assert_eq!(hooks.images, vec!["pic.png"]);
        assert!(
            result
                .html
                .contains(r#"<a href="/docs/guide" class="inlink">"#)
        );
        assert!(
            result
                .html
                .contains(r#"<img src="pic.png" alt="p" id="img_0" loading="lazy">"#)
        );
    }

    #[test]
    fn test_external_link_attributes() {
        struct ExternalHooks;
        impl RenderHooks for ExternalHooks {
            fn link(&mut self, href: &str) -> LinkRewrite {
                LinkRewrite {
                    href: href.to_owned(),
                    class: Some("extlink".to_owned()),
                    external: true,
                }
            }
        }

        let result = MarkdownRenderer::new()
            .render_markdown("[site](https://example.com)", &mut ExternalHooks);
        assert!(result.html.contains(
            r#"<a href="https://example.com" class="extlink" rel="noopener noreferrer nofollow" target="_blank">"#
        ));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let markdown = "## Guide\n\n### Setup\n\ntext";
        let first = render(markdown);
        let second = render(markdown);
        assert_eq!(first.html, second.html);
        assert_eq!(first.headings, second.headings);
    }
}
