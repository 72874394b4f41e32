//! Front-matter extraction.
//!
//! Documents may start with a `---` delimited block of key/value pairs.
//! The block is parsed permissively as YAML (which accepts JSON object
//! literals unchanged); the only recognized key is `title`, everything
//! else passes through into the page metadata untouched.

use std::sync::LazyLock;

use regex::Regex;

/// Leading front-matter block: `---`, content, `---`.
static FRONT_MATTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^---\n([\S\s]*?)\n---").expect("valid front matter regex"));

/// Split an optional leading front-matter block from a markdown source.
///
/// Returns the block's inner content (without delimiters) and the
/// remaining markdown body.
#[must_use]
pub fn split(source: &str) -> (Option<&str>, &str) {
    match FRONT_MATTER.captures(source) {
        Some(captures) => {
            let end = captures.get(0).map_or(0, |m| m.end());
            (
                Some(captures.get(1).map_or("", |m| m.as_str())),
                &source[end..],
            )
        }
        None => (None, source),
    }
}

/// Parse a front-matter block into a string-keyed value map.
pub fn parse_fields(
    block: &str,
) -> Result<serde_json::Map<String, serde_json::Value>, serde_yaml::Error> {
    serde_yaml::from_str(block)
}

/// Look up the front-matter `title` key.
#[must_use]
pub fn title(fields: &serde_json::Map<String, serde_json::Value>) -> Option<&str> {
    fields.get("title").and_then(serde_json::Value::as_str)
}
