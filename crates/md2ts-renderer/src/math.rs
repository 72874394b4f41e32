//! TeX to MathML rendering.
//!
//! Math rendering never fails the build: conversion errors are logged and
//! the raw (escaped) TeX is emitted in a fallback `<span>`. Display math
//! ending with `\label{...}` gets a deep-linkable wrapper with a permalink
//! anchor.

use std::sync::LazyLock;

use latex2mathml::{DisplayStyle, latex_to_mathml};
use regex::Regex;

use crate::state::escape_html;

static LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\label\{([^}]*)\}\s*$").expect("valid label regex"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Render inline math (`$...$`).
#[must_use]
pub fn render_inline(tex: &str) -> String {
    convert(tex, DisplayStyle::Inline)
}

/// Render display math (`$$...$$`).
///
/// A trailing `\label{name}` is stripped from the expression and turned
/// into an anchor: the equation is wrapped in a `<span class="equation">`
/// carrying the label as id, followed by a pilcrow permalink.
#[must_use]
pub fn render_display(tex: &str) -> String {
    let Some(captures) = LABEL.captures(tex) else {
        return convert(tex, DisplayStyle::Block);
    };

    let label = WHITESPACE
        .replace_all(captures[1].trim(), "-")
        .into_owned();
    let stripped = LABEL.replace(tex, "");
    let body = convert(&stripped, DisplayStyle::Block);
    let label = escape_html(&label);

    format!(
        r##"<span class="equation" id="{label}">{body}<a href="#{label}" class="mathlabel" title="Permalink to this equation">¶</a></span>"##
    )
}

fn convert(tex: &str, display: DisplayStyle) -> String {
    match latex_to_mathml(tex, display) {
        Ok(mathml) => mathml,
        Err(e) => {
            tracing::warn!(error = %e, "TeX to MathML conversion failed");
            format!(r#"<span class="math math-error">{}</span>"#, escape_html(tex))
        }
    }
}
