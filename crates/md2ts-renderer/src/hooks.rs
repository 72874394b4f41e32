//! Rewrite hooks for links and images.
//!
//! The renderer does not know about the documentation tree; hrefs and
//! image sources are routed through a [`RenderHooks`] implementation
//! supplied by the caller, which can rewrite targets and request extra
//! attributes. [`PassthroughHooks`] leaves everything untouched.

/// Rewritten attributes for an `<a>` element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkRewrite {
    /// The href to emit.
    pub href: String,
    /// Optional class attribute value.
    pub class: Option<String>,
    /// Whether to add `rel="noopener noreferrer nofollow"` and
    /// `target="_blank"`.
    pub external: bool,
}

impl LinkRewrite {
    /// A rewrite that leaves the href unchanged and adds nothing.
    #[must_use]
    pub fn passthrough(href: &str) -> Self {
        Self {
            href: href.to_owned(),
            class: None,
            external: false,
        }
    }
}

/// Rewritten attributes for an `<img>` element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageRewrite {
    /// Optional id attribute (the generated image key).
    pub id: Option<String>,
    /// Whether to add `loading="lazy"`.
    pub lazy: bool,
}

/// Hooks consulted when emitting links and images.
pub trait RenderHooks {
    /// Rewrite an anchor href.
    fn link(&mut self, href: &str) -> LinkRewrite {
        LinkRewrite::passthrough(href)
    }

    /// Rewrite an image source.
    fn image(&mut self, src: &str) -> ImageRewrite {
        let _ = src;
        ImageRewrite::default()
    }
}

/// Hooks that leave every link and image untouched.
pub struct PassthroughHooks;

impl RenderHooks for PassthroughHooks {}
