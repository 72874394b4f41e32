//! Navigation tree building.
//!
//! Nests the renderer's flat, ordered heading list into the anchor tree
//! attached to a page's metadata. The transform is pure: ids are assigned
//! once during rendering (so the HTML carries matching anchor targets)
//! and rebuilding from the same source yields a structurally identical
//! tree.

use md2ts_renderer::HeadingRef;
use serde::Serialize;

/// Navigation tree node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Anchor {
    /// Anchor id, matching the heading id in the page HTML.
    pub id: String,
    /// Heading text.
    pub title: String,
    /// Nested anchors for the next heading level.
    pub children: Vec<Anchor>,
}

/// Build the navigation tree from an ordered heading list.
///
/// Roots are the headings at `root_level`; the children of a heading at
/// level L are the level-(L+1) entries strictly before the next heading
/// of level ≤ L. Headings above the renderer's stop level never appear
/// in the list, which bounds the tree depth.
#[must_use]
pub fn build_navigation(headings: &[HeadingRef], root_level: u8) -> Vec<Anchor> {
    let mut anchors = Vec::new();
    let mut index = 0;

    while index < headings.len() {
        let heading = &headings[index];
        if heading.level == root_level {
            let end = headings[index + 1..]
                .iter()
                .position(|h| h.level <= root_level)
                .map_or(headings.len(), |offset| index + 1 + offset);
            anchors.push(Anchor {
                id: heading.id.clone(),
                title: heading.title.clone(),
                children: build_navigation(&headings[index + 1..end], root_level + 1),
            });
            index = end;
        } else {
            index += 1;
        }
    }

    anchors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(level: u8, id: &str, title: &str) -> HeadingRef {
        HeadingRef {
            level,
            id: id.to_owned(),
            title: title.to_owned(),
        }
    }

    #[test]
    fn test_empty_list_builds_empty_tree() {
        assert!(build_navigation(&[], 2).is_empty());
    }

    #[test]
    fn test_flat_headings() {
        let headings = [heading(2, "one", "One"), heading(2, "two", "Two")];
        let nav = build_navigation(&headings, 2);
        assert_eq!(nav.len(), 2);
        assert_eq!(nav[0].id, "one");
        assert!(nav[0].children.is_empty());
        assert_eq!(nav[1].id, "two");
    }

    #[test]
    fn test_nested_headings() {
        let headings = [
            heading(2, "guide", "Guide"),
            heading(3, "guide--setup", "Setup"),
            heading(3, "guide--usage", "Usage"),
            heading(2, "api", "API"),
            heading(3, "api--auth", "Auth"),
        ];
        let nav = build_navigation(&headings, 2);

        assert_eq!(nav.len(), 2);
        assert_eq!(nav[0].id, "guide");
        assert_eq!(nav[0].children.len(), 2);
        assert_eq!(nav[0].children[0].id, "guide--setup");
        assert_eq!(nav[0].children[1].id, "guide--usage");
        assert_eq!(nav[1].children.len(), 1);
        assert_eq!(nav[1].children[0].id, "api--auth");
    }

    #[test]
    fn test_orphan_subheading_is_dropped() {
        // An h3 before any h2 has no parent in the tree.
        let headings = [heading(3, "stray", "Stray"), heading(2, "root", "Root")];
        let nav = build_navigation(&headings, 2);
        assert_eq!(nav.len(), 1);
        assert_eq!(nav[0].id, "root");
    }

    #[test]
    fn test_rebuild_is_structurally_identical() {
        let headings = [
            heading(2, "guide", "Guide"),
            heading(3, "guide--setup", "Setup"),
        ];
        let first = build_navigation(&headings, 2);
        let second = build_navigation(&headings, 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_serialization_shape() {
        let nav = build_navigation(
            &[heading(2, "guide", "Guide"), heading(3, "guide--setup", "Setup")],
            2,
        );
        let json = serde_json::to_value(&nav).unwrap();
        assert_eq!(json[0]["id"], "guide");
        assert_eq!(json[0]["title"], "Guide");
        assert_eq!(json[0]["children"][0]["id"], "guide--setup");
        assert!(json[0]["children"][0]["children"].as_array().unwrap().is_empty());
    }
}
