//! Cross-document route index.
//!
//! A nested map keyed by route-path segments, populated while documents
//! are compiled and read back to build breadcrumb chains. Multiple
//! documents may contribute to the same subtree (an index-only directory
//! carries no marker of its own); markers are additive and only a marker
//! at the exact same leaf can be replaced, governed by [`RoutePolicy`].

use std::collections::BTreeMap;

use serde::Serialize;

/// Marker recorded for a route node: the breadcrumb link of the document
/// registered there.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RouteLink {
    /// Route path (e.g. `/docs/guide`).
    pub path: String,
    /// Document title.
    pub title: String,
}

/// Conflict policy for markers registered at the same leaf.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoutePolicy {
    /// Later document silently wins.
    #[default]
    Lenient,
    /// Replacing a different existing marker is an error.
    Strict,
}

/// Error raised by [`RoutePolicy::Strict`] on conflicting markers.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error(r#"The "{path}" route is already registered as "{existing}"."#)]
pub struct DuplicateRoute {
    /// Route path both documents map to.
    pub path: String,
    /// Title of the document already registered there.
    pub existing: String,
}

#[derive(Debug, Default)]
struct RouteNode {
    marker: Option<RouteLink>,
    children: BTreeMap<String, RouteNode>,
}

/// Nested route index shared across one compilation run.
#[derive(Debug, Default)]
pub struct RouteIndex {
    root: RouteNode,
    policy: RoutePolicy,
}

impl RouteIndex {
    /// Create an index with the given conflict policy.
    #[must_use]
    pub fn new(policy: RoutePolicy) -> Self {
        Self {
            root: RouteNode::default(),
            policy,
        }
    }

    /// Record a document's marker at its route location.
    ///
    /// Intermediate nodes are created as needed; existing siblings and
    /// children are never disturbed.
    ///
    /// # Errors
    ///
    /// Under [`RoutePolicy::Strict`], returns [`DuplicateRoute`] when the
    /// leaf already carries a different marker.
    pub fn insert(&mut self, segments: &[String], link: RouteLink) -> Result<(), DuplicateRoute> {
        let mut node = &mut self.root;
        for segment in segments {
            node = node.children.entry(segment.clone()).or_default();
        }

        if self.policy == RoutePolicy::Strict {
            if let Some(existing) = &node.marker {
                if *existing != link {
                    return Err(DuplicateRoute {
                        path: link.path,
                        existing: existing.title.clone(),
                    });
                }
            }
        }

        node.marker = Some(link);
        Ok(())
    }

    /// Collect the breadcrumb chain for a route location.
    ///
    /// Walks root → leaf, collecting every visited node's marker in
    /// order; the final crumb is the document itself. Stops early when a
    /// segment has not been registered.
    #[must_use]
    pub fn breadcrumbs(&self, segments: &[String]) -> Vec<RouteLink> {
        let mut crumbs = Vec::new();
        let mut node = &self.root;

        for segment in segments {
            let Some(child) = node.children.get(segment) else {
                break;
            };
            if let Some(marker) = &child.marker {
                crumbs.push(marker.clone());
            }
            node = child;
        }

        crumbs
    }
}
