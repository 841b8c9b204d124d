//! Canonical XPath locators for snapshot nodes.
//!
//! A node whose id is unique in the document resolves to `id("value")`.
//! Every other node resolves to its parent's locator followed by
//! `/tag[position]`, where position counts same-tag previous siblings plus
//! one. The document element has no parent, so its locator starts at `/`.

use crate::dom::snapshot::DomSnapshot;
use crate::error::{Result, ScrapeError};
use std::collections::HashMap;

/// Resolves locators for one snapshot, remembering every prefix it builds
/// so siblings and descendants never re-walk shared ancestors.
pub struct XPathResolver<'a> {
    snapshot: &'a DomSnapshot,
    resolved: HashMap<usize, String>,
}

impl<'a> XPathResolver<'a> {
    pub fn new(snapshot: &'a DomSnapshot) -> Self {
        Self { snapshot, resolved: HashMap::new() }
    }

    /// Resolve the locator of the node at `index`
    pub fn resolve(&mut self, index: usize) -> Result<String> {
        let mut pending = Vec::new();
        let mut prefix = String::new();
        let mut cursor = Some(index);

        // Walk up until a known prefix, an id anchor, or the document root
        while let Some(current) = cursor {
            if let Some(known) = self.resolved.get(&current) {
                prefix = known.clone();
                break;
            }

            let node = self.snapshot.get(current).ok_or_else(|| ScrapeError::Extraction {
                index,
                reason: format!("ancestor {} is outside the snapshot", current),
            })?;

            if let Some(anchor) = node.id().filter(|id| self.snapshot.is_unique_id(id)).and_then(id_anchor) {
                self.resolved.insert(current, anchor.clone());
                prefix = anchor;
                break;
            }

            if let Some(parent) = node.parent {
                // Pre-order guarantees parents come first; anything else is a corrupt link
                if parent >= current {
                    return Err(ScrapeError::Extraction {
                        index,
                        reason: format!("node {} has parent {} that does not precede it", current, parent),
                    });
                }
            }

            pending.push(current);
            cursor = node.parent;
        }

        for current in pending.into_iter().rev() {
            let segment = self.segment(index, current)?;
            prefix = format!("{}/{}", prefix, segment);
            self.resolved.insert(current, prefix.clone());
        }

        Ok(prefix)
    }

    /// `tag[position]` for one node
    fn segment(&self, index: usize, current: usize) -> Result<String> {
        let tag = self
            .snapshot
            .get(current)
            .map(|node| node.local_name())
            .filter(|tag| !tag.is_empty())
            .ok_or_else(|| ScrapeError::Extraction {
                index,
                reason: format!("node {} has no tag name", current),
            })?;

        let mut position = 1;
        let mut sibling = self.snapshot.previous_sibling(current);
        while let Some(previous) = sibling {
            if self.snapshot.get(previous).is_some_and(|node| node.is_tag(&tag)) {
                position += 1;
            }
            sibling = self.snapshot.previous_sibling(previous);
        }

        Ok(format!("{}[{}]", tag, position))
    }
}

/// `id("value")`, or `id('value')` when the value holds a double quote.
/// An id holding both quote kinds cannot be written as a literal, and
/// `id()` splits its argument on whitespace, so neither gets an anchor.
fn id_anchor(id: &str) -> Option<String> {
    if id.chars().any(char::is_whitespace) {
        None
    } else if !id.contains('"') {
        Some(format!("id(\"{}\")", id))
    } else if !id.contains('\'') {
        Some(format!("id('{}')", id))
    } else {
        None
    }
}

/// Resolve a single node without keeping the prefix cache around
pub fn resolve_xpath(snapshot: &DomSnapshot, index: usize) -> Result<String> {
    XPathResolver::new(snapshot).resolve(index)
}
