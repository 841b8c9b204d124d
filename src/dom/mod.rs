//! DOM capture, locator resolution and metadata extraction
//!
//! This module turns a loaded page into per-element data. It includes:
//! - DomNode: One captured element with its parent link and raw attributes
//! - DomSnapshot: Document-ordered node list with sibling and id indexes
//! - XPathResolver: Canonical locator per node
//! - ElementMetadata: Descriptive record per node

pub mod metadata;
pub mod node;
pub mod snapshot;
pub mod xpath;

pub use metadata::{ElementMetadata, ExtractLimits, extract_metadata, truncate_chars};
pub use node::DomNode;
pub use snapshot::DomSnapshot;
pub use xpath::{XPathResolver, resolve_xpath};

/// In-page script that enumerates elements; called as `(maxNodes, htmlLimit, textLimit)`
pub(crate) const SNAPSHOT_SCRIPT: &str = include_str!("snapshot_dom.js");

/// UTF-16 units of text transported per node for a given display cap.
///
/// A character takes at most two units, so text clipped to this length
/// still holds more than `display_text_cap` characters whenever the full
/// text does, and is never mistaken for text that fits.
pub(crate) fn text_transport_cap(display_text_cap: usize) -> usize {
    display_text_cap.saturating_add(1).saturating_mul(2)
}

/// Build the evaluation expression for the enumeration script
pub(crate) fn snapshot_expression(max_nodes: usize, html_cap: usize, display_text_cap: usize) -> String {
    format!(
        "({})({}, {}, {})",
        SNAPSHOT_SCRIPT.trim(),
        max_nodes,
        html_cap,
        text_transport_cap(display_text_cap)
    )
}
