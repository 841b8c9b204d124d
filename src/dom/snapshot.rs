use crate::dom::node::DomNode;
use crate::error::{Result, ScrapeError};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

/// Document-ordered element list captured from one page load.
///
/// Nodes are stored in pre-order, so every node's parent and previous
/// siblings appear before it. Taking the first N nodes therefore keeps every
/// ancestor of those N nodes.
#[derive(Debug, Clone, Default)]
pub struct DomSnapshot {
    nodes: Vec<DomNode>,

    /// Previous element sibling of each node
    previous_sibling: Vec<Option<usize>>,

    /// How many nodes carry each id, across the whole document
    id_counts: HashMap<String, usize>,

    /// Number of elements in the document, including those past the cap
    total_elements: usize,
}

/// Wire shape produced by `snapshot_dom.js`
#[derive(Debug, Deserialize)]
struct RawSnapshot {
    nodes: Vec<DomNode>,
    #[serde(default)]
    total_elements: Option<usize>,
    /// Ids used more than once anywhere in the document
    #[serde(default)]
    shared_ids: Vec<String>,
}

impl DomSnapshot {
    /// Build a snapshot from a complete, document-ordered node list
    pub fn new(nodes: Vec<DomNode>) -> Self {
        Self::with_shared_ids(nodes, None, HashSet::new())
    }

    fn with_shared_ids(nodes: Vec<DomNode>, total_elements: Option<usize>, shared_ids: HashSet<String>) -> Self {
        let mut previous_sibling = Vec::with_capacity(nodes.len());
        let mut last_child: HashMap<Option<usize>, usize> = HashMap::new();
        let mut id_counts: HashMap<String, usize> = HashMap::new();

        for (index, node) in nodes.iter().enumerate() {
            previous_sibling.push(last_child.insert(node.parent, index));
            if let Some(id) = node.id() {
                *id_counts.entry(id.to_string()).or_default() += 1;
            }
        }

        // Duplicates beyond the captured prefix still disqualify an id
        for id in shared_ids {
            let count = id_counts.entry(id).or_default();
            *count = (*count).max(2);
        }

        let total_elements = total_elements.unwrap_or(nodes.len()).max(nodes.len());
        Self { nodes, previous_sibling, id_counts, total_elements }
    }

    /// Parse the JSON emitted by the in-page enumeration script
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawSnapshot = serde_json::from_str(json)
            .map_err(|e| ScrapeError::SnapshotFailed(format!("Failed to parse DOM snapshot: {}", e)))?;
        Ok(Self::with_shared_ids(raw.nodes, raw.total_elements, raw.shared_ids.into_iter().collect()))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn total_elements(&self) -> usize {
        self.total_elements
    }

    pub fn get(&self, index: usize) -> Option<&DomNode> {
        self.nodes.get(index)
    }

    pub fn nodes(&self) -> &[DomNode] {
        &self.nodes
    }

    pub fn parent(&self, index: usize) -> Option<usize> {
        self.nodes.get(index).and_then(|node| node.parent)
    }

    pub fn previous_sibling(&self, index: usize) -> Option<usize> {
        self.previous_sibling.get(index).copied().flatten()
    }

    /// True when exactly one element in the document carries `id`
    pub fn is_unique_id(&self, id: &str) -> bool {
        self.id_counts.get(id) == Some(&1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DomSnapshot {
        DomSnapshot::new(vec![
            DomNode::new("html"),
            DomNode::new("head").with_parent(0),
            DomNode::new("body").with_parent(0),
            DomNode::new("div").with_parent(2).with_attribute("id", "a"),
            DomNode::new("span").with_parent(3),
            DomNode::new("div").with_parent(2).with_attribute("id", "dup"),
            DomNode::new("div").with_parent(2).with_attribute("id", "dup"),
        ])
    }

    #[test]
    fn test_previous_siblings() {
        let snapshot = sample();
        assert_eq!(snapshot.previous_sibling(0), None);
        assert_eq!(snapshot.previous_sibling(1), None);
        assert_eq!(snapshot.previous_sibling(2), Some(1));
        assert_eq!(snapshot.previous_sibling(3), None);
        assert_eq!(snapshot.previous_sibling(4), None);
        assert_eq!(snapshot.previous_sibling(5), Some(3));
        assert_eq!(snapshot.previous_sibling(6), Some(5));
    }

    #[test]
    fn test_unique_ids() {
        let snapshot = sample();
        assert!(snapshot.is_unique_id("a"));
        assert!(!snapshot.is_unique_id("dup"));
        assert!(!snapshot.is_unique_id("missing"));
    }

    #[test]
    fn test_from_json_with_shared_ids() {
        let json = r#"{
            "nodes": [
                {"tag_name": "html", "parent": null},
                {"tag_name": "body", "parent": 0, "attributes": {"id": "main"}}
            ],
            "total_elements": 40,
            "shared_ids": ["main"]
        }"#;

        let snapshot = DomSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.total_elements(), 40);
        assert_eq!(snapshot.parent(1), Some(0));
        // Only one copy captured, but the page reported a second one
        assert!(!snapshot.is_unique_id("main"));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = DomSnapshot::from_json("{\"nodes\": 3}").unwrap_err();
        assert!(matches!(err, ScrapeError::SnapshotFailed(_)));
    }
}
