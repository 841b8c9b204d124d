use crate::dom::node::DomNode;
use crate::error::{Result, ScrapeError};
use serde::{Deserialize, Serialize};

/// Default cap on serialized markup per element
pub const DEFAULT_HTML_CAP: usize = 2000;

/// Longest inner text still folded into a display name
pub const DEFAULT_DISPLAY_TEXT_CAP: usize = 40;

/// Per-field size bounds applied while extracting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractLimits {
    pub html_cap: usize,
    pub display_text_cap: usize,
}

impl Default for ExtractLimits {
    fn default() -> Self {
        Self { html_cap: DEFAULT_HTML_CAP, display_text_cap: DEFAULT_DISPLAY_TEXT_CAP }
    }
}

/// Descriptive data harvested from one element
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ElementMetadata {
    pub tag: String,
    pub input_type: String,
    pub id: String,
    pub name: String,
    pub class: String,
    pub display_name: String,
    pub html_snippet: String,
}

/// Harvest metadata from the node at `index`.
///
/// Fails only when the page could not evaluate the node; the caller skips it.
pub fn extract_metadata(index: usize, node: &DomNode, limits: &ExtractLimits) -> Result<ElementMetadata> {
    if let Some(reason) = &node.error {
        return Err(ScrapeError::Extraction { index, reason: reason.clone() });
    }

    let tag = node.local_name();
    if tag.is_empty() {
        return Err(ScrapeError::Extraction { index, reason: "missing tag name".to_string() });
    }

    let attribute = |key: &str| node.get_attribute(key).unwrap_or_default().to_string();
    let input_type = attribute("type");
    let id = attribute("id");
    let name = attribute("name");
    let class = attribute("class");

    let display_name = display_name(&tag, &id, &name, &input_type, node.text_content.as_deref(), limits.display_text_cap);
    let html_snippet = truncate_chars(node.outer_html.as_deref().unwrap_or_default(), limits.html_cap);

    Ok(ElementMetadata { tag, input_type, id, name, class, display_name, html_snippet })
}

/// `tag[#id][[name='x']][[type='y']][: text]`
fn display_name(tag: &str, id: &str, name: &str, input_type: &str, text: Option<&str>, text_cap: usize) -> String {
    let mut label = tag.to_string();
    if !id.is_empty() {
        label.push('#');
        label.push_str(id);
    }
    if !name.is_empty() {
        label.push_str(&format!("[name='{}']", name));
    }
    if !input_type.is_empty() {
        label.push_str(&format!("[type='{}']", input_type));
    }

    let text = text.map(str::trim).unwrap_or_default();
    if !text.is_empty() && text.chars().count() <= text_cap {
        label.push_str(": ");
        label.push_str(text);
    }

    label
}

/// First `cap` characters of `text`, split on a char boundary
pub fn truncate_chars(text: &str, cap: usize) -> String {
    match text.char_indices().nth(cap) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_metadata() {
        let node = DomNode::new("BUTTON")
            .with_attribute("id", "go")
            .with_attribute("class", "btn primary")
            .with_text("  Go  ")
            .with_html("<button id=\"go\" class=\"btn primary\">Go</button>");

        let meta = extract_metadata(0, &node, &ExtractLimits::default()).unwrap();
        assert_eq!(meta.tag, "button");
        assert_eq!(meta.id, "go");
        assert_eq!(meta.class, "btn primary");
        assert_eq!(meta.input_type, "");
        assert_eq!(meta.name, "");
        assert_eq!(meta.display_name, "button#go: Go");
        assert_eq!(meta.html_snippet, "<button id=\"go\" class=\"btn primary\">Go</button>");
    }

    #[test]
    fn test_display_name_with_name_and_type() {
        let node = DomNode::new("input")
            .with_attribute("name", "email")
            .with_attribute("type", "email");

        let meta = extract_metadata(0, &node, &ExtractLimits::default()).unwrap();
        assert_eq!(meta.display_name, "input[name='email'][type='email']");
    }

    #[test]
    fn test_long_text_left_out_of_display_name() {
        let node = DomNode::new("p").with_text("x".repeat(41));
        let meta = extract_metadata(0, &node, &ExtractLimits::default()).unwrap();
        assert_eq!(meta.display_name, "p");

        let node = DomNode::new("p").with_text("y".repeat(40));
        let meta = extract_metadata(0, &node, &ExtractLimits::default()).unwrap();
        assert_eq!(meta.display_name, format!("p: {}", "y".repeat(40)));
    }

    #[test]
    fn test_whitespace_text_ignored() {
        let node = DomNode::new("div").with_text(" \n\t ");
        let meta = extract_metadata(0, &node, &ExtractLimits::default()).unwrap();
        assert_eq!(meta.display_name, "div");
    }

    #[test]
    fn test_html_is_capped() {
        let node = DomNode::new("div").with_html("é".repeat(50));
        let limits = ExtractLimits { html_cap: 10, ..Default::default() };
        let meta = extract_metadata(0, &node, &limits).unwrap();
        assert_eq!(meta.html_snippet.chars().count(), 10);
    }

    #[test]
    fn test_failed_node() {
        let node = DomNode::new("div").with_error("node detached");
        let err = extract_metadata(4, &node, &ExtractLimits::default()).unwrap_err();
        assert_eq!(err, ScrapeError::Extraction { index: 4, reason: "node detached".to_string() });
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("", 0), "");
    }
}
