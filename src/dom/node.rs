use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One element as captured from the page, in document order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DomNode {
    /// Local tag name as reported by the page (e.g., "div", "button", "svg")
    #[serde(default)]
    pub tag_name: String,

    /// Position of the parent element in the snapshot, `None` for the document element
    #[serde(default)]
    pub parent: Option<usize>,

    /// Element attributes (e.g., id, class, type, name)
    #[serde(default)]
    pub attributes: HashMap<String, String>,

    /// Trimmed text content, capped in-page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,

    /// Serialized outer markup, capped in-page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_html: Option<String>,

    /// Set when the page could not evaluate this node (e.g., detached mid-scan)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DomNode {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self { tag_name: tag_name.into(), ..Default::default() }
    }

    pub fn with_parent(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.outer_html = Some(html.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn get_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Non-empty `id` attribute
    pub fn id(&self) -> Option<&str> {
        self.get_attribute("id").filter(|id| !id.is_empty())
    }

    /// Lowercased tag name, the form used in locators and rules
    pub fn local_name(&self) -> String {
        self.tag_name.to_ascii_lowercase()
    }

    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }
}
