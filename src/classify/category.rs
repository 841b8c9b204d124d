use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of UI roles an element can be classified into.
///
/// The declaration order is the display order of category buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Text Field")]
    TextField,
    #[serde(rename = "Input Field")]
    InputField,
    #[serde(rename = "Button")]
    Button,
    #[serde(rename = "Link")]
    Link,
    #[serde(rename = "Checkbox")]
    Checkbox,
    #[serde(rename = "Radio Button")]
    RadioButton,
    #[serde(rename = "Dropdown")]
    Dropdown,
    #[serde(rename = "Dropdown Option")]
    DropdownOption,
    #[serde(rename = "Slider")]
    Slider,
    #[serde(rename = "File Upload")]
    FileUpload,
    #[serde(rename = "Date Picker")]
    DatePicker,
    #[serde(rename = "Color Picker")]
    ColorPicker,
    #[serde(rename = "Form")]
    Form,
    #[serde(rename = "Image")]
    Image,
    #[serde(rename = "Icon")]
    Icon,
    #[serde(rename = "Video")]
    Video,
    #[serde(rename = "Audio")]
    Audio,
    #[serde(rename = "Table")]
    Table,
    #[serde(rename = "Table Row")]
    TableRow,
    #[serde(rename = "Table Cell")]
    TableCell,
    #[serde(rename = "List")]
    List,
    #[serde(rename = "List Item")]
    ListItem,
    #[serde(rename = "Navigation")]
    Navigation,
    #[serde(rename = "Header")]
    Header,
    #[serde(rename = "Footer")]
    Footer,
    #[serde(rename = "Section")]
    Section,
    #[serde(rename = "Dialog")]
    Dialog,
    #[serde(rename = "Frame")]
    Frame,
    #[serde(rename = "Container")]
    Container,
    #[serde(rename = "Page Metadata")]
    PageMetadata,
    /// No rule matched
    #[serde(rename = "Other")]
    Other,
    /// The label service could not give an answer
    #[serde(rename = "Uncategorized")]
    Uncategorized,
}

impl Category {
    /// Every category, in display order
    pub const ALL: [Category; 32] = [
        Category::TextField,
        Category::InputField,
        Category::Button,
        Category::Link,
        Category::Checkbox,
        Category::RadioButton,
        Category::Dropdown,
        Category::DropdownOption,
        Category::Slider,
        Category::FileUpload,
        Category::DatePicker,
        Category::ColorPicker,
        Category::Form,
        Category::Image,
        Category::Icon,
        Category::Video,
        Category::Audio,
        Category::Table,
        Category::TableRow,
        Category::TableCell,
        Category::List,
        Category::ListItem,
        Category::Navigation,
        Category::Header,
        Category::Footer,
        Category::Section,
        Category::Dialog,
        Category::Frame,
        Category::Container,
        Category::PageMetadata,
        Category::Other,
        Category::Uncategorized,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::TextField => "Text Field",
            Category::InputField => "Input Field",
            Category::Button => "Button",
            Category::Link => "Link",
            Category::Checkbox => "Checkbox",
            Category::RadioButton => "Radio Button",
            Category::Dropdown => "Dropdown",
            Category::DropdownOption => "Dropdown Option",
            Category::Slider => "Slider",
            Category::FileUpload => "File Upload",
            Category::DatePicker => "Date Picker",
            Category::ColorPicker => "Color Picker",
            Category::Form => "Form",
            Category::Image => "Image",
            Category::Icon => "Icon",
            Category::Video => "Video",
            Category::Audio => "Audio",
            Category::Table => "Table",
            Category::TableRow => "Table Row",
            Category::TableCell => "Table Cell",
            Category::List => "List",
            Category::ListItem => "List Item",
            Category::Navigation => "Navigation",
            Category::Header => "Header",
            Category::Footer => "Footer",
            Category::Section => "Section",
            Category::Dialog => "Dialog",
            Category::Frame => "Frame",
            Category::Container => "Container",
            Category::PageMetadata => "Page Metadata",
            Category::Other => "Other",
            Category::Uncategorized => "Uncategorized",
        }
    }

    /// Map free-form label text onto the closed set.
    ///
    /// Matching ignores case, spaces, hyphens and underscores, so
    /// `"input_field"` and `"Input Field"` agree. Returns `None` for anything
    /// outside the set.
    pub fn from_label(label: &str) -> Option<Category> {
        let key = normalize(label);
        if key.is_empty() {
            return None;
        }

        if let Some(category) = Category::ALL.iter().find(|c| normalize(c.as_str()) == key) {
            return Some(*category);
        }

        let alias = match key.as_str() {
            "text" | "textlabel" | "heading" | "paragraph" => Category::TextField,
            "input" | "textbox" | "textinput" | "textarea" => Category::InputField,
            "anchor" | "hyperlink" => Category::Link,
            "radio" => Category::RadioButton,
            "select" | "combobox" => Category::Dropdown,
            "option" => Category::DropdownOption,
            "iframe" => Category::Frame,
            "modal" => Category::Dialog,
            _ => return None,
        };
        Some(alias)
    }
}

fn normalize(label: &str) -> String {
    label
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
