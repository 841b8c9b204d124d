use crate::classify::Classifier;
use crate::classify::category::Category;
use crate::dom::ElementMetadata;
use crate::error::ClassificationError;
use async_trait::async_trait;

/// Which `type` attribute values a rule accepts
#[derive(Debug, Clone, Copy)]
enum TypeMatch {
    Any,
    /// Lowercased values; `""` matches a missing attribute
    OneOf(&'static [&'static str]),
}

/// `(tag, type) -> category`
#[derive(Debug, Clone, Copy)]
struct Rule {
    tags: &'static [&'static str],
    types: TypeMatch,
    category: Category,
}

impl Rule {
    const fn tags(tags: &'static [&'static str], category: Category) -> Self {
        Self { tags, types: TypeMatch::Any, category }
    }

    const fn input(types: &'static [&'static str], category: Category) -> Self {
        Self { tags: &["input"], types: TypeMatch::OneOf(types), category }
    }

    fn matches(&self, tag: &str, input_type: &str) -> bool {
        self.tags.contains(&tag)
            && match self.types {
                TypeMatch::Any => true,
                TypeMatch::OneOf(types) => types.contains(&input_type),
            }
    }
}

/// Checked top to bottom, first match wins
const RULES: &[Rule] = &[
    Rule::tags(&["button"], Category::Button),
    Rule::input(&["button", "submit", "reset", "image"], Category::Button),
    Rule::input(&["", "text", "password", "email", "search", "tel", "url", "number"], Category::InputField),
    Rule::input(&["checkbox"], Category::Checkbox),
    Rule::input(&["radio"], Category::RadioButton),
    Rule::input(&["range"], Category::Slider),
    Rule::input(&["file"], Category::FileUpload),
    Rule::input(&["date", "datetime-local", "month", "week", "time"], Category::DatePicker),
    Rule::input(&["color"], Category::ColorPicker),
    Rule::input(&["hidden"], Category::Other),
    // Browsers render unknown input types as text boxes
    Rule::tags(&["input"], Category::InputField),
    Rule::tags(&["textarea"], Category::InputField),
    Rule::tags(&["select", "datalist"], Category::Dropdown),
    Rule::tags(&["option", "optgroup"], Category::DropdownOption),
    Rule::tags(&["a"], Category::TextField),
    Rule::tags(&["h1", "h2", "h3", "h4", "h5", "h6", "p", "label", "span", "div"], Category::TextField),
    Rule::tags(&["form", "fieldset"], Category::Form),
    Rule::tags(&["img", "picture", "canvas"], Category::Image),
    Rule::tags(&["svg", "i"], Category::Icon),
    Rule::tags(&["video"], Category::Video),
    Rule::tags(&["audio"], Category::Audio),
    Rule::tags(&["table", "thead", "tbody", "tfoot"], Category::Table),
    Rule::tags(&["tr"], Category::TableRow),
    Rule::tags(&["td", "th"], Category::TableCell),
    Rule::tags(&["ul", "ol", "dl"], Category::List),
    Rule::tags(&["li", "dt", "dd"], Category::ListItem),
    Rule::tags(&["nav"], Category::Navigation),
    Rule::tags(&["header"], Category::Header),
    Rule::tags(&["footer"], Category::Footer),
    Rule::tags(&["main", "section", "article", "aside"], Category::Section),
    Rule::tags(&["dialog"], Category::Dialog),
    Rule::tags(&["iframe", "frame"], Category::Frame),
    Rule::tags(&["body"], Category::Container),
    Rule::tags(
        &["html", "head", "title", "meta", "link", "script", "style", "noscript", "base", "template"],
        Category::PageMetadata,
    ),
];

/// Classify by tag and `type` attribute; never fails, never leaves the closed set
pub fn classify_by_rules(tag: &str, input_type: &str) -> Category {
    let tag = tag.to_ascii_lowercase();
    let input_type = input_type.trim().to_ascii_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matches(&tag, &input_type))
        .map_or(Category::Other, |rule| rule.category)
}

/// Deterministic rule-table strategy
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleClassifier;

#[async_trait]
impl Classifier for RuleClassifier {
    fn name(&self) -> &str {
        "rules"
    }

    async fn classify(&self, element: &ElementMetadata) -> Result<Category, ClassificationError> {
        Ok(classify_by_rules(&element.tag, &element.input_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons() {
        assert_eq!(classify_by_rules("button", ""), Category::Button);
        assert_eq!(classify_by_rules("button", "submit"), Category::Button);
        assert_eq!(classify_by_rules("input", "button"), Category::Button);
        assert_eq!(classify_by_rules("input", "SUBMIT"), Category::Button);
    }

    #[test]
    fn test_input_fields() {
        for input_type in ["", "text", "password", "email", " Email "] {
            assert_eq!(classify_by_rules("input", input_type), Category::InputField, "type {:?}", input_type);
        }
        assert_eq!(classify_by_rules("textarea", ""), Category::InputField);
        assert_eq!(classify_by_rules("input", "made-up"), Category::InputField);
    }

    #[test]
    fn test_specialised_inputs() {
        assert_eq!(classify_by_rules("input", "checkbox"), Category::Checkbox);
        assert_eq!(classify_by_rules("input", "radio"), Category::RadioButton);
        assert_eq!(classify_by_rules("input", "range"), Category::Slider);
        assert_eq!(classify_by_rules("input", "file"), Category::FileUpload);
        assert_eq!(classify_by_rules("input", "date"), Category::DatePicker);
        assert_eq!(classify_by_rules("input", "color"), Category::ColorPicker);
        assert_eq!(classify_by_rules("input", "hidden"), Category::Other);
    }

    #[test]
    fn test_text_fields() {
        for tag in ["a", "h1", "h6", "p", "label", "span", "div", "DIV"] {
            assert_eq!(classify_by_rules(tag, ""), Category::TextField, "tag {}", tag);
        }
    }

    #[test]
    fn test_type_only_matters_for_inputs() {
        assert_eq!(classify_by_rules("button", "checkbox"), Category::Button);
        assert_eq!(classify_by_rules("div", "submit"), Category::TextField);
    }

    #[test]
    fn test_unmatched_is_other() {
        assert_eq!(classify_by_rules("marquee", ""), Category::Other);
        assert_eq!(classify_by_rules("", ""), Category::Other);
        assert_eq!(classify_by_rules("custom-element", "text"), Category::Other);
    }

    #[test]
    fn test_every_pair_stays_in_closed_set() {
        let tags = ["a", "button", "input", "select", "div", "table", "html", "x-widget", ""];
        let types = ["", "text", "radio", "submit", "bogus", "hidden"];
        for tag in tags {
            for input_type in types {
                let category = classify_by_rules(tag, input_type);
                assert!(Category::ALL.contains(&category));
                assert_ne!(category, Category::Uncategorized);
            }
        }
    }

    #[tokio::test]
    async fn test_rule_classifier_never_fails() {
        let element = ElementMetadata { tag: "button".into(), ..Default::default() };
        assert_eq!(RuleClassifier.classify(&element).await, Ok(Category::Button));

        let element = ElementMetadata { tag: "blink".into(), ..Default::default() };
        assert_eq!(RuleClassifier.classify(&element).await, Ok(Category::Other));
    }
}
