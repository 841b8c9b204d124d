//! Element classification
//!
//! Two interchangeable strategies sit behind [`Classifier`]:
//! - [`RuleClassifier`]: ordered `(tag, type)` rule table, pure and infallible
//! - [`RemoteClassifier`]: external label lookup that may fail per element
//!
//! A job uses exactly one strategy, picked from [`ClassifierKind`].

pub mod category;
pub mod remote;
pub mod rules;

pub use category::Category;
pub use remote::{RemoteClassifier, RemoteClassifierConfig};
pub use rules::{RuleClassifier, classify_by_rules};

use crate::dom::ElementMetadata;
use crate::error::{ClassificationError, Result, ScrapeError};
use async_trait::async_trait;
use std::sync::Arc;

/// Assigns one category to an element
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Strategy name used in logs
    fn name(&self) -> &str;

    async fn classify(&self, element: &ElementMetadata) -> std::result::Result<Category, ClassificationError>;

    /// Category recorded when `classify` fails
    fn fallback(&self) -> Category {
        Category::Uncategorized
    }
}

/// Strategy selection, fixed for the lifetime of a controller
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ClassifierKind {
    #[default]
    Rules,
    Remote(RemoteClassifierConfig),
}

impl ClassifierKind {
    pub fn build(&self) -> Result<Arc<dyn Classifier>> {
        match self {
            ClassifierKind::Rules => Ok(Arc::new(RuleClassifier)),
            ClassifierKind::Remote(config) => {
                let classifier = RemoteClassifier::new(config.clone()).map_err(|e| ScrapeError::Internal(e.to_string()))?;
                Ok(Arc::new(classifier))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rules() {
        let classifier = ClassifierKind::default().build().unwrap();
        assert_eq!(classifier.name(), "rules");
        assert_eq!(classifier.fallback(), Category::Uncategorized);
    }

    #[test]
    fn test_build_remote() {
        let kind = ClassifierKind::Remote(RemoteClassifierConfig::new("http://127.0.0.1:1/label"));
        let classifier = kind.build().unwrap();
        assert_eq!(classifier.name(), "remote");
    }
}
