//! Grouping of classified elements into category buckets.

use crate::classify::Category;
use crate::dom::ElementMetadata;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One extracted and classified element, as returned to callers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    pub xpath: String,

    #[serde(rename = "html")]
    pub html_snippet: String,

    pub tag: String,

    #[serde(rename = "type")]
    pub input_type: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub class: String,

    pub display_name: String,

    pub category: Category,
}

impl ElementRecord {
    pub fn new(xpath: String, metadata: ElementMetadata, category: Category) -> Self {
        Self {
            xpath,
            html_snippet: metadata.html_snippet,
            tag: metadata.tag,
            input_type: metadata.input_type,
            name: metadata.name,
            id: metadata.id,
            class: metadata.class,
            display_name: metadata.display_name,
            category,
        }
    }
}

/// Records sharing a category, in document order
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBucket {
    pub category: Category,
    pub records: Vec<ElementRecord>,
}

/// Per-category count, as reported in the response summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

/// Totals for one aggregation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub active_category: Option<Category>,
    pub categories: Vec<CategoryCount>,
}

/// Classified records grouped by category.
///
/// Buckets follow the declaration order of [`Category`] and empty buckets are
/// left out. Records inside a bucket keep their document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Aggregation {
    records: Vec<ElementRecord>,
    buckets: Vec<CategoryBucket>,
}

impl Aggregation {
    /// Aggregate records tagged with their enumeration index.
    ///
    /// The input may arrive in any order; records are put back in index order
    /// before bucketing.
    pub fn from_indexed(mut indexed: Vec<(usize, ElementRecord)>) -> Self {
        indexed.sort_by_key(|(index, _)| *index);
        let records: Vec<ElementRecord> = indexed.into_iter().map(|(_, record)| record).collect();

        let mut grouped: IndexMap<Category, Vec<ElementRecord>> =
            Category::ALL.iter().map(|category| (*category, Vec::new())).collect();
        for record in &records {
            if let Some(bucket) = grouped.get_mut(&record.category) {
                bucket.push(record.clone());
            }
        }

        let buckets = grouped
            .into_iter()
            .filter(|(_, records)| !records.is_empty())
            .map(|(category, records)| CategoryBucket { category, records })
            .collect();

        Self { records, buckets }
    }

    /// Aggregate records already in document order
    pub fn from_ordered(records: Vec<ElementRecord>) -> Self {
        Self::from_indexed(records.into_iter().enumerate().collect())
    }

    /// All records in document order
    pub fn records(&self) -> &[ElementRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ElementRecord> {
        self.records
    }

    /// Non-empty buckets in category order
    pub fn buckets(&self) -> &[CategoryBucket] {
        &self.buckets
    }

    pub fn bucket(&self, category: Category) -> Option<&CategoryBucket> {
        self.buckets.iter().find(|bucket| bucket.category == category)
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn counts(&self) -> IndexMap<Category, usize> {
        self.buckets.iter().map(|bucket| (bucket.category, bucket.records.len())).collect()
    }

    /// Bucket shown first: the first non-empty one
    pub fn active_category(&self) -> Option<Category> {
        self.buckets.first().map(|bucket| bucket.category)
    }

    pub fn summary(&self) -> Summary {
        Summary {
            total: self.total(),
            active_category: self.active_category(),
            categories: self
                .counts()
                .into_iter()
                .map(|(category, count)| CategoryCount { category, count })
                .collect(),
        }
    }
}
