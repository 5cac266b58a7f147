mod block;
pub mod blocks;
pub mod common;
mod property_value;

pub use block::Block;
pub use blocks::*;
pub use common::*;
pub use property_value::PropertyValue;

use crate::types::{PageId, PropertyName};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A Notion page with its block tree materialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub title: PageTitle,
    pub url: String,
    pub blocks: Vec<Block>,
    pub properties: IndexMap<PropertyName, PropertyValue>,
    pub archived: bool,
    /// ISO 8601 timestamp of the last edit, as reported by the API.
    pub last_edited_time: Option<String>,
}

impl Page {
    /// Get the page title
    pub fn title(&self) -> &PageTitle {
        &self.title
    }

    /// Orders database rows most recently edited first.
    ///
    /// Rows without a timestamp keep their relative order at the end.
    pub fn sort_by_last_edited(pages: &mut [Page]) {
        pages.sort_by_cached_key(|page| std::cmp::Reverse(page.edited_at()));
    }

    /// The last edit as a UTC instant; unparsable timestamps count as missing.
    pub fn edited_at(&self) -> Option<DateTime<Utc>> {
        self.last_edited_time
            .as_deref()
            .and_then(|time| DateTime::parse_from_rfc3339(time).ok())
            .map(|time| time.with_timezone(&Utc))
    }

    /// Properties shown in the page header, ordered by name.
    ///
    /// The title property is left out; it is already the document title.
    pub fn header_properties(&self) -> Vec<(&PropertyName, &PropertyValue)> {
        let mut properties: Vec<_> = self
            .properties
            .iter()
            .filter(|(_, value)| !matches!(value, PropertyValue::Title(_)))
            .collect();
        properties.sort_by(|a, b| a.0.cmp(b.0));
        properties
    }
}

/// Page title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageTitle(String);

impl PageTitle {
    pub fn new(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The title as written into a document; blank titles become `Untitled`.
    pub fn display_or_untitled(&self) -> &str {
        if self.0.trim().is_empty() {
            "Untitled"
        } else {
            &self.0
        }
    }
}

impl std::fmt::Display for PageTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RichTextItem;

    fn page_with(properties: IndexMap<PropertyName, PropertyValue>) -> Page {
        Page {
            id: PageId::parse("550e8400e29b41d4a716446655440000").unwrap(),
            title: PageTitle::new(""),
            url: String::new(),
            blocks: Vec::new(),
            properties,
            archived: false,
            last_edited_time: None,
        }
    }

    #[test]
    fn test_header_properties_skip_title_and_sort() {
        let mut properties = IndexMap::new();
        properties.insert(PropertyName::from("Status"), PropertyValue::Checkbox(true));
        properties.insert(
            PropertyName::from("Name"),
            PropertyValue::Title(vec![RichTextItem::plain_text("Doc")]),
        );
        properties.insert(PropertyName::from("Estimate"), PropertyValue::Number(Some(3.0)));

        let page = page_with(properties);
        let names: Vec<_> = page
            .header_properties()
            .into_iter()
            .map(|(name, _)| name.as_str())
            .collect();

        assert_eq!(names, vec!["Estimate", "Status"]);
    }

    #[test]
    fn test_rows_sort_newest_first() {
        let mut pages: Vec<Page> = ["2024-01-02T00:00:00.000Z", "", "2024-03-01T00:00:00.000Z"]
            .into_iter()
            .map(|time| Page {
                last_edited_time: (!time.is_empty()).then(|| time.to_string()),
                ..page_with(IndexMap::new())
            })
            .collect();

        Page::sort_by_last_edited(&mut pages);

        let times: Vec<_> = pages.iter().map(|p| p.last_edited_time.as_deref()).collect();
        assert_eq!(
            times,
            vec![
                Some("2024-03-01T00:00:00.000Z"),
                Some("2024-01-02T00:00:00.000Z"),
                None
            ]
        );
    }

    #[test]
    fn test_rows_sort_across_offsets() {
        let mut pages: Vec<Page> = ["2024-05-01T09:00:00+02:00", "2024-05-01T08:30:00Z"]
            .into_iter()
            .map(|time| Page {
                last_edited_time: Some(time.to_string()),
                ..page_with(IndexMap::new())
            })
            .collect();

        Page::sort_by_last_edited(&mut pages);

        assert_eq!(
            pages[0].last_edited_time.as_deref(),
            Some("2024-05-01T08:30:00Z")
        );
    }

    #[test]
    fn test_untitled_fallback() {
        assert_eq!(PageTitle::new("  ").display_or_untitled(), "Untitled");
        assert_eq!(PageTitle::new("Roadmap").display_or_untitled(), "Roadmap");
    }
}
