use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of rich text content.
///
/// Each variant carries its specific data; `RichTextItem::plain_text`
/// is the rendering used by the document compiler for every variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RichTextType {
    Text { content: String, link: Option<Link> },
    Mention { kind: String },
    Equation { expression: String },
}

/// Rich text item with formatting annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextItem {
    pub text_type: RichTextType,
    pub annotations: Annotations,
    pub plain_text: String,
    pub href: Option<String>,
}

impl RichTextItem {
    /// Create a plain text item, the most common rich text variant.
    ///
    /// ```ignore
    /// RichTextItem::plain_text("hello")
    /// ```
    pub fn plain_text(text: &str) -> Self {
        Self {
            text_type: RichTextType::Text {
                content: text.to_string(),
                link: None,
            },
            annotations: Annotations::default(),
            plain_text: text.to_string(),
            href: None,
        }
    }

    /// A plain text item carrying the given annotations.
    pub fn annotated(text: &str, annotations: Annotations) -> Self {
        Self {
            annotations,
            ..Self::plain_text(text)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: crate::types::Color,
}

impl Annotations {
    /// True when no formatting is applied at all.
    pub fn is_plain(&self) -> bool {
        !self.bold
            && !self.italic
            && !self.strikethrough
            && !self.underline
            && !self.code
            && self.color == crate::types::Color::Default
    }
}

/// Option of a select, multi-select or status property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub name: String,
    pub color: crate::types::Color,
}

/// Date value with optional end date.
///
/// `start` and `end` keep Notion's ISO 8601 text, which may be a date or
/// a date-time with offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateValue {
    pub start: String,
    pub end: Option<String>,
    pub time_zone: Option<String>,
}

/// Formula result types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FormulaResult {
    String(String),
    Number(f64),
    Boolean(bool),
    Date(DateValue),
}

/// Rollup result types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RollupResult {
    Number(Option<f64>),
    Date(Option<DateValue>),
    /// Each entry already flattened to its display text.
    Array(Vec<String>),
    Empty,
}

/// User representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{}", self.id),
        }
    }
}

/// File attached to a `files` property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRef {
    pub name: String,
    pub url: String,
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.url)
        } else {
            write!(f, "{}", self.name)
        }
    }
}
