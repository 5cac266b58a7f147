use super::common::BlockCommon;
use crate::types::{BlockId, Color, RichTextItem};
use serde::{Deserialize, Serialize};

/// Text content block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TextBlockContent {
    pub rich_text: Vec<RichTextItem>,
    pub color: Color,
}

impl TextBlockContent {
    pub fn new(rich_text: Vec<RichTextItem>) -> Self {
        Self {
            rich_text,
            color: Color::Default,
        }
    }
}

/// Paragraph, heading, list item, toggle and quote blocks share this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TextBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

impl TextBlock {
    pub fn new(common: BlockCommon, rich_text: Vec<RichTextItem>) -> Self {
        Self {
            common,
            content: TextBlockContent::new(rich_text),
        }
    }
}

/// To-do block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ToDoBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
    pub checked: bool,
}

/// Code block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub common: BlockCommon,
    pub language: String,
    pub content: TextBlockContent,
}

/// Divider block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DividerBlock {
    pub common: BlockCommon,
}

/// A database embedded in a page.
///
/// The block ID doubles as the database ID when querying its rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildDatabaseBlock {
    pub common: BlockCommon,
    pub title: String,
}

/// Table block; rows arrive as `TableRow` children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableBlock {
    pub common: BlockCommon,
    pub table_width: usize,
    pub has_column_header: bool,
    pub has_row_header: bool,
}

/// Table row block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRowBlock {
    pub common: BlockCommon,
    pub cells: Vec<Vec<RichTextItem>>,
}

/// Column list block; its children are `Column` blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ColumnListBlock {
    pub common: BlockCommon,
}

/// Column block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ColumnBlock {
    pub common: BlockCommon,
}

/// Synced block.
///
/// `synced_from == None` marks the original, whose content is its own
/// children. A reference points at the original by block ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncedBlock {
    pub common: BlockCommon,
    pub synced_from: Option<SyncedFrom>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncedFrom {
    pub block_id: BlockId,
}

/// Unsupported block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsupportedBlock {
    pub common: BlockCommon,
    pub block_type: String,
}
