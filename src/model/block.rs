use super::blocks::*;
use super::common::BlockCommon;
use crate::types::{BlockId, RichTextItem};
use serde::{Deserialize, Serialize};

/// Macro to reduce boilerplate in Block enum methods
macro_rules! match_all_blocks {
    ($self:expr, $pattern:pat => $result:expr) => {
        match $self {
            Block::Paragraph($pattern) => $result,
            Block::Heading1($pattern) => $result,
            Block::Heading2($pattern) => $result,
            Block::Heading3($pattern) => $result,
            Block::BulletedListItem($pattern) => $result,
            Block::NumberedListItem($pattern) => $result,
            Block::ToDo($pattern) => $result,
            Block::Toggle($pattern) => $result,
            Block::Quote($pattern) => $result,
            Block::Code($pattern) => $result,
            Block::Divider($pattern) => $result,
            Block::ChildDatabase($pattern) => $result,
            Block::Table($pattern) => $result,
            Block::TableRow($pattern) => $result,
            Block::ColumnList($pattern) => $result,
            Block::Column($pattern) => $result,
            Block::Synced($pattern) => $result,
            Block::Unsupported($pattern) => $result,
        }
    };
}

/// The Notion block kinds the document compiler knows how to lay out.
///
/// Anything else the API returns arrives as `Unsupported` carrying its
/// original type tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Paragraph(TextBlock),
    Heading1(TextBlock),
    Heading2(TextBlock),
    Heading3(TextBlock),
    BulletedListItem(TextBlock),
    NumberedListItem(TextBlock),
    ToDo(ToDoBlock),
    Toggle(TextBlock),
    Quote(TextBlock),
    Code(CodeBlock),
    Divider(DividerBlock),
    ChildDatabase(ChildDatabaseBlock),
    Table(TableBlock),
    TableRow(TableRowBlock),
    ColumnList(ColumnListBlock),
    Column(ColumnBlock),
    Synced(SyncedBlock),
    Unsupported(UnsupportedBlock),
}

impl Block {
    /// Get the block's ID
    pub fn id(&self) -> &BlockId {
        match_all_blocks!(self, b => &b.common.id)
    }

    /// Get the block's children
    pub fn children(&self) -> &[Block] {
        match_all_blocks!(self, b => &b.common.children)
    }

    /// Check if block has children
    pub fn has_children(&self) -> bool {
        self.common().has_children
    }

    /// Get common block data
    pub fn common(&self) -> &BlockCommon {
        match_all_blocks!(self, b => &b.common)
    }

    /// Get mutable common block data
    pub fn common_mut(&mut self) -> &mut BlockCommon {
        match_all_blocks!(self, b => &mut b.common)
    }

    /// Set children
    pub fn set_children(&mut self, children: Vec<Block>) {
        self.common_mut().children = children;
    }

    /// Rich text of the text-bearing kinds, `None` for structural blocks.
    pub fn rich_text(&self) -> Option<&[RichTextItem]> {
        match self {
            Block::Paragraph(b)
            | Block::Heading1(b)
            | Block::Heading2(b)
            | Block::Heading3(b)
            | Block::BulletedListItem(b)
            | Block::NumberedListItem(b)
            | Block::Toggle(b)
            | Block::Quote(b) => Some(&b.content.rich_text),
            Block::ToDo(b) => Some(&b.content.rich_text),
            Block::Code(b) => Some(&b.content.rich_text),
            _ => None,
        }
    }

    /// Whether the fetch layer should descend into this block's children.
    ///
    /// Linked databases expose rows rather than children, and the API
    /// refuses to list children of unsupported blocks. A synced reference
    /// is resolved through its source block instead.
    pub fn expands_children(&self) -> bool {
        self.has_children()
            && !matches!(
                self,
                Block::ChildDatabase(_)
                    | Block::Unsupported(_)
                    | Block::Synced(SyncedBlock {
                        synced_from: Some(_),
                        ..
                    })
            )
    }

    /// The source block of a synced reference.
    pub fn synced_source(&self) -> Option<&BlockId> {
        match self {
            Block::Synced(SyncedBlock {
                synced_from: Some(from),
                ..
            }) => Some(&from.block_id),
            _ => None,
        }
    }

    /// Get block type name
    pub fn block_type(&self) -> &str {
        match self {
            Block::Paragraph(_) => "paragraph",
            Block::Heading1(_) => "heading_1",
            Block::Heading2(_) => "heading_2",
            Block::Heading3(_) => "heading_3",
            Block::BulletedListItem(_) => "bulleted_list_item",
            Block::NumberedListItem(_) => "numbered_list_item",
            Block::ToDo(_) => "to_do",
            Block::Toggle(_) => "toggle",
            Block::Quote(_) => "quote",
            Block::Code(_) => "code",
            Block::Divider(_) => "divider",
            Block::ChildDatabase(_) => "child_database",
            Block::Table(_) => "table",
            Block::TableRow(_) => "table_row",
            Block::ColumnList(_) => "column_list",
            Block::Column(_) => "column",
            Block::Synced(_) => "synced_block",
            Block::Unsupported(b) => &b.block_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_keeps_original_type_name() {
        let block = Block::Unsupported(UnsupportedBlock {
            common: BlockCommon::default(),
            block_type: "callout".to_string(),
        });
        assert_eq!(block.block_type(), "callout");
        assert!(block.rich_text().is_none());
    }

    #[test]
    fn test_expands_children() {
        let common = BlockCommon::default().with_children(vec![Block::Divider(DividerBlock::default())]);
        let toggle = Block::Toggle(TextBlock::new(common.clone(), Vec::new()));
        let database = Block::ChildDatabase(ChildDatabaseBlock {
            common,
            title: "Tasks".to_string(),
        });

        let reference = Block::Synced(SyncedBlock {
            common: BlockCommon {
                has_children: true,
                ..BlockCommon::default()
            },
            synced_from: Some(SyncedFrom {
                block_id: BlockId::new_v4(),
            }),
        });

        assert!(toggle.expands_children());
        assert!(!database.expands_children());
        assert!(!reference.expands_children());
        assert!(reference.synced_source().is_some());
    }
}
