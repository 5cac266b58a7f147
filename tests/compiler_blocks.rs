// tests/compiler_blocks.rs
//! Every block kind replayed on an empty document.
//!
//! Whatever a compiler returns, replaying its operations must grow the
//! document by exactly the length it reports.

use notion2gdocs::{
    dispatch, Annotations, Block, BlockCommon, BlockId, BulletPreset, ChildDatabaseBlock,
    CodeBlock, ColumnBlock, ColumnListBlock, CompileContext, Compiled, DividerBlock,
    DocumentBuffer, Operation, RichTextItem, SyncedBlock, SyncedFrom, TableBlock, TableRowBlock,
    TextBlock, TextBlockContent, TextStyle, ToDoBlock, UnsupportedBlock,
};
use pretty_assertions::assert_eq;
use std::collections::HashMap;

const ORIGINAL_ID: &str = "00000000-0000-0000-0000-0000000000aa";

fn rich(text: &str) -> Vec<RichTextItem> {
    vec![RichTextItem::plain_text(text)]
}

fn text_block(text: &str, children: Vec<Block>) -> TextBlock {
    TextBlock::new(BlockCommon::default().with_children(children), rich(text))
}

fn paragraph(text: &str) -> Block {
    Block::Paragraph(text_block(text, Vec::new()))
}

fn table_row(cells: &[&str]) -> Block {
    Block::TableRow(TableRowBlock {
        common: BlockCommon::default(),
        cells: cells.iter().map(|cell| rich(cell)).collect(),
    })
}

/// Compiles `block` at index 1 of an empty document and replays it.
fn replay(block: &Block, ctx: &CompileContext) -> (Compiled, DocumentBuffer) {
    let compiled = dispatch(block, 1, ctx, 0);
    let mut buffer = DocumentBuffer::new();
    buffer
        .apply_all(&compiled.operations)
        .expect("operations should replay");
    assert_eq!(
        buffer.len(),
        1 + compiled.length,
        "reported length disagrees with replay for {}",
        block.block_type()
    );
    (compiled, buffer)
}

fn outline(block: &Block) -> String {
    replay(block, &CompileContext::default()).1.outline()
}

#[test]
fn test_text_kinds() {
    assert_eq!(outline(&paragraph("Hello")), "Hello\n\n");
    assert_eq!(
        outline(&Block::Heading1(text_block("Title", Vec::new()))),
        "[HEADING_1] Title\n\n"
    );
    assert_eq!(
        outline(&Block::Heading3(text_block("Small", Vec::new()))),
        "[HEADING_3] Small\n\n"
    );
    assert_eq!(
        outline(&Block::Quote(text_block("Wise words", Vec::new()))),
        "Wise words\n\n"
    );
    assert_eq!(
        outline(&Block::Divider(DividerBlock::default())),
        "---\n\n"
    );
}

#[test]
fn test_code_keeps_lines_and_uses_monospace() {
    let block = Block::Code(CodeBlock {
        common: BlockCommon::default(),
        language: "rust".to_string(),
        content: TextBlockContent::new(rich("fn main() {\n}")),
    });
    let (compiled, buffer) = replay(&block, &CompileContext::default());

    assert_eq!(buffer.outline(), "fn main() {\n}\n\n");
    assert_eq!(
        compiled.operations[1],
        Operation::text_style(1, 14, TextStyle::new().font_family("Consolas"))
    );
}

#[test]
fn test_list_kinds() {
    assert_eq!(
        outline(&Block::BulletedListItem(text_block("Milk", Vec::new()))),
        "• Milk\n\n"
    );
    assert_eq!(
        outline(&Block::NumberedListItem(text_block("First", Vec::new()))),
        "1. First\n\n"
    );
    assert_eq!(
        outline(&Block::ToDo(ToDoBlock {
            common: BlockCommon::default(),
            content: TextBlockContent::new(rich("Done")),
            checked: true,
        })),
        "☐ Done\n\n"
    );
}

#[test]
fn test_toggle_with_children_replays() {
    let block = Block::Toggle(text_block(
        "Details",
        vec![
            paragraph("Inner"),
            Block::BulletedListItem(text_block("point", Vec::new())),
        ],
    ));
    let (compiled, _) = replay(&block, &CompileContext::default());
    assert_eq!(
        compiled.operations[1],
        Operation::bullets(1, 8, BulletPreset::ArrowDiamondDisc)
    );
}

#[test]
fn test_table_is_built_from_rows() {
    let block = Block::Table(TableBlock {
        common: BlockCommon::default()
            .with_children(vec![table_row(&["Name", "Owner"]), table_row(&["Parser", "Ana"])]),
        table_width: 2,
        has_column_header: false,
        has_row_header: false,
    });
    let ctx = CompileContext::default().with_structural_tables(true);
    let (_, buffer) = replay(&block, &ctx);

    assert!(buffer
        .outline()
        .contains("| Name | Owner |\n| Parser | Ana |\n"));
}

#[test]
fn test_table_needs_structural_tables() {
    let block = Block::Table(TableBlock {
        common: BlockCommon::default().with_children(vec![table_row(&["a"])]),
        table_width: 1,
        has_column_header: false,
        has_row_header: false,
    });
    assert!(dispatch(&block, 1, &CompileContext::default(), 0).is_empty());
}

#[test]
fn test_column_list_flattens_columns() {
    let column = |texts: &[&str]| {
        Block::Column(ColumnBlock {
            common: BlockCommon::default()
                .with_children(texts.iter().map(|text| paragraph(text)).collect()),
        })
    };
    let block = Block::ColumnList(ColumnListBlock {
        common: BlockCommon::default().with_children(vec![column(&["left"]), column(&["right"])]),
    });
    assert_eq!(outline(&block), "\nleft\nright\n\n\n");
}

#[test]
fn test_synced_original_and_reference() {
    let original_id = BlockId::parse(ORIGINAL_ID).unwrap();
    let original = Block::Synced(SyncedBlock {
        common: BlockCommon::new(original_id.clone()).with_children(vec![paragraph("Shared")]),
        synced_from: None,
    });
    assert_eq!(outline(&original), "Shared\n\n\n");

    let reference = Block::Synced(SyncedBlock {
        common: BlockCommon::default(),
        synced_from: Some(SyncedFrom {
            block_id: original_id.clone(),
        }),
    });
    let references: HashMap<BlockId, Vec<Block>> =
        HashMap::from([(original_id, vec![paragraph("Shared")])]);
    let ctx = CompileContext::default().with_references(&references);
    let (_, buffer) = replay(&reference, &ctx);
    assert_eq!(buffer.outline(), "Shared\n\n\n");
}

#[test]
fn test_unresolved_synced_reference_writes_placeholder() {
    let reference = Block::Synced(SyncedBlock {
        common: BlockCommon::default(),
        synced_from: Some(SyncedFrom {
            block_id: BlockId::parse(ORIGINAL_ID).unwrap(),
        }),
    });
    assert_eq!(
        outline(&reference),
        "[Synced block: 000000000000000000000000000000aa]\n\n\n"
    );
}

#[test]
fn test_linked_database_without_rows() {
    let block = Block::ChildDatabase(ChildDatabaseBlock {
        common: BlockCommon::default(),
        title: "Tasks".to_string(),
    });
    assert_eq!(
        outline(&block),
        "Tasks (linked database)\nView this database's full contents in Notion.\n\n\n"
    );
}

#[test]
fn test_unsupported_kind_is_named() {
    let block = Block::Unsupported(UnsupportedBlock {
        common: BlockCommon::default(),
        block_type: "embed".to_string(),
    });
    assert_eq!(outline(&block), "[Unsupported block type: embed]\n\n");
}

#[test]
fn test_annotations_follow_utf16_offsets() {
    let block = Block::Paragraph(TextBlock::new(
        BlockCommon::default(),
        vec![
            RichTextItem::plain_text("🚀 "),
            RichTextItem::annotated(
                "launch",
                Annotations {
                    italic: true,
                    ..Default::default()
                },
            ),
        ],
    ));
    let (compiled, _) = replay(&block, &CompileContext::default());
    assert_eq!(
        compiled.operations[1],
        Operation::text_style(4, 10, TextStyle::new().italic())
    );
}
