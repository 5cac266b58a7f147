// tests/page_compiler.rs
//! Whole pages: header, property summary and blocks, replayed into an
//! empty document. Outlines are kept as `insta` snapshots under
//! `tests/snapshots/`.

use indexmap::IndexMap;
use notion2gdocs::{
    compile_page, preview, Annotations, Block, BlockCommon, CodeBlock, CompileContext,
    DividerBlock, DocumentBuffer, NamedStyle, Operation, Page, PageBundle, PageId, PageTitle,
    ParagraphStyle, PropertyName, PropertyValue, RichTextItem, TextBlock, TextBlockContent,
    ToDoBlock, UnsupportedBlock,
};
use pretty_assertions::assert_eq;
use std::collections::HashMap;

const PAGE_ID: &str = "1234567890abcdef1234567890abcdef";

fn rich(text: &str) -> Vec<RichTextItem> {
    vec![RichTextItem::plain_text(text)]
}

fn text(text: &str, children: Vec<Block>) -> TextBlock {
    TextBlock::new(BlockCommon::default().with_children(children), rich(text))
}

fn page(title: &str, blocks: Vec<Block>) -> Page {
    Page {
        id: PageId::parse(PAGE_ID).unwrap(),
        title: PageTitle::new(title),
        url: format!("https://www.notion.so/{}", PAGE_ID),
        blocks,
        properties: IndexMap::new(),
        archived: false,
        last_edited_time: None,
    }
}

fn weekly_review() -> Page {
    page(
        "Weekly Review",
        vec![
            Block::Heading1(text("Summary", Vec::new())),
            Block::Paragraph(TextBlock::new(
                BlockCommon::default(),
                vec![
                    RichTextItem::plain_text("Shipped the "),
                    RichTextItem::annotated(
                        "importer",
                        Annotations {
                            bold: true,
                            ..Default::default()
                        },
                    ),
                    RichTextItem::plain_text("."),
                ],
            )),
            Block::BulletedListItem(text(
                "Backend",
                vec![Block::BulletedListItem(text(
                    "Parser",
                    vec![Block::BulletedListItem(text("Tokens", Vec::new()))],
                ))],
            )),
            Block::NumberedListItem(text("Review notes", Vec::new())),
            Block::Divider(DividerBlock::default()),
            Block::ToDo(ToDoBlock {
                common: BlockCommon::default(),
                content: TextBlockContent::new(rich("Write docs")),
                checked: false,
            }),
            Block::Code(CodeBlock {
                common: BlockCommon::default(),
                language: "shell".to_string(),
                content: TextBlockContent::new(rich("cargo run")),
            }),
            Block::Unsupported(UnsupportedBlock {
                common: BlockCommon::default(),
                block_type: "bookmark".to_string(),
            }),
        ],
    )
}

fn replay(page: &Page, ctx: &CompileContext) -> DocumentBuffer {
    let program = compile_page(page, 1, ctx);
    let mut buffer = DocumentBuffer::new();
    buffer
        .apply_all(&program.operations())
        .expect("page should replay");
    assert_eq!(buffer.len(), 1 + program.length);
    buffer
}

#[test]
fn test_weekly_review_outline() {
    let buffer = replay(&weekly_review(), &CompileContext::default());
    insta::assert_snapshot!("weekly_review_outline", buffer.outline());
}

#[test]
fn test_property_summary_outline() {
    let mut release = page(
        "Release Notes",
        vec![Block::Paragraph(text("Ready to ship.", Vec::new()))],
    );
    release
        .properties
        .insert(PropertyName::from("Name"), PropertyValue::Title(rich("Release Notes")));
    release
        .properties
        .insert(PropertyName::from("Owner"), PropertyValue::RichText(rich("Ana")));
    release
        .properties
        .insert(PropertyName::from("Estimate"), PropertyValue::Number(Some(3.0)));

    let buffer = replay(&release, &CompileContext::default());
    insta::assert_snapshot!("property_summary_outline", buffer.outline());
}

#[test]
fn test_header_operations() {
    let program = compile_page(&page("Plan", Vec::new()), 1, &CompileContext::default());
    let operations = program.operations();

    assert_eq!(
        operations[..2],
        [
            Operation::insert_text(1, "Plan\n"),
            Operation::paragraph_style(1, 5, ParagraphStyle::named(NamedStyle::Title)),
        ]
    );
    assert_eq!(
        operations[2],
        Operation::insert_text(6, "Notion Page ID: 12345678-90ab-cdef-1234-567890abcdef\n")
    );
}

#[test]
fn test_page_compiled_further_in_is_shifted() {
    let page = weekly_review();
    let ctx = CompileContext::default();
    let at_start = compile_page(&page, 1, &ctx);
    let further = compile_page(&page, 41, &ctx);

    let shifted: Vec<Operation> = at_start
        .operations()
        .iter()
        .map(|operation| operation.shifted(40))
        .collect();
    assert_eq!(further.operations(), shifted);
    assert_eq!(further.length, at_start.length);
}

#[test]
fn test_segments_follow_blocks() {
    let page = weekly_review();
    let program = compile_page(&page, 1, &CompileContext::default());

    assert_eq!(program.segments.len(), page.blocks.len() + 1);
    let total: usize = program.segments.iter().map(|segment| segment.length).sum();
    assert_eq!(total, program.length);
}

#[test]
fn test_preview_text() {
    let bundle = PageBundle {
        page: page("Plan", vec![Block::Quote(text("Keep it small.", Vec::new()))]),
        references: HashMap::new(),
        database_rows: HashMap::new(),
    };
    let compiled = preview(&bundle, true).unwrap();
    assert_eq!(
        compiled.text,
        "Plan\nNotion Page ID: 12345678-90ab-cdef-1234-567890abcdef\n\nKeep it small.\n\n"
    );
}
