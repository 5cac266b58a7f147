// src/compiler/blocks/toggle.rs
//! Toggle blocks.
//!
//! The toggle line is bulleted straight away and its children are written
//! inline, before the toggle's own newline. A top-level toggle is followed
//! by one extra empty line.

use super::{empty_line_with_children, push_span_styles};
use crate::compiler::children::{compile_children, ChildStrategy};
use crate::compiler::rich_text::{flatten, strip_line_leading_tabs};
use crate::compiler::{CompileContext, Compiled};
use crate::docs::{utf16_len, BulletPreset, Operation};
use crate::model::TextBlock;

pub fn toggle(block: &TextBlock, offset: usize, ctx: &CompileContext, depth: usize) -> Compiled {
    let text = strip_line_leading_tabs(&flatten(&block.content.rich_text));
    if text.is_empty() {
        return empty_line_with_children(&block.common.children, offset, ctx, depth);
    }

    let len = utf16_len(&text);
    let mut result = Compiled::empty();
    result.insert(offset, format!("{}\n", text));
    push_span_styles(&mut result, &block.content.rich_text, &text, offset);
    result.push(Operation::bullets(
        offset,
        offset + len,
        BulletPreset::ArrowDiamondDisc,
    ));
    result.bullets_first_paragraph = true;

    // The bullets have already removed the indent tab in front of us.
    let start = offset - usize::from(ctx.follows_indent_marker());

    let strategy = ChildStrategy::NestOutsideBulletRange;
    result.append(compile_children(
        &block.common.children,
        strategy.children_offset(start, len),
        ctx,
        depth,
        strategy,
    ));

    if depth == 0 {
        result.insert(start + result.length, "\n");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::DocumentBuffer;
    use crate::model::{Block, BlockCommon};
    use crate::types::RichTextItem;
    use pretty_assertions::assert_eq;

    fn text_block(text: &str, children: Vec<Block>) -> TextBlock {
        TextBlock::new(
            BlockCommon::default().with_children(children),
            vec![RichTextItem::plain_text(text)],
        )
    }

    #[test]
    fn test_toggle_with_child_at_top_level() {
        let block = text_block(
            "Details",
            vec![Block::Paragraph(text_block("Inner", Vec::new()))],
        );
        let compiled = toggle(&block, 1, &CompileContext::default(), 0);

        assert_eq!(
            compiled.operations,
            vec![
                Operation::insert_text(1, "Details\n"),
                Operation::bullets(1, 8, BulletPreset::ArrowDiamondDisc),
                Operation::insert_text(8, "\t"),
                Operation::insert_text(9, "Inner\n"),
                Operation::insert_text(16, "\n"),
            ]
        );
        assert_eq!(compiled.length, 16);

        let mut buffer = DocumentBuffer::new();
        buffer.apply_all(&compiled.operations).unwrap();
        assert_eq!(buffer.len(), 17);
    }

    #[test]
    fn test_nested_toggle_has_no_trailing_line() {
        let block = text_block("Nested", Vec::new());
        let compiled = toggle(&block, 1, &CompileContext::default(), 2);
        assert_eq!(compiled.length, 7);
    }
}
