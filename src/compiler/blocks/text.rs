// src/compiler/blocks/text.rs
//! Plain text kinds: paragraphs, headings, quotes, code and dividers.

use super::{empty_line_with_children, push_span_styles};
use crate::compiler::children::{compile_children, ChildStrategy};
use crate::compiler::rich_text::flatten;
use crate::compiler::{CompileContext, Compiled};
use crate::constants::{MONOSPACE_FONT, QUOTE_INDENT_PT};
use crate::docs::{utf16_len, NamedStyle, Operation, ParagraphStyle, TextStyle};
use crate::model::{CodeBlock, TextBlock};

pub fn paragraph(block: &TextBlock, offset: usize, ctx: &CompileContext, depth: usize) -> Compiled {
    line_with_children(block, None, offset, ctx, depth)
}

pub fn heading(
    block: &TextBlock,
    style: NamedStyle,
    offset: usize,
    ctx: &CompileContext,
    depth: usize,
) -> Compiled {
    line_with_children(block, Some(style), offset, ctx, depth)
}

fn line_with_children(
    block: &TextBlock,
    style: Option<NamedStyle>,
    offset: usize,
    ctx: &CompileContext,
    depth: usize,
) -> Compiled {
    let text = flatten(&block.content.rich_text);
    if text.is_empty() {
        return empty_line_with_children(&block.common.children, offset, ctx, depth);
    }

    let len = utf16_len(&text);
    let mut result = Compiled::empty();
    result.insert(offset, format!("{}\n", text));
    if let Some(named) = style {
        result.push(Operation::paragraph_style(
            offset,
            offset + len,
            ParagraphStyle::named(named),
        ));
    }
    push_span_styles(&mut result, &block.content.rich_text, &text, offset);

    let strategy = ChildStrategy::FollowParagraph;
    result.append(compile_children(
        &block.common.children,
        strategy.children_offset(offset, len),
        ctx,
        depth,
        strategy,
    ));
    result
}

/// Quotes are indented on both the first and following lines. Children are
/// not rendered.
pub fn quote(block: &TextBlock, offset: usize) -> Compiled {
    let text = flatten(&block.content.rich_text);
    if text.is_empty() {
        return Compiled::empty();
    }

    let len = utf16_len(&text);
    let mut result = Compiled::empty();
    result.insert(offset, format!("{}\n", text));
    result.push(Operation::paragraph_style(
        offset,
        offset + len,
        ParagraphStyle::indented(QUOTE_INDENT_PT),
    ));
    push_span_styles(&mut result, &block.content.rich_text, &text, offset);
    result
}

pub fn code(block: &CodeBlock, offset: usize) -> Compiled {
    let text = flatten(&block.content.rich_text);
    if text.is_empty() {
        return Compiled::empty();
    }

    let len = utf16_len(&text);
    let mut result = Compiled::empty();
    result.insert(offset, format!("{}\n", text));
    result.push(Operation::text_style(
        offset,
        offset + len,
        TextStyle::new().font_family(MONOSPACE_FONT),
    ));
    result
}

pub fn divider(offset: usize) -> Compiled {
    let mut result = Compiled::empty();
    result.insert(offset, "---\n");
    result
}
