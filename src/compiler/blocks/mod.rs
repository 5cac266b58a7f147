// src/compiler/blocks/mod.rs
//! One compiler per block kind.

pub mod child_database;
pub mod columns;
pub mod fallback;
pub mod list;
pub mod synced;
pub mod table;
pub mod text;
pub mod toggle;

use super::children::{compile_children, ChildStrategy};
use super::rich_text::span_styles;
use super::{CompileContext, Compiled};
use crate::docs::Operation;
use crate::model::Block;
use crate::types::RichTextItem;

/// A block with no text of its own but with children still gets a line,
/// so the children have a paragraph to follow.
pub(crate) fn empty_line_with_children(
    children: &[Block],
    offset: usize,
    ctx: &CompileContext,
    depth: usize,
) -> Compiled {
    if children.is_empty() {
        return Compiled::empty();
    }

    let mut result = Compiled::empty();
    result.insert(offset, "\n");
    let strategy = ChildStrategy::FollowParagraph;
    result.append(compile_children(
        children,
        strategy.children_offset(offset, 0),
        ctx,
        depth,
        strategy,
    ));
    result
}

/// Adds annotation styles for `spans` written at `offset` as `written`.
///
/// Skipped when the text was altered before insertion, since span offsets
/// would no longer line up.
pub(crate) fn push_span_styles(
    result: &mut Compiled,
    spans: &[RichTextItem],
    written: &str,
    offset: usize,
) {
    if super::rich_text::flatten(spans) != written {
        return;
    }
    for (start, end, style) in span_styles(spans, offset) {
        result.push(Operation::text_style(start, end, style));
    }
}
