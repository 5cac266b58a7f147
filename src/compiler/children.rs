// src/compiler/children.rs
//! Child-block recursion.
//!
//! Every child is written behind a single indent tab. When the tab sits at
//! the start of a paragraph and the child bullets that paragraph, the
//! destination removes the tab while creating the bullets, so it adds
//! nothing to the length. The child reports this through
//! [`Compiled::bullets_first_paragraph`].

use super::dispatch::dispatch;
use super::{CompileContext, Compiled};
use crate::docs::Operation;
use crate::model::Block;

const INDENT_MARKER: &str = "\t";

/// How a parent positions its children relative to its own paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildStrategy {
    /// List items: children follow the item's newline; bullets are created
    /// over the item text once the children are in place.
    NestInsideBulletRange,
    /// Toggles: children are written before the toggle's own newline.
    NestOutsideBulletRange,
    /// Paragraphs and headings: children follow the newline.
    FollowParagraph,
}

impl ChildStrategy {
    /// Where children start for a parent whose text of `text_len` units
    /// begins at `offset`.
    pub fn children_offset(self, offset: usize, text_len: usize) -> usize {
        match self {
            ChildStrategy::NestOutsideBulletRange => offset + text_len,
            ChildStrategy::NestInsideBulletRange | ChildStrategy::FollowParagraph => {
                offset + text_len + 1
            }
        }
    }

    /// Whether the first marker lands at the start of a paragraph.
    pub fn starts_paragraph(self) -> bool {
        !matches!(self, ChildStrategy::NestOutsideBulletRange)
    }
}

/// Compiles `children` starting at `offset`, one indent tab per child.
pub fn compile_children(
    children: &[Block],
    offset: usize,
    ctx: &CompileContext,
    depth: usize,
    strategy: ChildStrategy,
) -> Compiled {
    let mut result = Compiled::empty();
    let mut at_paragraph_start = strategy.starts_paragraph();

    for child in children {
        let marker_at = offset + result.length;
        let child_ctx = ctx.with_indent_marker(at_paragraph_start);
        let compiled = dispatch(child, marker_at + 1, &child_ctx, depth + 1);
        if compiled.is_empty() {
            continue;
        }

        let absorbed = at_paragraph_start && compiled.bullets_first_paragraph;
        result.push(Operation::insert_text(marker_at, INDENT_MARKER));
        if !absorbed {
            result.length += 1;
        }
        result.append(compiled);
        at_paragraph_start = true;
    }

    result
}
