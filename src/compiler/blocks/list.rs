// src/compiler/blocks/list.rs
//! Bulleted, numbered and to-do items.
//!
//! Bullets are created last, after the children are in place. Creating them
//! removes the indent tab in front of the item, and doing that before the
//! children are written would move every child position by one.

use super::{empty_line_with_children, push_span_styles};
use crate::compiler::children::{compile_children, ChildStrategy};
use crate::compiler::rich_text::{flatten, strip_line_leading_tabs};
use crate::compiler::{CompileContext, Compiled};
use crate::docs::{utf16_len, BulletPreset, Operation, TextStyle};
use crate::model::{BlockCommon, TextBlock, ToDoBlock};
use crate::types::RichTextItem;

/// The parts of a list-like block the compiler needs.
#[derive(Debug, Clone, Copy)]
pub struct ListItem<'a> {
    pub common: &'a BlockCommon,
    pub rich_text: &'a [RichTextItem],
    pub preset: BulletPreset,
    pub checked: bool,
}

impl<'a> ListItem<'a> {
    pub fn new(block: &'a TextBlock, preset: BulletPreset) -> Self {
        Self {
            common: &block.common,
            rich_text: &block.content.rich_text,
            preset,
            checked: false,
        }
    }

    pub fn to_do(block: &'a ToDoBlock) -> Self {
        Self {
            common: &block.common,
            rich_text: &block.content.rich_text,
            preset: BulletPreset::Checkbox,
            checked: block.checked,
        }
    }
}

pub fn list_item(item: ListItem<'_>, offset: usize, ctx: &CompileContext, depth: usize) -> Compiled {
    let text = strip_line_leading_tabs(&flatten(item.rich_text));
    if text.is_empty() {
        return empty_line_with_children(&item.common.children, offset, ctx, depth);
    }

    let len = utf16_len(&text);
    let mut result = Compiled::empty();
    result.insert(offset, format!("{}\n", text));
    push_span_styles(&mut result, item.rich_text, &text, offset);
    if item.checked {
        result.push(Operation::text_style(
            offset,
            offset + len,
            TextStyle::new().strikethrough(),
        ));
    }

    let strategy = ChildStrategy::NestInsideBulletRange;
    result.append(compile_children(
        &item.common.children,
        strategy.children_offset(offset, len),
        ctx,
        depth,
        strategy,
    ));

    result.push(Operation::bullets(offset, offset + len, item.preset));
    result.bullets_first_paragraph = true;
    result
}
