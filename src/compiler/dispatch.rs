// src/compiler/dispatch.rs
//! Routes a block to the compiler for its kind.

use super::blocks::{child_database, columns, fallback, list, synced, table, text, toggle};
use super::{CompileContext, Compiled};
use crate::constants::BLOCK_MAX_COMPILE_DEPTH;
use crate::docs::{BulletPreset, NamedStyle};
use crate::model::Block;

/// Compiles `block` written at `offset`.
///
/// Blocks nested deeper than [`BLOCK_MAX_COMPILE_DEPTH`] are dropped with a
/// warning.
pub fn dispatch(block: &Block, offset: usize, ctx: &CompileContext, depth: usize) -> Compiled {
    if depth > BLOCK_MAX_COMPILE_DEPTH {
        log::warn!(
            "Skipping {} block {}: nesting deeper than {} levels",
            block.block_type(),
            block.id(),
            BLOCK_MAX_COMPILE_DEPTH
        );
        return Compiled::empty();
    }

    log::debug!(
        "Compiling {} block {} at index {} (depth {})",
        block.block_type(),
        block.id(),
        offset,
        depth
    );

    match block {
        Block::Paragraph(b) => text::paragraph(b, offset, ctx, depth),
        Block::Heading1(b) => text::heading(b, NamedStyle::Heading1, offset, ctx, depth),
        Block::Heading2(b) => text::heading(b, NamedStyle::Heading2, offset, ctx, depth),
        Block::Heading3(b) => text::heading(b, NamedStyle::Heading3, offset, ctx, depth),
        Block::Quote(b) => text::quote(b, offset),
        Block::Code(b) => text::code(b, offset),
        Block::Divider(_) => text::divider(offset),
        Block::BulletedListItem(b) => list::list_item(
            list::ListItem::new(b, BulletPreset::DiscCircleSquare),
            offset,
            ctx,
            depth,
        ),
        Block::NumberedListItem(b) => list::list_item(
            list::ListItem::new(b, BulletPreset::DecimalAlphaRoman),
            offset,
            ctx,
            depth,
        ),
        Block::ToDo(b) => list::list_item(list::ListItem::to_do(b), offset, ctx, depth),
        Block::Toggle(b) => toggle::toggle(b, offset, ctx, depth),
        Block::Table(b) => table::table(b, offset, ctx),
        Block::ColumnList(b) => columns::column_list(b, offset, ctx, depth),
        Block::Synced(b) => synced::synced(b, offset, ctx, depth),
        Block::ChildDatabase(b) => child_database::linked_database(b, offset, ctx),
        Block::TableRow(_) | Block::Column(_) | Block::Unsupported(_) => {
            fallback::unsupported(block.block_type(), offset)
        }
    }
}
