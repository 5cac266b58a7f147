// src/compiler/blocks/synced.rs
//! Synced blocks.
//!
//! An original synced block renders its own children. A reference renders
//! the original's children, looked up through the context. When they
//! cannot be found a placeholder line is written instead.

use crate::compiler::dispatch::dispatch;
use crate::compiler::{CompileContext, Compiled};
use crate::model::{Block, SyncedBlock};

pub fn synced(block: &SyncedBlock, offset: usize, ctx: &CompileContext, depth: usize) -> Compiled {
    let source_id = block
        .synced_from
        .as_ref()
        .map(|from| &from.block_id)
        .unwrap_or(&block.common.id);

    let content: Option<&[Block]> = match &block.synced_from {
        None => Some(block.common.children.as_slice()),
        Some(from) => ctx.references.and_then(|refs| refs.resolve(&from.block_id)),
    };

    match content.filter(|blocks| !blocks.is_empty()) {
        Some(blocks) => compile_sequence(blocks, offset, ctx, depth),
        None => {
            log::warn!(
                "Synced block {} has no content available (source {})",
                block.common.id,
                source_id
            );
            let mut result = Compiled::empty();
            result.insert(offset, format!("[Synced block: {}]\n", source_id));
            result.insert(offset + result.length, "\n");
            result
        }
    }
}

/// Compiles `blocks` one after another at the same depth, then a newline.
fn compile_sequence(
    blocks: &[Block],
    offset: usize,
    ctx: &CompileContext,
    depth: usize,
) -> Compiled {
    let mut result = Compiled::empty();
    let mut after_marker = ctx.follows_indent_marker();
    let mut cursor = offset;

    for block in blocks {
        let compiled = dispatch(block, cursor, &ctx.with_indent_marker(after_marker), depth);
        if compiled.is_empty() {
            continue;
        }
        if result.operations.is_empty() {
            result.bullets_first_paragraph = compiled.bullets_first_paragraph;
        }
        // The first block's bullets took the tab in front of this block.
        if after_marker && compiled.bullets_first_paragraph {
            cursor -= 1;
        }
        after_marker = false;
        cursor += compiled.length;
        result.append(compiled);
    }

    result.insert(cursor, "\n");
    result
}
