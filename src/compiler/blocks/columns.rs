// src/compiler/blocks/columns.rs
//! Column layouts are flattened: column contents follow one another
//! between two empty lines.

use crate::compiler::dispatch::dispatch;
use crate::compiler::{CompileContext, Compiled};
use crate::model::{Block, ColumnListBlock};

pub fn column_list(
    block: &ColumnListBlock,
    offset: usize,
    ctx: &CompileContext,
    depth: usize,
) -> Compiled {
    let ctx = ctx.with_indent_marker(false);
    let mut result = Compiled::empty();
    result.insert(offset, "\n");

    for column in &block.common.children {
        let contents: &[Block] = match column {
            Block::Column(_) => column.children(),
            other => std::slice::from_ref(other),
        };
        for child in contents {
            let compiled = dispatch(child, offset + result.length, &ctx, depth + 1);
            result.append(compiled);
        }
    }

    result.insert(offset + result.length, "\n");
    result
}
