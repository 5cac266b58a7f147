// src/compiler/blocks/table.rs
//! Tables as real document tables.
//!
//! `insertTable` lays out a table as: a newline, the table start, then per
//! row one row start and per cell a cell start plus the cell's newline, and
//! finally the table end. Cell text is written at the cell's newline, walking
//! the table front to back so every earlier index stays valid.

use crate::compiler::rich_text::{flatten, span_styles};
use crate::compiler::{CompileContext, Compiled};
use crate::docs::{utf16_len, Operation, TextStyle};
use crate::model::{Block, TableBlock};
use crate::types::RichTextItem;

pub fn table(block: &TableBlock, offset: usize, ctx: &CompileContext) -> Compiled {
    let rows = &block.common.children;
    let columns = block.table_width;
    if !ctx.structural_tables || rows.is_empty() || columns == 0 {
        log::debug!(
            "Skipping table {} ({} rows, {} columns, structural tables {})",
            block.common.id,
            rows.len(),
            columns,
            ctx.structural_tables
        );
        return Compiled::empty();
    }

    let mut result = Compiled::empty();
    result.insert(offset, "\n");
    result.push(Operation::InsertTable {
        index: offset + 1,
        rows: rows.len(),
        columns,
    });

    // Past our newline and the table's own.
    let mut cursor = offset + 2;
    for (row_index, row) in rows.iter().enumerate() {
        cursor += 1;
        let cells: &[Vec<RichTextItem>] = match row {
            Block::TableRow(row) => &row.cells,
            _ => &[],
        };

        for column_index in 0..columns {
            cursor += 2;
            let Some(cell) = cells.get(column_index) else {
                continue;
            };
            let text = flatten(cell);
            let len = utf16_len(&text);
            if len == 0 {
                continue;
            }

            result.push(Operation::insert_text(cursor, text));
            for (start, end, style) in span_styles(cell, cursor) {
                result.push(Operation::text_style(start, end, style));
            }
            let is_header = (row_index == 0 && block.has_column_header)
                || (column_index == 0 && block.has_row_header);
            if is_header {
                result.push(Operation::text_style(
                    cursor,
                    cursor + len,
                    TextStyle::new().bold(),
                ));
            }
            cursor += len;
        }
    }

    // Past the last cell's newline and the table end.
    cursor += 2;
    result.push(Operation::insert_text(cursor, "\n"));
    cursor += 1;

    result.length = cursor - offset;
    result
}
