// src/compiler/blocks/child_database.rs
//! Linked (child) databases.
//!
//! The database itself is not copied. A link back to Notion is written,
//! followed by a short note and, when the rows were fetched, a plain pipe
//! table of their properties.

use crate::compiler::{CompileContext, Compiled};
use crate::constants::MONOSPACE_FONT;
use crate::docs::{utf16_len, Operation, RgbColor, TextStyle};
use crate::model::{ChildDatabaseBlock, Page};
use crate::types::PropertyName;

const DESCRIPTION: &str = "View this database's full contents in Notion.";

pub fn linked_database(block: &ChildDatabaseBlock, offset: usize, ctx: &CompileContext) -> Compiled {
    let title = if block.title.trim().is_empty() {
        "Linked Database".to_string()
    } else {
        format!("{} (linked database)", block.title)
    };

    let mut result = Compiled::empty();

    let title_len = utf16_len(&title);
    result.insert(offset, format!("{}\n", title));
    result.push(Operation::text_style(
        offset,
        offset + title_len,
        TextStyle::new()
            .bold()
            .foreground(RgbColor::new(0.0, 0.3, 0.8))
            .link(block.common.id.notion_url()),
    ));

    let description_at = offset + result.length;
    result.insert(description_at, format!("{}\n", DESCRIPTION));
    result.push(Operation::text_style(
        description_at,
        description_at + utf16_len(DESCRIPTION),
        TextStyle::new().italic().foreground(RgbColor::gray(0.5)),
    ));

    let rows = ctx
        .database_rows
        .and_then(|source| source.rows(&block.common.id))
        .filter(|rows| !rows.is_empty());
    if let Some(rows) = rows {
        let table = rows_table(rows);
        let table_at = offset + result.length;
        result.insert(table_at, table.clone());
        result.push(Operation::text_style(
            table_at,
            table_at + utf16_len(&table) - 1,
            TextStyle::new().font_family(MONOSPACE_FONT),
        ));
    } else if ctx.database_rows.is_some() {
        log::debug!("No rows available for linked database {}", block.common.id);
    }

    result.insert(offset + result.length, "\n");
    result
}

/// `| Name | <property> | ... |` lines for each row, newline-terminated.
fn rows_table(rows: &[Page]) -> String {
    let mut columns: Vec<&PropertyName> = Vec::new();
    for row in rows {
        for (name, _) in row.header_properties() {
            if !columns.contains(&name) {
                columns.push(name);
            }
        }
    }

    let header: Vec<&str> = std::iter::once("Name")
        .chain(columns.iter().map(|name| name.as_str()))
        .collect();
    let mut out = format!("| {} |\n", header.join(" | "));
    out.push_str(&format!("|{}\n", " --- |".repeat(header.len())));

    for row in rows {
        let mut cells = vec![row.title().display_or_untitled().replace('\n', " ")];
        for column in &columns {
            let value = row
                .properties
                .get(column.as_str())
                .map(|value| value.display_value().replace('\n', " "))
                .unwrap_or_default();
            cells.push(value);
        }
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    out
}
