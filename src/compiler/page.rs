// src/compiler/page.rs
//! Whole-page compilation: header, property summary, then the blocks.

use super::dispatch::dispatch;
use super::properties::property_table;
use super::{CompileContext, Compiled};
use crate::constants::{MONOSPACE_FONT, PAGE_MARKER_PREFIX};
use crate::docs::{utf16_len, NamedStyle, Operation, ParagraphStyle, RgbColor, TextStyle};
use crate::model::Page;
use crate::types::PageId;

const PROPERTIES_HEADING: &str = "Page Properties";

/// A compiled page. `segments[0]` is the header; each top-level block
/// follows as its own segment, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct PageProgram {
    pub segments: Vec<Compiled>,
    pub length: usize,
}

impl PageProgram {
    /// All operations in submission order.
    pub fn operations(&self) -> Vec<Operation> {
        self.segments
            .iter()
            .flat_map(|segment| segment.operations.iter().cloned())
            .collect()
    }

    pub fn header(&self) -> &Compiled {
        &self.segments[0]
    }

    /// Segments after the header.
    pub fn blocks(&self) -> &[Compiled] {
        &self.segments[1..]
    }
}

/// The identity line written below every page title.
pub fn page_marker(id: &PageId) -> String {
    format!("{}{}", PAGE_MARKER_PREFIX, id.to_dashed())
}

pub fn compile_page(page: &Page, offset: usize, ctx: &CompileContext) -> PageProgram {
    let ctx = ctx.with_indent_marker(false);
    let header = compile_header(page, offset);
    let mut length = header.length;
    let mut segments = Vec::with_capacity(page.blocks.len() + 1);
    segments.push(header);

    for block in &page.blocks {
        let compiled = dispatch(block, offset + length, &ctx, 0);
        length += compiled.length;
        segments.push(compiled);
    }

    log::debug!(
        "Compiled page {} at index {}: {} blocks, {} units",
        page.id,
        offset,
        page.blocks.len(),
        length
    );
    PageProgram { segments, length }
}

fn compile_header(page: &Page, offset: usize) -> Compiled {
    let mut header = Compiled::empty();

    let title = page.title().display_or_untitled().replace('\n', " ");
    header.insert(offset, format!("{}\n", title));
    header.push(Operation::paragraph_style(
        offset,
        offset + utf16_len(&title),
        ParagraphStyle::named(NamedStyle::Title),
    ));

    let marker = page_marker(&page.id);
    let marker_at = offset + header.length;
    let link = if page.url.is_empty() {
        page.id.notion_url()
    } else {
        page.url.clone()
    };
    header.insert(marker_at, format!("{}\n", marker));
    header.push(Operation::text_style(
        marker_at,
        marker_at + utf16_len(&marker),
        TextStyle::new()
            .font_size(8.0)
            .foreground(RgbColor::gray(0.5))
            .link(link),
    ));
    header.insert(offset + header.length, "\n");

    if let Some(table) = property_table(page) {
        let heading_at = offset + header.length;
        header.insert(heading_at, format!("{}\n", PROPERTIES_HEADING));
        header.push(Operation::paragraph_style(
            heading_at,
            heading_at + utf16_len(PROPERTIES_HEADING),
            ParagraphStyle::named(NamedStyle::Heading2),
        ));

        let table_at = offset + header.length;
        let table_len = utf16_len(&table);
        header.insert(table_at, table);
        header.push(Operation::text_style(
            table_at,
            table_at + table_len - 1,
            TextStyle::new().font_family(MONOSPACE_FONT),
        ));
        header.insert(offset + header.length, "\n");
    }

    header
}
