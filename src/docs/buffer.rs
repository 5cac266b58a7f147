// src/docs/buffer.rs
//! In-memory model of a document body that operations can be replayed on.
//!
//! The model follows the Docs API rules that affect indexes:
//!
//! - indexes are 1-based UTF-16 offsets and the body always ends in a newline
//!   that can never be deleted;
//! - `insertTable` adds a newline before the table, then one unit for the
//!   table start, one per row, two per cell (cell start plus its newline) and
//!   one for the table end;
//! - `insertPageBreak` adds the break followed by a newline;
//! - `createParagraphBullets` removes the leading tabs of every paragraph
//!   it touches.
//!
//! Character styles are bounds-checked but not stored; paragraph bullets and
//! named styles are kept on each paragraph's newline.

use super::operation::{BulletPreset, Operation, Range};
use super::snapshot::{Body, DocumentSnapshot, Paragraph, ParagraphElement, StructuralElement, TextRun};
use super::style::NamedStyle;
use crate::error::{AppError, Result};
use serde_json::json;

const NEWLINE: u16 = b'\n' as u16;
const TAB: u16 = b'\t' as u16;
const TABLE_START: u16 = 0xE000;
const ROW_START: u16 = 0xE001;
const CELL_START: u16 = 0xE002;
const TABLE_END: u16 = 0xE003;
const PAGE_BREAK: u16 = 0xE004;

fn is_structural(unit: u16) -> bool {
    matches!(unit, TABLE_START | ROW_START | CELL_START | TABLE_END)
}

/// Paragraph-level state carried by a paragraph's newline.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParagraphMark {
    pub bullet: Option<BulletPreset>,
    pub named_style: Option<NamedStyle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentBuffer {
    units: Vec<u16>,
    marks: Vec<ParagraphMark>,
    revision: u64,
}

impl Default for DocumentBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuffer {
    /// An empty document: a single newline.
    pub fn new() -> Self {
        Self {
            units: vec![NEWLINE],
            marks: vec![ParagraphMark::default()],
            revision: 0,
        }
    }

    /// A document whose body is `text`, with the final newline added when missing.
    pub fn from_text(text: &str) -> Self {
        let mut units: Vec<u16> = text.encode_utf16().collect();
        if units.last() != Some(&NEWLINE) {
            units.push(NEWLINE);
        }
        let marks = vec![ParagraphMark::default(); units.len()];
        Self {
            units,
            marks,
            revision: 0,
        }
    }

    /// Body length in UTF-16 units, final newline included.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.len() == 1
    }

    /// One past the final newline, as reported by the API.
    pub fn end_index(&self) -> usize {
        self.units.len() + 1
    }

    pub fn revision_id(&self) -> String {
        format!("rev-{}", self.revision)
    }

    /// Raw body text. Table structure and page breaks appear as
    /// private-use characters.
    pub fn text(&self) -> String {
        String::from_utf16_lossy(&self.units)
    }

    /// Text of `[start, end)` with structural units dropped.
    pub fn text_in(&self, range: Range) -> String {
        let start = range.start_index.saturating_sub(1).min(self.units.len());
        let end = range.end_index.saturating_sub(1).min(self.units.len());
        let units: Vec<u16> = self.units[start..end]
            .iter()
            .copied()
            .filter(|unit| !is_structural(*unit) && *unit != PAGE_BREAK)
            .collect();
        String::from_utf16_lossy(&units)
    }

    /// Paragraph state of the paragraph holding `index`.
    pub fn paragraph_at(&self, index: usize) -> Option<ParagraphMark> {
        let pos = index.checked_sub(1)?;
        if pos >= self.units.len() || is_structural(self.units[pos]) {
            return None;
        }
        let (_, newline) = self.paragraph_bounds(pos);
        Some(self.marks[newline])
    }

    /// Applies `operations` in order as one atomic batch.
    ///
    /// On error the buffer is left untouched, like a rejected `batchUpdate`.
    pub fn apply_all(&mut self, operations: &[Operation]) -> Result<()> {
        let mut scratch = self.clone();
        for operation in operations {
            scratch.apply(operation)?;
        }
        scratch.revision += 1;
        *self = scratch;
        Ok(())
    }

    fn apply(&mut self, operation: &Operation) -> Result<()> {
        match operation {
            Operation::InsertText { index, text } => {
                self.check_insert(operation, *index)?;
                let units: Vec<u16> = text.encode_utf16().collect();
                self.insert_units(*index - 1, &units);
            }
            Operation::InsertTable {
                index,
                rows,
                columns,
            } => {
                self.check_insert(operation, *index)?;
                let mut units = vec![NEWLINE, TABLE_START];
                for _ in 0..*rows {
                    units.push(ROW_START);
                    for _ in 0..*columns {
                        units.extend([CELL_START, NEWLINE]);
                    }
                }
                units.push(TABLE_END);
                self.insert_units(*index - 1, &units);
            }
            Operation::InsertPageBreak { index } => {
                self.check_insert(operation, *index)?;
                self.insert_units(*index - 1, &[PAGE_BREAK, NEWLINE]);
            }
            Operation::DeleteContentRange { range } => {
                self.check_range(operation, *range, self.units.len())?;
                let start = range.start_index - 1;
                let end = range.end_index - 1;
                self.units.drain(start..end);
                self.marks.drain(start..end);
            }
            Operation::UpdateTextStyle { range, .. } => {
                self.check_range(operation, *range, self.units.len() + 1)?;
            }
            Operation::UpdateParagraphStyle { range, style } => {
                self.check_range(operation, *range, self.units.len() + 1)?;
                if let Some(named) = style.named_style {
                    for (_, newline) in self.paragraphs_overlapping(*range) {
                        self.marks[newline].named_style = Some(named);
                    }
                }
            }
            Operation::CreateParagraphBullets { range, preset } => {
                self.check_range(operation, *range, self.units.len() + 1)?;
                let paragraphs = self.paragraphs_overlapping(*range);
                // Back to front so earlier paragraph positions stay valid.
                for (start, newline) in paragraphs.into_iter().rev() {
                    self.marks[newline].bullet = Some(*preset);
                    let tabs = self.units[start..newline]
                        .iter()
                        .take_while(|unit| **unit == TAB)
                        .count();
                    self.units.drain(start..start + tabs);
                    self.marks.drain(start..start + tabs);
                }
            }
            Operation::DeleteParagraphBullets { range } => {
                self.check_range(operation, *range, self.units.len() + 1)?;
                for (_, newline) in self.paragraphs_overlapping(*range) {
                    self.marks[newline].bullet = None;
                }
            }
        }
        Ok(())
    }

    fn check_insert(&self, operation: &Operation, index: usize) -> Result<()> {
        if index == 0 || index > self.units.len() {
            return Err(AppError::OperationOutOfBounds {
                operation: operation.kind(),
                index,
                length: self.units.len(),
            });
        }
        Ok(())
    }

    fn check_range(&self, operation: &Operation, range: Range, max_end: usize) -> Result<()> {
        if range.start_index == 0 || range.is_empty() {
            return Err(AppError::OperationOutOfBounds {
                operation: operation.kind(),
                index: range.start_index,
                length: self.units.len(),
            });
        }
        if range.end_index > max_end {
            return Err(AppError::OperationOutOfBounds {
                operation: operation.kind(),
                index: range.end_index,
                length: self.units.len(),
            });
        }
        Ok(())
    }

    /// Inserts at a 0-based position. New newlines take on the state of
    /// the paragraph they split.
    fn insert_units(&mut self, pos: usize, units: &[u16]) {
        let inherited = self.units[pos..]
            .iter()
            .position(|unit| *unit == NEWLINE)
            .map(|offset| self.marks[pos + offset])
            .unwrap_or_default();
        let marks = units.iter().map(|unit| {
            if *unit == NEWLINE {
                inherited
            } else {
                ParagraphMark::default()
            }
        });
        self.marks.splice(pos..pos, marks);
        self.units.splice(pos..pos, units.iter().copied());
    }

    /// 0-based `(first unit, newline)` of the paragraph holding `pos`.
    fn paragraph_bounds(&self, pos: usize) -> (usize, usize) {
        let mut start = pos;
        while start > 0 && self.units[start - 1] != NEWLINE && !is_structural(self.units[start - 1]) {
            start -= 1;
        }
        let newline = self.units[pos..]
            .iter()
            .position(|unit| *unit == NEWLINE)
            .map(|offset| pos + offset)
            .unwrap_or(self.units.len() - 1);
        (start, newline)
    }

    fn paragraphs_overlapping(&self, range: Range) -> Vec<(usize, usize)> {
        let end = (range.end_index - 1).min(self.units.len());
        let mut pos = range.start_index - 1;
        let mut found = Vec::new();
        while pos < end {
            if is_structural(self.units[pos]) {
                pos += 1;
                continue;
            }
            let (start, newline) = self.paragraph_bounds(pos);
            found.push((start, newline));
            pos = newline + 1;
        }
        found
    }

    /// The body as `documents.get` would describe it.
    pub fn snapshot(&self, document_id: &str) -> DocumentSnapshot {
        let mut content = vec![StructuralElement {
            start_index: 0,
            end_index: 1,
            section_break: Some(json!({})),
            ..StructuralElement::default()
        }];

        let mut pos = 0;
        while pos < self.units.len() {
            if self.units[pos] == TABLE_START {
                let end = self.units[pos..]
                    .iter()
                    .position(|unit| *unit == TABLE_END)
                    .map(|offset| pos + offset)
                    .unwrap_or(self.units.len() - 1);
                content.push(StructuralElement {
                    start_index: pos + 1,
                    end_index: end + 2,
                    table: Some(json!({})),
                    ..StructuralElement::default()
                });
                pos = end + 1;
                continue;
            }

            let (_, newline) = self.paragraph_bounds(pos);
            content.push(StructuralElement {
                start_index: pos + 1,
                end_index: newline + 2,
                paragraph: Some(self.paragraph_elements(pos, newline)),
                ..StructuralElement::default()
            });
            pos = newline + 1;
        }

        DocumentSnapshot {
            document_id: document_id.to_string(),
            revision_id: Some(self.revision_id()),
            body: Body { content },
        }
    }

    fn paragraph_elements(&self, start: usize, newline: usize) -> Paragraph {
        let mut elements = Vec::new();
        let mut run_start = start;
        for pos in start..=newline {
            if self.units[pos] == PAGE_BREAK {
                if pos > run_start {
                    elements.push(self.text_run(run_start, pos));
                }
                elements.push(ParagraphElement {
                    start_index: pos + 1,
                    end_index: pos + 2,
                    page_break: Some(json!({})),
                    ..ParagraphElement::default()
                });
                run_start = pos + 1;
            }
        }
        elements.push(self.text_run(run_start, newline + 1));
        Paragraph { elements }
    }

    fn text_run(&self, start: usize, end: usize) -> ParagraphElement {
        ParagraphElement {
            start_index: start + 1,
            end_index: end + 1,
            text_run: Some(TextRun {
                content: String::from_utf16_lossy(&self.units[start..end]),
            }),
            ..ParagraphElement::default()
        }
    }

    /// Human-readable rendering used by snapshot tests and `--dry-run`.
    ///
    /// One line per paragraph, prefixed with its named style and bullet.
    /// Tabs show as `→`, page breaks as `<page break>` and tables as a
    /// `| cell | cell |` line per row.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        let mut pos = 0;
        while pos < self.units.len() {
            if self.units[pos] == TABLE_START {
                pos = self.outline_table(pos, &mut out);
                continue;
            }
            let (_, newline) = self.paragraph_bounds(pos);
            let mark = self.marks[newline];
            if let Some(named) = mark.named_style.filter(|n| *n != NamedStyle::NormalText) {
                out.push_str(&format!("[{}] ", named.as_str()));
            }
            if let Some(bullet) = mark.bullet {
                out.push_str(match bullet {
                    BulletPreset::DiscCircleSquare => "• ",
                    BulletPreset::DecimalAlphaRoman => "1. ",
                    BulletPreset::Checkbox => "☐ ",
                    BulletPreset::ArrowDiamondDisc => "▸ ",
                });
            }
            out.push_str(&render_units(&self.units[pos..newline]));
            out.push('\n');
            pos = newline + 1;
        }
        out
    }

    fn outline_table(&self, table_start: usize, out: &mut String) -> usize {
        let mut pos = table_start + 1;
        let mut row: Vec<String> = Vec::new();
        let mut cell: Vec<u16> = Vec::new();
        let flush_row = |row: &mut Vec<String>, out: &mut String| {
            if !row.is_empty() {
                out.push_str(&format!("| {} |\n", row.join(" | ")));
                row.clear();
            }
        };
        while pos < self.units.len() {
            match self.units[pos] {
                TABLE_END => {
                    flush_row(&mut row, out);
                    return pos + 1;
                }
                ROW_START => flush_row(&mut row, out),
                CELL_START => cell.clear(),
                NEWLINE => {
                    row.push(render_units(&cell));
                    cell.clear();
                }
                unit => cell.push(unit),
            }
            pos += 1;
        }
        flush_row(&mut row, out);
        pos
    }
}

fn render_units(units: &[u16]) -> String {
    String::from_utf16_lossy(units)
        .replace('\t', "→")
        .replace('\u{E004}', "<page break>")
}
