// src/placement/plan.rs
//! Turns a placement decision into a start index and prelude operations.

use super::{find_section, Section, SectionLedger};
use crate::docs::{DocumentSnapshot, Operation, ParagraphStyle, Range};
use crate::types::{DocumentId, PageId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementKind {
    /// Replace a section written earlier.
    Update,
    /// Add the page at the end of the document.
    Append,
}

/// Where a page will be compiled and what has to happen first.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementPlan {
    pub kind: PlacementKind,
    /// Index the page is compiled at.
    pub start: usize,
    /// Operations to submit ahead of the page, in the same batch.
    pub prelude: Vec<Operation>,
    /// The section being replaced, for updates.
    pub replaced: Option<Section>,
}

impl PlacementPlan {
    /// Clears `section` and leaves one unstyled empty paragraph at its start.
    pub fn update(section: Section) -> Self {
        let start = section.start;
        let mut prelude = Vec::with_capacity(4);
        if !section.is_empty() {
            prelude.push(Operation::DeleteContentRange {
                range: section.range(),
            });
        }
        prelude.push(Operation::insert_text(start, "\n"));
        prelude.extend(reset_paragraph(start));

        Self {
            kind: PlacementKind::Update,
            start,
            prelude,
            replaced: Some(section),
        }
    }

    /// Starts a new page after the current end of the document.
    pub fn append(snapshot: &DocumentSnapshot) -> Self {
        let mut at = snapshot.end_index().saturating_sub(1);
        if at <= 1 {
            return Self {
                kind: PlacementKind::Append,
                start: 1,
                prelude: Vec::new(),
                replaced: None,
            };
        }

        let mut prelude = Vec::with_capacity(4);
        // The final newline ends the last paragraph; a page break placed
        // there would share a line with its text.
        let last_has_text = snapshot
            .paragraphs()
            .last()
            .is_some_and(|paragraph| !paragraph.text.trim_end_matches('\n').is_empty());
        if last_has_text {
            prelude.push(Operation::insert_text(at, "\n"));
            at += 1;
        }
        prelude.push(Operation::InsertPageBreak { index: at });
        let start = at + 1;
        prelude.extend(reset_paragraph(start));

        Self {
            kind: PlacementKind::Append,
            start,
            prelude,
            replaced: None,
        }
    }

    /// The section a page of `length` units occupies once written.
    ///
    /// The page is written in front of an empty paragraph: the one an
    /// update's prelude inserts, or the newline that closes an appended
    /// page break. That paragraph ends the section. Only an append into an
    /// empty document has none, and the document's final newline follows
    /// the page directly.
    pub fn written_section(&self, length: usize) -> Section {
        match self.kind {
            PlacementKind::Append if self.prelude.is_empty() => {
                Section::new(self.start, self.start + length)
            }
            _ => Section::new(self.start, self.start + length + 1),
        }
    }
}

fn reset_paragraph(index: usize) -> [Operation; 2] {
    let range = Range::new(index, index + 1);
    [
        Operation::UpdateParagraphStyle {
            range,
            style: ParagraphStyle::reset(),
        },
        Operation::DeleteParagraphBullets { range },
    ]
}

/// Decides where `page` goes in `document`.
///
/// The ledger is consulted first; it only answers while the snapshot's
/// revision matches our last write.
pub fn plan_placement(
    snapshot: &DocumentSnapshot,
    document: &DocumentId,
    page: &PageId,
    ledger: &mut SectionLedger,
) -> PlacementPlan {
    let recorded = ledger
        .lookup(document, snapshot.revision_id.as_deref(), page)
        .filter(|section| section.end < snapshot.end_index());

    match recorded.or_else(|| find_section(snapshot, page)) {
        Some(section) => {
            log::info!(
                "Updating page {} in place at [{}, {})",
                page,
                section.start,
                section.end
            );
            PlacementPlan::update(section)
        }
        None => {
            log::info!("Appending page {} to document {}", page, document);
            PlacementPlan::append(snapshot)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::DocumentBuffer;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_append_to_empty_document_has_no_prelude() {
        let plan = PlacementPlan::append(&DocumentBuffer::new().snapshot("doc"));
        assert_eq!(plan.start, 1);
        assert!(plan.prelude.is_empty());
    }

    #[test]
    fn test_append_after_text_adds_line_then_break() {
        let buffer = DocumentBuffer::from_text("Hello\n");
        let plan = PlacementPlan::append(&buffer.snapshot("doc"));

        assert_eq!(plan.start, 8);
        assert_eq!(plan.prelude[0], Operation::insert_text(6, "\n"));
        assert_eq!(plan.prelude[1], Operation::InsertPageBreak { index: 7 });

        let mut replay = buffer.clone();
        replay.apply_all(&plan.prelude).unwrap();
        replay
            .apply_all(&[Operation::insert_text(plan.start, "Next\n")])
            .unwrap();
        assert_eq!(replay.outline(), "Hello\n<page break>Next\n\n\n");

        // The break's own newline is part of the new page's section.
        let section = plan.written_section(5);
        assert_eq!(section, Section::new(8, 14));
        assert_eq!(section.end, replay.end_index() - 1);
    }

    #[test]
    fn test_append_to_empty_document_ends_before_final_newline() {
        let buffer = DocumentBuffer::new();
        let plan = PlacementPlan::append(&buffer.snapshot("doc"));
        let mut replay = buffer.clone();
        replay
            .apply_all(&[Operation::insert_text(plan.start, "Only\n")])
            .unwrap();

        assert_eq!(plan.written_section(5), Section::new(1, 6));
        assert_eq!(replay.end_index() - 1, 6);
    }

    #[test]
    fn test_update_prelude() {
        let plan = PlacementPlan::update(Section::new(10, 30));
        assert_eq!(
            plan.prelude[0..2],
            [
                Operation::DeleteContentRange {
                    range: Range::new(10, 30)
                },
                Operation::insert_text(10, "\n"),
            ]
        );
        assert_eq!(plan.prelude.len(), 4);
        assert_eq!(plan.written_section(25), Section::new(10, 36));
    }
}
