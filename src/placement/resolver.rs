// src/placement/resolver.rs
//! Finds a previously written page in a live document by its identity line.
//!
//! A page section runs from the start of its title text to the start of the
//! next page's title paragraph. The last page runs up to the document's
//! final newline. Runs of empty lines never end a section; tables and
//! column layouts produce them inside a page.

use super::Section;
use crate::compiler::page_marker;
use crate::constants::PAGE_MARKER_PREFIX;
use crate::docs::{DocumentSnapshot, ParagraphText};
use crate::types::PageId;

/// Locates the section written for `page`, if any.
pub fn find_section(snapshot: &DocumentSnapshot, page: &PageId) -> Option<Section> {
    let marker = page_marker(page);
    let paragraphs = snapshot.paragraphs();
    let position = paragraphs
        .iter()
        .position(|paragraph| paragraph.text.contains(&marker))?;

    let title = if position > 0 {
        &paragraphs[position - 1]
    } else {
        &paragraphs[position]
    };
    let start = title.text_start;
    let end = section_end(snapshot, &paragraphs, position);

    log::debug!(
        "Found page {} in document {} at [{}, {})",
        page,
        snapshot.document_id,
        start,
        end
    );
    Some(Section::new(start, end.max(start)))
}

fn section_end(snapshot: &DocumentSnapshot, paragraphs: &[ParagraphText], position: usize) -> usize {
    let next_marker = paragraphs
        .iter()
        .enumerate()
        .skip(position + 1)
        .find(|(_, paragraph)| paragraph.text.contains(PAGE_MARKER_PREFIX));

    match next_marker {
        // The next page starts at its title paragraph, page break included.
        Some((index, _)) if index - 1 > position => paragraphs[index - 1].start_index,
        Some((_, paragraph)) => paragraph.start_index,
        None => last_section_end(snapshot, &paragraphs[position]),
    }
}

/// End of the last page in the document: everything up to the final
/// newline, trailing blank paragraphs included.
/// This matches [`PlacementPlan::written_section`](super::PlacementPlan::written_section).
fn last_section_end(snapshot: &DocumentSnapshot, marker: &ParagraphText) -> usize {
    snapshot.end_index().saturating_sub(1).max(marker.text_start)
}
