// src/placement/mod.rs
//! Where a page goes in the destination document.
//!
//! A page that was written before is replaced in place; anything else is
//! appended on a new page. Previous positions come from the section ledger
//! when the document is unchanged since our last write, and from a text
//! search for the page's identity line otherwise.

pub mod ledger;
pub mod plan;
pub mod resolver;

pub use ledger::SectionLedger;
pub use plan::{plan_placement, PlacementKind, PlacementPlan};
pub use resolver::find_section;

use crate::docs::Range;
use serde::{Deserialize, Serialize};

/// The half-open index range `[start, end)` a page occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub start: usize,
    pub end: usize,
}

impl Section {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn range(&self) -> Range {
        Range::new(self.start, self.end)
    }
}
