// src/placement/ledger.rs
//! Persisted record of where each page was last written.
//!
//! The record for a document is only trusted while the document's revision
//! is the one we left it at. Any other edit may have moved text around, so
//! the entry is dropped and placement falls back to searching.

use super::Section;
use crate::error::AppError;
use crate::types::{DocumentId, PageId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct DocumentEntry {
    revision_id: String,
    sections: IndexMap<PageId, Section>,
}

/// Page sections per document, keyed by document ID.
#[derive(Debug, Default)]
pub struct SectionLedger {
    documents: HashMap<String, DocumentEntry>,
    path: Option<PathBuf>,
}

impl SectionLedger {
    /// A ledger that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads the ledger at `path`.
    ///
    /// A missing or unreadable file gives an empty ledger; it is rebuilt by
    /// the next successful write.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let documents = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable ledger {}: {}", path.display(), e);
                HashMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                log::warn!("Cannot read ledger {}: {}", path.display(), e);
                HashMap::new()
            }
        };
        Self {
            documents,
            path: Some(path),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Writes the ledger back to where it was loaded from.
    pub async fn save(&self) -> Result<(), AppError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&self.documents)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// The recorded section of `page`, when `revision` is still current.
    ///
    /// A stale record for the document is discarded.
    pub fn lookup(
        &mut self,
        document: &DocumentId,
        revision: Option<&str>,
        page: &PageId,
    ) -> Option<Section> {
        let entry = self.documents.get(document.as_str())?;
        if Some(entry.revision_id.as_str()) != revision {
            log::debug!(
                "Ledger for {} is at {}, document is at {:?}; discarding",
                document,
                entry.revision_id,
                revision
            );
            self.documents.remove(document.as_str());
            return None;
        }
        entry.sections.get(page).copied()
    }

    /// Records `written` for `page` after a successful write.
    ///
    /// When the write replaced `replaced`, later sections move by the
    /// change in length. Without a known revision the document's record
    /// cannot be trusted again and is dropped.
    pub fn record(
        &mut self,
        document: &DocumentId,
        revision: Option<String>,
        page: &PageId,
        replaced: Option<Section>,
        written: Section,
    ) {
        let Some(revision_id) = revision else {
            self.documents.remove(document.as_str());
            return;
        };

        let entry = self
            .documents
            .entry(document.as_str().to_string())
            .or_insert_with(|| DocumentEntry {
                revision_id: revision_id.clone(),
                sections: IndexMap::new(),
            });
        entry.revision_id = revision_id;

        if let Some(old) = replaced {
            let delta = written.len() as isize - old.len() as isize;
            for (other, section) in entry.sections.iter_mut() {
                if other != page && section.start >= old.end {
                    section.start = section.start.saturating_add_signed(delta);
                    section.end = section.end.saturating_add_signed(delta);
                }
            }
        }
        entry.sections.insert(page.clone(), written);
    }

    /// Sections of `document` in recording order.
    pub fn sections(&self, document: &DocumentId) -> Vec<(PageId, Section)> {
        self.documents
            .get(document.as_str())
            .map(|entry| {
                entry
                    .sections
                    .iter()
                    .map(|(page, section)| (page.clone(), *section))
                    .collect()
            })
            .unwrap_or_default()
    }
}
