// src/docs/snapshot.rs
//! Read-only view of a live document, as returned by `documents.get`.
//!
//! Only the parts placement needs are modelled: the body's top-level
//! structural elements and the text runs of their paragraphs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub revision_id: Option<String>,
    #[serde(default)]
    pub body: Body,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralElement {
    #[serde(default)]
    pub start_index: usize,
    pub end_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<Paragraph>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_break: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub elements: Vec<ParagraphElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphElement {
    #[serde(default)]
    pub start_index: usize,
    pub end_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_run: Option<TextRun>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_break: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    #[serde(default)]
    pub content: String,
}

/// One top-level paragraph flattened to its text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphText {
    pub start_index: usize,
    pub end_index: usize,
    /// Start of the first text run, past any leading page break.
    pub text_start: usize,
    pub text: String,
}

impl ParagraphText {
    /// True for paragraphs holding nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl DocumentSnapshot {
    /// End index of the body, one past its final newline.
    pub fn end_index(&self) -> usize {
        self.body
            .content
            .last()
            .map(|element| element.end_index)
            .unwrap_or(1)
    }

    /// Top-level paragraphs in document order; tables and section breaks
    /// are skipped.
    pub fn paragraphs(&self) -> Vec<ParagraphText> {
        self.body
            .content
            .iter()
            .filter_map(|element| {
                let paragraph = element.paragraph.as_ref()?;
                let mut text = String::new();
                let mut text_start = None;
                for item in &paragraph.elements {
                    if let Some(run) = &item.text_run {
                        text_start.get_or_insert(item.start_index);
                        text.push_str(&run.content);
                    }
                }
                Some(ParagraphText {
                    start_index: element.start_index,
                    end_index: element.end_index,
                    text_start: text_start.unwrap_or(element.start_index),
                    text,
                })
            })
            .collect()
    }

    /// All paragraph text concatenated, the string placement searches.
    pub fn flat_text(&self) -> String {
        self.paragraphs()
            .into_iter()
            .map(|paragraph| paragraph.text)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "documentId": "1AbCdEfGhIjKlMnOpQrStUvWxYz",
        "revisionId": "ALm37BVm",
        "body": {
            "content": [
                { "endIndex": 1, "sectionBreak": { "sectionStyle": {} } },
                {
                    "startIndex": 1,
                    "endIndex": 8,
                    "paragraph": {
                        "elements": [
                            { "startIndex": 1, "endIndex": 2, "pageBreak": {} },
                            { "startIndex": 2, "endIndex": 8, "textRun": { "content": "Title\n" } }
                        ]
                    }
                },
                { "startIndex": 8, "endIndex": 20, "table": { "rows": 1, "columns": 1 } },
                {
                    "startIndex": 20,
                    "endIndex": 21,
                    "paragraph": { "elements": [ { "startIndex": 20, "endIndex": 21, "textRun": { "content": "\n" } } ] }
                }
            ]
        }
    }"#;

    #[test]
    fn test_deserializes_docs_json() {
        let snapshot: DocumentSnapshot = serde_json::from_str(DOCUMENT).unwrap();
        assert_eq!(snapshot.revision_id.as_deref(), Some("ALm37BVm"));
        assert_eq!(snapshot.end_index(), 21);

        let paragraphs = snapshot.paragraphs();
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].start_index, 1);
        assert_eq!(paragraphs[0].text_start, 2);
        assert_eq!(paragraphs[0].text, "Title\n");
        assert!(paragraphs[1].is_blank());
        assert_eq!(snapshot.flat_text(), "Title\n\n");
    }

    #[test]
    fn test_empty_body_ends_at_one() {
        assert_eq!(DocumentSnapshot::default().end_index(), 1);
    }
}
