// src/docs/operation.rs
//! The closed vocabulary of edits sent to a document.
//!
//! Indexes address the document as it stands after every preceding
//! operation in the same list has been applied.

use super::style::{ParagraphStyle, TextStyle};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Half-open `[start_index, end_index)` range in UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub start_index: usize,
    pub end_index: usize,
}

impl Range {
    pub fn new(start_index: usize, end_index: usize) -> Self {
        Self {
            start_index,
            end_index,
        }
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn shifted(self, delta: usize) -> Self {
        Self::new(self.start_index + delta, self.end_index + delta)
    }

    fn to_json(self) -> Value {
        json!({ "startIndex": self.start_index, "endIndex": self.end_index })
    }
}

/// Glyph presets for `createParagraphBullets`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletPreset {
    DiscCircleSquare,
    DecimalAlphaRoman,
    Checkbox,
    ArrowDiamondDisc,
}

impl BulletPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            BulletPreset::DiscCircleSquare => "BULLET_DISC_CIRCLE_SQUARE",
            BulletPreset::DecimalAlphaRoman => "NUMBERED_DECIMAL_ALPHA_ROMAN",
            BulletPreset::Checkbox => "BULLET_CHECKBOX",
            BulletPreset::ArrowDiamondDisc => "BULLET_ARROW_DIAMOND_DISC",
        }
    }
}

/// One `batchUpdate` request.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    InsertText { index: usize, text: String },
    UpdateTextStyle { range: Range, style: TextStyle },
    UpdateParagraphStyle { range: Range, style: ParagraphStyle },
    CreateParagraphBullets { range: Range, preset: BulletPreset },
    DeleteParagraphBullets { range: Range },
    InsertTable { index: usize, rows: usize, columns: usize },
    InsertPageBreak { index: usize },
    DeleteContentRange { range: Range },
}

impl Operation {
    pub fn insert_text(index: usize, text: impl Into<String>) -> Self {
        Operation::InsertText {
            index,
            text: text.into(),
        }
    }

    pub fn text_style(start: usize, end: usize, style: TextStyle) -> Self {
        Operation::UpdateTextStyle {
            range: Range::new(start, end),
            style,
        }
    }

    pub fn paragraph_style(start: usize, end: usize, style: ParagraphStyle) -> Self {
        Operation::UpdateParagraphStyle {
            range: Range::new(start, end),
            style,
        }
    }

    pub fn bullets(start: usize, end: usize, preset: BulletPreset) -> Self {
        Operation::CreateParagraphBullets {
            range: Range::new(start, end),
            preset,
        }
    }

    /// Name of the request, as it appears in the `batchUpdate` body.
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::InsertText { .. } => "insertText",
            Operation::UpdateTextStyle { .. } => "updateTextStyle",
            Operation::UpdateParagraphStyle { .. } => "updateParagraphStyle",
            Operation::CreateParagraphBullets { .. } => "createParagraphBullets",
            Operation::DeleteParagraphBullets { .. } => "deleteParagraphBullets",
            Operation::InsertTable { .. } => "insertTable",
            Operation::InsertPageBreak { .. } => "insertPageBreak",
            Operation::DeleteContentRange { .. } => "deleteContentRange",
        }
    }

    /// The same operation addressed `delta` units further into the document.
    pub fn shifted(&self, delta: usize) -> Self {
        let mut op = self.clone();
        match &mut op {
            Operation::InsertText { index, .. }
            | Operation::InsertTable { index, .. }
            | Operation::InsertPageBreak { index } => *index += delta,
            Operation::UpdateTextStyle { range, .. }
            | Operation::UpdateParagraphStyle { range, .. }
            | Operation::CreateParagraphBullets { range, .. }
            | Operation::DeleteParagraphBullets { range }
            | Operation::DeleteContentRange { range } => *range = range.shifted(delta),
        }
        op
    }

    /// The request object for a `batchUpdate` body.
    pub fn to_request(&self) -> Value {
        match self {
            Operation::InsertText { index, text } => json!({
                "insertText": { "location": { "index": index }, "text": text }
            }),
            Operation::UpdateTextStyle { range, style } => {
                let (text_style, fields) = style.to_request_parts();
                json!({
                    "updateTextStyle": {
                        "range": range.to_json(),
                        "textStyle": text_style,
                        "fields": fields
                    }
                })
            }
            Operation::UpdateParagraphStyle { range, style } => {
                let (paragraph_style, fields) = style.to_request_parts();
                json!({
                    "updateParagraphStyle": {
                        "range": range.to_json(),
                        "paragraphStyle": paragraph_style,
                        "fields": fields
                    }
                })
            }
            Operation::CreateParagraphBullets { range, preset } => json!({
                "createParagraphBullets": {
                    "range": range.to_json(),
                    "bulletPreset": preset.as_str()
                }
            }),
            Operation::DeleteParagraphBullets { range } => json!({
                "deleteParagraphBullets": { "range": range.to_json() }
            }),
            Operation::InsertTable {
                index,
                rows,
                columns,
            } => json!({
                "insertTable": {
                    "location": { "index": index },
                    "rows": rows,
                    "columns": columns
                }
            }),
            Operation::InsertPageBreak { index } => json!({
                "insertPageBreak": { "location": { "index": index } }
            }),
            Operation::DeleteContentRange { range } => json!({
                "deleteContentRange": { "range": range.to_json() }
            }),
        }
    }
}

/// Wraps operations into a `batchUpdate` request body.
pub fn batch_update_body(operations: &[Operation]) -> Value {
    json!({
        "requests": operations.iter().map(Operation::to_request).collect::<Vec<_>>()
    })
}
