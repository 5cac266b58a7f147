// src/docs/style.rs
//! Text and paragraph styles in the shape the Docs API expects.
//!
//! Every style only carries the members it sets. The `fields` mask sent
//! with an update is derived from those members, so an update never
//! clears a property it did not mention.

use serde_json::{json, Map, Value};

/// An RGB colour with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RgbColor {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl RgbColor {
    pub const fn new(red: f64, green: f64, blue: f64) -> Self {
        Self { red, green, blue }
    }

    pub const fn gray(level: f64) -> Self {
        Self::new(level, level, level)
    }

    fn to_json(self) -> Value {
        json!({ "color": { "rgbColor": { "red": self.red, "green": self.green, "blue": self.blue } } })
    }
}

/// Character-level style (`updateTextStyle`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStyle {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub strikethrough: Option<bool>,
    pub underline: Option<bool>,
    pub font_size_pt: Option<f64>,
    pub font_family: Option<String>,
    pub foreground: Option<RgbColor>,
    pub background: Option<RgbColor>,
    pub link: Option<String>,
}

impl TextStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bold(mut self) -> Self {
        self.bold = Some(true);
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = Some(true);
        self
    }

    pub fn strikethrough(mut self) -> Self {
        self.strikethrough = Some(true);
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = Some(true);
        self
    }

    pub fn font_size(mut self, points: f64) -> Self {
        self.font_size_pt = Some(points);
        self
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn foreground(mut self, color: RgbColor) -> Self {
        self.foreground = Some(color);
        self
    }

    pub fn background(mut self, color: RgbColor) -> Self {
        self.background = Some(color);
        self
    }

    pub fn link(mut self, url: impl Into<String>) -> Self {
        self.link = Some(url.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The `textStyle` object and its `fields` mask.
    pub fn to_request_parts(&self) -> (Value, String) {
        let mut style = Map::new();
        let mut fields = Vec::new();

        let flags = [
            ("bold", self.bold),
            ("italic", self.italic),
            ("strikethrough", self.strikethrough),
            ("underline", self.underline),
        ];
        for (name, flag) in flags {
            if let Some(flag) = flag {
                style.insert(name.to_string(), Value::Bool(flag));
                fields.push(name);
            }
        }
        if let Some(points) = self.font_size_pt {
            style.insert(
                "fontSize".to_string(),
                json!({ "magnitude": points, "unit": "PT" }),
            );
            fields.push("fontSize");
        }
        if let Some(family) = &self.font_family {
            style.insert(
                "weightedFontFamily".to_string(),
                json!({ "fontFamily": family }),
            );
            fields.push("weightedFontFamily");
        }
        if let Some(color) = self.foreground {
            style.insert("foregroundColor".to_string(), color.to_json());
            fields.push("foregroundColor");
        }
        if let Some(color) = self.background {
            style.insert("backgroundColor".to_string(), color.to_json());
            fields.push("backgroundColor");
        }
        if let Some(url) = &self.link {
            style.insert("link".to_string(), json!({ "url": url }));
            fields.push("link");
        }

        (Value::Object(style), fields.join(","))
    }
}

/// Built-in paragraph styles of a Google document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedStyle {
    NormalText,
    Title,
    Heading1,
    Heading2,
    Heading3,
}

impl NamedStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamedStyle::NormalText => "NORMAL_TEXT",
            NamedStyle::Title => "TITLE",
            NamedStyle::Heading1 => "HEADING_1",
            NamedStyle::Heading2 => "HEADING_2",
            NamedStyle::Heading3 => "HEADING_3",
        }
    }

    /// Heading style for a Notion heading level, if there is one.
    pub fn heading(level: u8) -> Option<Self> {
        match level {
            1 => Some(NamedStyle::Heading1),
            2 => Some(NamedStyle::Heading2),
            3 => Some(NamedStyle::Heading3),
            _ => None,
        }
    }
}

/// Paragraph-level style (`updateParagraphStyle`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphStyle {
    pub named_style: Option<NamedStyle>,
    pub indent_start_pt: Option<f64>,
    pub indent_first_line_pt: Option<f64>,
    /// Send `fields: "*"` so every unspecified member returns to its default.
    pub reset: bool,
}

impl ParagraphStyle {
    pub fn named(style: NamedStyle) -> Self {
        Self {
            named_style: Some(style),
            ..Self::default()
        }
    }

    pub fn indented(points: f64) -> Self {
        Self {
            indent_start_pt: Some(points),
            indent_first_line_pt: Some(points),
            ..Self::default()
        }
    }

    /// Back to `NORMAL_TEXT` with nothing else carried over.
    pub fn reset() -> Self {
        Self {
            named_style: Some(NamedStyle::NormalText),
            reset: true,
            ..Self::default()
        }
    }

    /// The `paragraphStyle` object and its `fields` mask.
    pub fn to_request_parts(&self) -> (Value, String) {
        let mut style = Map::new();
        let mut fields = Vec::new();

        if let Some(named) = self.named_style {
            style.insert("namedStyleType".to_string(), json!(named.as_str()));
            fields.push("namedStyleType");
        }
        if let Some(points) = self.indent_start_pt {
            style.insert(
                "indentStart".to_string(),
                json!({ "magnitude": points, "unit": "PT" }),
            );
            fields.push("indentStart");
        }
        if let Some(points) = self.indent_first_line_pt {
            style.insert(
                "indentFirstLine".to_string(),
                json!({ "magnitude": points, "unit": "PT" }),
            );
            fields.push("indentFirstLine");
        }

        let mask = if self.reset {
            "*".to_string()
        } else {
            fields.join(",")
        };
        (Value::Object(style), mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_style_fields_follow_set_members() {
        let style = TextStyle::new()
            .bold()
            .foreground(RgbColor::new(0.0, 0.3, 0.8))
            .link("https://www.notion.so/abc");
        let (value, fields) = style.to_request_parts();

        assert_eq!(fields, "bold,foregroundColor,link");
        assert_eq!(
            value,
            json!({
                "bold": true,
                "foregroundColor": { "color": { "rgbColor": { "red": 0.0, "green": 0.3, "blue": 0.8 } } },
                "link": { "url": "https://www.notion.so/abc" }
            })
        );
    }

    #[test]
    fn test_paragraph_reset_uses_wildcard_mask() {
        let (value, fields) = ParagraphStyle::reset().to_request_parts();
        assert_eq!(fields, "*");
        assert_eq!(value, json!({ "namedStyleType": "NORMAL_TEXT" }));

        let (_, fields) = ParagraphStyle::indented(36.0).to_request_parts();
        assert_eq!(fields, "indentStart,indentFirstLine");
    }
}
