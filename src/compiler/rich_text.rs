// src/compiler/rich_text.rs
//! Rich text flattening and annotation styles.

use crate::constants::MONOSPACE_FONT;
use crate::docs::{utf16_len, RgbColor, TextStyle};
use crate::types::{Annotations, Color, RichTextItem};

/// Concatenates the plain text of every span, in order, untouched.
pub fn flatten(spans: &[RichTextItem]) -> String {
    spans.iter().map(|span| span.plain_text.as_str()).collect()
}

/// Removes tab characters at the start of every line.
///
/// The destination reads leading tabs of a bulleted paragraph as nesting
/// and deletes them, so bulleted text must not carry any of its own.
pub fn strip_line_leading_tabs(text: &str) -> String {
    text.split('\n')
        .map(|line| line.trim_start_matches('\t'))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fixed foreground palette for Notion colours.
pub fn palette(color: Color) -> Option<RgbColor> {
    match color.base() {
        Color::Blue => Some(RgbColor::new(0.13, 0.59, 0.95)),
        Color::Brown => Some(RgbColor::new(0.5, 0.3, 0.1)),
        Color::Gray => Some(RgbColor::gray(0.5)),
        Color::Green => Some(RgbColor::new(0.13, 0.69, 0.42)),
        Color::Orange => Some(RgbColor::new(0.99, 0.5, 0.15)),
        Color::Pink => Some(RgbColor::new(0.97, 0.44, 0.84)),
        Color::Purple => Some(RgbColor::new(0.69, 0.32, 0.87)),
        Color::Red => Some(RgbColor::new(0.96, 0.26, 0.21)),
        Color::Yellow => Some(RgbColor::new(0.97, 0.78, 0.29)),
        _ => None,
    }
}

/// Text style for one span's annotations, or `None` for plain text.
pub fn annotation_style(annotations: &Annotations, href: Option<&str>) -> Option<TextStyle> {
    let mut style = TextStyle::new();
    if annotations.bold {
        style = style.bold();
    }
    if annotations.italic {
        style = style.italic();
    }
    if annotations.strikethrough {
        style = style.strikethrough();
    }
    if annotations.underline {
        style = style.underline();
    }
    if annotations.code {
        style = style
            .font_family(MONOSPACE_FONT)
            .background(RgbColor::gray(0.95));
    }
    if let Some(color) = palette(annotations.color) {
        style = style.foreground(color);
    }
    if let Some(url) = href {
        style = style.link(url);
    }

    (!style.is_empty()).then_some(style)
}

/// `(start, end, style)` for every styled span of `spans` written at `offset`.
pub fn span_styles(spans: &[RichTextItem], offset: usize) -> Vec<(usize, usize, TextStyle)> {
    let mut cursor = offset;
    let mut styles = Vec::new();
    for span in spans {
        let len = utf16_len(&span.plain_text);
        if len > 0 {
            if let Some(style) = annotation_style(&span.annotations, span.href.as_deref()) {
                styles.push((cursor, cursor + len, style));
            }
        }
        cursor += len;
    }
    styles
}
