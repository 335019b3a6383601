//! Export serializer.
//!
//! Pure functions from a [`Document`] to the three clipboard payloads: plain
//! text, an HTML fragment carrying the surface font, and a minimal RTF
//! document.

use crate::document::{Document, ListKind, Paragraph};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use thiserror::Error;

/// Surface-wide presentation used by the styled payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// CSS font-family specification
    pub font_family: String,
    pub font_size_px: f32,
    /// Family named in RTF when `font_family` yields nothing usable
    pub fallback_font: String,
}

/// The three payloads written to the clipboard together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSnapshot {
    pub plain_text: String,
    pub html: String,
    pub rtf: String,
}

impl ExportSnapshot {
    pub fn from_document(doc: &Document, settings: &ExportSettings) -> Self {
        let plain_text = plain_text(doc);
        let font_name = primary_font_name(&settings.font_family, &settings.fallback_font);
        Self {
            html: html_fragment(doc, settings),
            rtf: to_rtf(&plain_text, &font_name, settings.font_size_px),
            plain_text,
        }
    }
}

/// Document text with paragraphs joined by `\n`, trimmed.
pub fn plain_text(doc: &Document) -> String {
    doc.text().trim().to_string()
}

/// HTML fragment: a font-carrying wrapper around the paragraph markup.
pub fn html_fragment(doc: &Document, settings: &ExportSettings) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<div style=\"font-family:{}; font-size:{}px;\">",
        html_escape::encode_double_quoted_attribute(&settings.font_family),
        settings.font_size_px
    );

    let mut open_list: Option<ListKind> = None;
    for paragraph in doc.paragraphs() {
        let list = paragraph.format.list;
        if open_list != list {
            if let Some(kind) = open_list {
                out.push_str(list_close(kind));
            }
            if let Some(kind) = list {
                out.push_str(list_open(kind));
            }
            open_list = list;
        }
        let tag = if list.is_some() { "li" } else { "div" };
        write_paragraph(&mut out, tag, &paragraph);
    }
    if let Some(kind) = open_list {
        out.push_str(list_close(kind));
    }

    out.push_str("</div>");
    out
}

fn list_open(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Bulleted => "<ul>",
        ListKind::Numbered => "<ol>",
    }
}

fn list_close(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Bulleted => "</ul>",
        ListKind::Numbered => "</ol>",
    }
}

fn write_paragraph(out: &mut String, tag: &str, paragraph: &Paragraph) {
    let alignment = paragraph.format.alignment;
    if alignment.css() == "left" {
        let _ = write!(out, "<{tag}>");
    } else {
        let _ = write!(out, "<{tag} style=\"text-align:{}\">", alignment.css());
    }

    if paragraph.is_empty() {
        out.push_str("<br>");
    }
    for run in &paragraph.runs {
        let text = html_escape::encode_text(&run.text);
        if run.style.is_plain() {
            out.push_str(&text);
        } else {
            let _ = write!(out, "<span style=\"{}\">{}</span>", run.style.css(), text);
        }
    }

    let _ = write!(out, "</{tag}>");
}

static FONT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]+)"|([^,]+)"#).expect("font name pattern is valid"));

/// First family named in a CSS font-family specification.
///
/// `"Noto Sans Telugu", sans-serif` yields `Noto Sans Telugu`; an empty or
/// blank specification yields `fallback`.
pub fn primary_font_name(spec: &str, fallback: &str) -> String {
    let name = FONT_NAME
        .captures(spec)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().trim())
        .unwrap_or("");
    if name.is_empty() {
        fallback.trim().to_string()
    } else {
        name.to_string()
    }
}

/// Minimal single-font RTF document for `text`.
///
/// The size is written in half-points (`round(size_px * 2)`, at least 8).
/// Backslash and braces are escaped, `\n` becomes `\par`, `\t` becomes
/// `\tab`, ASCII passes through, and everything else is written as
/// `\u<code point>?`. The font name gets the same escaping, with `;`
/// written as `\'3b` and control characters dropped.
pub fn to_rtf(text: &str, font_name: &str, size_px: f32) -> String {
    let half_points = ((size_px * 2.0).round() as i64).max(8);
    let mut font = String::with_capacity(font_name.len());
    for ch in font_name.chars() {
        match ch {
            ';' => font.push_str("\\'3b"),
            c if c.is_control() => {}
            c => push_rtf_char(&mut font, c),
        }
    }
    let mut body = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\n' => body.push_str("\\par "),
            '\t' => body.push_str("\\tab "),
            c => push_rtf_char(&mut body, c),
        }
    }
    format!("{{\\rtf1\\ansi\\deff0{{\\fonttbl{{\\f0\\fnil {font};}}}}\\uc1\\fs{half_points} {body}}}")
}

fn push_rtf_char(out: &mut String, ch: char) {
    match ch {
        '\\' => out.push_str("\\\\"),
        '{' => out.push_str("\\{"),
        '}' => out.push_str("\\}"),
        c if (c as u32) <= 127 => out.push(c),
        c => {
            let _ = write!(out, "\\u{}?", c as u32);
        }
    }
}

/// Failure to hand a snapshot to the system clipboard.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard rejected the payload: {0}")]
    Rejected(String),
}

/// Host clipboard receiving all three payloads at once.
pub trait Clipboard {
    fn write(&mut self, snapshot: &ExportSnapshot) -> Result<(), ClipboardError>;
}

/// Clipboard that keeps the last snapshot in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    last: Option<ExportSnapshot>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&ExportSnapshot> {
        self.last.as_ref()
    }
}

impl Clipboard for MemoryClipboard {
    fn write(&mut self, snapshot: &ExportSnapshot) -> Result<(), ClipboardError> {
        self.last = Some(snapshot.clone());
        Ok(())
    }
}
