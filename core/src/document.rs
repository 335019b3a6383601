//! Styled document model.
//!
//! The document is a flat arena of styled runs. Paragraph boundaries are the
//! `'\n'` characters inside run text, and every paragraph owns exactly one
//! [`BlockFormat`] (list kind and alignment). All positions are absolute
//! **char** offsets; nothing holds a live handle into the run list across a
//! mutation, so callers re-derive offsets after every [`EditOp`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use thiserror::Error;

/// Inline toggle formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Bold,
    Italic,
    Underline,
}

/// Errors produced while parsing a colour value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("colour must start with '#': {0:?}")]
    MissingHash(String),
    #[error("colour must have 3 or 6 hex digits: {0:?}")]
    BadLength(String),
    #[error("invalid hex digit in colour {0:?}")]
    BadDigit(String),
}

/// A validated `#rrggbb` colour, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    /// Parse `#rgb` or `#rrggbb`.
    pub fn parse(value: &str) -> Result<Self, ColorError> {
        let trimmed = value.trim();
        let hex = trimmed
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(value.to_string()))?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::BadDigit(value.to_string()));
        }
        let expanded = match hex.len() {
            6 => hex.to_ascii_lowercase(),
            3 => hex
                .chars()
                .flat_map(|c| [c, c])
                .collect::<String>()
                .to_ascii_lowercase(),
            _ => return Err(ColorError::BadLength(value.to_string())),
        };
        Ok(Self(format!("#{expanded}")))
    }

    /// The default ink colour.
    pub fn black() -> Self {
        Self("#000000".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inline style carried by a run.
///
/// `color: None` means "inherit the surface colour"; it is what the
/// formatting state produces while the active colour equals the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Style {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: Option<Color>,
}

impl Style {
    /// Check whether the style carries no attribute at all.
    pub fn is_plain(&self) -> bool {
        !self.bold && !self.italic && !self.underline && self.color.is_none()
    }

    pub fn has(&self, format: Format) -> bool {
        match format {
            Format::Bold => self.bold,
            Format::Italic => self.italic,
            Format::Underline => self.underline,
        }
    }

    pub fn set(&mut self, format: Format, on: bool) {
        match format {
            Format::Bold => self.bold = on,
            Format::Italic => self.italic = on,
            Format::Underline => self.underline = on,
        }
    }

    /// Inline CSS declarations for this style (empty when plain).
    pub fn css(&self) -> String {
        let mut rules: Vec<String> = Vec::with_capacity(4);
        if self.bold {
            rules.push("font-weight:700".to_string());
        }
        if self.italic {
            rules.push("font-style:italic".to_string());
        }
        if self.underline {
            rules.push("text-decoration:underline".to_string());
        }
        if let Some(color) = &self.color {
            rules.push(format!("color:{color}"));
        }
        rules.join(";")
    }
}

/// A change applied to every run inside a range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StylePatch {
    Format(Format, bool),
    Color(Option<Color>),
}

impl StylePatch {
    pub fn apply(&self, style: &mut Style) {
        match self {
            StylePatch::Format(format, on) => style.set(*format, *on),
            StylePatch::Color(color) => style.color = color.clone(),
        }
    }
}

/// A contiguous piece of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    pub style: Style,
}

impl Run {
    pub fn new<T: Into<String>>(text: T, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Bulleted,
    Numbered,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn css(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// Per-paragraph formatting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockFormat {
    pub list: Option<ListKind>,
    pub alignment: Alignment,
}

/// The typed operation set every document mutation goes through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    Insert {
        at: usize,
        text: String,
        style: Style,
    },
    DeleteRange {
        range: Range<usize>,
    },
    WrapRangeWithStyle {
        range: Range<usize>,
        patch: StylePatch,
    },
    SetListKind {
        range: Range<usize>,
        kind: Option<ListKind>,
    },
    SetAlignment {
        range: Range<usize>,
        alignment: Alignment,
    },
}

/// A read-only paragraph view handed to serializers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    pub format: BlockFormat,
}

impl Paragraph {
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.is_empty())
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// The editable document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    runs: Vec<Run>,
    /// One entry per paragraph; always `newline count + 1` long.
    blocks: Vec<BlockFormat>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map_or(text.len(), |(i, _)| i)
}

impl Document {
    /// Create an empty document with a single empty paragraph.
    pub fn new() -> Self {
        Self {
            runs: Vec::new(),
            blocks: vec![BlockFormat::default()],
        }
    }

    /// Build a document holding `text` in the plain style.
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::new();
        doc.insert(0, text, &Style::default());
        doc
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.runs.iter().map(Run::char_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn blocks(&self) -> &[BlockFormat] {
        &self.blocks
    }

    pub fn paragraph_count(&self) -> usize {
        self.blocks.len()
    }

    /// Reset to a single empty paragraph.
    pub fn clear(&mut self) {
        self.runs.clear();
        self.blocks = vec![BlockFormat::default()];
    }

    /// Text inside `range` (clamped).
    pub fn slice(&self, range: Range<usize>) -> String {
        let range = self.clamp(range);
        self.chars()
            .skip(range.start)
            .take(range.end - range.start)
            .collect()
    }

    fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.runs.iter().flat_map(|r| r.text.chars())
    }

    /// Clamp a range to the document bounds.
    pub fn clamp(&self, range: Range<usize>) -> Range<usize> {
        let len = self.len();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        start..end
    }

    /// Index of the paragraph containing `offset`.
    pub fn paragraph_of(&self, offset: usize) -> usize {
        self.chars().take(offset).filter(|c| *c == '\n').count()
    }

    /// Zero-based (line, column) of an offset, in chars.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let mut line = 0;
        let mut col = 0;
        for ch in self.chars().take(offset) {
            if ch == '\n' {
                line += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        (line, col)
    }

    /// Offset of `col` on `line`, clamped to the line's length.
    pub fn offset_of(&self, line: usize, col: usize) -> usize {
        let mut offset = 0;
        let mut current = 0;
        let mut column = 0;
        for ch in self.chars() {
            if current == line {
                if ch == '\n' || column == col {
                    return offset;
                }
                column += 1;
            } else if current > line {
                break;
            }
            if ch == '\n' {
                current += 1;
            }
            offset += 1;
        }
        offset
    }

    /// Check whether every char in `range` carries `format`.
    ///
    /// An empty range never does.
    pub fn range_has(&self, range: Range<usize>, format: Format) -> bool {
        let range = self.clamp(range);
        if range.is_empty() {
            return false;
        }
        let mut acc = 0;
        for run in &self.runs {
            let len = run.char_len();
            let overlaps = acc < range.end && acc + len > range.start;
            if overlaps && !run.style.has(format) {
                return false;
            }
            acc += len;
        }
        true
    }

    /// Block formats of the paragraphs touched by `range`.
    pub fn blocks_in(&self, range: Range<usize>) -> &[BlockFormat] {
        let (first, last) = self.paragraph_span(range);
        &self.blocks[first..=last]
    }

    fn paragraph_span(&self, range: Range<usize>) -> (usize, usize) {
        let range = self.clamp(range);
        let first = self.paragraph_of(range.start);
        let last = self
            .paragraph_of(range.end)
            .min(self.blocks.len().saturating_sub(1));
        (first.min(last), last)
    }

    /// Apply one typed operation, returning the affected span.
    pub fn apply(&mut self, op: &EditOp) -> Range<usize> {
        match op {
            EditOp::Insert { at, text, style } => self.insert(*at, text, style),
            EditOp::DeleteRange { range } => self.delete(range.clone()),
            EditOp::WrapRangeWithStyle { range, patch } => self.wrap(range.clone(), patch),
            EditOp::SetListKind { range, kind } => self.set_list_kind(range.clone(), *kind),
            EditOp::SetAlignment { range, alignment } => {
                self.set_alignment(range.clone(), *alignment)
            }
        }
    }

    /// Insert styled text; returns the span it now occupies.
    ///
    /// Each inserted newline opens a paragraph that inherits the block format
    /// of the paragraph it was split from.
    pub fn insert(&mut self, at: usize, text: &str, style: &Style) -> Range<usize> {
        let at = at.min(self.len());
        if text.is_empty() {
            return at..at;
        }
        let newlines = text.matches('\n').count();
        if newlines > 0 {
            let paragraph = self.paragraph_of(at);
            let inherited = self.blocks.get(paragraph).copied().unwrap_or_default();
            self.blocks.splice(
                paragraph + 1..paragraph + 1,
                std::iter::repeat(inherited).take(newlines),
            );
        }
        let index = self.split_at(at);
        self.runs.insert(index, Run::new(text, style.clone()));
        self.normalize();
        at..at + text.chars().count()
    }

    /// Delete a span; paragraphs merged by the deletion keep the first
    /// paragraph's block format.
    pub fn delete(&mut self, range: Range<usize>) -> Range<usize> {
        let range = self.clamp(range);
        if range.is_empty() {
            return range.start..range.start;
        }
        let removed_newlines = self.slice(range.clone()).matches('\n').count();
        if removed_newlines > 0 {
            let paragraph = self.paragraph_of(range.start);
            self.blocks
                .drain(paragraph + 1..paragraph + 1 + removed_newlines);
        }
        let start = self.split_at(range.start);
        let end = self.split_at(range.end);
        self.runs.drain(start..end);
        self.normalize();
        range.start..range.start
    }

    /// Apply a style patch to every run in `range`, splitting runs at the
    /// range edges.
    pub fn wrap(&mut self, range: Range<usize>, patch: &StylePatch) -> Range<usize> {
        let range = self.clamp(range);
        if range.is_empty() {
            return range;
        }
        let start = self.split_at(range.start);
        let end = self.split_at(range.end);
        for run in &mut self.runs[start..end] {
            patch.apply(&mut run.style);
        }
        self.normalize();
        range
    }

    pub fn set_list_kind(&mut self, range: Range<usize>, kind: Option<ListKind>) -> Range<usize> {
        let (first, last) = self.paragraph_span(range.clone());
        for block in &mut self.blocks[first..=last] {
            block.list = kind;
        }
        self.clamp(range)
    }

    pub fn set_alignment(&mut self, range: Range<usize>, alignment: Alignment) -> Range<usize> {
        let (first, last) = self.paragraph_span(range.clone());
        for block in &mut self.blocks[first..=last] {
            block.alignment = alignment;
        }
        self.clamp(range)
    }

    /// Split the document into paragraph views.
    pub fn paragraphs(&self) -> Vec<Paragraph> {
        let mut groups: Vec<Vec<Run>> = Vec::with_capacity(self.blocks.len());
        let mut current: Vec<Run> = Vec::new();
        for run in &self.runs {
            let mut pieces = run.text.split('\n').peekable();
            while let Some(piece) = pieces.next() {
                if !piece.is_empty() {
                    current.push(Run::new(piece, run.style.clone()));
                }
                if pieces.peek().is_some() {
                    groups.push(std::mem::take(&mut current));
                }
            }
        }
        groups.push(current);

        groups
            .into_iter()
            .zip(self.blocks.iter().copied())
            .map(|(runs, format)| Paragraph { runs, format })
            .collect()
    }

    /// Make `offset` a run boundary and return the index of the run that
    /// starts there (or `runs.len()` at the end).
    fn split_at(&mut self, offset: usize) -> usize {
        let mut acc = 0;
        for index in 0..self.runs.len() {
            if acc == offset {
                return index;
            }
            let len = self.runs[index].char_len();
            if offset < acc + len {
                let split = byte_index(&self.runs[index].text, offset - acc);
                let tail = self.runs[index].text.split_off(split);
                let style = self.runs[index].style.clone();
                self.runs.insert(index + 1, Run::new(tail, style));
                return index + 1;
            }
            acc += len;
        }
        self.runs.len()
    }

    /// Drop empty runs and coalesce neighbours with identical style.
    fn normalize(&mut self) {
        let mut merged: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.text.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.style == run.style => last.text.push_str(&run.text),
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold() -> Style {
        Style {
            bold: true,
            ..Style::default()
        }
    }

    #[test]
    fn test_insert_and_len_count_chars() {
        let mut doc = Document::new();
        let span = doc.insert(0, "తెలుగు", &Style::default());
        assert_eq!(span, 0..6);
        assert_eq!(doc.len(), 6);
        assert_eq!(doc.text(), "తెలుగు");
    }

    #[test]
    fn test_insert_in_middle_splits_run() {
        let mut doc = Document::from_text("hello");
        doc.insert(2, "XY", &bold());
        assert_eq!(doc.text(), "heXYllo");
        assert_eq!(doc.runs().len(), 3);
        assert!(doc.runs()[1].style.bold);
    }

    #[test]
    fn test_same_style_runs_coalesce() {
        let mut doc = Document::from_text("ab");
        doc.insert(2, "cd", &Style::default());
        assert_eq!(doc.runs().len(), 1);
        doc.delete(1..3);
        assert_eq!(doc.text(), "ad");
        assert_eq!(doc.runs().len(), 1);
    }

    #[test]
    fn test_wrap_splits_at_edges() {
        let mut doc = Document::from_text("abcdef");
        doc.wrap(2..4, &StylePatch::Format(Format::Bold, true));
        let runs = doc.runs();
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0].text, "ab");
        assert_eq!(runs[1].text, "cd");
        assert!(runs[1].style.bold);
        assert_eq!(runs[2].text, "ef");
        assert!(doc.range_has(2..4, Format::Bold));
        assert!(!doc.range_has(1..4, Format::Bold));
        assert!(!doc.range_has(3..3, Format::Bold));
    }

    #[test]
    fn test_newline_inherits_block_format() {
        let mut doc = Document::from_text("one");
        doc.set_list_kind(0..0, Some(ListKind::Bulleted));
        doc.insert(3, "\ntwo", &Style::default());
        assert_eq!(doc.paragraph_count(), 2);
        assert_eq!(doc.blocks()[1].list, Some(ListKind::Bulleted));
    }

    #[test]
    fn test_delete_across_paragraphs_keeps_first_block() {
        let mut doc = Document::from_text("ab\ncd\nef");
        doc.set_alignment(0..0, Alignment::Center);
        doc.set_alignment(3..3, Alignment::Right);
        doc.delete(1..4);
        assert_eq!(doc.text(), "ad\nef");
        assert_eq!(doc.paragraph_count(), 2);
        assert_eq!(doc.blocks()[0].alignment, Alignment::Center);
    }

    #[test]
    fn test_paragraph_views() {
        let mut doc = Document::from_text("ab\n\ncd");
        doc.wrap(0..1, &StylePatch::Format(Format::Italic, true));
        let paragraphs = doc.paragraphs();
        assert_eq!(paragraphs.len(), 3);
        assert_eq!(paragraphs[0].runs.len(), 2);
        assert!(paragraphs[1].is_empty());
        assert_eq!(paragraphs[2].text(), "cd");
    }

    #[test]
    fn test_line_col_round_trip() {
        let doc = Document::from_text("abc\nde");
        assert_eq!(doc.line_col(5), (1, 1));
        assert_eq!(doc.offset_of(1, 1), 5);
        assert_eq!(doc.offset_of(0, 10), 3);
        assert_eq!(doc.offset_of(1, 10), 6);
    }

    #[test]
    fn test_out_of_bounds_ranges_are_clamped() {
        let mut doc = Document::from_text("abc");
        assert_eq!(doc.delete(2..99), 2..2);
        assert_eq!(doc.text(), "ab");
        assert_eq!(doc.insert(50, "z", &Style::default()), 2..3);
    }

    #[test]
    fn test_color_parse() {
        assert_eq!(Color::parse("#FF0000").unwrap().as_str(), "#ff0000");
        assert_eq!(Color::parse("#abc").unwrap().as_str(), "#aabbcc");
        assert!(matches!(Color::parse("red"), Err(ColorError::MissingHash(_))));
        assert!(matches!(Color::parse("#12"), Err(ColorError::BadLength(_))));
        assert!(matches!(Color::parse("#zzzzzz"), Err(ColorError::BadDigit(_))));
    }

    #[test]
    fn test_style_css() {
        let style = Style {
            bold: true,
            underline: true,
            color: Some(Color::parse("#336699").unwrap()),
            ..Style::default()
        };
        assert_eq!(
            style.css(),
            "font-weight:700;text-decoration:underline;color:#336699"
        );
        assert_eq!(Style::default().css(), "");
    }
}
