//! Host document surface.
//!
//! The editing core never touches a host's internals directly; everything it
//! does to the document goes through the [`Surface`] primitives. The crate
//! ships [`DocumentSurface`], an implementation over [`Document`] with a
//! simple monospace layout model, which hosts can use as-is or mirror into
//! their own widget tree.

use crate::document::{Document, EditOp, Style};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Caret/selection as a pair of char offsets.
///
/// `anchor` is where the selection started, `head` where the caret is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    /// A collapsed selection (caret only).
    pub fn caret(at: usize) -> Self {
        Self {
            anchor: at,
            head: at,
        }
    }

    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    /// Ordered range covered by the selection.
    pub fn range(&self) -> Range<usize> {
        self.anchor.min(self.head)..self.anchor.max(self.head)
    }
}

/// Overlay position relative to the document surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorPoint {
    pub left: f32,
    pub top: f32,
}

/// Caret motion requested by a navigation key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretMove {
    Left,
    Right,
    Up,
    Down,
}

/// Primitives the editing core needs from a host surface.
pub trait Surface {
    fn document(&self) -> &Document;

    fn selection(&self) -> Selection;

    fn set_selection(&mut self, selection: Selection);

    /// Insert text at the caret, replacing a non-collapsed selection.
    /// The caret ends after the inserted text.
    fn insert_styled_text(&mut self, text: &str, style: &Style) -> Range<usize>;

    /// Replace `range` wholesale: delete it, then insert at the same origin.
    /// The caret ends after the new content.
    fn replace_range(&mut self, range: Range<usize>, text: &str, style: &Style) -> Range<usize>;

    /// Delete `range`; the caret collapses to its start.
    fn delete_range(&mut self, range: Range<usize>);

    /// Apply a structural or styling operation without moving the caret.
    fn apply(&mut self, op: EditOp) -> Range<usize>;

    /// Where an overlay anchored under `range` should be placed.
    fn query_anchor_rect(&self, range: Range<usize>) -> Option<AnchorPoint>;

    /// Drop all content.
    fn clear(&mut self);

    /// Move the caret. The provided version works on char columns; hosts
    /// with real layout should override it.
    fn move_caret(&mut self, motion: CaretMove) {
        let sel = self.selection();
        let doc = self.document();
        let at = match motion {
            CaretMove::Left if sel.is_collapsed() => sel.head.saturating_sub(1),
            CaretMove::Left => sel.range().start,
            CaretMove::Right if sel.is_collapsed() => (sel.head + 1).min(doc.len()),
            CaretMove::Right => sel.range().end,
            CaretMove::Up => match doc.line_col(sel.head) {
                (0, _) => 0,
                (line, col) => doc.offset_of(line - 1, col),
            },
            CaretMove::Down => {
                let (line, col) = doc.line_col(sel.head);
                if line + 1 >= doc.paragraph_count() {
                    doc.len()
                } else {
                    doc.offset_of(line + 1, col)
                }
            }
        };
        self.set_selection(Selection::caret(at));
    }

    /// Layout hook for a new surface font size.
    fn set_font_size(&mut self, _size_px: f32) {}
}

/// Monospace layout used to derive anchor rectangles and vertical moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetrics {
    pub char_advance_px: f32,
    pub line_height_px: f32,
    /// Gap between a line's bottom and the overlay.
    pub anchor_offset_px: f32,
}

impl LayoutMetrics {
    /// Metrics for a font size in pixels.
    pub fn for_font_size(size_px: f32, anchor_offset_px: f32) -> Self {
        Self {
            char_advance_px: size_px * 0.6,
            line_height_px: size_px * 1.5,
            anchor_offset_px,
        }
    }
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self::for_font_size(12.0, 8.0)
    }
}

/// In-memory [`Surface`] over a [`Document`].
#[derive(Debug, Clone, Default)]
pub struct DocumentSurface {
    document: Document,
    selection: Selection,
    metrics: LayoutMetrics,
}

impl DocumentSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(metrics: LayoutMetrics) -> Self {
        Self {
            metrics,
            ..Self::default()
        }
    }

    pub fn metrics(&self) -> LayoutMetrics {
        self.metrics
    }

    pub fn set_metrics(&mut self, metrics: LayoutMetrics) {
        self.metrics = metrics;
    }

    fn clamp_selection(&mut self) {
        let len = self.document.len();
        self.selection.anchor = self.selection.anchor.min(len);
        self.selection.head = self.selection.head.min(len);
    }
}

impl Surface for DocumentSurface {
    fn document(&self) -> &Document {
        &self.document
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
        self.clamp_selection();
    }

    fn insert_styled_text(&mut self, text: &str, style: &Style) -> Range<usize> {
        let range = self.selection.range();
        self.replace_range(range, text, style)
    }

    fn replace_range(&mut self, range: Range<usize>, text: &str, style: &Style) -> Range<usize> {
        let origin = self.document.delete(range).start;
        let span = self.document.insert(origin, text, style);
        self.selection = Selection::caret(span.end);
        span
    }

    fn delete_range(&mut self, range: Range<usize>) {
        let origin = self.document.delete(range).start;
        self.selection = Selection::caret(origin);
    }

    fn apply(&mut self, op: EditOp) -> Range<usize> {
        let span = self.document.apply(&op);
        self.clamp_selection();
        span
    }

    fn query_anchor_rect(&self, range: Range<usize>) -> Option<AnchorPoint> {
        if range.start > range.end || range.end > self.document.len() {
            return None;
        }
        let (line, col) = self.document.line_col(range.end);
        Some(AnchorPoint {
            left: col as f32 * self.metrics.char_advance_px,
            top: (line + 1) as f32 * self.metrics.line_height_px + self.metrics.anchor_offset_px,
        })
    }

    fn clear(&mut self) {
        self.document.clear();
        self.selection = Selection::caret(0);
    }

    fn set_font_size(&mut self, size_px: f32) {
        self.metrics = LayoutMetrics::for_font_size(size_px, self.metrics.anchor_offset_px);
    }
}
