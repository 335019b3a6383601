//! Editor context for host communication.
//!
//! `EditorContext` is a plain data snapshot with public fields. After every
//! engine call the host reads it to redraw the toolbar, the placeholder and
//! the suggestion overlay. No callbacks, no traits: the engine writes, the
//! host reads.

use crate::document::Style;
use crate::surface::AnchorPoint;
use serde::Serialize;
use std::ops::Range;

/// Host-facing snapshot of the editor state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EditorContext {
    /// Raw romanized buffer of the word in progress
    pub buffer: String,

    /// Char span of the word in progress
    pub region: Option<Range<usize>>,

    /// Candidates to display, in selection order
    pub candidates: Vec<String>,

    /// Generation the displayed candidates belong to
    pub generation: u64,

    /// Where the candidate overlay goes
    pub anchor: Option<AnchorPoint>,

    /// Style the next inserted text will get (drives toolbar toggles)
    pub active_style: Style,

    pub placeholder: String,

    /// True while the document is empty
    pub show_placeholder: bool,

    /// True while the "copied" confirmation is showing
    pub copied: bool,

    pub style_preset: String,
    pub font_family: String,
    pub font_size_px: f32,
}

impl EditorContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the candidate overlay should be visible.
    pub fn has_candidates(&self) -> bool {
        !self.candidates.is_empty()
    }

    /// JSON form of the snapshot, for hosts across a process or FFI boundary.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Candidates paired with the select key that picks each one.
    pub fn labelled_candidates<'a>(&'a self, select_keys: &'a str) -> impl Iterator<Item = (char, &'a str)> + 'a {
        select_keys
            .chars()
            .zip(self.candidates.iter().map(String::as_str))
    }
}
