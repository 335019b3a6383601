//! Formatting state machine.
//!
//! Toggles and colour changes either act on the current selection right away
//! (when text is selected) or flip the persistent insertion state (when only a
//! caret is present). Every insertion path asks [`FormatState::insertion_style`]
//! for the style of the text it is about to insert.

use crate::document::{Color, EditOp, Format, StylePatch, Style};
use crate::surface::Surface;
use tracing::debug;

/// What a toggle or colour change acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTarget {
    /// The selected text was restyled; the insertion state is unchanged
    Selection,
    /// The insertion state was changed
    Insertion,
}

/// Insertion-time formatting state, one per editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatState {
    bold: bool,
    italic: bool,
    underline: bool,
    color: Color,
    default_color: Color,
}

impl Default for FormatState {
    fn default() -> Self {
        Self::new(Color::black())
    }
}

impl FormatState {
    /// Create a state whose "no colour" value is `default_color`.
    pub fn new(default_color: Color) -> Self {
        Self {
            bold: false,
            italic: false,
            underline: false,
            color: default_color.clone(),
            default_color,
        }
    }

    pub fn is_active(&self, format: Format) -> bool {
        match format {
            Format::Bold => self.bold,
            Format::Italic => self.italic,
            Format::Underline => self.underline,
        }
    }

    /// The active colour (the default colour when none is set).
    pub fn color(&self) -> &Color {
        &self.color
    }

    /// Toggle `format`.
    ///
    /// With a non-empty selection the selected runs are restyled: if every
    /// selected char already has the format it is removed, otherwise it is
    /// applied. With a caret only, the insertion state flips.
    pub fn toggle<S: Surface + ?Sized>(&mut self, format: Format, surface: &mut S) -> FormatTarget {
        let selection = surface.selection();
        if !selection.is_collapsed() {
            let range = selection.range();
            let on = !surface.document().range_has(range.clone(), format);
            debug!(?format, on, ?range, "restyling selection");
            surface.apply(EditOp::WrapRangeWithStyle {
                range,
                patch: StylePatch::Format(format, on),
            });
            return FormatTarget::Selection;
        }

        let flag = match format {
            Format::Bold => &mut self.bold,
            Format::Italic => &mut self.italic,
            Format::Underline => &mut self.underline,
        };
        *flag = !*flag;
        debug!(?format, on = *flag, "insertion format toggled");
        FormatTarget::Insertion
    }

    /// Set the active colour.
    ///
    /// The insertion colour always follows the last chosen value; a
    /// non-empty selection is recoloured as well.
    pub fn set_color<S: Surface + ?Sized>(&mut self, color: Color, surface: &mut S) -> FormatTarget {
        self.color = color;
        let selection = surface.selection();
        if selection.is_collapsed() {
            return FormatTarget::Insertion;
        }
        surface.apply(EditOp::WrapRangeWithStyle {
            range: selection.range(),
            patch: StylePatch::Color(self.effective_color()),
        });
        FormatTarget::Selection
    }

    /// Style for newly inserted text: exactly the active toggles, plus the
    /// colour unless it equals the default.
    pub fn insertion_style(&self) -> Style {
        Style {
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            color: self.effective_color(),
        }
    }

    /// Check whether any insertion-time attribute is active.
    pub fn has_any(&self) -> bool {
        !self.insertion_style().is_plain()
    }

    /// Return to plain insertion with the default colour.
    pub fn reset(&mut self) {
        self.bold = false;
        self.italic = false;
        self.underline = false;
        self.color = self.default_color.clone();
    }

    fn effective_color(&self) -> Option<Color> {
        (self.color != self.default_color).then(|| self.color.clone())
    }
}
