//! Word-region tracker.
//!
//! Keeps the rendered word in the document equal to
//! `transliterate(buffer)` while a word is being typed. Every change
//! re-derives the rendering from the whole buffer and replaces the tracked
//! span wholesale (delete, then insert at the same origin); the document is
//! never patched incrementally.

use crate::document::Style;
use crate::profile::LanguageProfile;
use crate::session::EditorSession;
use crate::surface::Surface;
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, trace};

/// What a tracker operation did to the document and session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionResult {
    /// A new region was opened at the caret
    Started(Range<usize>),
    /// The region was re-rendered in place
    Updated(Range<usize>),
    /// The region was closed; its content stays in the document
    Closed,
    /// The buffer ran empty and the region's content was deleted
    Removed,
    /// Text was inserted outside region tracking
    Inserted(Range<usize>),
    /// Nothing to do in the current state
    PassThrough,
}

impl RegionResult {
    /// Whether the input buffer changed (and suggestions need refreshing).
    pub fn buffer_changed(&self) -> bool {
        matches!(self, Self::Started(_) | Self::Updated(_) | Self::Removed)
    }
}

/// Idle/Building state machine over an [`EditorSession`].
#[derive(Debug)]
pub struct WordRegionTracker<L: LanguageProfile + ?Sized> {
    profile: Arc<L>,
}

impl<L: LanguageProfile + ?Sized> Clone for WordRegionTracker<L> {
    fn clone(&self) -> Self {
        Self {
            profile: Arc::clone(&self.profile),
        }
    }
}

impl<L: LanguageProfile + ?Sized> WordRegionTracker<L> {
    pub fn new(profile: Arc<L>) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &L {
        &self.profile
    }

    /// Extend the word with a transliteration-alphabet char.
    ///
    /// Idle: the rendering of `ch` is inserted at the caret (replacing any
    /// selection) and becomes the region. Building: the whole buffer is
    /// re-rendered into the region.
    pub fn push_literal<S: Surface + ?Sized>(
        &self,
        session: &mut EditorSession,
        surface: &mut S,
        ch: char,
        style: &Style,
    ) -> RegionResult {
        session.buffer_mut().push(ch);
        let rendered = self.profile.transliterate(session.buffer().text());
        trace!(buffer = session.buffer().text(), %rendered, "literal");

        match session.region() {
            Some(region) => {
                let region = surface.document().clamp(region);
                let span = surface.replace_range(region, &rendered, style);
                session.set_region(span.clone());
                RegionResult::Updated(span)
            }
            None => {
                let span = surface.insert_styled_text(&rendered, style);
                debug!(start = span.start, "word region started");
                session.set_region(span.clone());
                RegionResult::Started(span)
            }
        }
    }

    /// Drop the last buffered char.
    ///
    /// When the buffer runs empty the region's content is deleted and the
    /// session returns to `Idle`.
    pub fn backspace<S: Surface + ?Sized>(
        &self,
        session: &mut EditorSession,
        surface: &mut S,
        style: &Style,
    ) -> RegionResult {
        let Some(region) = session.region() else {
            return RegionResult::PassThrough;
        };
        let region = surface.document().clamp(region);
        session.buffer_mut().pop();

        if session.buffer().is_empty() {
            surface.delete_range(region);
            session.clear();
            debug!("word region removed");
            return RegionResult::Removed;
        }

        let rendered = self.profile.transliterate(session.buffer().text());
        let span = surface.replace_range(region, &rendered, style);
        session.set_region(span.clone());
        RegionResult::Updated(span)
    }

    /// Close the region, keeping its rendered content.
    pub fn commit(&self, session: &mut EditorSession) -> RegionResult {
        if !session.is_building() {
            return RegionResult::PassThrough;
        }
        debug!(buffer = session.buffer().text(), "word region committed");
        session.clear();
        RegionResult::Closed
    }

    /// Replace the region with `candidate` and close it.
    pub fn select_candidate<S: Surface + ?Sized>(
        &self,
        session: &mut EditorSession,
        surface: &mut S,
        candidate: &str,
        style: &Style,
    ) -> RegionResult {
        let Some(region) = session.region() else {
            return RegionResult::PassThrough;
        };
        let region = surface.document().clamp(region);
        surface.replace_range(region, candidate, style);
        debug!(buffer = session.buffer().text(), candidate, "candidate selected");
        session.clear();
        RegionResult::Closed
    }

    /// Insert `text` as one transliterated block at the caret.
    ///
    /// Any active region is closed first; the pasted text never becomes a
    /// region.
    pub fn paste<S: Surface + ?Sized>(
        &self,
        session: &mut EditorSession,
        surface: &mut S,
        text: &str,
        style: &Style,
    ) -> RegionResult {
        self.commit(session);
        if text.is_empty() {
            return RegionResult::PassThrough;
        }
        let rendered = self.profile.transliterate(text);
        let span = surface.insert_styled_text(&rendered, style);
        debug!(len = span.len(), "pasted");
        RegionResult::Inserted(span)
    }
}
