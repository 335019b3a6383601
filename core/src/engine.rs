//! Typewriter engine with session management and key event processing.
//!
//! `TypewriterEngine` ties the pieces together: it classifies key events,
//! drives the word-region tracker, feeds buffer changes to the suggestion
//! controller and applies formatting through the surface. After every call
//! that may mutate state it re-derives the overlay anchor from the surface
//! and refreshes the [`EditorContext`] the host reads.

use crate::classifier::{classify, InputClass};
use crate::context::EditorContext;
use crate::document::{Alignment, Color, ColorError, Document, EditOp, Format, ListKind};
use crate::export::{Clipboard, ExportSettings, ExportSnapshot};
use crate::format::{FormatState, FormatTarget};
use crate::profile::LanguageProfile;
use crate::region::{RegionResult, WordRegionTracker};
use crate::session::EditorSession;
use crate::suggestion::SuggestionController;
use crate::surface::{AnchorPoint, CaretMove, DocumentSurface, LayoutMetrics, Selection, Surface};
use crate::Config;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

/// Font sizes offered by the editor, in pixels.
pub const FONT_SIZE_RANGE: RangeInclusive<f32> = 10.0..=50.0;

/// Key event types that the engine can process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// Character input (letters, digits, punctuation, space)
    Char(char),
    /// Backspace key
    Backspace,
    /// Enter/Return key
    Enter,
    /// Escape key (close the word in progress)
    Escape,
    /// Left arrow key
    Left,
    /// Right arrow key
    Right,
    /// Up arrow key
    Up,
    /// Down arrow key
    Down,
    /// Ctrl + character (e.g., Ctrl+b for bold)
    Ctrl(char),
    /// Ctrl + Shift + character (Ctrl+Shift+z for redo)
    CtrlShift(char),
}

/// Native host command the engine hands back instead of handling itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    Undo,
    Redo,
}

/// Result of processing a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    /// Key was handled by the engine
    Handled,
    /// Key was not handled (pass through to the host)
    NotHandled,
    /// The host should run its own command
    Delegate(HostCommand),
}

/// Live transliteration editor.
pub struct TypewriterEngine<L: LanguageProfile + ?Sized, S: Surface = DocumentSurface> {
    profile: Arc<L>,
    tracker: WordRegionTracker<L>,
    session: EditorSession,
    surface: S,
    format: FormatState,
    suggestions: SuggestionController,
    config: Config,
    font_family: String,
    font_size_px: f32,
    style_preset: String,
    copied_until: Option<Instant>,
    context: EditorContext,
}

impl<L: LanguageProfile + ?Sized> TypewriterEngine<L, DocumentSurface> {
    /// Create an engine over an in-memory [`DocumentSurface`].
    pub fn new(profile: Arc<L>, config: Config) -> Self {
        let font_size = clamp_font_size(config.default_font_size_px);
        let surface = DocumentSurface::with_metrics(LayoutMetrics::for_font_size(
            font_size,
            config.anchor_offset_px,
        ));
        Self::with_surface(profile, config, surface)
    }
}

impl<L: LanguageProfile + ?Sized, S: Surface> TypewriterEngine<L, S> {
    /// Create an engine over a host-provided surface.
    pub fn with_surface(profile: Arc<L>, mut config: Config, mut surface: S) -> Self {
        drop_input_select_keys(&mut config, &*profile);
        let settings = config.suggestion_settings(profile.suggestion_limit());
        let suggestions = SuggestionController::new(profile.suggestion_service(), settings);
        let font_size_px = clamp_font_size(config.default_font_size_px);
        surface.set_font_size(font_size_px);

        let mut engine = Self {
            tracker: WordRegionTracker::new(Arc::clone(&profile)),
            session: EditorSession::new(),
            surface,
            format: FormatState::new(config.default_color.clone()),
            suggestions,
            font_family: profile.default_font().to_string(),
            font_size_px,
            style_preset: profile.default_style_preset().to_string(),
            copied_until: None,
            context: EditorContext::new(),
            config,
            profile,
        };
        engine.sync();
        engine
    }

    /// Get a reference to the context for reading editor state.
    pub fn context(&self) -> &EditorContext {
        &self.context
    }

    pub fn document(&self) -> &Document {
        self.surface.document()
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn format_state(&self) -> &FormatState {
        &self.format
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn profile(&self) -> &L {
        &self.profile
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn suggestions(&self) -> &SuggestionController {
        &self.suggestions
    }

    /// Process a key event.
    pub fn process_key(&mut self, key: KeyEvent) -> KeyResult {
        trace!(?key, building = self.session.is_building(), "key");
        let result = self.dispatch(key);
        self.sync();
        result
    }

    fn dispatch(&mut self, key: KeyEvent) -> KeyResult {
        match key {
            KeyEvent::Ctrl(ch) => return self.handle_chord(ch.to_ascii_lowercase(), false),
            KeyEvent::CtrlShift(ch) => return self.handle_chord(ch.to_ascii_lowercase(), true),
            KeyEvent::Char(ch) if classify(ch, &*self.profile) == InputClass::Literal => {
                let style = self.format.insertion_style();
                let result =
                    self.tracker
                        .push_literal(&mut self.session, &mut self.surface, ch, &style);
                self.after_region_change(&result);
                return KeyResult::Handled;
            }
            KeyEvent::Enter if self.suggestions.has_candidates() => {
                let generation = self.suggestions.generation();
                self.select_suggestion(generation, 0);
                return KeyResult::Handled;
            }
            _ => {}
        }

        match key {
            KeyEvent::Char(' ') | KeyEvent::Enter => {
                self.close_region();
                let text = if key == KeyEvent::Enter { "\n" } else { " " };
                self.surface
                    .insert_styled_text(text, &self.format.insertion_style());
                KeyResult::Handled
            }
            KeyEvent::Escape => {
                self.close_region();
                KeyResult::Handled
            }
            KeyEvent::Left | KeyEvent::Right | KeyEvent::Up | KeyEvent::Down => {
                self.close_region();
                self.surface.move_caret(caret_move(key));
                KeyResult::Handled
            }
            KeyEvent::Backspace => self.backspace(),
            KeyEvent::Char(ch) => {
                if let Some(index) = self.displayed_select_index(ch) {
                    let generation = self.suggestions.generation();
                    self.select_suggestion(generation, index);
                    return KeyResult::Handled;
                }
                self.close_region();
                let mut buf = [0u8; 4];
                self.surface
                    .insert_styled_text(ch.encode_utf8(&mut buf), &self.format.insertion_style());
                KeyResult::Handled
            }
            KeyEvent::Ctrl(_) | KeyEvent::CtrlShift(_) => KeyResult::NotHandled,
        }
    }

    fn handle_chord(&mut self, ch: char, shift: bool) -> KeyResult {
        let command = match (ch, shift) {
            ('b', false) => return self.chord_format(Format::Bold),
            ('i', false) => return self.chord_format(Format::Italic),
            ('u', false) => return self.chord_format(Format::Underline),
            ('z', false) => HostCommand::Undo,
            ('y', false) | ('z', true) => HostCommand::Redo,
            _ => return KeyResult::NotHandled,
        };
        self.close_region();
        debug!(?command, "delegating to host");
        KeyResult::Delegate(command)
    }

    fn chord_format(&mut self, format: Format) -> KeyResult {
        self.format.toggle(format, &mut self.surface);
        KeyResult::Handled
    }

    fn backspace(&mut self) -> KeyResult {
        if self.session.is_building() {
            let style = self.format.insertion_style();
            let result = self
                .tracker
                .backspace(&mut self.session, &mut self.surface, &style);
            self.after_region_change(&result);
            return KeyResult::Handled;
        }

        let selection = self.surface.selection();
        let range = if selection.is_collapsed() {
            if selection.head == 0 {
                return KeyResult::NotHandled;
            }
            selection.head - 1..selection.head
        } else {
            selection.range()
        };
        self.surface.delete_range(range);
        KeyResult::Handled
    }

    /// Index of the candidate `ch` selects, if candidates are displayed and
    /// `ch` is a select key within range.
    fn displayed_select_index(&self, ch: char) -> Option<usize> {
        let shown = self.suggestions.current()?.candidates.len();
        self.config
            .selection_key_index(ch)
            .filter(|index| *index < shown)
    }

    /// Insert text as one transliterated block, bypassing region tracking.
    pub fn paste(&mut self, text: &str) {
        let style = self.format.insertion_style();
        let result = self
            .tracker
            .paste(&mut self.session, &mut self.surface, text, &style);
        self.suggestions.cancel();
        trace!(?result, "paste");
        self.sync();
    }

    pub fn toggle_format(&mut self, format: Format) -> FormatTarget {
        let target = self.format.toggle(format, &mut self.surface);
        self.sync();
        target
    }

    /// Set the active colour from a `#rgb`/`#rrggbb` value.
    pub fn set_color(&mut self, value: &str) -> Result<FormatTarget, ColorError> {
        let color = Color::parse(value)?;
        let target = self.format.set_color(color, &mut self.surface);
        self.sync();
        Ok(target)
    }

    /// Toggle a list kind on the paragraphs touched by the selection.
    ///
    /// If every touched paragraph already has `kind` the list is removed.
    pub fn toggle_list(&mut self, kind: ListKind) {
        self.close_region();
        let range = self.surface.selection().range();
        let all_set = self
            .surface
            .document()
            .blocks_in(range.clone())
            .iter()
            .all(|b| b.list == Some(kind));
        let kind = (!all_set).then_some(kind);
        self.surface.apply(EditOp::SetListKind { range, kind });
        self.sync();
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        let range = self.surface.selection().range();
        self.surface.apply(EditOp::SetAlignment { range, alignment });
        self.sync();
    }

    /// Move the caret/selection. Relocating the caret closes the word in
    /// progress.
    pub fn set_selection(&mut self, selection: Selection) {
        if selection != self.surface.selection() {
            self.close_region();
        }
        self.surface.set_selection(selection);
        self.sync();
    }

    /// Pick candidate `index` (0-based) of the set shown for `generation`.
    ///
    /// Returns false when `generation` is stale or the index is out of range.
    pub fn select_suggestion(&mut self, generation: u64, index: usize) -> bool {
        let Some(candidate) = self
            .suggestions
            .select(generation, index)
            .map(str::to_string)
        else {
            return false;
        };
        let style = self.format.insertion_style();
        let result =
            self.tracker
                .select_candidate(&mut self.session, &mut self.surface, &candidate, &style);
        self.after_region_change(&result);
        self.sync();
        result == RegionResult::Closed
    }

    /// Apply suggestion replies that have arrived. Also expires the
    /// "copied" flag, so hosts should call it regularly.
    pub fn poll_suggestions(&mut self) -> bool {
        let changed = self.suggestions.poll();
        self.sync();
        changed
    }

    /// Wait for the outstanding suggestion lookup and apply it.
    pub async fn settle_suggestions(&mut self) -> bool {
        let changed = self.suggestions.settle().await;
        self.sync();
        changed
    }

    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = family.to_string();
        self.sync();
    }

    /// Set the surface font size, clamped to [`FONT_SIZE_RANGE`].
    pub fn set_font_size(&mut self, size_px: f32) {
        self.font_size_px = clamp_font_size(size_px);
        self.surface.set_font_size(self.font_size_px);
        self.sync();
    }

    /// Switch the decorative preset. Unknown presets are rejected.
    pub fn set_style_preset(&mut self, preset: &str) -> bool {
        if !self.profile.style_presets().iter().any(|p| p.value == preset) {
            debug!(preset, "unknown style preset");
            return false;
        }
        self.style_preset = preset.to_string();
        self.sync();
        true
    }

    /// Empty the document and drop the word in progress and suggestions.
    pub fn clear(&mut self) {
        self.surface.clear();
        self.session.clear();
        self.suggestions.cancel();
        self.copied_until = None;
        self.sync();
    }

    pub fn export_settings(&self) -> ExportSettings {
        ExportSettings {
            font_family: self.font_family.clone(),
            font_size_px: self.font_size_px,
            fallback_font: self.profile.fallback_font_name().to_string(),
        }
    }

    pub fn export(&self) -> ExportSnapshot {
        ExportSnapshot::from_document(self.surface.document(), &self.export_settings())
    }

    /// Write all three payloads to `clipboard`.
    ///
    /// Does nothing for an empty document. Returns whether the copy
    /// succeeded; failures only clear the "copied" flag.
    pub fn copy<C: Clipboard + ?Sized>(&mut self, clipboard: &mut C) -> bool {
        let snapshot = self.export();
        if snapshot.plain_text.is_empty() {
            return false;
        }
        let copied = match clipboard.write(&snapshot) {
            Ok(()) => {
                self.copied_until = Some(Instant::now() + self.config.copy_feedback());
                true
            }
            Err(e) => {
                warn!(error = %e, "clipboard write failed");
                self.copied_until = None;
                false
            }
        };
        self.sync();
        copied
    }

    /// Whether the "copied" confirmation is still showing.
    pub fn is_copied(&self) -> bool {
        self.copied_until
            .is_some_and(|until| Instant::now() < until)
    }

    fn close_region(&mut self) {
        let result = self.tracker.commit(&mut self.session);
        self.after_region_change(&result);
        self.suggestions.cancel();
    }

    fn after_region_change(&mut self, result: &RegionResult) {
        if result.buffer_changed() {
            // Position the overlay before a cached set is shown.
            self.suggestions.set_anchor(self.region_anchor());
            self.suggestions
                .on_buffer_changed(self.session.buffer().text());
        } else if *result == RegionResult::Closed {
            self.suggestions.cancel();
        }
    }

    fn region_anchor(&self) -> Option<AnchorPoint> {
        let region = self.session.region()?;
        self.surface.query_anchor_rect(region)
    }

    /// Post-mutation step: re-derive the anchor and refresh the context.
    fn sync(&mut self) {
        if self.copied_until.is_some() && !self.is_copied() {
            self.copied_until = None;
        }
        self.suggestions.set_anchor(self.region_anchor());

        let ctx = &mut self.context;
        ctx.buffer = self.session.buffer().text().to_string();
        ctx.region = self.session.region();
        match self.suggestions.current() {
            Some(set) => {
                ctx.candidates = set.candidates.clone();
                ctx.generation = set.generation;
                ctx.anchor = set.anchor;
            }
            None => {
                ctx.candidates.clear();
                ctx.generation = self.suggestions.generation();
                ctx.anchor = None;
            }
        }
        ctx.active_style = self.format.insertion_style();
        ctx.placeholder = self.profile.placeholder().to_string();
        ctx.show_placeholder = self.surface.document().is_empty();
        ctx.copied = self.copied_until.is_some();
        ctx.style_preset = self.style_preset.clone();
        ctx.font_family = self.font_family.clone();
        ctx.font_size_px = self.font_size_px;
    }
}

fn caret_move(key: KeyEvent) -> CaretMove {
    match key {
        KeyEvent::Left => CaretMove::Left,
        KeyEvent::Right => CaretMove::Right,
        KeyEvent::Up => CaretMove::Up,
        _ => CaretMove::Down,
    }
}

fn clamp_font_size(size_px: f32) -> f32 {
    if size_px.is_nan() {
        return *FONT_SIZE_RANGE.start();
    }
    size_px.clamp(*FONT_SIZE_RANGE.start(), *FONT_SIZE_RANGE.end())
}

/// Select keys that classify as input would only ever extend the word, so
/// they are removed. Falls back to the default keys if none remain.
fn drop_input_select_keys<L: LanguageProfile + ?Sized>(config: &mut Config, profile: &L) {
    let (kept, removed): (String, String) = config
        .select_keys
        .chars()
        .partition(|ch| classify(*ch, profile) != InputClass::Literal);
    if removed.is_empty() {
        return;
    }
    warn!(%removed, "select keys overlap the input alphabet, ignoring them");
    if kept.is_empty() {
        config.select_keys = Config::default().select_keys;
    } else {
        config.select_keys = kept;
    }
}
