//! liblipi-core
//!
//! Language-agnostic live transliteration editing engine shared by the
//! language crates (libtelugu).
//!
//! A keystroke flows through the classifier into the word-region tracker,
//! which re-renders the word in progress through the active
//! [`LanguageProfile`]; the suggestion controller then looks up completion
//! candidates for the new buffer in the background. Formatting, lists,
//! alignment and clipboard export operate on the same styled [`Document`].
//!
//! Public API:
//! - `TypewriterEngine` - Coordinator hosts drive with key events
//! - `Document` / `Surface` - Styled run model and the host surface seam
//! - `LanguageProfile` - Per-language transliteration, fonts and suggestions
//! - `SuggestionController` - Debounced, cancellable candidate lookups
//! - `ExportSnapshot` - Plain text, HTML and RTF clipboard payloads
//! - `Config` - Configuration shared by every language
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod document;
pub use document::{
    Alignment, BlockFormat, Color, ColorError, Document, EditOp, Format, ListKind, Paragraph, Run,
    Style, StylePatch,
};

pub mod surface;
pub use surface::{AnchorPoint, CaretMove, DocumentSurface, LayoutMetrics, Selection, Surface};

pub mod profile;
pub use profile::{FontOption, LanguageProfile, StylePreset, TransliterationError};

pub mod classifier;
pub use classifier::{classify, classify_key, InputClass};

pub mod input_buffer;
pub use input_buffer::InputBuffer;

pub mod session;
pub use session::{EditorSession, RegionState};

pub mod region;
pub use region::{RegionResult, WordRegionTracker};

pub mod format;
pub use format::{FormatState, FormatTarget};

pub mod suggestion;
pub use suggestion::{
    cancel_pair, CancelHandle, CancelToken, SuggestError, SuggestionController, SuggestionFuture,
    SuggestionReply, SuggestionService, SuggestionSet, SuggestionSettings,
};

pub mod export;
pub use export::{
    Clipboard, ClipboardError, ExportSettings, ExportSnapshot, MemoryClipboard,
};

pub mod context;
pub use context::EditorContext;

pub mod engine;
pub use engine::{HostCommand, KeyEvent, KeyResult, TypewriterEngine};

/// Generic configuration for the editing core.
///
/// This config contains only language-agnostic fields. Language-specific
/// options (suggestion endpoints, request timeouts, ...) belong in the
/// language crate's config, which flattens this one.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    // Suggestion Settings
    /// Buffers shorter than this (in chars) never trigger a lookup
    pub suggestion_min_length: usize,
    /// Quiet interval after the last keystroke before a lookup is issued
    pub suggestion_debounce_ms: u64,
    /// Override for the profile's candidate limit
    pub suggestion_limit: Option<usize>,

    // Cache Management
    /// Maximum number of entries in the buffer -> candidates cache (0 disables it)
    pub max_cache_size: usize,

    // Candidate Selection
    /// Keys for selecting candidates (default: "123456789")
    /// First char selects the 1st candidate, etc.
    pub select_keys: String,

    // Presentation
    /// Colour treated as "no colour" for inserted text
    pub default_color: Color,
    pub default_font_size_px: f32,
    /// How long the "copied" confirmation stays on
    pub copy_feedback_ms: u64,
    /// Gap between a line and the candidate overlay
    pub anchor_offset_px: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            suggestion_min_length: 2,
            suggestion_debounce_ms: 200,
            suggestion_limit: None,
            max_cache_size: 256,
            select_keys: "123456789".to_string(),
            default_color: Color::black(),
            default_font_size_px: 12.0,
            copy_feedback_ms: 1600,
            anchor_offset_px: 8.0,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    // ========== Selection Keys Management ==========

    /// Set the selection keys string. Empty strings are ignored.
    pub fn set_select_keys(&mut self, keys: &str) {
        if !keys.is_empty() {
            self.select_keys = keys.to_string();
        }
    }

    /// Check if a character is a selection key and return its index (0-based).
    pub fn selection_key_index(&self, ch: char) -> Option<usize> {
        self.select_keys.chars().position(|c| c == ch)
    }

    /// Suggestion controller settings, using `profile_limit` unless the
    /// config overrides it.
    pub fn suggestion_settings(&self, profile_limit: usize) -> SuggestionSettings {
        SuggestionSettings {
            min_length: self.suggestion_min_length,
            debounce: Duration::from_millis(self.suggestion_debounce_ms),
            limit: self.suggestion_limit.unwrap_or(profile_limit),
            cache_size: self.max_cache_size,
        }
    }

    pub fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.suggestion_min_length, 2);
        assert_eq!(config.suggestion_debounce_ms, 200);
        assert_eq!(config.select_keys, "123456789");
        assert_eq!(config.copy_feedback(), Duration::from_millis(1600));
        assert_eq!(config.suggestion_settings(6).limit, 6);
    }

    #[test]
    fn test_config_toml_roundtrip_with_partial_input() {
        let config = Config::from_toml_str(
            r##"
            suggestion_limit = 4
            select_keys = "!@#$"
            default_color = "#ABC"
            "##,
        )
        .unwrap();
        assert_eq!(config.suggestion_limit, Some(4));
        assert_eq!(config.default_color.as_str(), "#aabbcc");
        assert_eq!(config.max_cache_size, 256);
        assert_eq!(config.selection_key_index('#'), Some(2));
        assert_eq!(config.suggestion_settings(6).limit, 4);

        let text = config.to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_bad_color_is_rejected() {
        assert!(Config::from_toml_str("default_color = \"red\"").is_err());
    }

    #[test]
    fn test_set_select_keys_ignores_empty() {
        let mut config = Config::default();
        config.set_select_keys("");
        assert_eq!(config.select_keys, "123456789");
        config.set_select_keys("-=[");
        assert_eq!(config.selection_key_index('='), Some(1));
    }
}
