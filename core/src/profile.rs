// core/src/profile.rs
//
// Language profile: the seam between the language-agnostic editing core and a
// concrete script (Telugu, ...). Language crates implement `LanguageProfile`
// and hand it to `TypewriterEngine`.

use crate::suggestion::SuggestionService;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Failure inside a transliteration scheme.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransliterationError {
    #[error("unsupported input {0:?}")]
    Unsupported(String),
    #[error("transliteration failed: {0}")]
    Internal(String),
}

/// A font family offered by a language profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FontOption {
    /// Display label (usually in the target script)
    pub label: &'static str,
    /// CSS font-family specification, e.g. `"Noto Sans Telugu", sans-serif`
    pub value: &'static str,
}

/// A named decorative treatment of the whole text surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StylePreset {
    pub label: &'static str,
    pub value: &'static str,
}

/// Per-language behaviour consumed by the editing core.
///
/// Only `try_transliterate` may fail; the provided [`transliterate`] wrapper
/// turns every failure into the untransformed input so the keystroke path
/// never sees an error.
///
/// [`transliterate`]: LanguageProfile::transliterate
pub trait LanguageProfile: Send + Sync {
    /// Short identifier, e.g. "te".
    fn id(&self) -> &str;

    /// Human-readable language name.
    fn name(&self) -> &str;

    /// Whether `ch` belongs to the transliteration alphabet.
    fn is_input_char(&self, ch: char) -> bool;

    /// Render a romanized buffer in the target script.
    fn try_transliterate(&self, buffer: &str) -> Result<String, TransliterationError>;

    /// Total transliteration: empty in, empty out; failure falls back to
    /// the original buffer.
    fn transliterate(&self, buffer: &str) -> String {
        if buffer.is_empty() {
            return String::new();
        }
        match self.try_transliterate(buffer) {
            Ok(rendered) => rendered,
            Err(e) => {
                warn!(language = self.id(), buffer, error = %e, "transliteration failed, keeping input");
                buffer.to_string()
            }
        }
    }

    /// Completion backend, if the language has one.
    fn suggestion_service(&self) -> Option<Arc<dyn SuggestionService>> {
        None
    }

    /// Maximum number of candidates shown at once.
    fn suggestion_limit(&self) -> usize {
        6
    }

    /// Placeholder shown while the document is empty.
    fn placeholder(&self) -> &str;

    fn fonts(&self) -> &[FontOption];

    fn style_presets(&self) -> &[StylePreset];

    /// Family used when the font specification yields no usable name.
    fn fallback_font_name(&self) -> &str;

    /// Initial font-family specification.
    fn default_font(&self) -> &str {
        self.fonts()
            .first()
            .map_or_else(|| self.fallback_font_name(), |f| f.value)
    }

    /// Initial style preset.
    fn default_style_preset(&self) -> &str {
        self.style_presets().first().map_or("normal", |p| p.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl LanguageProfile for Upper {
        fn id(&self) -> &str {
            "up"
        }
        fn name(&self) -> &str {
            "Upper"
        }
        fn is_input_char(&self, ch: char) -> bool {
            ch.is_ascii_alphabetic()
        }
        fn try_transliterate(&self, buffer: &str) -> Result<String, TransliterationError> {
            if buffer.contains('q') {
                return Err(TransliterationError::Unsupported(buffer.to_string()));
            }
            Ok(buffer.to_ascii_uppercase())
        }
        fn placeholder(&self) -> &str {
            "type..."
        }
        fn fonts(&self) -> &[FontOption] {
            &[]
        }
        fn style_presets(&self) -> &[StylePreset] {
            &[]
        }
        fn fallback_font_name(&self) -> &str {
            "Sans"
        }
    }

    #[test]
    fn test_transliterate_falls_back_on_error() {
        let profile = Upper;
        assert_eq!(profile.transliterate("abc"), "ABC");
        assert_eq!(profile.transliterate("aqua"), "aqua");
        assert_eq!(profile.transliterate(""), "");
    }

    #[test]
    fn test_defaults() {
        let profile = Upper;
        assert_eq!(profile.suggestion_limit(), 6);
        assert_eq!(profile.default_font(), "Sans");
        assert_eq!(profile.default_style_preset(), "normal");
        assert!(profile.suggestion_service().is_none());
    }
}
