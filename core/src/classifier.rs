//! Keystroke classification.
//!
//! A character either extends the word being built (`Literal`) or closes it
//! (`Commit`). The decision depends only on the character and the active
//! language profile.

use crate::engine::KeyEvent;
use crate::profile::LanguageProfile;

/// Class of an incoming character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputClass {
    /// Part of the transliteration alphabet
    Literal,
    /// Closes the active word region
    Commit,
}

/// Classify a single character.
pub fn classify<L: LanguageProfile + ?Sized>(ch: char, profile: &L) -> InputClass {
    if profile.is_input_char(ch) {
        InputClass::Literal
    } else {
        InputClass::Commit
    }
}

/// Classify a key event.
///
/// Returns `None` for keys that neither extend nor close a word on their own
/// (backspace, control chords).
pub fn classify_key<L: LanguageProfile + ?Sized>(key: &KeyEvent, profile: &L) -> Option<InputClass> {
    match key {
        KeyEvent::Char(ch) => Some(classify(*ch, profile)),
        KeyEvent::Enter
        | KeyEvent::Escape
        | KeyEvent::Left
        | KeyEvent::Right
        | KeyEvent::Up
        | KeyEvent::Down => Some(InputClass::Commit),
        KeyEvent::Backspace | KeyEvent::Ctrl(_) | KeyEvent::CtrlShift(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{FontOption, StylePreset, TransliterationError};

    struct Latin;

    impl LanguageProfile for Latin {
        fn id(&self) -> &str {
            "la"
        }
        fn name(&self) -> &str {
            "Latin"
        }
        fn is_input_char(&self, ch: char) -> bool {
            ch.is_ascii_alphabetic()
        }
        fn try_transliterate(&self, buffer: &str) -> Result<String, TransliterationError> {
            Ok(buffer.to_string())
        }
        fn placeholder(&self) -> &str {
            ""
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
    fn test_letters_are_literal() {
        assert_eq!(classify('a', &Latin), InputClass::Literal);
        assert_eq!(classify('Z', &Latin), InputClass::Literal);
    }

    #[test]
    fn test_everything_else_commits() {
        for ch in [' ', '\n', '\t', '1', '.', 'é', 'క'] {
            assert_eq!(classify(ch, &Latin), InputClass::Commit, "{ch:?}");
        }
    }

    #[test]
    fn test_navigation_keys_commit() {
        assert_eq!(classify_key(&KeyEvent::Left, &Latin), Some(InputClass::Commit));
        assert_eq!(classify_key(&KeyEvent::Escape, &Latin), Some(InputClass::Commit));
        assert_eq!(classify_key(&KeyEvent::Backspace, &Latin), None);
        assert_eq!(classify_key(&KeyEvent::Ctrl('b'), &Latin), None);
    }
}
