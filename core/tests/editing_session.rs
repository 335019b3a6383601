// core/tests/editing_session.rs
//
// Integration tests for the word-region lifecycle driven through
// TypewriterEngine key events.
//
// Tests cover:
// - Region content always equals a fresh transliteration of the buffer
// - Backspace symmetry and buffer exhaustion
// - Commit characters closing the region
// - Paste bypassing region tracking
// - Formatting applied to text typed after a toggle

use liblipi_core::{
    Config, FontOption, Format, KeyEvent, LanguageProfile, RegionState, Selection, StylePreset,
    TransliterationError, TypewriterEngine,
};
use std::sync::Arc;

// Mock profile: short vowels merge into the preceding consonant and a
// trailing consonant gets a '+' mark, so the rendering of a buffer is not
// the concatenation of the renderings of its chars.
struct MockProfile;

impl MockProfile {
    fn render(buffer: &str) -> String {
        let mut out = String::new();
        let chars: Vec<char> = buffer.chars().collect();
        for (i, ch) in chars.iter().enumerate() {
            if !ch.is_ascii_alphabetic() {
                out.push(*ch);
                continue;
            }
            let vowel = "aeiou".contains(*ch);
            if vowel && i > 0 && !"aeiou".contains(chars[i - 1]) {
                out.push(ch.to_ascii_lowercase());
            } else {
                out.push(ch.to_ascii_uppercase());
            }
            let next_is_vowel = chars.get(i + 1).is_some_and(|n| "aeiou".contains(*n));
            if !vowel && !next_is_vowel {
                out.push('+');
            }
        }
        out
    }
}

impl LanguageProfile for MockProfile {
    fn id(&self) -> &str {
        "mock"
    }
    fn name(&self) -> &str {
        "Mock"
    }
    fn is_input_char(&self, ch: char) -> bool {
        ch.is_ascii_lowercase()
    }
    fn try_transliterate(&self, buffer: &str) -> Result<String, TransliterationError> {
        if buffer.contains('q') {
            return Err(TransliterationError::Unsupported(buffer.to_string()));
        }
        Ok(Self::render(buffer))
    }
    fn placeholder(&self) -> &str {
        "type here"
    }
    fn fonts(&self) -> &[FontOption] {
        &[]
    }
    fn style_presets(&self) -> &[StylePreset] {
        &[]
    }
    fn fallback_font_name(&self) -> &str {
        "Mock Sans"
    }
}

fn engine() -> TypewriterEngine<MockProfile> {
    TypewriterEngine::new(Arc::new(MockProfile), Config::default())
}

fn type_str(engine: &mut TypewriterEngine<MockProfile>, text: &str) {
    for ch in text.chars() {
        engine.process_key(KeyEvent::Char(ch));
    }
}

fn region_text(engine: &TypewriterEngine<MockProfile>) -> String {
    let region = engine.session().region().expect("region should be active");
    engine.document().slice(region)
}

#[test]
fn test_region_matches_fresh_transliteration() {
    for word in ["krishna", "amma", "telugu", "str", "aeiou"] {
        let mut engine = engine();
        engine.paste("x ");
        for ch in word.chars() {
            engine.process_key(KeyEvent::Char(ch));
            let buffer = engine.session().buffer().text().to_string();
            assert_eq!(region_text(&engine), MockProfile.transliterate(&buffer), "{word}");
        }
        assert_eq!(engine.document().text(), format!("X+ {}", MockProfile::render(word)));
    }
}

#[test]
fn test_rendering_is_not_incremental() {
    let mut engine = engine();
    type_str(&mut engine, "k");
    assert_eq!(region_text(&engine), "K+");
    type_str(&mut engine, "a");
    // "K+" + "A" would be the incremental (wrong) result.
    assert_eq!(region_text(&engine), "Ka");
    assert_eq!(engine.document().text(), "Ka");
}

#[test]
fn test_backspace_symmetry() {
    let mut typed = engine();
    type_str(&mut typed, "krishnaa");
    typed.process_key(KeyEvent::Backspace);

    let mut direct = engine();
    type_str(&mut direct, "krishna");

    assert_eq!(typed.document().text(), direct.document().text());
    assert_eq!(typed.session().region(), direct.session().region());
    assert_eq!(typed.context().buffer, "krishna");
}

#[test]
fn test_buffer_exhaustion_returns_to_idle() {
    let mut engine = engine();
    type_str(&mut engine, "ab");
    engine.process_key(KeyEvent::Char(' '));
    type_str(&mut engine, "k");
    assert_eq!(engine.session().state(), RegionState::Building);

    engine.process_key(KeyEvent::Backspace);
    assert_eq!(engine.session().state(), RegionState::Idle);
    assert!(engine.session().region().is_none());
    assert!(engine.context().region.is_none());
    assert_eq!(engine.document().text(), "Ab+ ");

    // The next backspace edits the committed text, not a region.
    engine.process_key(KeyEvent::Backspace);
    assert_eq!(engine.document().text(), "Ab+");
    assert_eq!(engine.session().state(), RegionState::Idle);
}

#[test]
fn test_commit_starts_unrelated_region() {
    let mut engine = engine();
    type_str(&mut engine, "ka");
    engine.process_key(KeyEvent::Char(' '));
    assert!(engine.session().region().is_none());
    assert!(engine.session().buffer().is_empty());

    type_str(&mut engine, "ma");
    assert_eq!(engine.context().buffer, "ma");
    assert_eq!(engine.session().region(), Some(3..5));
    assert_eq!(engine.document().text(), "Ka Ma");

    engine.process_key(KeyEvent::Enter);
    type_str(&mut engine, "t");
    assert_eq!(engine.document().text(), "Ka Ma\nT+");
    assert_eq!(engine.session().region(), Some(6..8));
}

#[test]
fn test_paste_bypasses_region() {
    let mut engine = engine();
    type_str(&mut engine, "ka");
    engine.paste("krishna rao");
    assert!(engine.session().region().is_none());
    assert!(engine.session().buffer().is_empty());
    assert_eq!(
        engine.document().text(),
        format!("Ka{}", MockProfile::render("krishna rao"))
    );

    // Typing after a paste opens a fresh region at the caret.
    type_str(&mut engine, "m");
    let len = engine.document().len();
    assert_eq!(engine.session().region(), Some(len - 2..len));
}

#[test]
fn test_transliteration_failure_keeps_raw_buffer() {
    let mut engine = engine();
    type_str(&mut engine, "aq");
    assert_eq!(region_text(&engine), "aq");
    engine.process_key(KeyEvent::Backspace);
    assert_eq!(region_text(&engine), "A");
}

#[test]
fn test_formatting_applies_to_following_text() {
    let mut engine = engine();
    type_str(&mut engine, "ka");
    engine.process_key(KeyEvent::Char(' '));
    engine.toggle_format(Format::Bold);
    type_str(&mut engine, "ma");

    let runs = engine.document().runs();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].text, "Ka ");
    assert!(!runs[0].style.bold);
    assert_eq!(runs[1].text, "Ma");
    assert!(runs[1].style.bold);
}

#[test]
fn test_caret_relocation_commits() {
    let mut engine = engine();
    type_str(&mut engine, "ka ma");
    engine.set_selection(Selection::caret(0));
    assert!(engine.session().region().is_none());
    type_str(&mut engine, "t");
    assert_eq!(engine.document().text(), "T+Ka Ma");
}
