// core/tests/rtf_export.rs
//
// Integration tests for the clipboard export payloads.
//
// Tests cover:
// - RTF escaping of control characters and non-ASCII text
// - Font size encoding in half-points
// - Primary font extraction from CSS font-family specifications
// - Snapshot of a styled document through the engine

use liblipi_core::export::{primary_font_name, to_rtf};
use liblipi_core::{
    Config, FontOption, Format, KeyEvent, LanguageProfile, MemoryClipboard, StylePreset,
    TransliterationError, TypewriterEngine,
};
use std::sync::Arc;

#[test]
fn test_rtf_escapes_and_size() {
    let rtf = to_rtf("Te\\lu{gu}\n", "Sample Font", 14.0);
    assert_eq!(
        rtf,
        "{\\rtf1\\ansi\\deff0{\\fonttbl{\\f0\\fnil Sample Font;}}\\uc1\\fs28 Te\\\\lu\\{gu\\}\\par }"
    );
}

#[test]
fn test_rtf_unicode_escape() {
    // U+0C24 TELUGU LETTER TA
    let rtf = to_rtf("త", "Sample Font", 14.0);
    assert!(rtf.ends_with("\\fs28 \\u3108?}"));

    // Outside the BMP the code point is written as-is.
    let rtf = to_rtf("😀", "F", 12.0);
    assert!(rtf.contains("\\u128512?"));

    // ASCII boundary: DEL passes through.
    assert!(to_rtf("\u{7f}", "F", 12.0).ends_with(" \u{7f}}"));
}

#[test]
fn test_rtf_size_rounding() {
    assert!(to_rtf("a", "F", 10.25).contains("\\fs21 "));
    assert!(to_rtf("a", "F", 3.0).contains("\\fs8 "));
    assert!(to_rtf("a", "F", 50.0).contains("\\fs100 "));
}

#[test]
fn test_primary_font_name_forms() {
    let fallback = "Noto Sans Telugu";
    assert_eq!(
        primary_font_name("\"Ramabhadra\", \"Noto Sans Telugu\", sans-serif", fallback),
        "Ramabhadra"
    );
    assert_eq!(primary_font_name("Gidugu, sans-serif", fallback), "Gidugu");
    assert_eq!(primary_font_name("", fallback), fallback);
}

struct Plain;

const FONTS: &[FontOption] = &[FontOption {
    label: "Serif",
    value: "\"Book Serif\", serif",
}];

impl LanguageProfile for Plain {
    fn id(&self) -> &str {
        "plain"
    }
    fn name(&self) -> &str {
        "Plain"
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
        FONTS
    }
    fn style_presets(&self) -> &[StylePreset] {
        &[]
    }
    fn fallback_font_name(&self) -> &str {
        "Book Serif"
    }
}

#[test]
fn test_engine_snapshot() {
    let mut engine = TypewriterEngine::new(Arc::new(Plain), Config::default());
    engine.set_font_size(14.0);
    for ch in "hi ".chars() {
        engine.process_key(KeyEvent::Char(ch));
    }
    engine.process_key(KeyEvent::Ctrl('b'));
    for ch in "there".chars() {
        engine.process_key(KeyEvent::Char(ch));
    }
    engine.process_key(KeyEvent::Enter);

    let mut clipboard = MemoryClipboard::new();
    assert!(engine.copy(&mut clipboard));
    let snapshot = clipboard.last().unwrap();

    assert_eq!(snapshot.plain_text, "hi there");
    assert_eq!(
        snapshot.rtf,
        "{\\rtf1\\ansi\\deff0{\\fonttbl{\\f0\\fnil Book Serif;}}\\uc1\\fs28 hi there}"
    );
    assert_eq!(
        snapshot.html,
        "<div style=\"font-family:&quot;Book Serif&quot;, serif; font-size:14px;\">\
         <div>hi <span style=\"font-weight:700\">there</span></div><div><br></div></div>"
    );
    assert!(engine.context().copied);

    let json = serde_json::to_value(snapshot).unwrap();
    assert_eq!(json["plain_text"], "hi there");
    assert!(engine.format_state().is_active(Format::Bold));
}
