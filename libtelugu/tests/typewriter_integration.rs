// libtelugu/tests/typewriter_integration.rs
//
// End-to-end typing through the Telugu profile: live re-rendering of the
// word in progress, commit keys, candidate selection and clipboard export.

use libtelugu::{
    Format, KeyEvent, KeyResult, LanguageProfile, MemoryClipboard, TeluguConfig, TeluguProfile, TypewriterEngine,
};
use liblipi_core::{CancelToken, SuggestError, SuggestionFuture, SuggestionService};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// Answers with the offline rendering plus a long-vowel variant.
#[derive(Default)]
struct FixedService {
    requests: Mutex<Vec<String>>,
}

impl SuggestionService for FixedService {
    fn fetch(&self, text: String, _cancel: CancelToken) -> SuggestionFuture {
        self.requests.lock().unwrap().push(text.clone());
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            if text == "zzz" {
                return Err(SuggestError::Status(503));
            }
            let base = libtelugu::transliterate(&text);
            Ok(vec![base.clone(), format!("{base}\u{0C3E}")])
        })
    }
}

fn offline_engine() -> TypewriterEngine<TeluguProfile> {
    libtelugu::telugu_engine(TeluguConfig::default())
}

fn online_engine() -> (TypewriterEngine<TeluguProfile>, Arc<FixedService>) {
    let service = Arc::new(FixedService::default());
    let shared: Arc<dyn SuggestionService> = service.clone();
    let profile = Arc::new(TeluguProfile::with_service(shared));
    let engine = TypewriterEngine::new(profile, TeluguConfig::default().into_base());
    (engine, service)
}

fn type_str<L: LanguageProfile + ?Sized>(engine: &mut TypewriterEngine<L>, text: &str) {
    for ch in text.chars() {
        engine.process_key(KeyEvent::Char(ch));
    }
}

#[test]
fn test_word_is_rerendered_on_every_keystroke() {
    let mut engine = offline_engine();
    let steps = [('a', "అ"), ('m', "అమ్"), ('m', "అమ్మ్"), ('a', "అమ్మ")];
    for (ch, expected) in steps {
        assert_eq!(engine.process_key(KeyEvent::Char(ch)), KeyResult::Handled);
        assert_eq!(engine.document().text(), expected);
    }
    assert_eq!(engine.context().buffer, "amma");
    assert_eq!(engine.context().region, Some(0..4));
}

#[test]
fn test_space_commits_and_starts_new_word() {
    let mut engine = offline_engine();
    type_str(&mut engine, "amma naanna");
    assert_eq!(engine.document().text(), "అమ్మ నాన్న");
    assert_eq!(engine.context().buffer, "naanna");
}

#[test]
fn test_backspace_edits_the_romanized_buffer() {
    let mut engine = offline_engine();
    type_str(&mut engine, "telugu");
    assert_eq!(engine.document().text(), "తెలుగు");

    engine.process_key(KeyEvent::Backspace);
    assert_eq!(engine.document().text(), "తెలుగ్");
    assert_eq!(engine.context().buffer, "telug");

    engine.process_key(KeyEvent::Char('a'));
    assert_eq!(engine.document().text(), "తెలుగ");
}

#[test]
fn test_escape_closes_region() {
    let mut engine = offline_engine();
    type_str(&mut engine, "ka");
    engine.process_key(KeyEvent::Escape);
    assert!(engine.context().region.is_none());
    type_str(&mut engine, "a");
    assert_eq!(engine.document().text(), "కఅ");
}

#[test]
fn test_enter_splits_paragraphs() {
    let mut engine = offline_engine();
    type_str(&mut engine, "amma");
    engine.process_key(KeyEvent::Enter);
    type_str(&mut engine, "raamu");
    assert_eq!(engine.document().text(), "అమ్మ\nరాము");
    assert_eq!(engine.document().paragraph_count(), 2);
}

#[test]
fn test_paste_is_transliterated_as_a_block() {
    let mut engine = offline_engine();
    engine.paste("namaste telugu");
    assert_eq!(engine.document().text(), "నమస్తె తెలుగు");
    assert!(engine.context().region.is_none());
}

#[test]
fn test_placeholder_follows_document() {
    let mut engine = offline_engine();
    assert!(engine.context().show_placeholder);
    assert_eq!(engine.context().placeholder, "టైప్ చేయడం ప్రారంభించండి...");
    type_str(&mut engine, "a");
    assert!(!engine.context().show_placeholder);
    engine.clear();
    assert!(engine.context().show_placeholder);
}

#[test]
fn test_bold_word_export() {
    let mut engine = offline_engine();
    engine.toggle_format(Format::Bold);
    type_str(&mut engine, "telugu");

    let snapshot = engine.export();
    assert_eq!(snapshot.plain_text, "తెలుగు");
    assert!(snapshot
        .html
        .contains("<span style=\"font-weight:700\">తెలుగు</span>"));
    assert!(snapshot.rtf.contains("\\f0\\fnil Noto Sans Telugu;"));
    assert!(snapshot
        .rtf
        .ends_with("\\fs24 \\u3108?\\u3142?\\u3122?\\u3137?\\u3095?\\u3137?}"));
}

#[tokio::test(start_paused = true)]
async fn test_copy_feedback_expires() {
    let mut engine = offline_engine();
    let mut clipboard = MemoryClipboard::new();
    assert!(!engine.copy(&mut clipboard), "empty document is not copied");

    type_str(&mut engine, "amma");
    assert!(engine.copy(&mut clipboard));
    assert!(engine.context().copied);
    assert_eq!(clipboard.last().map(|s| s.plain_text.as_str()), Some("అమ్మ"));

    tokio::time::advance(Duration::from_millis(1601)).await;
    engine.poll_suggestions();
    assert!(!engine.context().copied);
}

#[tokio::test(start_paused = true)]
async fn test_candidates_and_select_key() {
    let (mut engine, service) = online_engine();
    type_str(&mut engine, "amma");
    assert!(engine.settle_suggestions().await);
    assert_eq!(engine.context().candidates, vec!["అమ్మ", "అమ్మా"]);
    assert_eq!(*service.requests.lock().unwrap(), vec!["amma".to_string()]);

    // '2' is not a letter, so it picks the second candidate.
    assert_eq!(engine.process_key(KeyEvent::Char('2')), KeyResult::Handled);
    assert_eq!(engine.document().text(), "అమ్మా");
    assert!(engine.context().region.is_none());
    assert!(engine.context().candidates.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_enter_takes_first_candidate() {
    let (mut engine, _service) = online_engine();
    type_str(&mut engine, "raamu");
    engine.settle_suggestions().await;
    assert!(engine.context().has_candidates());

    engine.process_key(KeyEvent::Enter);
    assert_eq!(engine.document().text(), "రాము");
    assert_eq!(engine.document().paragraph_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_short_buffer_and_failures_show_nothing() {
    let (mut engine, service) = online_engine();
    type_str(&mut engine, "k");
    engine.settle_suggestions().await;
    assert!(engine.context().candidates.is_empty());
    assert!(service.requests.lock().unwrap().is_empty());

    engine.process_key(KeyEvent::Char(' '));
    type_str(&mut engine, "zzz");
    engine.settle_suggestions().await;
    assert!(engine.context().candidates.is_empty());
    assert_eq!(engine.document().text(), "క్ జ్జ్జ్");
}
