//! Romanized input buffer for the word in progress.
//!
//! The buffer stores the raw transliteration-scheme characters typed since
//! the last commit or cancel (e.g. "telugu"). It is separate from the
//! rendered text in the document, which is always re-derived from the whole
//! buffer.

/// Input buffer holding the raw romanized word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    /// Create a new empty input buffer.
    pub fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    /// Get the raw input text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the buffer in chars.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Append one character.
    pub fn push(&mut self, ch: char) {
        self.text.push(ch);
    }

    /// Remove the last character (backspace).
    /// Returns the removed character, if any.
    pub fn pop(&mut self) -> Option<char> {
        self.text.pop()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.text.clear();
    }
}
