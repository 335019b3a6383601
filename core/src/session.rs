//! Editor session state.
//!
//! The `EditorSession` struct owns the word-in-progress state: the romanized
//! input buffer, the span of the document it currently occupies, and the
//! region state. It is owned by the engine and passed by reference to the
//! tracker.

use super::input_buffer::InputBuffer;
use std::ops::Range;

/// State of the word-region state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegionState {
    /// No word in progress
    #[default]
    Idle,
    /// A word is being built from the input buffer
    Building,
}

/// Word-in-progress state.
///
/// Invariant: `region` is `Some` exactly when the buffer is non-empty, and
/// `state` is `Building` exactly then.
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    /// Raw romanized input (e.g., "telugu")
    buffer: InputBuffer,

    /// Char span of the rendered word in the document
    region: Option<Range<usize>>,

    state: RegionState,
}

impl EditorSession {
    /// Create a new idle session.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &InputBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut InputBuffer {
        &mut self.buffer
    }

    /// Span of the active word region, if any.
    pub fn region(&self) -> Option<Range<usize>> {
        self.region.clone()
    }

    pub fn state(&self) -> RegionState {
        self.state
    }

    pub fn is_building(&self) -> bool {
        self.state == RegionState::Building
    }

    /// Record the span the rendered word now occupies.
    pub(crate) fn set_region(&mut self, region: Range<usize>) {
        self.region = Some(region);
        self.state = RegionState::Building;
    }

    /// Drop the buffer and region and return to `Idle`.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.region = None;
        self.state = RegionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle() {
        let session = EditorSession::new();
        assert_eq!(session.state(), RegionState::Idle);
        assert!(session.region().is_none());
        assert!(session.buffer().is_empty());
    }

    #[test]
    fn test_set_region_and_clear() {
        let mut session = EditorSession::new();
        session.buffer_mut().push('a');
        session.set_region(3..4);
        assert!(session.is_building());
        assert_eq!(session.region(), Some(3..4));

        session.clear();
        assert_eq!(session.state(), RegionState::Idle);
        assert!(session.region().is_none());
        assert_eq!(session.buffer().text(), "");
    }
}
