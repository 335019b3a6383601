//! Suggestion controller.
//!
//! Every change of the input buffer starts a new *generation*. The previous
//! generation's request is cancelled, its candidates are hidden, and (once the
//! buffer is long enough) a task is spawned that waits for the debounce
//! interval and then asks the [`SuggestionService`] for candidates. Replies
//! come back over a channel tagged with their generation; only a reply for
//! the latest generation is ever displayed.
//!
//! Resolved lists are kept in an LRU cache keyed by the buffer text, so
//! retyping a word shows its candidates without a new request.

use crate::surface::AnchorPoint;
use lru::LruCache;
use std::future::Future;
use std::num::NonZeroUsize;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};
use unicode_normalization::UnicodeNormalization;

/// Failure of a candidate lookup. Never surfaced to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SuggestError {
    #[error("request cancelled")]
    Cancelled,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("service answered with status {0}")]
    Status(u16),
}

/// Boxed future returned by [`SuggestionService::fetch`].
pub type SuggestionFuture = Pin<Box<dyn Future<Output = Result<Vec<String>, SuggestError>> + Send>>;

/// Asynchronous completion backend.
///
/// Implementations should stop early once `cancel` reports cancellation;
/// the controller ignores the result of a superseded request either way.
pub trait SuggestionService: Send + Sync {
    fn fetch(&self, text: String, cancel: CancelToken) -> SuggestionFuture;
}

/// Observer side of a cancellation pair.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

/// Owner side of a cancellation pair. Dropping it cancels the token.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Create a linked handle/token pair.
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolve once the token is cancelled.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// Candidates currently on display.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionSet {
    pub candidates: Vec<String>,
    pub anchor: Option<AnchorPoint>,
    pub generation: u64,
}

/// Outcome of one lookup, tagged with the generation that issued it.
#[derive(Debug, Clone)]
pub struct SuggestionReply {
    pub generation: u64,
    pub text: String,
    pub outcome: Result<Vec<String>, SuggestError>,
}

/// Tuning knobs for [`SuggestionController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionSettings {
    /// Buffers shorter than this (in chars) never trigger a request
    pub min_length: usize,
    /// Quiet interval after the last buffer change
    pub debounce: Duration,
    /// Maximum number of candidates displayed
    pub limit: usize,
    /// Capacity of the resolved-list cache; 0 disables it
    pub cache_size: usize,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            min_length: 2,
            debounce: Duration::from_millis(200),
            limit: 6,
            cache_size: 256,
        }
    }
}

struct InFlight {
    generation: u64,
    cancel: CancelHandle,
    task: JoinHandle<()>,
}

impl InFlight {
    fn abort(self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

/// Debounced, cancellable candidate lookups with stale-reply filtering.
pub struct SuggestionController {
    service: Option<Arc<dyn SuggestionService>>,
    settings: SuggestionSettings,
    generation: u64,
    current: Option<SuggestionSet>,
    anchor: Option<AnchorPoint>,
    in_flight: Option<InFlight>,
    tx: mpsc::UnboundedSender<SuggestionReply>,
    rx: mpsc::UnboundedReceiver<SuggestionReply>,
    cache: Option<LruCache<String, Vec<String>>>,
    cache_hits: usize,
    cache_misses: usize,
}

impl SuggestionController {
    pub fn new(service: Option<Arc<dyn SuggestionService>>, settings: SuggestionSettings) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            service,
            settings,
            generation: 0,
            current: None,
            anchor: None,
            in_flight: None,
            tx,
            rx,
            cache: NonZeroUsize::new(settings.cache_size).map(LruCache::new),
            cache_hits: 0,
            cache_misses: 0,
        }
    }

    pub fn settings(&self) -> SuggestionSettings {
        self.settings
    }

    /// The latest generation id.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The displayed set, if any.
    pub fn current(&self) -> Option<&SuggestionSet> {
        self.current.as_ref()
    }

    pub fn has_candidates(&self) -> bool {
        self.current.is_some()
    }

    /// Whether a request for the latest generation is still outstanding.
    pub fn is_pending(&self) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|f| f.generation == self.generation && !f.task.is_finished())
    }

    /// Reposition the overlay.
    pub fn set_anchor(&mut self, anchor: Option<AnchorPoint>) {
        self.anchor = anchor;
        if let Some(set) = self.current.as_mut() {
            set.anchor = anchor;
        }
    }

    /// React to a new buffer value. Returns the new generation id.
    pub fn on_buffer_changed(&mut self, text: &str) -> u64 {
        self.abort_in_flight();
        self.generation += 1;
        self.current = None;
        let generation = self.generation;

        let len = text.chars().count();
        if len < self.settings.min_length {
            trace!(generation, len, "buffer below suggestion threshold");
            return generation;
        }

        if let Some(cached) = self.cache.as_mut().and_then(|c| c.get(text)).cloned() {
            self.cache_hits += 1;
            debug!(generation, buffer = text, "suggestion cache hit");
            self.show(generation, cached);
            return generation;
        }

        let Some(service) = self.service.clone() else {
            return generation;
        };
        let Ok(runtime) = Handle::try_current() else {
            debug!(generation, "no async runtime, suggestions disabled");
            return generation;
        };
        self.cache_misses += 1;

        let (cancel, token) = cancel_pair();
        let tx = self.tx.clone();
        let debounce = self.settings.debounce;
        let text = text.to_string();
        let task = runtime.spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(debounce) => {}
                _ = token.cancelled() => return,
            }
            debug!(generation, buffer = %text, "issuing suggestion request");
            let outcome = tokio::select! {
                res = service.fetch(text.clone(), token.clone()) => res,
                _ = token.cancelled() => Err(SuggestError::Cancelled),
            };
            // The controller may be gone already.
            let _ = tx.send(SuggestionReply {
                generation,
                text,
                outcome,
            });
        });
        self.in_flight = Some(InFlight {
            generation,
            cancel,
            task,
        });
        generation
    }

    /// Hide candidates and cancel any outstanding request.
    pub fn cancel(&mut self) {
        self.abort_in_flight();
        self.current = None;
        self.generation += 1;
        trace!(generation = self.generation, "suggestions cancelled");
    }

    /// Apply every reply that is ready. Returns whether the displayed set
    /// changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(reply) = self.rx.try_recv() {
            changed |= self.apply_reply(reply);
        }
        changed
    }

    /// Wait for the latest outstanding request to resolve, then apply it.
    pub async fn settle(&mut self) -> bool {
        let mut changed = self.poll();
        if let Some(in_flight) = self.in_flight.take() {
            // The task sends its reply before finishing.
            let _ = in_flight.task.await;
            drop(in_flight.cancel);
            changed |= self.poll();
        }
        changed
    }

    /// Apply one reply. Replies from superseded generations are dropped
    /// (their successful results are still cached).
    pub fn apply_reply(&mut self, reply: SuggestionReply) -> bool {
        let SuggestionReply {
            generation,
            text,
            outcome,
        } = reply;

        let candidates = match outcome {
            Ok(raw) => {
                let candidates = normalize_candidates(raw, self.settings.limit);
                // An empty answer may be transient; ask again next time.
                if let Some(cache) = self.cache.as_mut().filter(|_| !candidates.is_empty()) {
                    cache.put(text.clone(), candidates.clone());
                }
                candidates
            }
            Err(SuggestError::Cancelled) => {
                debug!(generation, "suggestion request cancelled");
                Vec::new()
            }
            Err(e) => {
                warn!(generation, buffer = %text, error = %e, "suggestion request failed");
                Vec::new()
            }
        };

        if generation != self.generation {
            debug!(generation, latest = self.generation, "discarding stale suggestions");
            return false;
        }
        if self
            .in_flight
            .as_ref()
            .is_some_and(|f| f.generation == generation)
        {
            self.in_flight = None;
        }
        let before = self.current.is_some();
        self.show(generation, candidates);
        before || self.current.is_some()
    }

    /// Candidate `index` (0-based) of the set shown for `generation`.
    ///
    /// Returns `None` when `generation` is no longer the displayed one.
    pub fn select(&self, generation: u64, index: usize) -> Option<&str> {
        let set = self.current.as_ref()?;
        if set.generation != generation || generation != self.generation {
            debug!(generation, latest = self.generation, "ignoring stale candidate selection");
            return None;
        }
        set.candidates.get(index).map(String::as_str)
    }

    /// Cache statistics as (hits, misses).
    pub fn cache_stats(&self) -> (usize, usize) {
        (self.cache_hits, self.cache_misses)
    }

    pub fn cache_size(&self) -> usize {
        self.cache.as_ref().map_or(0, LruCache::len)
    }

    pub fn clear_cache(&mut self) {
        if let Some(cache) = self.cache.as_mut() {
            cache.clear();
        }
        self.cache_hits = 0;
        self.cache_misses = 0;
    }

    fn show(&mut self, generation: u64, candidates: Vec<String>) {
        self.current = (!candidates.is_empty()).then(|| SuggestionSet {
            candidates,
            anchor: self.anchor,
            generation,
        });
    }

    fn abort_in_flight(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            trace!(generation = in_flight.generation, "aborting suggestion request");
            in_flight.abort();
        }
    }
}

impl Drop for SuggestionController {
    fn drop(&mut self) {
        self.abort_in_flight();
    }
}

impl std::fmt::Debug for SuggestionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionController")
            .field("generation", &self.generation)
            .field("current", &self.current)
            .field("pending", &self.in_flight.is_some())
            .field("has_service", &self.service.is_some())
            .finish()
    }
}

/// NFC-normalise, drop blank and duplicate entries, truncate to `limit`.
pub fn normalize_candidates(raw: Vec<String>, limit: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len().min(limit));
    for candidate in raw {
        if out.len() >= limit {
            break;
        }
        let candidate: String = candidate.trim().nfc().collect();
        if candidate.is_empty() || out.contains(&candidate) {
            continue;
        }
        out.push(candidate);
    }
    out
}
