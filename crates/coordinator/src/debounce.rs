//! Turns a burst of keystrokes into committed search terms.
//!
//! `TermDebouncer` is a plain state machine: callers pass the current
//! instant in, so the event loop drives it from a timer and tests drive it
//! with hand-made instants.

use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
struct Pending {
    term: String,
    deadline: Instant,
}

/// Debounce + dedupe for raw search input.
///
/// ## Algorithm
/// 1. Every `push` replaces the pending term and restarts the quiet window
/// 2. Once the window elapses, `poll` commits the pending term
/// 3. A committed term equal to the previously committed one is dropped
///
/// The duplicate check runs after debouncing: "ab" → "a" typed within one
/// window commits "a" and is suppressed only if "a" was the last commit.
#[derive(Debug, Clone)]
pub struct TermDebouncer {
    quiet: Duration,
    pending: Option<Pending>,
    last_emitted: Option<String>,
}

impl TermDebouncer {
    /// Create a debouncer with the given quiet interval
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            last_emitted: None,
        }
    }

    /// Record a new raw term observed at `now`.
    pub fn push(&mut self, term: impl Into<String>, now: Instant) {
        self.pending = Some(Pending {
            term: term.into(),
            deadline: now + self.quiet,
        });
    }

    /// When the pending term becomes due, if there is one
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Check if a term is waiting for its quiet window to elapse
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The most recently committed term
    pub fn last_emitted(&self) -> Option<&str> {
        self.last_emitted.as_deref()
    }

    /// Commit the pending term if its window has elapsed by `now`.
    ///
    /// Returns `None` when nothing is due or the due term repeats the last
    /// commit.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        if self.pending.as_ref().is_none_or(|p| p.deadline > now) {
            return None;
        }
        let Pending { term, .. } = self.pending.take()?;

        if self.last_emitted.as_deref() == Some(term.as_str()) {
            debug!("Suppressing repeated search term '{}'", term);
            return None;
        }
        self.last_emitted = Some(term.clone());
        Some(term)
    }

    /// Drop the pending term without committing it
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
