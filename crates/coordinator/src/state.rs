//! What the live search publishes to the UI.

use catalog::Book;
use pipeline::FilterCriteria;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Snapshot of everything the listing view renders.
///
/// Published through a `watch` channel; only the coordinator's event loop
/// writes it.
#[derive(Debug, Clone, Default)]
pub struct SearchView {
    /// Books to display, replaced wholesale on each completed run
    pub results: Arc<Vec<Book>>,
    /// A committed search is awaiting its response
    pub is_loading: bool,
    /// The full catalog snapshot is being (re)loaded
    pub is_seeding: bool,
    /// Distinct categories in the full catalog, for the category selector
    pub categories: Arc<BTreeSet<String>>,
    /// Refinement currently applied to `results`
    pub criteria: FilterCriteria,
    /// Last term that survived debounce/dedupe
    pub committed_term: Option<String>,
    /// Bumped every time `results` is replaced
    pub revision: u64,
}

impl SearchView {
    /// True once `term` has been committed and nothing is loading
    pub fn is_settled_on(&self, term: &str) -> bool {
        !self.is_loading && self.committed_term.as_deref() == Some(term)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// Message for the user-facing notification area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NotificationLevel::Info => write!(f, "{}", self.message),
            NotificationLevel::Error => write!(f, "error: {}", self.message),
        }
    }
}
