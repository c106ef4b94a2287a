//! Live search settings.

use catalog::SearchScope;
use std::time::Duration;

/// Quiet interval after the last keystroke before a term is committed
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Settings for a `LiveSearchCoordinator`.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Quiet interval before a typed term is committed (default: 300ms)
    pub debounce: Duration,
    /// Field set remote searches run against (default: all fields)
    pub scope: SearchScope,
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the debounce window
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Configure the remote search scope
    pub fn with_scope(mut self, scope: SearchScope) -> Self {
        self.scope = scope;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            scope: SearchScope::All,
        }
    }
}
