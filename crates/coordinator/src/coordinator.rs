//! # Live Search Coordinator
//!
//! This module runs the book listing's real-time search:
//! 1. Seed the full catalog snapshot (and its categories)
//! 2. Debounce and dedupe raw keystrokes into committed terms
//! 3. Route each committed term: blank → cached snapshot, otherwise → remote search
//! 4. Drop responses that belong to superseded dispatches
//! 5. Refine by category/status and publish the result set + loading flag
//!
//! ## Concurrency
//!
//! All state lives in one tokio task. Requests run on spawned tasks and
//! report back over a channel tagged with their dispatch ticket, so the
//! loop keeps accepting keystrokes while a search is in flight. The loop is
//! the only writer of the published `SearchView`.

use std::collections::BTreeSet;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use catalog::{Book, CatalogPage, CatalogSource, TransportError};
use pipeline::{extract_categories, FilterCriteria, FilterPipeline};

use crate::config::SearchConfig;
use crate::debounce::TermDebouncer;
use crate::dispatch::{route, Dispatcher, Route, Ticket};
use crate::state::{Notification, SearchView};

/// Errors surfaced to callers of a `SearchHandle`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorError {
    #[error("Live search coordinator has shut down")]
    Closed,
}

/// Input events accepted by the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCommand {
    TermChanged(String),
    CategorySelected(Option<String>),
    StatusSelected(Option<String>),
    ClearFilters,
    Refresh,
    Shutdown,
}

/// Outcome of a spawned request, routed back into the event loop
#[derive(Debug)]
enum Resolution {
    Search {
        ticket: Ticket,
        term: String,
        outcome: Result<CatalogPage, TransportError>,
    },
    Snapshot {
        seed: u64,
        outcome: Result<CatalogPage, TransportError>,
    },
}

struct SeedRun {
    id: u64,
    refresh: bool,
    task: JoinHandle<()>,
}

/// Caller side of a running coordinator.
///
/// Dropping the handle stops the event loop.
pub struct SearchHandle {
    commands: mpsc::UnboundedSender<SearchCommand>,
    view: watch::Receiver<SearchView>,
    task: JoinHandle<()>,
}

impl SearchHandle {
    /// A raw keystroke-level change of the search box
    pub fn on_search_term_changed(&self, raw: impl Into<String>) -> Result<(), CoordinatorError> {
        self.send(SearchCommand::TermChanged(raw.into()))
    }

    /// Category selector changed; an empty value clears the filter
    pub fn on_category_selected(&self, value: Option<String>) -> Result<(), CoordinatorError> {
        self.send(SearchCommand::CategorySelected(value))
    }

    /// Status selector changed; an empty value clears the filter
    pub fn on_status_selected(&self, value: Option<String>) -> Result<(), CoordinatorError> {
        self.send(SearchCommand::StatusSelected(value))
    }

    /// Reset search box and both selectors
    pub fn clear_filters(&self) -> Result<(), CoordinatorError> {
        self.send(SearchCommand::ClearFilters)
    }

    /// Reload the full catalog snapshot
    pub fn refresh(&self) -> Result<(), CoordinatorError> {
        self.send(SearchCommand::Refresh)
    }

    /// Current view
    pub fn view(&self) -> SearchView {
        self.view.borrow().clone()
    }

    /// A receiver that observes every published view
    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.view.clone()
    }

    /// Wait until the published view satisfies `predicate`.
    pub async fn wait_for(
        &self,
        mut predicate: impl FnMut(&SearchView) -> bool,
    ) -> Result<SearchView, CoordinatorError> {
        let mut view = self.view.clone();
        let settled = view
            .wait_for(|v| predicate(v))
            .await
            .map_err(|_| CoordinatorError::Closed)?;
        Ok(settled.clone())
    }

    /// Stop the event loop and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.commands.send(SearchCommand::Shutdown);
        if let Err(e) = self.task.await {
            warn!("Live search task ended abnormally: {}", e);
        }
    }

    fn send(&self, command: SearchCommand) -> Result<(), CoordinatorError> {
        self.commands
            .send(command)
            .map_err(|_| CoordinatorError::Closed)
    }
}

/// Owns all live search state; runs as a single tokio task.
pub struct LiveSearchCoordinator<S> {
    source: Arc<S>,
    config: SearchConfig,
    pipeline: FilterPipeline,
    debouncer: TermDebouncer,
    dispatcher: Dispatcher,
    criteria: FilterCriteria,
    /// Full unfiltered catalog from the last successful seed
    snapshot: Arc<Vec<Book>>,
    /// Unrefined set the current results were derived from
    base: Arc<Vec<Book>>,
    categories: Arc<BTreeSet<String>>,
    search_task: Option<JoinHandle<()>>,
    seed: Option<SeedRun>,
    seed_counter: u64,
    resolutions: mpsc::UnboundedSender<Resolution>,
    view: watch::Sender<SearchView>,
    notifications: mpsc::UnboundedSender<Notification>,
}

impl<S: CatalogSource + 'static> LiveSearchCoordinator<S> {
    /// Start a coordinator on the current tokio runtime.
    ///
    /// The catalog seed starts immediately. Returns the handle used to feed
    /// events and observe results, plus the notification stream for the
    /// user-facing error area.
    ///
    /// # Panics
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        source: S,
        config: SearchConfig,
    ) -> (SearchHandle, mpsc::UnboundedReceiver<Notification>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (notification_tx, notification_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(SearchView::default());

        let (coordinator, resolution_rx) =
            Self::new(Arc::new(source), config, view_tx, notification_tx);
        let task = tokio::spawn(coordinator.run(command_rx, resolution_rx));

        let handle = SearchHandle {
            commands: command_tx,
            view: view_rx,
            task,
        };
        (handle, notification_rx)
    }

    fn new(
        source: Arc<S>,
        config: SearchConfig,
        view: watch::Sender<SearchView>,
        notifications: mpsc::UnboundedSender<Notification>,
    ) -> (Self, mpsc::UnboundedReceiver<Resolution>) {
        let (resolution_tx, resolution_rx) = mpsc::unbounded_channel();
        let coordinator = Self {
            debouncer: TermDebouncer::new(config.debounce),
            source,
            config,
            pipeline: FilterPipeline::refinement(),
            dispatcher: Dispatcher::new(),
            criteria: FilterCriteria::new(),
            snapshot: Arc::new(Vec::new()),
            base: Arc::new(Vec::new()),
            categories: Arc::new(BTreeSet::new()),
            search_task: None,
            seed: None,
            seed_counter: 0,
            resolutions: resolution_tx,
            view,
            notifications,
        };
        (coordinator, resolution_rx)
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<SearchCommand>,
        mut resolutions: mpsc::UnboundedReceiver<Resolution>,
    ) {
        info!(
            "Live search started against {} (debounce {:?}, scope {})",
            self.source.name(),
            self.config.debounce,
            self.config.scope
        );
        self.start_seed(false);

        loop {
            let deadline = self.debouncer.deadline();
            // A due term commits before a keystroke arriving in the same wakeup
            tokio::select! {
                biased;
                _ = wait_until(deadline) => {
                    if let Some(term) = self.debouncer.poll(Instant::now()) {
                        self.dispatch(term);
                    }
                }
                command = commands.recv() => match command {
                    Some(SearchCommand::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(resolution) = resolutions.recv() => self.resolve(resolution),
            }
        }

        if let Some(task) = self.search_task.take() {
            task.abort();
        }
        if let Some(seed) = self.seed.take() {
            seed.task.abort();
        }
        info!("Live search stopped");
    }

    fn handle_command(&mut self, command: SearchCommand) {
        match command {
            SearchCommand::TermChanged(raw) => {
                debug!("Search input changed: '{}'", raw);
                self.debouncer.push(raw, Instant::now());
            }
            SearchCommand::CategorySelected(value) => {
                self.criteria.set_category(value);
                debug!("Category filter now {:?}", self.criteria.category);
                self.republish_base();
            }
            SearchCommand::StatusSelected(value) => {
                self.criteria.set_status(value);
                debug!("Status filter now {:?}", self.criteria.status);
                self.republish_base();
            }
            SearchCommand::ClearFilters => {
                debug!("Clearing search term and filters");
                self.criteria = FilterCriteria::new();
                self.republish_base();
                self.debouncer.push(String::new(), Instant::now());
            }
            SearchCommand::Refresh => self.start_seed(true),
            // Handled by the run loop
            SearchCommand::Shutdown => {}
        }
    }

    /// Run one committed term down its path, superseding whatever was in flight.
    fn dispatch(&mut self, term: String) {
        if let Some(task) = self.search_task.take() {
            task.abort();
        }

        match route(&term) {
            Route::Fallback => {
                self.dispatcher.supersede();
                debug!(
                    "Blank term committed, showing {} cached books",
                    self.snapshot.len()
                );
                self.base = self.snapshot.clone();
                let results = self.pipeline.refine(&self.base, &self.criteria);
                self.publish(Some(results));
            }
            Route::Remote(trimmed) => {
                let ticket = self.dispatcher.issue();
                info!(
                    "Dispatching search for '{}' (generation {})",
                    trimmed,
                    ticket.generation()
                );

                let source = self.source.clone();
                let resolutions = self.resolutions.clone();
                let scope = self.config.scope;
                self.search_task = Some(tokio::spawn(async move {
                    let outcome = source.search(&trimmed, scope).await;
                    let _ = resolutions.send(Resolution::Search {
                        ticket,
                        term: trimmed,
                        outcome,
                    });
                }));
                self.publish(None);
            }
        }
    }

    fn resolve(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::Search {
                ticket,
                term,
                outcome,
            } => self.resolve_search(ticket, term, outcome),
            Resolution::Snapshot { seed, outcome } => self.resolve_snapshot(seed, outcome),
        }
    }

    fn resolve_search(
        &mut self,
        ticket: Ticket,
        term: String,
        outcome: Result<CatalogPage, TransportError>,
    ) {
        if !self.dispatcher.settle(ticket) {
            debug!(
                "Discarding stale response for '{}' (generation {}, current {})",
                term,
                ticket.generation(),
                self.dispatcher.generation()
            );
            return;
        }
        self.search_task = None;

        match outcome {
            Ok(page) => match page.data {
                Some(books) => {
                    info!("Search for '{}' returned {} books", term, books.len());
                    self.base = Arc::new(books);
                    let results = self.pipeline.refine(&self.base, &self.criteria);
                    self.publish(Some(results));
                }
                None => {
                    debug!("Search for '{}' returned no payload", term);
                    self.publish(None);
                }
            },
            Err(e) => {
                warn!("Search for '{}' failed: {}", term, e);
                self.notify(Notification::error(format!("Search failed: {}", e)));
                self.publish(None);
            }
        }
    }

    /// Fetch the full catalog. A newer seed supersedes an older one.
    fn start_seed(&mut self, refresh: bool) {
        if let Some(previous) = self.seed.take() {
            previous.task.abort();
        }
        self.seed_counter += 1;
        let seed = self.seed_counter;
        debug!("Loading catalog snapshot (seed {})", seed);

        let source = self.source.clone();
        let resolutions = self.resolutions.clone();
        let task = tokio::spawn(async move {
            let outcome = source.list_all().await;
            let _ = resolutions.send(Resolution::Snapshot { seed, outcome });
        });
        self.seed = Some(SeedRun {
            id: seed,
            refresh,
            task,
        });
        self.publish(None);
    }

    fn resolve_snapshot(&mut self, seed: u64, outcome: Result<CatalogPage, TransportError>) {
        if self.seed.as_ref().map(|s| s.id) != Some(seed) {
            debug!("Discarding superseded catalog snapshot (seed {})", seed);
            return;
        }
        let Some(run) = self.seed.take() else {
            return;
        };

        let books = match outcome {
            Ok(page) => page.data,
            Err(e) => {
                warn!("Loading catalog snapshot failed: {}", e);
                self.notify(Notification::error(format!("Failed to load books: {}", e)));
                self.publish(None);
                return;
            }
        };
        let Some(books) = books else {
            debug!("Catalog snapshot carried no payload; keeping previous snapshot");
            self.publish(None);
            return;
        };

        info!("Catalog snapshot loaded: {} books", books.len());
        self.snapshot = Arc::new(books);
        self.categories = Arc::new(extract_categories(&self.snapshot));
        if run.refresh {
            self.notify(Notification::info(format!(
                "Catalog refreshed: {} books",
                self.snapshot.len()
            )));
        }

        // Search results stay on screen while a non-blank term is committed
        let showing_catalog = self
            .debouncer
            .last_emitted()
            .is_none_or(|term| term.trim().is_empty());
        if showing_catalog {
            self.base = self.snapshot.clone();
            let results = self.pipeline.refine(&self.base, &self.criteria);
            self.publish(Some(results));
        } else {
            self.publish(None);
        }
    }

    /// Re-apply the current criteria to the last unrefined set.
    fn republish_base(&mut self) {
        let results = self.pipeline.refine(&self.base, &self.criteria);
        self.publish(Some(results));
    }

    /// Publish the view. `results: None` keeps the current result set.
    ///
    /// `is_loading` tracks the search dispatch only; a catalog seed in
    /// flight is reported through `is_seeding`.
    fn publish(&self, results: Option<Vec<Book>>) {
        let is_loading = self.dispatcher.in_flight();
        let is_seeding = self.seed.is_some();
        let committed_term = self.debouncer.last_emitted().map(str::to_string);
        self.view.send_modify(|view| {
            if let Some(results) = results {
                view.results = Arc::new(results);
                view.revision += 1;
            }
            view.is_loading = is_loading;
            view.is_seeding = is_seeding;
            view.categories = self.categories.clone();
            view.criteria = self.criteria.clone();
            view.committed_term = committed_term;
        });
    }

    fn notify(&self, notification: Notification) {
        if self.notifications.send(notification).is_err() {
            debug!("Notification receiver dropped");
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use catalog::{ApiResponse, SearchScope};

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    /// Source whose requests never complete; outcomes are injected by hand
    struct StalledSource;

    #[async_trait]
    impl CatalogSource for StalledSource {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn search(&self, _term: &str, _scope: SearchScope) -> Result<CatalogPage, TransportError> {
            std::future::pending().await
        }

        async fn list_all(&self) -> Result<CatalogPage, TransportError> {
            std::future::pending().await
        }
    }

    fn page(ids: &[&str]) -> CatalogPage {
        ApiResponse::with_data(ids.iter().map(|id| Book::new(*id, *id)).collect())
    }

    fn ids(view: &SearchView) -> Vec<String> {
        view.results.iter().map(|b| b.id.clone()).collect()
    }

    struct Harness {
        coordinator: LiveSearchCoordinator<StalledSource>,
        view: watch::Receiver<SearchView>,
        notifications: mpsc::UnboundedReceiver<Notification>,
    }

    fn build_harness() -> Harness {
        let (view_tx, view) = watch::channel(SearchView::default());
        let (notification_tx, notifications) = mpsc::unbounded_channel();
        let (coordinator, _resolutions) = LiveSearchCoordinator::new(
            Arc::new(StalledSource),
            SearchConfig::default(),
            view_tx,
            notification_tx,
        );
        Harness {
            coordinator,
            view,
            notifications,
        }
    }

    fn issue(harness: &mut Harness, term: &str) -> Ticket {
        harness.coordinator.dispatch(term.to_string());
        harness
            .coordinator
            .dispatcher
            .in_flight_ticket()
            .expect("remote dispatch should be in flight")
    }

    // ============================================================================
    // Staleness
    // ============================================================================

    #[tokio::test]
    async fn test_late_response_from_superseded_dispatch_is_dropped() {
        let mut harness = build_harness();

        let first = issue(&mut harness, "a");
        let second = issue(&mut harness, "ab");
        assert!(harness.view.borrow().is_loading);

        // D2 resolves first, then D1 arrives last
        harness.coordinator.resolve(Resolution::Search {
            ticket: second,
            term: "ab".to_string(),
            outcome: Ok(page(&["ab-1"])),
        });
        harness.coordinator.resolve(Resolution::Search {
            ticket: first,
            term: "a".to_string(),
            outcome: Ok(page(&["a-1", "a-2"])),
        });

        let view = harness.view.borrow().clone();
        assert_eq!(ids(&view), vec!["ab-1"]);
        assert!(!view.is_loading);
    }

    #[tokio::test]
    async fn test_stale_response_before_current_one_is_dropped() {
        let mut harness = build_harness();

        let first = issue(&mut harness, "a");
        let _second = issue(&mut harness, "ab");

        harness.coordinator.resolve(Resolution::Search {
            ticket: first,
            term: "a".to_string(),
            outcome: Ok(page(&["a-1"])),
        });

        let view = harness.view.borrow().clone();
        assert!(view.results.is_empty(), "Stale result must not be published");
        assert!(view.is_loading, "Current dispatch is still in flight");
    }

    #[tokio::test]
    async fn test_stale_failure_is_silent() {
        let mut harness = build_harness();

        let first = issue(&mut harness, "a");
        let _second = issue(&mut harness, "ab");

        harness.coordinator.resolve(Resolution::Search {
            ticket: first,
            term: "a".to_string(),
            outcome: Err(TransportError::Connection {
                source_name: "stalled".to_string(),
                reason: "reset".to_string(),
            }),
        });

        assert!(harness.notifications.try_recv().is_err());
        assert!(harness.view.borrow().is_loading);
    }

    #[tokio::test]
    async fn test_blank_term_supersedes_in_flight_search() {
        let mut harness = build_harness();
        harness.coordinator.snapshot = Arc::new(page(&["s-1", "s-2"]).data.unwrap());

        let ticket = issue(&mut harness, "dune");
        harness.coordinator.dispatch("   ".to_string());
        assert_eq!(ids(&harness.view.borrow()), vec!["s-1", "s-2"]);

        harness.coordinator.resolve(Resolution::Search {
            ticket,
            term: "dune".to_string(),
            outcome: Ok(page(&["d-1"])),
        });
        assert_eq!(ids(&harness.view.borrow()), vec!["s-1", "s-2"]);
        assert!(!harness.view.borrow().is_loading);
    }

    // ============================================================================
    // Resolution handling
    // ============================================================================

    #[tokio::test]
    async fn test_missing_payload_keeps_results_and_clears_loading() {
        let mut harness = build_harness();

        let first = issue(&mut harness, "a");
        harness.coordinator.resolve(Resolution::Search {
            ticket: first,
            term: "a".to_string(),
            outcome: Ok(page(&["a-1"])),
        });
        let revision = harness.view.borrow().revision;

        let second = issue(&mut harness, "b");
        harness.coordinator.resolve(Resolution::Search {
            ticket: second,
            term: "b".to_string(),
            outcome: Ok(ApiResponse::empty()),
        });

        let view = harness.view.borrow().clone();
        assert_eq!(ids(&view), vec!["a-1"]);
        assert_eq!(view.revision, revision);
        assert!(!view.is_loading);
    }

    #[tokio::test]
    async fn test_snapshot_does_not_replace_search_results() {
        let mut harness = build_harness();
        harness.coordinator.start_seed(false);
        let seed = harness.coordinator.seed_counter;

        harness.coordinator.debouncer.push("dune", Instant::now());
        harness.coordinator.debouncer.poll(Instant::now() + SearchConfig::default().debounce);

        let ticket = issue(&mut harness, "dune");
        harness.coordinator.resolve(Resolution::Search {
            ticket,
            term: "dune".to_string(),
            outcome: Ok(page(&["d-1"])),
        });
        harness.coordinator.resolve(Resolution::Snapshot {
            seed,
            outcome: Ok(page(&["s-1", "s-2", "s-3"])),
        });

        let view = harness.view.borrow().clone();
        assert_eq!(ids(&view), vec!["d-1"]);
        assert_eq!(harness.coordinator.snapshot.len(), 3);
        assert!(!view.is_loading);
    }

    #[tokio::test]
    async fn test_superseded_snapshot_is_dropped() {
        let mut harness = build_harness();
        harness.coordinator.start_seed(false);
        let old_seed = harness.coordinator.seed_counter;
        harness.coordinator.start_seed(true);

        harness.coordinator.resolve(Resolution::Snapshot {
            seed: old_seed,
            outcome: Ok(page(&["old"])),
        });
        assert!(harness.coordinator.snapshot.is_empty());
        assert!(harness.view.borrow().is_seeding);
    }

    #[tokio::test]
    async fn test_search_loading_is_independent_of_seed() {
        let mut harness = build_harness();
        harness.coordinator.start_seed(false);
        assert!(harness.view.borrow().is_seeding);
        assert!(!harness.view.borrow().is_loading);

        let ticket = issue(&mut harness, "dune");
        assert!(harness.view.borrow().is_loading);

        harness.coordinator.resolve(Resolution::Search {
            ticket,
            term: "dune".to_string(),
            outcome: Err(TransportError::Connection {
                source_name: "stalled".to_string(),
                reason: "reset".to_string(),
            }),
        });
        let view = harness.view.borrow().clone();
        assert!(!view.is_loading);
        assert!(view.is_seeding);

        issue(&mut harness, "dun");
        harness.coordinator.dispatch(" ".to_string());
        let view = harness.view.borrow().clone();
        assert!(!view.is_loading);
        assert!(view.is_seeding);
    }
}
