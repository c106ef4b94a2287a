//! Live search for the library admin book listing.
//!
//! This crate contains the coordinator that turns raw search-box input and
//! filter selections into a published result set, backed by any
//! `CatalogSource`.

pub mod config;
pub mod coordinator;
pub mod debounce;
pub mod dispatch;
pub mod state;

pub use config::{SearchConfig, DEFAULT_DEBOUNCE};
pub use coordinator::{CoordinatorError, LiveSearchCoordinator, SearchCommand, SearchHandle};
pub use debounce::TermDebouncer;
pub use dispatch::{route, Dispatcher, Route, Ticket};
pub use state::{Notification, NotificationLevel, SearchView};
