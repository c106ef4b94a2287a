//! The catalog source abstraction.
//!
//! The search pipeline only ever talks to the catalog through this trait,
//! so the HTTP client, the in-memory catalog and test doubles are
//! interchangeable.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::TransportError;
use crate::types::{CatalogPage, SearchScope};

/// Remote catalog the live search reads from.
///
/// ## Design Note
/// - `Send + Sync` because requests run on spawned tasks
/// - Both calls return the backend envelope; an absent `data` payload is not
///   an error and is left for the caller to interpret
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Returns the name of this source (for logging/notifications)
    fn name(&self) -> &str;

    /// Search the catalog for `term` within `scope`.
    ///
    /// The term is passed through as given; callers trim it.
    async fn search(&self, term: &str, scope: SearchScope) -> Result<CatalogPage, TransportError>;

    /// Fetch the full, unfiltered catalog.
    async fn list_all(&self) -> Result<CatalogPage, TransportError>;
}

#[async_trait]
impl<S: CatalogSource + ?Sized> CatalogSource for Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn search(&self, term: &str, scope: SearchScope) -> Result<CatalogPage, TransportError> {
        (**self).search(term, scope).await
    }

    async fn list_all(&self) -> Result<CatalogPage, TransportError> {
        (**self).list_all().await
    }
}
