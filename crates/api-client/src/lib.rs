//! HTTP client for the library backend's book endpoints.
//!
//! This crate provides a Rust client for the REST API the admin front-end
//! talks to. It handles:
//! - Building endpoint URLs from a configurable base
//! - Issuing list, search and lookup requests
//! - Decoding the backend's response envelope
//! - Mapping failures onto the catalog's transport error
//!
//! `LibraryApiClient` implements `catalog::CatalogSource`, so it can be
//! handed straight to the live search coordinator.

use async_trait::async_trait;
use catalog::{Book, CatalogPage, CatalogSource, SearchScope, TransportError};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

/// Default base URL of the library backend
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Errors that can occur when talking to the library backend
#[derive(Error, Debug)]
pub enum ApiClientError {
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to reach library API: {0}")]
    ConnectionError(String),

    #[error("Library API returned HTTP {status}: {body}")]
    StatusError { status: u16, body: String },

    #[error("Invalid response from library API: {0}")]
    InvalidResponse(String),
}

impl ApiClientError {
    /// Convert into the transport failure reported to the search pipeline.
    pub fn into_transport(self, source_name: &str) -> TransportError {
        let source_name = source_name.to_string();
        match self {
            ApiClientError::InvalidUrl(reason) | ApiClientError::ConnectionError(reason) => {
                TransportError::Connection { source_name, reason }
            }
            ApiClientError::StatusError { status, body } => TransportError::Status {
                source_name,
                status,
                body,
            },
            ApiClientError::InvalidResponse(reason) => {
                TransportError::InvalidResponse { source_name, reason }
            }
        }
    }
}

/// Connection settings for the library backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL, e.g. "http://localhost:8080/api"
    pub base_url: String,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Configure the User-Agent header (default: crate name and version)
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Client for the library backend.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct LibraryApiClient {
    client: reqwest::Client,
    base_url: Url,
    name: String,
}

impl LibraryApiClient {
    /// Build a client for the backend described by `config`.
    ///
    /// No request is made here; an unreachable backend surfaces on the
    /// first call.
    pub fn new(config: ApiConfig) -> Result<Self, ApiClientError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiClientError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiClientError::InvalidUrl(config.base_url));
        }

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| ApiClientError::ConnectionError(e.to_string()))?;

        info!("Library API client configured for {}", base_url);
        Ok(Self {
            client,
            name: format!("library API at {}", base_url),
            base_url,
        })
    }

    /// Shorthand for `LibraryApiClient::new(ApiConfig::new(base_url))`
    pub fn from_base_url(base_url: impl Into<String>) -> Result<Self, ApiClientError> {
        Self::new(ApiConfig::new(base_url))
    }

    /// Base URL this client sends requests to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch every book (`GET /admin/books`).
    #[instrument(skip(self))]
    pub async fn list_books(&self) -> Result<CatalogPage, ApiClientError> {
        let url = self.endpoint(&["admin", "books"])?;
        self.get_json(self.client.get(url)).await
    }

    /// Search books (`GET /books/search?searchTerm=..&searchType=..`).
    #[instrument(skip(self))]
    pub async fn search_books(
        &self,
        term: &str,
        scope: SearchScope,
    ) -> Result<CatalogPage, ApiClientError> {
        let url = self.endpoint(&["books", "search"])?;
        let request = self
            .client
            .get(url)
            .query(&[("searchTerm", term), ("searchType", scope.as_str())]);
        self.get_json(request).await
    }

    /// Fetch a single book (`GET /books/{id}`).
    #[instrument(skip(self))]
    pub async fn get_book(&self, id: &str) -> Result<Book, ApiClientError> {
        let url = self.endpoint(&["books", id])?;
        self.get_json(self.client.get(url)).await
    }

    /// Categories known to the backend (`GET /books/categories`).
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<String>, ApiClientError> {
        let url = self.endpoint(&["books", "categories"])?;
        self.get_json(self.client.get(url)).await
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiClientError> {
        let response = request.send().await.map_err(|e| {
            error!("Request to library API failed: {}", e);
            ApiClientError::ConnectionError(e.to_string())
        })?;

        let status = response.status();
        debug!("{} responded with {}", response.url(), status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Library API returned {}: {}", status, body);
            return Err(ApiClientError::StatusError {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<T>().await.map_err(|e| {
            error!("Could not decode library API response: {}", e);
            ApiClientError::InvalidResponse(e.to_string())
        })
    }
}

#[async_trait]
impl CatalogSource for LibraryApiClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, term: &str, scope: SearchScope) -> Result<CatalogPage, TransportError> {
        self.search_books(term, scope)
            .await
            .map_err(|e| e.into_transport(&self.name))
    }

    async fn list_all(&self) -> Result<CatalogPage, TransportError> {
        self.list_books().await.map_err(|e| e.into_transport(&self.name))
    }
}
