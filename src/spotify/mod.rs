//! # Spotify Integration Module
//!
//! HTTP access to the two Spotify endpoints the release-day search needs:
//!
//! ```text
//! DateAggregator
//!      ↓  (Catalog trait)
//! SpotifyClient
//!     ├── auth    - client credentials token exchange (POST /api/token)
//!     └── search  - paginated prefix search (GET /search)
//!      ↓
//! reqwest
//! ```
//!
//! The aggregator only talks to the [`Catalog`] trait, so tests and other
//! front-ends can drive it with their own catalog.
//!
//! ## Error Handling
//!
//! - A failed token exchange is returned as [`crate::Error::Auth`].
//! - A failed search page ends pagination for that prefix. The items gathered so
//!   far are returned together with a [`crate::Error::Fetch`].
//! - Nothing is retried automatically, including `429 Too Many Requests`.

pub mod auth;
pub mod search;

use async_trait::async_trait;
use reqwest::Client;

use crate::{Res, config};

pub use search::{MAX_OFFSET, PAGE_LIMIT, PrefixResult};

/// A music catalog that can be searched by name prefix and year.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Obtains a bearer token for the following searches.
    async fn access_token(&self) -> Res<String>;

    /// Collects every release whose name starts with `prefix` in `year`.
    async fn search_prefix(&self, prefix: char, year: i32, token: &str) -> PrefixResult;
}

/// Spotify Web API client using the client credentials flow.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    client: Client,
    api_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl SpotifyClient {
    pub fn new(
        api_url: impl Into<String>,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Builds a client from the configured endpoints and credentials.
    pub fn from_env() -> Res<Self> {
        Ok(Self::new(
            config::spotify_apiurl(),
            config::spotify_apitoken_url(),
            config::spotify_client_id()?,
            config::spotify_client_secret()?,
        ))
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl Catalog for SpotifyClient {
    async fn access_token(&self) -> Res<String> {
        auth::client_credentials_token(
            &self.client,
            &self.token_url,
            &self.client_id,
            &self.client_secret,
        )
        .await
    }

    async fn search_prefix(&self, prefix: char, year: i32, token: &str) -> PrefixResult {
        search::search_prefix(&self.client, &self.api_url, prefix, year, token).await
    }
}
