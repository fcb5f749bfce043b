//! Types for CineVault API requests and responses.

use cinevault_core::{FieldError, User};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Production API base URL
pub const DEFAULT_BASE_URL: &str = "https://mymoviesdb-6c5720b5bef1.herokuapp.com";

/// Configuration for connecting to the CineVault API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "https://movies.example.com")
    pub url: String,
    /// Overall request timeout; `None` keeps the transport default
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create a config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: None,
        }
    }

    /// Set a request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

// =============================================================================
// Authentication Types
// =============================================================================

/// Request body for the login endpoint.
#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Raw login response body.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginBody {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// Result of a successful login. Not persisted by the client.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    /// The account record, when the server includes it
    pub user: Option<User>,
}

// =============================================================================
// Favorites
// =============================================================================

/// What a favorite mutation did on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteOutcome {
    /// The favorites list changed
    Applied,
    /// The list was already in the requested state
    AlreadyConsistent,
}

// =============================================================================
// Error Types
// =============================================================================

/// Error body shapes the API is known to send.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub errors: Vec<FieldError>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
