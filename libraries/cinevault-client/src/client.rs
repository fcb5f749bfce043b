//! Main CineVault API client.

use crate::auth::AuthClient;
use crate::catalog::CatalogClient;
use crate::error::{ApiError, Result};
use crate::types::{ClientConfig, FavoriteOutcome, LoginResponse};
use crate::users::UsersClient;
use cinevault_core::{FieldError, Movie, MovieId, NewUser, SessionState, User, UserUpdate};
use reqwest::Client;
use url::Url;

/// Client for the CineVault movie API.
///
/// This is the only component that talks to the network. It reads the bearer
/// token and username from the session store but never writes to it: callers
/// decide what to persist after a login.
///
/// # Example
///
/// ```ignore
/// use cinevault_client::{CineVaultClient, ClientConfig};
/// use cinevault_core::{MemorySessionStore, SessionState};
/// use std::sync::Arc;
///
/// let session = SessionState::new(Arc::new(MemorySessionStore::new()));
/// let client = CineVaultClient::new(ClientConfig::default(), session.clone())?;
///
/// let login = client.login("alice", "hunter22").await?;
/// session.set(&login.token, &login.username)?;
///
/// let movies = client.fetch_catalog().await?;
/// println!("Found {} movies", movies.len());
/// ```
#[derive(Clone)]
pub struct CineVaultClient {
    http: Client,
    base_url: Url,
    session: SessionState,
}

impl CineVaultClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig, session: SessionState) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(invalid_url("URL cannot be empty"));
        }

        let url = config.url.trim().trim_end_matches('/');
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(invalid_url("URL must start with http:// or https://"));
        }

        let base_url = Url::parse(url).map_err(|e| invalid_url(&e.to_string()))?;

        let mut builder = Client::builder().user_agent(format!(
            "CineVault/{} (Terminal)",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::NetworkError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    /// The API base URL, without a trailing slash.
    pub fn url(&self) -> String {
        self.base_url.as_str().trim_end_matches('/').to_string()
    }

    /// The session state this client reads credentials from.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// The username of the stored session.
    pub fn session_username(&self) -> Result<String> {
        self.session
            .username()?
            .filter(|u| !u.is_empty())
            .ok_or(ApiError::NoSessionToken)
    }

    fn access_token(&self) -> Result<String> {
        let token = self
            .session
            .token()?
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::NoSessionToken)?;
        Ok(token)
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Create a new account.
    pub async fn register_user(&self, new_user: &NewUser) -> Result<User> {
        AuthClient::new(&self.http, &self.base_url)
            .register(new_user)
            .await
    }

    /// Login with username and password.
    ///
    /// The returned token is not persisted.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        AuthClient::new(&self.http, &self.base_url)
            .login(username, password)
            .await
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Get every movie.
    pub async fn fetch_catalog(&self) -> Result<Vec<Movie>> {
        let token = self.access_token()?;
        CatalogClient::new(&self.http, &self.base_url, &token)
            .get_movies()
            .await
    }

    // =========================================================================
    // Users and favorites
    // =========================================================================

    pub async fn fetch_user(&self, username: &str) -> Result<User> {
        let token = self.access_token()?;
        UsersClient::new(&self.http, &self.base_url, &token)
            .get_user(username)
            .await
    }

    pub async fn fetch_favorites(&self, username: &str) -> Result<Vec<Movie>> {
        let token = self.access_token()?;
        UsersClient::new(&self.http, &self.base_url, &token)
            .get_favorites(username)
            .await
    }

    pub async fn add_favorite(&self, username: &str, movie_id: &MovieId) -> Result<FavoriteOutcome> {
        let token = self.access_token()?;
        UsersClient::new(&self.http, &self.base_url, &token)
            .add_favorite(username, movie_id)
            .await
    }

    pub async fn remove_favorite(
        &self,
        username: &str,
        movie_id: &MovieId,
    ) -> Result<FavoriteOutcome> {
        let token = self.access_token()?;
        UsersClient::new(&self.http, &self.base_url, &token)
            .remove_favorite(username, movie_id)
            .await
    }

    /// Update a profile. Rejected locally unless `update` has a username and email.
    pub async fn update_user(&self, username: &str, update: &UserUpdate) -> Result<User> {
        let token = self.access_token()?;
        UsersClient::new(&self.http, &self.base_url, &token)
            .update_user(username, update)
            .await
    }
}

/// Join `segments` onto the base URL, percent-encoding each one.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| invalid_url("URL cannot be a base"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn invalid_url(msg: &str) -> ApiError {
    ApiError::Validation(vec![FieldError::new("url", msg)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinevault_core::MemorySessionStore;
    use std::sync::Arc;

    fn session() -> SessionState {
        SessionState::new(Arc::new(MemorySessionStore::new()))
    }

    #[test]
    fn test_url_validation() {
        // Valid URLs
        assert!(CineVaultClient::new(ClientConfig::new("https://example.com"), session()).is_ok());
        assert!(
            CineVaultClient::new(ClientConfig::new("http://localhost:8080"), session()).is_ok()
        );

        // Invalid URLs
        assert!(CineVaultClient::new(ClientConfig::new(""), session()).is_err());
        assert!(CineVaultClient::new(ClientConfig::new("not-a-url"), session()).is_err());
        assert!(CineVaultClient::new(ClientConfig::new("ftp://example.com"), session()).is_err());
    }

    #[test]
    fn test_url_normalization() {
        let client =
            CineVaultClient::new(ClientConfig::new("https://example.com/"), session()).unwrap();
        assert_eq!(client.url(), "https://example.com");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let base = Url::parse("https://example.com/api").unwrap();
        let url = endpoint(&base, &["users", "jane doe", "movies", "a/b"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/api/users/jane%20doe/movies/a%2Fb"
        );

        let root = Url::parse("https://example.com").unwrap();
        assert_eq!(
            endpoint(&root, &["movies"]).unwrap().as_str(),
            "https://example.com/movies"
        );
    }

    #[test]
    fn test_session_username_requires_login() {
        let session = session();
        let client = CineVaultClient::new(ClientConfig::default(), session.clone()).unwrap();
        assert_eq!(client.session_username(), Err(ApiError::NoSessionToken));

        session.set("tok", "alice").unwrap();
        assert_eq!(client.session_username().unwrap(), "alice");
    }
}
