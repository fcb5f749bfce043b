//! CineVault Client
//!
//! HTTP client library for the CineVault (myFlix) movie API.
//!
//! # Features
//!
//! - **Authentication**: Login with username/password, account registration
//! - **Catalog**: Fetch the full movie list
//! - **Profile**: Fetch and update the user record
//! - **Favorites**: Fetch, add and remove favorites with idempotent intent
//!
//! Every failure is reported as an [`ApiError`]; transport errors never leak.
//!
//! # Example
//!
//! ```ignore
//! use cinevault_client::{CineVaultClient, ClientConfig};
//! use cinevault_core::{FileSessionStore, SessionState};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = FileSessionStore::open(".cinevault/session.json")?;
//!     let session = SessionState::new(Arc::new(store));
//!     let client = CineVaultClient::new(ClientConfig::default(), session.clone())?;
//!
//!     let login = client.login("alice", "hunter22").await?;
//!     session.set(&login.token, &login.username)?;
//!
//!     let favorites = client.fetch_favorites(&login.username).await?;
//!     println!("{} favorites", favorites.len());
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod catalog;
mod client;
mod error;
mod response;
mod types;
mod users;

// Re-export main types
pub use client::CineVaultClient;
pub use error::{ApiError, ErrorKind, Result};
pub use types::{ClientConfig, FavoriteOutcome, LoginResponse, DEFAULT_BASE_URL};

// Re-export sub-clients for direct use if needed
pub use auth::AuthClient;
pub use catalog::CatalogClient;
pub use users::UsersClient;
