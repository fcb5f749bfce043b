//! CineVault Core
//!
//! Platform-agnostic domain types, session state and token inspection for
//! the CineVault movie catalog client.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Movie`, `User`, `FavoriteRef`, registration and update payloads
//! - **Session State**: the injectable `SessionStore` trait, its in-memory and
//!   file-backed implementations, and the `SessionState` helper on top
//! - **Token Inspection**: reading the `exp` claim of a bearer token
//! - **Error Handling**: unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cinevault_core::session::{MemorySessionStore, SessionState};
//! use std::sync::Arc;
//!
//! let session = SessionState::new(Arc::new(MemorySessionStore::new()));
//! session.set("token", "alice").unwrap();
//! assert_eq!(session.username().unwrap().as_deref(), Some("alice"));
//!
//! session.clear().unwrap();
//! assert!(session.token().unwrap().is_none());
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod session;
pub mod token;
pub mod types;

pub use error::{CoreError, Result};
pub use session::{
    FileSessionStore, MemorySessionStore, Session, SessionState, SessionStore,
    KEY_AUTH_TOKEN, KEY_FAVORITE_MOVIES, KEY_USERNAME,
};
pub use token::TokenClaims;
pub use types::{
    Director, FavoriteRef, FieldError, Genre, Movie, MovieId, NewUser, User, UserUpdate,
};
