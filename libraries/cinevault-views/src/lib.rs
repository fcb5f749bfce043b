//! CineVault Views
//!
//! Front-end agnostic view state for the CineVault movie client.
//!
//! # Architecture
//!
//! - **Guard**: `SessionGuard`, the one place that checks the session and
//!   turns errors into notifications (forcing logout on 401)
//! - **Catalog**: every movie with derived favorite flags, search and
//!   per-movie detail panels
//! - **Profile**: the account record, profile edits and favorite removal
//! - **Auth**: login and registration forms
//! - **Navigation**: routes and logout
//! - **Favorites**: membership reconciliation and optimistic toggles with a
//!   pending-mutation log
//!
//! Views talk to the outside world through two traits: [`Notifier`] for
//! user-facing messages and [`Navigator`] for route changes. A front end
//! implements both.
//!
//! # Example
//!
//! ```ignore
//! use cinevault_views::{CatalogView, SessionGuard};
//!
//! let guard = SessionGuard::new(session.clone(), notifier, navigator);
//! let mut catalog = CatalogView::new(client, guard);
//!
//! if catalog.load().await {
//!     catalog.set_search("nolan");
//!     for entry in catalog.visible() {
//!         println!("{} {}", if entry.is_favorite { "*" } else { " " }, entry.movie.title);
//!     }
//! }
//! ```

#![forbid(unsafe_code)]

pub mod auth;
pub mod catalog;
pub mod detail;
pub mod favorites;
pub mod guard;
pub mod navigation;
pub mod notify;
pub mod profile;

pub use auth::{LoginForm, LoginView, RegistrationForm, RegistrationView};
pub use catalog::CatalogView;
pub use detail::{DetailPanel, DetailSection};
pub use favorites::{
    reconcile, CatalogEntry, FavoritesState, MutationKind, MutationStatus, PendingMutation,
};
pub use guard::SessionGuard;
pub use navigation::{NavigationShell, Navigator, Route};
pub use notify::{Level, Notification, Notifier};
pub use profile::ProfileView;
