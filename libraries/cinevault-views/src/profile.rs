//! User profile screen.

use crate::favorites::{report_settled, FavoritesState, MutationKind};
use crate::guard::SessionGuard;
use crate::notify::Notification;
use cinevault_client::{ApiError, CineVaultClient};
use cinevault_core::{FavoriteRef, Movie, MovieId, User, UserUpdate};
use tracing::{debug, info, warn};

/// State of the profile screen: the account record and its favorite movies.
pub struct ProfileView {
    client: CineVaultClient,
    guard: SessionGuard,
    user: Option<User>,
    favorites: FavoritesState,
    // Every favorite movie seen since the last load, so a removed one can
    // be added back.
    movies: Vec<Movie>,
    loading: bool,
}

impl ProfileView {
    pub fn new(client: CineVaultClient, guard: SessionGuard) -> Self {
        Self {
            client,
            guard,
            user: None,
            favorites: FavoritesState::new(),
            movies: Vec::new(),
            loading: false,
        }
    }

    /// Activate the screen: fetch the user record and favorite movies.
    pub async fn load(&mut self) -> bool {
        self.settle().await;

        let Some(session) = self.guard.require_session() else {
            return false;
        };

        self.loading = true;
        let loaded = self.fetch(&session.username).await;
        self.loading = false;
        loaded
    }

    async fn fetch(&mut self, username: &str) -> bool {
        let user = match self.client.fetch_user(username).await {
            Ok(user) => user,
            Err(e) => {
                self.guard.report(&e, "Error fetching user data");
                return false;
            }
        };

        match self.client.fetch_favorites(username).await {
            Ok(movies) => {
                self.favorites
                    .replace(movies.iter().map(FavoriteRef::from).collect());
                self.movies = movies;
            }
            Err(ApiError::NotFound(message)) => {
                self.guard.notify(Notification::info(message));
                self.favorites.replace(Vec::new());
                self.movies.clear();
            }
            Err(e) => {
                self.guard.report(&e, "Error fetching favorite movies");
                if !self.guard.has_session() {
                    return false;
                }
                self.favorites.replace(user.favorite_movies.clone());
                self.movies.clear();
            }
        }
        self.mirror();

        info!(
            username = %user.username,
            favorites = self.favorites.len(),
            "Profile loaded"
        );
        self.user = Some(user);
        true
    }

    fn mirror(&self) {
        if !self.guard.has_session() {
            debug!("No session, favorites not mirrored");
            return;
        }
        if let Err(e) = self.guard.session().mirror_favorites(self.favorites.list()) {
            warn!(error = %e, "Failed to mirror favorites");
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Favorite movies currently shown, in the order they were received.
    pub fn favorite_movies(&self) -> Vec<&Movie> {
        self.movies
            .iter()
            .filter(|m| self.favorites.contains(&m.id))
            .collect()
    }

    pub fn favorites(&self) -> &FavoritesState {
        &self.favorites
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Send a profile update. Missing username or email is rejected locally.
    pub async fn update_profile(&mut self, update: UserUpdate) -> bool {
        let Some(session) = self.guard.require_session() else {
            return false;
        };

        self.loading = true;
        let result = self.client.update_user(&session.username, &update).await;
        self.loading = false;

        match result {
            Ok(user) => {
                self.user = Some(user);
                self.guard
                    .notify(Notification::success("Profile updated successfully!"));
                true
            }
            Err(e) => {
                self.guard.report(&e, "Error updating user data");
                false
            }
        }
    }

    /// Remove a movie from the favorites, if it is one.
    pub fn remove_favorite(&mut self, movie_id: &MovieId) -> bool {
        if !self.favorites.contains(movie_id) {
            self.guard.notify(Notification::info(format!(
                "Movie {} is not in your favorites.",
                movie_id
            )));
            return false;
        }
        self.toggle_favorite(movie_id).is_some()
    }

    /// Optimistically flip a favorite shown on this screen.
    ///
    /// Returns the new flag, or `None` if the movie is unknown here or there
    /// is no session.
    pub fn toggle_favorite(&mut self, movie_id: &MovieId) -> Option<bool> {
        let session = self.guard.require_session()?;

        let favorite = match self.movies.iter().find(|m| &m.id == movie_id) {
            Some(movie) => FavoriteRef::from(movie),
            None => self
                .favorites
                .list()
                .iter()
                .find(|f| &f.id == movie_id)
                .cloned()?,
        };

        let kind = self
            .favorites
            .toggle(&self.client, &session.username, favorite);
        self.mirror();
        Some(kind == MutationKind::Add)
    }

    /// Wait for outstanding favorite updates and notify their outcomes.
    pub async fn settle(&mut self) {
        let settled = self.favorites.settle().await;
        report_settled(&self.guard, &settled);
    }
}
