//! Movie catalog screen.

use crate::detail::{DetailPanel, DetailSection};
use crate::favorites::{reconcile, report_settled, CatalogEntry, FavoritesState, MutationKind};
use crate::guard::SessionGuard;
use crate::notify::Notification;
use cinevault_client::{ApiError, CineVaultClient};
use cinevault_core::{FavoriteRef, MovieId};
use tracing::{debug, info, warn};

/// State of the catalog screen: every movie, which ones are favorites,
/// the search filter and each movie's detail panel.
pub struct CatalogView {
    client: CineVaultClient,
    guard: SessionGuard,
    entries: Vec<CatalogEntry>,
    favorites: FavoritesState,
    search: String,
    loading: bool,
}

impl CatalogView {
    pub fn new(client: CineVaultClient, guard: SessionGuard) -> Self {
        Self {
            client,
            guard,
            entries: Vec::new(),
            favorites: FavoritesState::new(),
            search: String::new(),
            loading: false,
        }
    }

    /// Activate the screen: check the session, then fetch the catalog and
    /// the user's favorites.
    ///
    /// Outstanding favorite updates are settled first so the reload sees
    /// them. Returns whether the catalog was loaded.
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
        let movies = match self.client.fetch_catalog().await {
            Ok(movies) => movies,
            Err(e) => {
                self.guard.report(&e, "Failed to load movies");
                return false;
            }
        };
        self.entries = movies.into_iter().map(CatalogEntry::new).collect();
        self.apply_cached_favorites();

        let favorites = match self.client.fetch_favorites(username).await {
            Ok(movies) => movies.iter().map(FavoriteRef::from).collect(),
            Err(ApiError::NotFound(message)) => {
                self.guard.notify(Notification::info(message));
                Vec::new()
            }
            Err(e) => {
                self.guard.report(&e, "Failed to load favorites");
                return false;
            }
        };
        self.apply_favorites(favorites);

        info!(
            movies = self.entries.len(),
            favorites = self.favorites.len(),
            "Catalog loaded"
        );
        true
    }

    /// Flag favorites from the session's cached mirror.
    ///
    /// Used for a warm start before the authoritative fetch completes.
    pub fn apply_cached_favorites(&mut self) {
        let cached = self.guard.session().cached_favorites();
        debug!(cached = cached.len(), "Applying cached favorites");
        self.favorites.replace(cached);
        reconcile(&mut self.entries, self.favorites.ids());
    }

    fn apply_favorites(&mut self, favorites: Vec<FavoriteRef>) {
        self.favorites.replace(favorites);
        reconcile(&mut self.entries, self.favorites.ids());
        self.mirror();
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

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Entries matching the search filter, in server order.
    pub fn visible(&self) -> Vec<&CatalogEntry> {
        self.entries
            .iter()
            .filter(|e| e.movie.matches_query(&self.search))
            .collect()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn entry(&self, movie_id: &MovieId) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| &e.movie.id == movie_id)
    }

    pub fn favorites(&self) -> &FavoritesState {
        &self.favorites
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Optimistically flip a movie's favorite flag and send the update.
    ///
    /// Returns the new flag, or `None` if the movie is not in the catalog or
    /// there is no session.
    pub fn toggle_favorite(&mut self, movie_id: &MovieId) -> Option<bool> {
        let username = self.guard.require_session()?.username;

        let Some(index) = self.entries.iter().position(|e| &e.movie.id == movie_id) else {
            self.guard
                .notify(Notification::error(format!("Movie not found: {}", movie_id)));
            return None;
        };

        let favorite = FavoriteRef::from(&self.entries[index].movie);
        let kind = self.favorites.toggle(&self.client, &username, favorite);
        let is_favorite = kind == MutationKind::Add;
        self.entries[index].is_favorite = is_favorite;
        self.mirror();

        Some(is_favorite)
    }

    /// Expand or collapse one detail section of a movie.
    pub fn toggle_section(
        &mut self,
        movie_id: &MovieId,
        section: DetailSection,
    ) -> Option<DetailPanel> {
        let entry = self.entries.iter_mut().find(|e| &e.movie.id == movie_id)?;
        entry.panel.toggle(section);
        Some(entry.panel)
    }

    /// Wait for outstanding favorite updates and notify their outcomes.
    pub async fn settle(&mut self) {
        let settled = self.favorites.settle().await;
        report_settled(&self.guard, &settled);
    }
}
