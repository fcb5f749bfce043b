//! Favorites reconciliation and optimistic favorite toggles.
//!
//! [`FavoritesState`] is the single place where favorite membership lives for
//! a view. It is replaced wholesale from server data on every load, and
//! mutated optimistically when the user toggles a movie; the server call runs
//! on a spawned task and is recorded in a pending-mutation log until
//! [`FavoritesState::settle`] collects its outcome.
//!
//! Failed mutations are not rolled back. The next authoritative load
//! reconciles the view with the server.

use crate::detail::DetailPanel;
use crate::guard::SessionGuard;
use crate::notify::Notification;
use cinevault_client::{ApiError, CineVaultClient, FavoriteOutcome};
use cinevault_core::{FavoriteRef, Movie, MovieId};
use std::collections::HashSet;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// A catalog movie plus the view-only state derived for it.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub movie: Movie,
    pub is_favorite: bool,
    pub panel: DetailPanel,
}

impl CatalogEntry {
    pub fn new(movie: Movie) -> Self {
        Self {
            movie,
            is_favorite: false,
            panel: DetailPanel::default(),
        }
    }
}

/// Recompute every entry's favorite flag by set membership.
pub fn reconcile(entries: &mut [CatalogEntry], favorites: &HashSet<MovieId>) {
    for entry in entries {
        entry.is_favorite = favorites.contains(&entry.movie.id);
    }
}

/// Direction of a favorite mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Add,
    Remove,
}

/// Where a logged mutation stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationStatus {
    Pending,
    Applied,
    AlreadyConsistent,
    Failed(ApiError),
}

/// One optimistic change awaiting, or having received, a server response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMutation {
    pub seq: u64,
    pub movie_id: MovieId,
    pub kind: MutationKind,
    pub status: MutationStatus,
}

type MutationTask = JoinHandle<Result<FavoriteOutcome, ApiError>>;

/// The favorites of the signed-in user as one view sees them.
///
/// Dropping the state detaches any tasks still in flight; their outcomes are
/// discarded.
#[derive(Debug, Default)]
pub struct FavoritesState {
    list: Vec<FavoriteRef>,
    ids: HashSet<MovieId>,
    log: Vec<PendingMutation>,
    in_flight: Vec<(u64, MutationTask)>,
    next_seq: u64,
}

impl FavoritesState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace membership with an authoritative snapshot.
    ///
    /// Settled log entries are dropped; pending ones are kept so their
    /// outcomes can still be collected.
    pub fn replace(&mut self, favorites: Vec<FavoriteRef>) {
        let mut seen = HashSet::with_capacity(favorites.len());
        self.list = favorites
            .into_iter()
            .filter(|f| seen.insert(f.id.clone()))
            .collect();
        self.ids = seen;
        self.log.retain(|m| m.status == MutationStatus::Pending);
        debug!(favorites = self.list.len(), "Favorites replaced");
    }

    pub fn contains(&self, movie_id: &MovieId) -> bool {
        self.ids.contains(movie_id)
    }

    pub fn ids(&self) -> &HashSet<MovieId> {
        &self.ids
    }

    /// Favorites in the order they were received or added.
    pub fn list(&self) -> &[FavoriteRef] {
        &self.list
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// The pending-mutation log.
    pub fn log(&self) -> &[PendingMutation] {
        &self.log
    }

    /// Number of server calls not yet collected by [`FavoritesState::settle`].
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Flip `favorite` locally and send the matching add or remove.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn toggle(
        &mut self,
        client: &CineVaultClient,
        username: &str,
        favorite: FavoriteRef,
    ) -> MutationKind {
        let movie_id = favorite.id.clone();
        let kind = if self.ids.remove(&movie_id) {
            self.list.retain(|f| f.id != movie_id);
            MutationKind::Remove
        } else {
            self.ids.insert(movie_id.clone());
            self.list.push(favorite);
            MutationKind::Add
        };

        let seq = self.next_seq;
        self.next_seq += 1;
        self.log.push(PendingMutation {
            seq,
            movie_id: movie_id.clone(),
            kind,
            status: MutationStatus::Pending,
        });
        debug!(seq, movie_id = %movie_id, kind = ?kind, "Favorite toggled");

        let client = client.clone();
        let username = username.to_string();
        let task = tokio::spawn(async move {
            match kind {
                MutationKind::Add => client.add_favorite(&username, &movie_id).await,
                MutationKind::Remove => client.remove_favorite(&username, &movie_id).await,
            }
        });
        self.in_flight.push((seq, task));

        kind
    }

    /// Wait for every in-flight mutation and record its outcome.
    ///
    /// Returns the entries settled by this call, in issue order.
    pub async fn settle(&mut self) -> Vec<PendingMutation> {
        let in_flight = std::mem::take(&mut self.in_flight);
        let mut settled = Vec::with_capacity(in_flight.len());

        for (seq, task) in in_flight {
            let status = match task.await {
                Ok(Ok(FavoriteOutcome::Applied)) => MutationStatus::Applied,
                Ok(Ok(FavoriteOutcome::AlreadyConsistent)) => MutationStatus::AlreadyConsistent,
                Ok(Err(e)) => MutationStatus::Failed(e),
                Err(e) => MutationStatus::Failed(ApiError::NetworkError(format!(
                    "Favorite update was interrupted: {}",
                    e
                ))),
            };

            if let Some(entry) = self.log.iter_mut().find(|m| m.seq == seq) {
                entry.status = status;
                settled.push(entry.clone());
            }
        }

        if !settled.is_empty() {
            info!(settled = settled.len(), "Favorite updates settled");
        }
        settled
    }
}

/// Emit one notification per settled mutation.
pub(crate) fn report_settled(guard: &SessionGuard, settled: &[PendingMutation]) {
    for mutation in settled {
        match (&mutation.status, mutation.kind) {
            (MutationStatus::Failed(e), _) => guard.report(e, "Could not update favorites"),
            (MutationStatus::Pending, _) => {}
            (_, MutationKind::Add) => guard.notify(Notification::success("Added to favorites!")),
            (_, MutationKind::Remove) => {
                guard.notify(Notification::success("Removed from favorites!"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> HashSet<MovieId> {
        raw.iter().map(|id| MovieId::new(*id)).collect()
    }

    #[test]
    fn test_reconcile_flags_by_membership() {
        let mut entries = vec![
            CatalogEntry::new(Movie::new("1", "A")),
            CatalogEntry::new(Movie::new("2", "B")),
        ];

        reconcile(&mut entries, &ids(&["2"]));
        assert!(!entries[0].is_favorite);
        assert!(entries[1].is_favorite);

        reconcile(&mut entries, &ids(&[]));
        assert!(entries.iter().all(|e| !e.is_favorite));
    }

    #[test]
    fn test_replace_overwrites_and_dedups() {
        let mut state = FavoritesState::new();
        state.replace(vec![FavoriteRef::new("1"), FavoriteRef::new("2")]);
        state.replace(vec![
            FavoriteRef::new("3"),
            FavoriteRef::new("3"),
            FavoriteRef::new("4"),
        ]);

        assert_eq!(state.len(), 2);
        assert!(!state.contains(&MovieId::new("1")));
        assert!(state.contains(&MovieId::new("3")));
        assert_eq!(state.list()[0].id, MovieId::new("3"));
    }

    #[test]
    fn test_replace_keeps_only_pending_log_entries() {
        let mut state = FavoritesState::new();
        state.log = vec![
            PendingMutation {
                seq: 0,
                movie_id: MovieId::new("1"),
                kind: MutationKind::Add,
                status: MutationStatus::Applied,
            },
            PendingMutation {
                seq: 1,
                movie_id: MovieId::new("2"),
                kind: MutationKind::Remove,
                status: MutationStatus::Pending,
            },
        ];

        state.replace(Vec::new());
        assert_eq!(state.log().len(), 1);
        assert_eq!(state.log()[0].seq, 1);
    }
}
