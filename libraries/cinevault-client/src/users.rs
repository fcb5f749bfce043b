//! User profile and favorites operations.

use crate::client::endpoint;
use crate::error::{ApiError, Result};
use crate::response::{error_from_response, json_or_error, transport_error};
use crate::types::FavoriteOutcome;
use cinevault_core::{Movie, MovieId, User, UserUpdate};
use reqwest::{Client, Method};
use tracing::{debug, info, warn};
use url::Url;

/// Users client for the CineVault API.
pub struct UsersClient<'a> {
    http: &'a Client,
    base_url: &'a Url,
    access_token: &'a str,
}

impl<'a> UsersClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a Url, access_token: &'a str) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    /// Get a user record.
    pub async fn get_user(&self, username: &str) -> Result<User> {
        let url = endpoint(self.base_url, &["users", username])?;
        debug!(url = %url, "Fetching user");

        let response = self
            .http
            .get(url)
            .bearer_auth(self.access_token)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        json_or_error(response, "user", &format!("User not found: {}", username)).await
    }

    /// Get the movies a user has favorited.
    ///
    /// A 404 is `NotFound`, which is not the same as an empty list.
    pub async fn get_favorites(&self, username: &str) -> Result<Vec<Movie>> {
        let url = endpoint(self.base_url, &["users", username, "favoriteMovies"])?;
        debug!(url = %url, "Fetching favorites");

        let response = self
            .http
            .get(url)
            .bearer_auth(self.access_token)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let favorites: Vec<Movie> = json_or_error(
            response,
            "favorites",
            "No favorite movies found for this user.",
        )
        .await?;

        debug!(favorites = favorites.len(), "Fetched favorites");
        Ok(favorites)
    }

    /// Add a movie to a user's favorites.
    ///
    /// A 409, or a 400 saying the movie is already there, means the list was
    /// already in the requested state.
    pub async fn add_favorite(&self, username: &str, movie_id: &MovieId) -> Result<FavoriteOutcome> {
        match self.mutate_favorite(Method::POST, username, movie_id).await {
            Ok(()) => {
                info!(movie_id = %movie_id, "Added favorite");
                Ok(FavoriteOutcome::Applied)
            }
            Err(ApiError::Rejected { status: 409, .. }) => Ok(FavoriteOutcome::AlreadyConsistent),
            Err(ApiError::Rejected {
                status: 400,
                ref message,
                ..
            }) if message.to_lowercase().contains("already") => {
                Ok(FavoriteOutcome::AlreadyConsistent)
            }
            Err(e) => Err(e),
        }
    }

    /// Remove a movie from a user's favorites.
    ///
    /// A 404 means it was not a favorite to begin with.
    pub async fn remove_favorite(
        &self,
        username: &str,
        movie_id: &MovieId,
    ) -> Result<FavoriteOutcome> {
        match self.mutate_favorite(Method::DELETE, username, movie_id).await {
            Ok(()) => {
                info!(movie_id = %movie_id, "Removed favorite");
                Ok(FavoriteOutcome::Applied)
            }
            Err(ApiError::NotFound(_)) => Ok(FavoriteOutcome::AlreadyConsistent),
            Err(e) => Err(e),
        }
    }

    async fn mutate_favorite(&self, method: Method, username: &str, movie_id: &MovieId) -> Result<()> {
        let url = endpoint(self.base_url, &["users", username, "movies", movie_id.as_str()])?;
        debug!(url = %url, method = %method, "Updating favorites");

        let response = self
            .http
            .request(method, url)
            .bearer_auth(self.access_token)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let err = error_from_response(response, &format!("Movie not in favorites: {}", movie_id)).await;
            if !matches!(err, ApiError::NotFound(_) | ApiError::Rejected { .. }) {
                warn!(movie_id = %movie_id, error = %err, "Favorite update failed");
            }
            Err(err)
        }
    }

    /// Update a user's profile.
    ///
    /// `update` must carry a username and an email; otherwise nothing is sent.
    pub async fn update_user(&self, username: &str, update: &UserUpdate) -> Result<User> {
        let problems = update.validate();
        if !problems.is_empty() {
            debug!(problems = problems.len(), "Profile update rejected locally");
            return Err(ApiError::Validation(problems));
        }

        let url = endpoint(self.base_url, &["users", username])?;
        debug!(url = %url, "Updating user");

        let response = self
            .http
            .put(url)
            .bearer_auth(self.access_token)
            .json(update)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let user: User =
            json_or_error(response, "user", &format!("User not found: {}", username)).await?;
        info!(username = %user.username, "Profile updated");
        Ok(user)
    }
}
