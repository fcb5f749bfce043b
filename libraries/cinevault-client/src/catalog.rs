//! Movie catalog operations.

use crate::client::endpoint;
use crate::error::Result;
use crate::response::{json_or_error, transport_error};
use cinevault_core::Movie;
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Catalog client for the CineVault API.
pub struct CatalogClient<'a> {
    http: &'a Client,
    base_url: &'a Url,
    access_token: &'a str,
}

impl<'a> CatalogClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a Url, access_token: &'a str) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    /// Get every movie, in server order.
    pub async fn get_movies(&self) -> Result<Vec<Movie>> {
        let url = endpoint(self.base_url, &["movies"])?;
        debug!(url = %url, "Fetching catalog");

        let response = self
            .http
            .get(url)
            .bearer_auth(self.access_token)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let movies: Vec<Movie> =
            json_or_error(response, "movie list", "Movie catalog not found").await?;

        debug!(movies = movies.len(), "Fetched catalog");
        Ok(movies)
    }
}
