//! Login and registration against the CineVault API.

use crate::client::endpoint;
use crate::error::{ApiError, Result};
use crate::response::{error_from_response, json_or_error, transport_error};
use crate::types::{LoginBody, LoginRequest, LoginResponse};
use cinevault_core::{NewUser, User};
use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

/// Authentication client. Neither call requires a session.
pub struct AuthClient<'a> {
    http: &'a Client,
    base_url: &'a Url,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a Url) -> Self {
        Self { http, base_url }
    }

    /// Login with username and password.
    ///
    /// Bad credentials (400 or 401) are reported as `Unauthorized`.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let url = endpoint(self.base_url, &["login"])?;
        debug!(url = %url, username = %username, "Attempting login");

        let response = self
            .http
            .post(url)
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status().as_u16();
        if status == 400 || status == 401 {
            let err = error_from_response(response, "").await;
            warn!(status = status, error = %err, "Login failed: invalid credentials");
            return Err(ApiError::Unauthorized(
                "Invalid username or password".to_string(),
            ));
        }

        let body: LoginBody = json_or_error(response, "login response", "Login endpoint not found").await?;
        let resolved = body
            .user
            .as_ref()
            .map(|u| u.username.clone())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| username.to_string());

        info!(username = %resolved, "Login successful");

        Ok(LoginResponse {
            token: body.token,
            username: resolved,
            user: body.user,
        })
    }

    /// Create a new account.
    ///
    /// Server-side validation failures come back as `Rejected` with the
    /// field-level messages the server supplied.
    pub async fn register(&self, new_user: &NewUser) -> Result<User> {
        let url = endpoint(self.base_url, &["users"])?;
        debug!(url = %url, username = %new_user.username, "Registering user");

        let response = self
            .http
            .post(url)
            .json(new_user)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let user: User =
            json_or_error(response, "registration response", "Registration endpoint not found")
                .await?;

        info!(username = %user.username, "Registration successful");
        Ok(user)
    }
}
