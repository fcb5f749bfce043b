//! Login and registration screens.

use crate::guard::SessionGuard;
use crate::navigation::Route;
use crate::notify::Notification;
use chrono::NaiveDate;
use cinevault_client::CineVaultClient;
use cinevault_core::{FieldError, NewUser};
use std::fmt;
use tracing::{info, warn};

/// Credentials typed into the login form.
#[derive(Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields are required.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut problems = Vec::new();
        if self.username.trim().is_empty() {
            problems.push(FieldError::new("username", "Username is required"));
        }
        if self.password.is_empty() {
            problems.push(FieldError::new("password", "Password is required"));
        }
        problems
    }
}

pub struct LoginView {
    client: CineVaultClient,
    guard: SessionGuard,
    form: LoginForm,
}

impl LoginView {
    pub fn new(client: CineVaultClient, guard: SessionGuard) -> Self {
        Self {
            client,
            guard,
            form: LoginForm::default(),
        }
    }

    /// Greet a user who is already signed in. Returns whether a valid
    /// session exists.
    pub fn activate(&self) -> bool {
        let session = self.guard.session();
        if !session.is_valid() {
            return false;
        }
        match session.username() {
            Ok(Some(username)) if !username.is_empty() => {
                self.guard
                    .notify(Notification::info(format!("Welcome back, {}!", username)));
                true
            }
            Ok(_) => false,
            Err(e) => {
                warn!(error = %e, "Failed to read username");
                false
            }
        }
    }

    pub fn form(&self) -> &LoginForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut LoginForm {
        &mut self.form
    }

    /// Log in with the form's credentials.
    ///
    /// On success the session is stored and the catalog is shown. On failure
    /// nothing is stored and the form keeps its contents.
    pub async fn submit(&mut self) -> bool {
        let problems = self.form.validate();
        if !problems.is_empty() {
            self.guard.notify(Notification::error(format!(
                "Login failed: {}",
                FieldError::join(&problems)
            )));
            return false;
        }

        let response = match self
            .client
            .login(self.form.username.trim(), &self.form.password)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.guard
                    .notify(Notification::error(format!("Login failed: {}", e.message())));
                return false;
            }
        };

        // A previous user's favorites mirror must not survive into this session.
        let session = self.guard.session();
        let stored = session
            .clear()
            .and_then(|()| session.set(&response.token, &response.username));
        if let Err(e) = stored {
            warn!(error = %e, "Failed to store session");
            self.guard.notify(Notification::error(format!(
                "Login failed: could not save session: {}",
                e
            )));
            return false;
        }

        info!(username = %response.username, "Logged in");
        self.form.password.clear();
        self.guard.notify(Notification::success(format!(
            "Logged in as {}.",
            response.username
        )));
        self.guard.navigate(Route::Movies);
        true
    }
}

/// Fields of the registration form.
#[derive(Clone, Default)]
pub struct RegistrationForm {
    pub username: String,
    pub password: String,
    pub email: String,
    pub birthdate: Option<NaiveDate>,
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("birthdate", &self.birthdate)
            .finish()
    }
}

impl RegistrationForm {
    pub fn to_new_user(&self) -> NewUser {
        NewUser {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
            email: self.email.trim().to_string(),
            birthdate: self.birthdate,
        }
    }
}

pub struct RegistrationView {
    client: CineVaultClient,
    guard: SessionGuard,
    form: RegistrationForm,
    field_errors: Vec<FieldError>,
}

impl RegistrationView {
    pub fn new(client: CineVaultClient, guard: SessionGuard) -> Self {
        Self {
            client,
            guard,
            form: RegistrationForm::default(),
            field_errors: Vec::new(),
        }
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut RegistrationForm {
        &mut self.form
    }

    /// Problems from the last submit attempt, local or from the server.
    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    /// Create the account. On success any stray session is cleared and the
    /// login screen is shown.
    pub async fn submit(&mut self) -> bool {
        let new_user = self.form.to_new_user();

        self.field_errors = new_user.validate();
        if !self.field_errors.is_empty() {
            self.guard.notify(Notification::error(format!(
                "User registration failed: {}",
                FieldError::join(&self.field_errors)
            )));
            return false;
        }

        match self.client.register_user(&new_user).await {
            Ok(user) => {
                info!(username = %user.username, "Registered");
                if let Err(e) = self.guard.session().clear() {
                    warn!(error = %e, "Failed to clear session");
                }
                self.guard
                    .notify(Notification::success("User registration successful!"));
                self.guard.navigate(Route::Login);
                true
            }
            Err(e) => {
                warn!(error = %e, "Registration failed");
                self.field_errors = e.field_errors().to_vec();
                self.guard.notify(Notification::error(format!(
                    "User registration failed: {}",
                    e.message()
                )));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_form_requires_both_fields() {
        assert_eq!(LoginForm::default().validate().len(), 2);
        assert_eq!(LoginForm::new("alice", "").validate()[0].path, "password");
        assert!(LoginForm::new("alice", "pw").validate().is_empty());
    }

    #[test]
    fn test_login_form_debug_redacts_password() {
        let debug = format!("{:?}", LoginForm::new("alice", "hunter22"));
        assert!(!debug.contains("hunter22"));
    }

    #[test]
    fn test_registration_form_trims_identity_fields() {
        let form = RegistrationForm {
            username: " alice1 ".into(),
            password: " secret ".into(),
            email: " a@b.co ".into(),
            birthdate: None,
        };
        let new_user = form.to_new_user();
        assert_eq!(new_user.username, "alice1");
        assert_eq!(new_user.email, "a@b.co");
        assert_eq!(new_user.password, " secret ");
    }
}
