/// User domain types
use super::ids::MovieId;
use super::movie::Movie;
use super::serde_helpers::optional_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum username length accepted at registration
pub const MIN_USERNAME_LEN: usize = 5;

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LEN: usize = 6;

/// A user account as returned by the API.
///
/// The password is write-only and never part of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,

    #[serde(default)]
    pub email: String,

    #[serde(
        default,
        with = "optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub birthdate: Option<NaiveDate>,

    #[serde(rename = "favoriteMovies", default)]
    pub favorite_movies: Vec<FavoriteRef>,
}

/// Reference to a favorited movie.
///
/// The API sends favorites either as bare id strings or as (partial) movie
/// objects; both decode to this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawFavorite")]
pub struct FavoriteRef {
    #[serde(rename = "_id")]
    pub id: MovieId,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFavorite {
    Id(MovieId),
    Object {
        #[serde(rename = "_id")]
        id: MovieId,
        #[serde(default)]
        title: Option<String>,
    },
}

impl From<RawFavorite> for FavoriteRef {
    fn from(raw: RawFavorite) -> Self {
        match raw {
            RawFavorite::Id(id) => Self { id, title: None },
            RawFavorite::Object { id, title } => Self { id, title },
        }
    }
}

impl FavoriteRef {
    pub fn new(id: impl Into<MovieId>) -> Self {
        Self {
            id: id.into(),
            title: None,
        }
    }
}

impl From<&Movie> for FavoriteRef {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id.clone(),
            title: Some(movie.title.clone()),
        }
    }
}

/// A field-level validation message, in the `{path, msg}` shape the API uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(alias = "param")]
    pub path: String,
    pub msg: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            msg: msg.into(),
        }
    }

    /// Join a list of field errors into one human-readable line.
    pub fn join(errors: &[FieldError]) -> String {
        errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.msg)
    }
}

/// Registration payload (`POST /users`).
#[derive(Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(with = "optional_date", skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<NaiveDate>,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("birthdate", &self.birthdate)
            .finish()
    }
}

impl NewUser {
    /// Check the registration rules locally.
    ///
    /// Returns every violated rule, in field order. Empty means valid.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        let username = self.username.trim();
        if username.is_empty() {
            errors.push(FieldError::new("username", "Username is required"));
        } else {
            if username.chars().count() < MIN_USERNAME_LEN {
                errors.push(FieldError::new(
                    "username",
                    format!("Username must be at least {} characters", MIN_USERNAME_LEN),
                ));
            }
            if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
                errors.push(FieldError::new(
                    "username",
                    "Username may contain only letters and numbers",
                ));
            }
        }

        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(FieldError::new(
                "password",
                format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
            ));
        }

        if self.email.trim().is_empty() {
            errors.push(FieldError::new("email", "Email is required"));
        } else if !is_valid_email(self.email.trim()) {
            errors.push(FieldError::new("email", "Email is not valid"));
        }

        errors
    }
}

/// Partial profile update (`PUT /users/{username}`).
#[derive(Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(with = "optional_date", skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<NaiveDate>,
}

impl fmt::Debug for UserUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserUpdate")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("birthdate", &self.birthdate)
            .finish()
    }
}

impl UserUpdate {
    /// Username and email must both be present and non-empty.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.username.as_deref().map_or(true, |u| u.trim().is_empty()) {
            errors.push(FieldError::new("username", "Username is required"));
        }
        match self.email.as_deref().map(str::trim) {
            None | Some("") => errors.push(FieldError::new("email", "Email is required")),
            Some(email) if !is_valid_email(email) => {
                errors.push(FieldError::new("email", "Email is not valid"));
            }
            Some(_) => {}
        }
        errors
    }
}

/// Structural email check: `local@domain.tld`, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_decodes_mixed_favorites() {
        let user: User = serde_json::from_value(json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "$2b$10$hash",
            "birthdate": "1990-01-01T00:00:00.000Z",
            "favoriteMovies": ["1", { "_id": "2", "title": "B" }]
        }))
        .unwrap();

        assert_eq!(user.birthdate, NaiveDate::from_ymd_opt(1990, 1, 1));
        assert_eq!(
            user.favorite_movies,
            vec![
                FavoriteRef::new("1"),
                FavoriteRef {
                    id: MovieId::new("2"),
                    title: Some("B".to_string())
                }
            ]
        );
    }

    #[test]
    fn test_user_serialization_never_contains_password() {
        let user: User = serde_json::from_value(json!({
            "username": "alice",
            "password": "secret-hash"
        }))
        .unwrap();
        let encoded = serde_json::to_string(&user).unwrap();
        assert!(!encoded.contains("secret-hash"));
    }

    #[test]
    fn test_new_user_validation() {
        let valid = NewUser {
            username: "alice1".into(),
            password: "hunter22".into(),
            email: "alice@example.com".into(),
            birthdate: None,
        };
        assert!(valid.validate().is_empty());

        let invalid = NewUser {
            username: "al!".into(),
            password: "123".into(),
            email: "not-an-email".into(),
            birthdate: None,
        };
        let paths: Vec<_> = invalid.validate().into_iter().map(|e| e.path).collect();
        assert_eq!(paths, vec!["username", "username", "password", "email"]);
    }

    #[test]
    fn test_new_user_debug_redacts_password() {
        let user = NewUser {
            username: "alice1".into(),
            password: "hunter22".into(),
            email: "alice@example.com".into(),
            birthdate: None,
        };
        assert!(!format!("{:?}", user).contains("hunter22"));
    }

    #[test]
    fn test_user_update_requires_username_and_email() {
        let update = UserUpdate {
            username: Some("x".into()),
            ..UserUpdate::default()
        };
        let errors = update.validate();
        assert_eq!(errors, vec![FieldError::new("email", "Email is required")]);

        let update = UserUpdate {
            username: Some("x".into()),
            email: Some("x@example.com".into()),
            ..UserUpdate::default()
        };
        assert!(update.validate().is_empty());
    }

    #[test]
    fn test_user_update_skips_absent_fields() {
        let update = UserUpdate {
            username: Some("x".into()),
            email: Some("x@example.com".into()),
            ..UserUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "username": "x", "email": "x@example.com" })
        );
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@@b.co"));
        assert!(!is_valid_email("a b@c.co"));
        assert!(!is_valid_email("a@b..co"));
    }
}
