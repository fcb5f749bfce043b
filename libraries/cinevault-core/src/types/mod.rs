mod ids;
mod movie;
pub mod serde_helpers;
mod user;

pub use ids::MovieId;
pub use movie::{Director, Genre, Movie};
pub use user::{
    is_valid_email, FavoriteRef, FieldError, NewUser, User, UserUpdate, MIN_PASSWORD_LEN,
    MIN_USERNAME_LEN,
};
