/// Movie domain types
use super::ids::MovieId;
use super::serde_helpers::{lenient_year, optional_date};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A movie as served by the catalog API.
///
/// Only authoritative fields live here. Whether the movie is a favorite, or
/// which detail section is expanded, is view state derived on every load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    /// Unique movie identifier
    #[serde(rename = "_id")]
    pub id: MovieId,

    /// Title
    pub title: String,

    /// Genre
    #[serde(default)]
    pub genre: Genre,

    /// Director
    #[serde(default)]
    pub director: Director,

    /// Synopsis
    #[serde(default)]
    pub synopsis: String,

    /// Poster image reference
    #[serde(rename = "imagePath", default)]
    pub image_path: String,

    /// Release date
    #[serde(
        rename = "releaseDate",
        default,
        with = "optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub release_date: Option<NaiveDate>,
}

/// Movie genre
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Movie director
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Director {
    pub name: String,

    #[serde(default)]
    pub bio: String,

    #[serde(
        rename = "birthYear",
        default,
        deserialize_with = "lenient_year",
        skip_serializing_if = "Option::is_none"
    )]
    pub birth_year: Option<i32>,

    /// `None` while the director is alive, or when the API sent something unusable
    #[serde(
        rename = "deathYear",
        default,
        deserialize_with = "lenient_year",
        skip_serializing_if = "Option::is_none"
    )]
    pub death_year: Option<i32>,
}

impl Movie {
    /// Create a movie with just an id and title; remaining fields empty.
    pub fn new(id: impl Into<MovieId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            genre: Genre::default(),
            director: Director::default(),
            synopsis: String::new(),
            image_path: String::new(),
            release_date: None,
        }
    }

    /// Case-insensitive substring match against title, director name and genre name.
    ///
    /// An empty (or whitespace-only) query matches every movie.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&needle)
            || self.director.name.to_lowercase().contains(&needle)
            || self.genre.name.to_lowercase().contains(&needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_json() -> serde_json::Value {
        json!({
            "_id": "65a1",
            "title": "Inception",
            "genre": { "name": "Science Fiction", "description": "Speculative stories" },
            "director": {
                "name": "Christopher Nolan",
                "bio": "British-American filmmaker",
                "birthYear": 1970,
                "deathYear": null
            },
            "synopsis": "A thief who steals corporate secrets through dreams.",
            "imagePath": "https://example.com/inception.jpg",
            "releaseDate": "2010-07-16T00:00:00.000Z"
        })
    }

    #[test]
    fn test_decode_full_movie() {
        let movie: Movie = serde_json::from_value(sample_json()).unwrap();

        assert_eq!(movie.id.as_str(), "65a1");
        assert_eq!(movie.genre.name, "Science Fiction");
        assert_eq!(movie.director.birth_year, Some(1970));
        assert_eq!(movie.director.death_year, None);
        assert_eq!(movie.release_date, NaiveDate::from_ymd_opt(2010, 7, 16));
    }

    #[test]
    fn test_invalid_death_year_is_dropped() {
        let mut raw = sample_json();
        raw["director"]["deathYear"] = json!("unknown");
        let movie: Movie = serde_json::from_value(raw).unwrap();
        assert_eq!(movie.director.death_year, None);

        let mut raw = sample_json();
        raw["director"]["deathYear"] = json!(2020);
        let movie: Movie = serde_json::from_value(raw).unwrap();
        assert_eq!(movie.director.death_year, Some(2020));
    }

    #[test]
    fn test_malformed_release_date_is_dropped() {
        for bad in [json!(2010), json!({}), json!("someday")] {
            let mut raw = sample_json();
            raw["releaseDate"] = bad;
            let movie: Movie = serde_json::from_value(raw).unwrap();
            assert_eq!(movie.release_date, None);
            assert_eq!(movie.title, "Inception");
        }
    }

    #[test]
    fn test_minimal_movie_decodes() {
        let movie: Movie = serde_json::from_value(json!({ "_id": "1", "title": "A" })).unwrap();
        assert_eq!(movie, Movie::new("1", "A"));
    }

    #[test]
    fn test_matches_query() {
        let movie: Movie = serde_json::from_value(sample_json()).unwrap();

        assert!(movie.matches_query(""));
        assert!(movie.matches_query("incep"));
        assert!(movie.matches_query("NOLAN"));
        assert!(movie.matches_query("fiction"));
        assert!(!movie.matches_query("western"));
    }
}
