//! Terminal adapters for the view layer, and plain-text rendering.

use cinevault_core::{Movie, User};
use cinevault_views::{
    CatalogEntry, DetailSection, Level, Navigator, Notification, Notifier, Route,
};
use std::sync::Mutex;
use tracing::debug;

/// Prints notifications: errors to stderr, everything else to stdout.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Error => eprintln!("error: {}", notification.message),
            Level::Success => println!("ok: {}", notification.message),
            Level::Info => println!("{}", notification.message),
        }
    }
}

/// Remembers the last route a view asked for.
///
/// A one-shot command cannot switch screens, so the route is turned into a
/// hint about what to run next.
#[derive(Debug, Default)]
pub struct TerminalNavigator {
    current: Mutex<Option<Route>>,
}

impl TerminalNavigator {
    pub fn current(&self) -> Option<Route> {
        self.current.lock().ok().and_then(|route| *route)
    }

    /// Suggested follow-up command for the current route.
    pub fn hint(&self) -> Option<&'static str> {
        match self.current()? {
            Route::Login => Some("Run `cinevault login` to sign in."),
            Route::Register => Some("Run `cinevault register` to create an account."),
            Route::Movies => Some("Run `cinevault movies` to browse the catalog."),
            Route::Profile => Some("Run `cinevault profile` to see your account."),
            Route::Welcome => None,
        }
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        debug!(route = route.path(), "Navigate");
        if let Ok(mut current) = self.current.lock() {
            *current = Some(route);
        }
    }
}

/// One catalog line: favorite marker, id, title, year, director and genre.
pub fn render_entry(entry: &CatalogEntry) -> String {
    let marker = if entry.is_favorite { '*' } else { ' ' };
    format!("{} {}", marker, render_movie(&entry.movie))
}

pub fn render_movie(movie: &Movie) -> String {
    let mut line = format!("{}  {}", movie.id, movie.title);
    if let Some(date) = movie.release_date {
        line.push_str(&format!(" ({})", date.format("%Y")));
    }
    if !movie.director.name.is_empty() {
        line.push_str(&format!(" - {}", movie.director.name));
    }
    if !movie.genre.name.is_empty() {
        line.push_str(&format!(" [{}]", movie.genre.name));
    }
    line
}

/// Body text of an expanded detail section.
pub fn render_section(movie: &Movie, section: DetailSection) -> String {
    match section {
        DetailSection::Synopsis => movie.synopsis.clone(),
        DetailSection::Genre => format!("{}\n{}", movie.genre.name, movie.genre.description),
        DetailSection::Director => {
            let director = &movie.director;
            let lifespan = match (director.birth_year, director.death_year) {
                (Some(born), Some(died)) => format!(" ({}-{})", born, died),
                (Some(born), None) => format!(" (born {})", born),
                _ => String::new(),
            };
            format!("{}{}\n{}", director.name, lifespan, director.bio)
        }
    }
}

pub fn render_user(user: &User) -> String {
    let mut out = format!("Username: {}\nEmail:    {}", user.username, user.email);
    if let Some(birthdate) = user.birthdate {
        out.push_str(&format!("\nBirthday: {}", birthdate.format("%Y-%m-%d")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use cinevault_core::{Director, Genre};

    fn inception() -> Movie {
        let mut movie = Movie::new("42", "Inception");
        movie.release_date = NaiveDate::from_ymd_opt(2010, 7, 16);
        movie.director = Director {
            name: "Christopher Nolan".into(),
            bio: "British-American filmmaker.".into(),
            birth_year: Some(1970),
            death_year: None,
        };
        movie.genre = Genre {
            name: "Sci-Fi".into(),
            description: "Speculative fiction.".into(),
        };
        movie
    }

    #[test]
    fn test_render_entry_marks_favorites() {
        let mut entry = CatalogEntry::new(inception());
        assert_eq!(
            render_entry(&entry),
            "  42  Inception (2010) - Christopher Nolan [Sci-Fi]"
        );

        entry.is_favorite = true;
        assert!(render_entry(&entry).starts_with("* 42"));
    }

    #[test]
    fn test_render_minimal_movie() {
        assert_eq!(render_movie(&Movie::new("1", "A")), "1  A");
    }

    #[test]
    fn test_render_director_section() {
        let text = render_section(&inception(), DetailSection::Director);
        assert_eq!(
            text,
            "Christopher Nolan (born 1970)\nBritish-American filmmaker."
        );
    }

    #[test]
    fn test_navigator_hint_follows_last_route() {
        let navigator = TerminalNavigator::default();
        assert_eq!(navigator.hint(), None);

        navigator.navigate(Route::Movies);
        navigator.navigate(Route::Login);
        assert_eq!(navigator.current(), Some(Route::Login));
        assert!(navigator.hint().unwrap().contains("login"));
    }
}
