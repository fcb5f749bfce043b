//! Routes and the top-level navigation shell.

use crate::guard::SessionGuard;
use crate::notify::Notification;
use tracing::info;

/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Welcome,
    Login,
    Register,
    Movies,
    Profile,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Welcome => "/welcome",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Movies => "/movies",
            Route::Profile => "/profile",
        }
    }

    /// Resolve a path. Unknown paths land on the welcome screen, and
    /// `/logout` shows the login form.
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/login" | "/logout" => Route::Login,
            "/register" => Route::Register,
            "/movies" => Route::Movies,
            "/profile" => Route::Profile,
            _ => Route::Welcome,
        }
    }
}

/// Performs route changes requested by the views.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigation bar actions: move between screens, or log out.
pub struct NavigationShell {
    guard: SessionGuard,
}

impl NavigationShell {
    pub fn new(guard: SessionGuard) -> Self {
        Self { guard }
    }

    /// Tear down the session and return to the login screen.
    pub fn logout(&self) {
        info!("Logging out");
        self.guard.end_session();
        self.guard
            .notify(Notification::success("Logged out successfully!"));
    }

    pub fn go_to_movies(&self) {
        self.guard.navigate(Route::Movies);
    }

    pub fn go_to_profile(&self) {
        self.guard.navigate(Route::Profile);
    }
}
