//! Session checks and error reporting shared by every view.

use crate::navigation::{Navigator, Route};
use crate::notify::{Notification, Notifier};
use cinevault_client::ApiError;
use cinevault_core::{Session, SessionState};
use std::sync::Arc;
use tracing::{debug, warn};

/// Gatekeeper for views that need an authenticated user.
///
/// Views never inspect the session store or classify errors themselves:
/// they ask the guard for the current session and hand every failure to
/// [`SessionGuard::report`], which emits exactly one notification and
/// forces a logout when the server rejected the token.
#[derive(Clone)]
pub struct SessionGuard {
    session: SessionState,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl SessionGuard {
    pub fn new(
        session: SessionState,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            session,
            notifier,
            navigator,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    pub fn navigate(&self, route: Route) {
        self.navigator.navigate(route);
    }

    /// Whether a session is stored, without redirecting or notifying.
    pub fn has_session(&self) -> bool {
        matches!(self.session.current(), Ok(Some(_)))
    }

    /// The current session, if present and unexpired.
    ///
    /// Otherwise any stale state is cleared, the user is sent to the login
    /// screen, and one notification explains why.
    pub fn require_session(&self) -> Option<Session> {
        let current = self.session.current().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read session");
            None
        });

        match current {
            Some(session) if self.session.is_valid() => Some(session),
            Some(session) => {
                debug!(username = %session.username, "Session token expired");
                self.end_session();
                self.notify(Notification::info(
                    "Your session has expired. Please log in again.",
                ));
                None
            }
            None => {
                self.end_session();
                self.notify(Notification::info("Please log in to continue."));
                None
            }
        }
    }

    /// Surface a failed operation to the user.
    ///
    /// `context` prefixes the message, e.g. "Failed to load movies".
    pub fn report(&self, error: &ApiError, context: &str) {
        match error {
            ApiError::Unauthorized(_) | ApiError::NoSessionToken => {
                warn!(error = %error, "{}; ending session", context);
                self.end_session();
                self.notify(Notification::error(format!(
                    "{}: your session is no longer valid. Please log in again.",
                    context
                )));
            }
            _ => {
                warn!(error = %error, "{}", context);
                self.notify(Notification::error(format!(
                    "{}: {}",
                    context,
                    error.message()
                )));
            }
        }
    }

    /// Clear all session keys and show the login screen.
    pub(crate) fn end_session(&self) {
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to clear session");
        }
        self.navigate(Route::Login);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::MockNavigator;
    use crate::notify::{Level, MockNotifier};
    use cinevault_core::MemorySessionStore;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use mockall::predicate::eq;

    fn token_expiring_in(secs: i64) -> String {
        let exp = chrono::Utc::now().timestamp() + secs;
        encode(
            &Header::default(),
            &serde_json::json!({ "exp": exp }),
            &EncodingKey::from_secret(b"test"),
        )
        .unwrap()
    }

    fn guard_with(
        session: &SessionState,
        notifier: MockNotifier,
        navigator: MockNavigator,
    ) -> SessionGuard {
        SessionGuard::new(session.clone(), Arc::new(notifier), Arc::new(navigator))
    }

    fn expect_login_redirect() -> MockNavigator {
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .with(eq(Route::Login))
            .times(1)
            .return_const(());
        navigator
    }

    fn expect_one_notification(level: Level) -> MockNotifier {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(move |n| n.level == level)
            .times(1)
            .return_const(());
        notifier
    }

    fn memory_session() -> SessionState {
        SessionState::new(Arc::new(MemorySessionStore::new()))
    }

    #[test]
    fn test_valid_session_passes_silently() {
        let session = memory_session();
        session.set(&token_expiring_in(3600), "alice").unwrap();

        let guard = guard_with(&session, MockNotifier::new(), MockNavigator::new());
        let current = guard.require_session().unwrap();
        assert_eq!(current.username, "alice");
    }

    #[test]
    fn test_missing_session_redirects_once() {
        let session = memory_session();
        let guard = guard_with(
            &session,
            expect_one_notification(Level::Info),
            expect_login_redirect(),
        );
        assert!(guard.require_session().is_none());
    }

    #[test]
    fn test_expired_session_is_cleared() {
        let session = memory_session();
        session.set(&token_expiring_in(-60), "alice").unwrap();

        let guard = guard_with(
            &session,
            expect_one_notification(Level::Info),
            expect_login_redirect(),
        );
        assert!(guard.require_session().is_none());
        assert!(session.token().unwrap().is_none());
        assert!(session.username().unwrap().is_none());
    }

    #[test]
    fn test_malformed_token_is_cleared() {
        let session = memory_session();
        session.set("not-a-jwt", "alice").unwrap();

        let guard = guard_with(
            &session,
            expect_one_notification(Level::Info),
            expect_login_redirect(),
        );
        assert!(guard.require_session().is_none());
        assert!(session.token().unwrap().is_none());
    }

    #[test]
    fn test_report_unauthorized_forces_logout() {
        let session = memory_session();
        session.set(&token_expiring_in(3600), "alice").unwrap();

        let guard = guard_with(
            &session,
            expect_one_notification(Level::Error),
            expect_login_redirect(),
        );
        guard.report(
            &ApiError::Unauthorized("jwt expired".into()),
            "Failed to load movies",
        );

        assert!(session.current().unwrap().is_none());
        assert!(!guard.has_session());
    }

    #[test]
    fn test_report_other_errors_keep_session() {
        let session = memory_session();
        session.set(&token_expiring_in(3600), "alice").unwrap();

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|n| n.is_error() && n.message == "Failed to load movies: boom")
            .times(1)
            .return_const(());

        let guard = guard_with(&session, notifier, MockNavigator::new());
        guard.report(
            &ApiError::ServerError {
                status: 500,
                message: "boom".into(),
            },
            "Failed to load movies",
        );

        assert!(session.current().unwrap().is_some());
        assert!(guard.has_session());
    }
}
