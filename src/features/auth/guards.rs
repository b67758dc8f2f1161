//! Route guard decisions. Guards never navigate themselves; they return a
//! `GuardDecision` and the router layer applies it. While the session is
//! still being restored no redirect is ever issued, which keeps a page
//! refresh from bouncing a signed-in user to the login screen.

use crate::features::paths;

/// Query parameter carrying the path a signed-out user originally asked for.
pub const RETURN_TO_PARAM: &str = "from";

/// A navigation instruction produced by a guard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redirect {
    pub path: &'static str,
    /// Originally requested path, preserved for after sign-in.
    pub return_to: Option<String>,
}

impl Redirect {
    #[must_use]
    pub fn to(path: &'static str) -> Self {
        Self {
            path,
            return_to: None,
        }
    }

    /// Target URL including the preserved return path.
    #[must_use]
    pub fn href(&self) -> String {
        match &self.return_to {
            Some(from) => format!(
                "{}?{RETURN_TO_PARAM}={}",
                self.path,
                urlencoding::encode(from)
            ),
            None => self.path.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session restoration still running; show a placeholder.
    Pending,
    Render,
    Redirect(Redirect),
}

/// Admits only signed-in users; everyone else goes to the login screen with
/// `requested_path` preserved.
#[must_use]
pub fn require_session(loading: bool, signed_in: bool, requested_path: &str) -> GuardDecision {
    if loading {
        GuardDecision::Pending
    } else if signed_in {
        GuardDecision::Render
    } else {
        GuardDecision::Redirect(Redirect {
            path: paths::LOGIN,
            return_to: Some(requested_path.to_string()),
        })
    }
}

/// Admits only signed-out users; signed-in users go to the dashboard.
#[must_use]
pub fn require_no_session(loading: bool, signed_in: bool) -> GuardDecision {
    if loading {
        GuardDecision::Pending
    } else if signed_in {
        GuardDecision::Redirect(Redirect::to(paths::DASHBOARD))
    } else {
        GuardDecision::Render
    }
}

/// Resolves where to go after a successful sign-in. Only same-site absolute
/// paths are honored, and never the auth screens themselves.
#[must_use]
pub fn return_path(requested: Option<&str>) -> String {
    requested
        .map(str::trim)
        .filter(|path| path.starts_with('/') && !path.starts_with("//") && !path.contains('\\'))
        .filter(|path| {
            let route = path.split(['?', '#']).next().unwrap_or(path);
            !matches!(
                route,
                paths::LOGIN | paths::REGISTER | paths::AUTH_CALLBACK
            )
        })
        .map_or_else(|| paths::DASHBOARD.to_string(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::{GuardDecision, Redirect, require_no_session, require_session, return_path};
    use crate::features::auth::store::{AuthState, reduce, restoration_settled};
    use crate::features::auth::types::fixtures::session;
    use crate::features::auth::types::{AuthChangeEvent, AuthEventKind};

    #[test]
    fn guards_wait_while_loading() {
        assert_eq!(require_session(true, false, "/dashboard"), GuardDecision::Pending);
        assert_eq!(require_session(true, true, "/dashboard"), GuardDecision::Pending);
        assert_eq!(require_no_session(true, false), GuardDecision::Pending);
        assert_eq!(require_no_session(true, true), GuardDecision::Pending);
    }

    #[test]
    fn session_guard_is_stable_across_mounts() {
        for _ in 0..3 {
            let decision = require_session(false, false, "/dashboard");
            let GuardDecision::Redirect(redirect) = decision else {
                panic!("expected redirect, got {decision:?}");
            };
            assert_eq!(redirect.path, "/login");
            assert_eq!(redirect.return_to.as_deref(), Some("/dashboard"));

            assert_eq!(
                require_session(false, true, "/dashboard"),
                GuardDecision::Render
            );
        }
    }

    #[test]
    fn sign_out_on_dashboard_redirects_to_login_once_settled() {
        let signed_in = reduce(
            AuthState::restoring(),
            &AuthChangeEvent::new(
                AuthEventKind::InitialSession,
                Some(session("u1", "a@example.com")),
            ),
        );
        let settled = restoration_settled(false, &signed_in);
        assert_eq!(
            require_session(!settled, signed_in.is_authenticated(), "/dashboard"),
            GuardDecision::Render
        );

        let signed_out = reduce(
            signed_in,
            &AuthChangeEvent::new(AuthEventKind::SignedOut, None),
        );
        let settled = restoration_settled(settled, &signed_out);
        let decision = require_session(!settled, signed_out.is_authenticated(), "/dashboard");
        let GuardDecision::Redirect(redirect) = decision else {
            panic!("expected redirect, got {decision:?}");
        };
        assert_eq!(redirect.href(), "/login?from=%2Fdashboard");
    }

    #[test]
    fn no_session_guard_sends_signed_in_users_to_dashboard() {
        assert_eq!(
            require_no_session(false, true),
            GuardDecision::Redirect(Redirect::to("/dashboard"))
        );
        assert_eq!(require_no_session(false, false), GuardDecision::Render);
    }

    #[test]
    fn redirect_href_encodes_return_path() {
        let redirect = Redirect {
            path: "/login",
            return_to: Some("/dashboard?tab=a b".to_string()),
        };
        assert_eq!(redirect.href(), "/login?from=%2Fdashboard%3Ftab%3Da%20b");
        assert_eq!(Redirect::to("/dashboard").href(), "/dashboard");
    }

    #[test]
    fn return_path_defaults_to_dashboard() {
        assert_eq!(return_path(None), "/dashboard");
        assert_eq!(return_path(Some("")), "/dashboard");
        assert_eq!(return_path(Some("/dashboard")), "/dashboard");
    }

    #[test]
    fn return_path_rejects_offsite_and_auth_routes() {
        assert_eq!(return_path(Some("https://evil.example")), "/dashboard");
        assert_eq!(return_path(Some("//evil.example/x")), "/dashboard");
        assert_eq!(return_path(Some("/\\evil.example")), "/dashboard");
        assert_eq!(return_path(Some("/login")), "/dashboard");
        assert_eq!(return_path(Some("/register?x=1")), "/dashboard");
    }
}
