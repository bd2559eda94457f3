use crate::core::guard::{guard, Guarded, Redirect, LOGIN_PATH};
use std::fmt;

/// Landing path for signed-in users and target of the catch-all redirect.
pub const HOME_PATH: &str = "/app";

const MAX_REDIRECTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Dashboard,
    Tickets,
    Clients,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::Login => "login",
            View::Dashboard => "dashboard",
            View::Tickets => "tickets",
            View::Clients => "clients",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub view: View,
    pub protected: bool,
}

pub const ROUTES: &[Route] = &[
    Route {
        path: LOGIN_PATH,
        view: View::Login,
        protected: false,
    },
    Route {
        path: HOME_PATH,
        view: View::Dashboard,
        protected: true,
    },
    Route {
        path: "/app/tickets",
        view: View::Tickets,
        protected: true,
    },
    Route {
        path: "/app/clientes",
        view: View::Clients,
        protected: true,
    },
];

/// Strips query, fragment and trailing slashes.
fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

pub fn find_route(path: &str) -> Option<&'static Route> {
    let path = normalize(path);
    ROUTES.iter().find(|route| route.path == path)
}

/// Resolves one navigation step. Unknown paths redirect to the dashboard.
pub fn resolve(path: &str, is_authenticated: bool) -> Guarded<View> {
    match find_route(path) {
        Some(route) if route.protected => guard(is_authenticated, route).map(|r| r.view),
        Some(route) => Guarded::Render(route.view),
        None => {
            tracing::debug!("No route for '{}', redirecting to {}", path, HOME_PATH);
            Guarded::Redirect(Redirect::replace(HOME_PATH))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub view: View,
    /// Path the view was finally rendered at.
    pub path: String,
    /// Redirects followed on the way, in order.
    pub redirects: Vec<Redirect>,
}

/// Follows redirects until a view renders.
pub fn navigate(path: &str, is_authenticated: bool) -> Navigation {
    let mut current = normalize(path).to_string();
    let mut redirects = Vec::new();

    loop {
        match resolve(&current, is_authenticated) {
            Guarded::Render(view) => {
                return Navigation {
                    view,
                    path: current,
                    redirects,
                };
            }
            Guarded::Redirect(redirect) => {
                redirects.push(redirect);
                current = redirect.to.to_string();
                // the route table has no cycles; bail out to the login view if that ever changes
                if redirects.len() >= MAX_REDIRECTS {
                    tracing::warn!("Redirect limit reached navigating to '{}'", path);
                    return Navigation {
                        view: View::Login,
                        path: LOGIN_PATH.to_string(),
                        redirects,
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_is_public() {
        assert_eq!(resolve("/login", false), Guarded::Render(View::Login));
        assert_eq!(resolve("/login", true), Guarded::Render(View::Login));
    }

    #[test]
    fn test_protected_routes_are_guarded() {
        for route in ROUTES.iter().filter(|r| r.protected) {
            assert_eq!(resolve(route.path, true), Guarded::Render(route.view));
            assert_eq!(
                resolve(route.path, false),
                Guarded::Redirect(Redirect::replace(LOGIN_PATH))
            );
        }
    }

    #[test]
    fn test_normalization() {
        assert_eq!(find_route("/app/tickets/").map(|r| r.view), Some(View::Tickets));
        assert_eq!(find_route("/app?tab=1").map(|r| r.view), Some(View::Dashboard));
        assert_eq!(find_route("/app/clientes#top").map(|r| r.view), Some(View::Clients));
        assert!(find_route("").is_none());
    }

    #[test]
    fn test_unknown_path_lands_on_dashboard_or_login() {
        let nav = navigate("/inventario", true);
        assert_eq!(nav.view, View::Dashboard);
        assert_eq!(nav.path, HOME_PATH);
        assert_eq!(nav.redirects.len(), 1);

        let nav = navigate("/", false);
        assert_eq!(nav.view, View::Login);
        assert_eq!(nav.path, LOGIN_PATH);
        assert_eq!(
            nav.redirects.iter().map(|r| r.to).collect::<Vec<_>>(),
            vec![HOME_PATH, LOGIN_PATH]
        );
    }
}
