/// Path of the public sign-in view.
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub to: &'static str,
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
}

impl Redirect {
    pub fn replace(to: &'static str) -> Self {
        Self { to, replace: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guarded<V> {
    Render(V),
    Redirect(Redirect),
}

impl<V> Guarded<V> {
    pub fn is_render(&self) -> bool {
        matches!(self, Guarded::Render(_))
    }

    pub fn into_view(self) -> Option<V> {
        match self {
            Guarded::Render(view) => Some(view),
            Guarded::Redirect(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> Guarded<U> {
        match self {
            Guarded::Render(view) => Guarded::Render(f(view)),
            Guarded::Redirect(redirect) => Guarded::Redirect(redirect),
        }
    }
}

/// Hands out the protected view only to an authenticated session.
///
/// Pure: no side effects and nothing is cached between navigations. This is a
/// UX gate, the API still has to authorize every request.
pub fn guard<V>(is_authenticated: bool, protected_view: V) -> Guarded<V> {
    if is_authenticated {
        Guarded::Render(protected_view)
    } else {
        Guarded::Redirect(Redirect::replace(LOGIN_PATH))
    }
}
