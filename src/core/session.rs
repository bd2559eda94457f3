use crate::domain::model::{
    AuthSnapshot, Credentials, Session, SessionState, TokenResponse, User, EMAIL_KEY,
    PLACEHOLDER_EMAIL, TOKEN_KEY,
};
use crate::domain::ports::{AuthApi, KeyValueStore};
use crate::utils::error::{Result, SessionError, LOGIN_FAILED_MESSAGE};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::watch;

/// Single owner of the authentication state.
///
/// All writes go through `initialize`, `login`, `logout` and `validate_remote`;
/// readers either poll the accessors or hold a receiver from [`SessionStore::subscribe`].
/// Every write replaces the whole snapshot, so concurrent logins resolve last-write-wins.
pub struct SessionStore<S: KeyValueStore, A: AuthApi> {
    storage: S,
    api: A,
    state: watch::Sender<AuthSnapshot>,
    pending_logins: AtomicUsize,
}

impl<S: KeyValueStore, A: AuthApi> SessionStore<S, A> {
    pub fn new(storage: S, api: A) -> Self {
        let (state, _) = watch::channel(AuthSnapshot::default());
        Self {
            storage,
            api,
            state,
            pending_logins: AtomicUsize::new(0),
        }
    }

    /// Loads the persisted token, if any. Never contacts the server.
    pub async fn initialize(&self) -> Result<SessionState> {
        let token = self
            .storage
            .get(TOKEN_KEY)
            .await?
            .filter(|t| !t.is_empty());

        let session = match token {
            Some(token) => {
                let email = self
                    .storage
                    .get(EMAIL_KEY)
                    .await?
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| PLACEHOLDER_EMAIL.to_string());
                tracing::debug!("Restored persisted session for {}", email);
                Session::authenticated(token, User::admin(email))
            }
            None => {
                tracing::debug!("No persisted token, starting unauthenticated");
                Session::unauthenticated()
            }
        };

        let state = session.state();
        self.state.send_modify(|snapshot| snapshot.session = session);
        Ok(state)
    }

    /// Loads persisted state and, when asked to, revalidates it against the server.
    pub async fn bootstrap(&self, validate: bool) -> Result<SessionState> {
        let state = self.initialize().await?;
        if validate && state == SessionState::Authenticated {
            return self.validate_remote().await;
        }
        Ok(state)
    }

    /// Exchanges credentials for a token and persists it.
    ///
    /// On failure the session is left untouched, the snapshot carries a
    /// displayable message and the error is returned to the caller.
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenResponse> {
        self.pending_logins.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|snapshot| {
            snapshot.loading = true;
            snapshot.error = None;
        });

        let result = self.try_login(credentials).await;
        self.pending_logins.fetch_sub(1, Ordering::SeqCst);

        let error_message = match &result {
            Ok(_) => {
                tracing::info!("Signed in as {}", credentials.email);
                None
            }
            Err(e) => {
                tracing::error!("Sign-in failed for {}: {}", credentials.email, e);
                Some(if e.is_login_failure() {
                    LOGIN_FAILED_MESSAGE.to_string()
                } else {
                    e.user_friendly_message()
                })
            }
        };

        // read the counter under the watch lock so the last writer sees the final count
        self.state.send_modify(|snapshot| {
            snapshot.loading = self.pending_logins.load(Ordering::SeqCst) > 0;
            if error_message.is_some() {
                snapshot.error = error_message;
            }
        });

        result
    }

    async fn try_login(&self, credentials: &Credentials) -> Result<TokenResponse> {
        let response = self.api.login(credentials).await?;

        let token = response
            .access_token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or(SessionError::MissingAccessToken)?;

        self.storage.set(TOKEN_KEY, &token).await?;
        if let Err(e) = self.storage.set(EMAIL_KEY, &credentials.email).await {
            // keep storage consistent with the unchanged in-memory session
            if let Err(cleanup) = self.storage.remove(TOKEN_KEY).await {
                tracing::warn!("Could not roll back persisted token: {}", cleanup);
            }
            return Err(e);
        }

        let user = User::admin(credentials.email.clone());
        self.state
            .send_modify(|snapshot| snapshot.session = Session::authenticated(token, user));

        Ok(response)
    }

    /// Forgets the session locally. No network call.
    pub async fn logout(&self) {
        for key in [TOKEN_KEY, EMAIL_KEY] {
            if let Err(e) = self.storage.remove(key).await {
                tracing::warn!("Could not remove '{}' from storage: {}", key, e);
            }
        }

        self.state
            .send_modify(|snapshot| snapshot.session = Session::unauthenticated());
        tracing::info!("Signed out");
    }

    /// Asks the server whether the current token is still accepted.
    ///
    /// A 401/403 signs the client out. Any other failure is logged and the
    /// session is kept, since the server may simply be unreachable.
    pub async fn validate_remote(&self) -> Result<SessionState> {
        let Some(token) = self.token() else {
            return Ok(SessionState::Unauthenticated);
        };

        match self.api.current_user(&token).await {
            Ok(remote) => {
                // check and update in one step so a concurrent logout is not undone
                let refreshed = self.state.send_if_modified(|snapshot| {
                    let same_token = snapshot.session.token() == Some(token.as_str());
                    let known_email = snapshot.session.user().map(|u| u.email.as_str());
                    if !same_token || known_email == Some(remote.email.as_str()) {
                        return false;
                    }
                    snapshot.session =
                        Session::authenticated(token.clone(), User::admin(remote.email.clone()));
                    true
                });

                if refreshed {
                    tracing::debug!("Refreshing session email from server profile");
                    self.storage.set(EMAIL_KEY, &remote.email).await?;
                    if self.token().as_deref() != Some(token.as_str()) {
                        self.storage.remove(EMAIL_KEY).await?;
                    }
                }
                Ok(self.state())
            }
            Err(SessionError::SessionRejected { status }) => {
                tracing::warn!("Server rejected persisted token (HTTP {}), signing out", status);
                self.logout().await;
                Ok(SessionState::Unauthenticated)
            }
            Err(e) => {
                tracing::warn!("Could not validate session, keeping it: {}", e);
                Ok(self.state())
            }
        }
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.state.borrow().clone()
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().session.state()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().session.is_authenticated()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().session.token().map(str::to_string)
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().session.user().cloned()
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
