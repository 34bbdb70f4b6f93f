//! Auth session service.
//!
//! Owns the signed-in state and is the only writer of the persisted
//! `auth-storage` entry. Construct one per process with the store it should
//! hydrate from; a second service built over the same store sees exactly what
//! the first one last persisted.

use campus_core::api::{PortalApi, TokenSource};
use campus_core::session::{
    AuthUser, Credentials, GuardDecision, PersistedSession, Route, SESSION_STORAGE_KEY, Session,
};
use campus_core::storage::KeyValueStore;
use campus_core::{PortalError, Result};
use std::sync::{Arc, RwLock, RwLockReadGuard};

pub struct AuthSessionService {
    store: Arc<dyn KeyValueStore>,
    session: RwLock<Session>,
}

impl AuthSessionService {
    /// Creates the service and hydrates the session from `store`.
    ///
    /// A missing entry means signed out. An unreadable entry is logged and
    /// also treated as signed out.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let session = hydrate(store.as_ref());
        Self {
            store,
            session: RwLock::new(session),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        // A poisoned lock still holds a complete Session value.
        self.session.read().unwrap_or_else(|e| e.into_inner())
    }

    fn replace(&self, next: Session) -> Result<()> {
        self.persist(&next)?;
        let mut guard = self.session.write().unwrap_or_else(|e| e.into_inner());
        *guard = next;
        Ok(())
    }

    fn persist(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_string(&PersistedSession::new(session.clone()))?;
        self.store.set_item(SESSION_STORAGE_KEY, &json)
    }

    pub fn session(&self) -> Session {
        self.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.read().user.clone()
    }

    /// Stores an authenticated session and returns where the user lands.
    pub fn login(
        &self,
        user: AuthUser,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Result<Route> {
        let landing = Route::landing_for(&user.role);
        tracing::info!(
            "[Auth] Signed in as {} ({:?})",
            user.username,
            user.role
        );
        self.replace(Session::authenticated(
            user,
            access_token.into(),
            refresh_token.into(),
        ))?;
        Ok(landing)
    }

    /// Clears every field and persists the cleared state.
    pub fn logout(&self) -> Result<()> {
        tracing::info!("[Auth] Signed out");
        self.replace(Session::signed_out())
    }

    /// Decides whether `route` may be shown. Only the authenticated flag counts.
    pub fn guard(&self, route: Route) -> GuardDecision {
        if route.is_public() || self.is_authenticated() {
            GuardDecision::Allow
        } else {
            GuardDecision::RedirectTo(Route::Login)
        }
    }

    /// Exchanges credentials for tokens, then signs in.
    pub async fn sign_in(&self, api: &dyn PortalApi, credentials: &Credentials) -> Result<Route> {
        if credentials.username.trim().is_empty() {
            return Err(PortalError::validation("username", "Username is required"));
        }
        if credentials.password.is_empty() {
            return Err(PortalError::validation("password", "Password is required"));
        }

        let tokens = api.login(credentials).await?;
        self.login(tokens.user, tokens.access_token, tokens.refresh_token)
    }

    /// Swaps the refresh token for a new token pair.
    pub async fn refresh(&self, api: &dyn PortalApi) -> Result<()> {
        let refresh_token = self
            .read()
            .refresh_token
            .clone()
            .ok_or_else(|| PortalError::Unauthorized("Not signed in".to_string()))?;

        let tokens = api.refresh(&refresh_token).await?;
        tracing::debug!("[Auth] Tokens refreshed for {}", tokens.user.username);
        self.replace(Session::authenticated(
            tokens.user,
            tokens.access_token,
            tokens.refresh_token,
        ))
    }
}

impl TokenSource for AuthSessionService {
    fn access_token(&self) -> Option<String> {
        let session = self.read();
        if session.is_authenticated {
            session.access_token.clone()
        } else {
            None
        }
    }
}

fn hydrate(store: &dyn KeyValueStore) -> Session {
    let raw = match store.get_item(SESSION_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Session::signed_out(),
        Err(e) => {
            tracing::warn!("[Auth] Could not read stored session: {}", e);
            return Session::signed_out();
        }
    };

    match serde_json::from_str::<PersistedSession>(&raw) {
        Ok(persisted) => persisted.state,
        Err(e) => {
            tracing::warn!("[Auth] Ignoring corrupt stored session: {}", e);
            Session::signed_out()
        }
    }
}
