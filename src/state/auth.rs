//! Session store: the current bearer token and user profile.
//!
//! DESIGN
//! ======
//! Token and user live in one `Option<Credentials>` so they are set and
//! cleared together. All writes go through [`SessionStore::set_auth`] and
//! [`SessionStore::logout`]; readers get cloned [`AuthState`] snapshots.
//!
//! PERSISTENCE
//! ===========
//! Every mutation rewrites the `auth-storage` record through the injected
//! [`SessionStorage`]. Writes are best-effort: a failed write is logged and
//! the in-memory session still changes. Hydration never fails; a missing or
//! unreadable record yields the anonymous state.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};

use super::storage::{MemoryStorage, SessionStorage};
use crate::net::types::User;

/// Storage key for the persisted session record.
pub const AUTH_STORAGE_KEY: &str = "auth-storage";

/// Schema version written into the persisted record.
pub const AUTH_STORAGE_VERSION: u32 = 0;

#[derive(Clone, PartialEq, Eq)]
struct Credentials {
    token: String,
    user: User,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

/// Read-only snapshot of the session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    credentials: Option<Credentials>,
}

impl AuthState {
    /// The anonymous state.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.token.as_str())
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.credentials.as_ref().map(|c| &c.user)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }
}

/// Rejected `set_auth` inputs.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session token must not be empty")]
    EmptyToken,

    #[error("session token cannot be sent as a bearer credential")]
    UnsendableToken,

    #[error("session user must have an id")]
    MissingUserId,
}

/// Presence checks shared by `set_auth` and hydration. A token that cannot
/// become an `Authorization` header would fail every later request.
fn check_credentials(token: &str, user: &User) -> Result<(), SessionError> {
    if token.is_empty() {
        return Err(SessionError::EmptyToken);
    }
    if HeaderValue::from_str(&format!("Bearer {token}")).is_err() {
        return Err(SessionError::UnsendableToken);
    }
    if user.id.is_empty() {
        return Err(SessionError::MissingUserId);
    }
    Ok(())
}

// =============================================================================
// PERSISTED RECORD
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct PersistedRecord {
    state: PersistedAuth,
    version: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedAuth {
    token: Option<String>,
    user: Option<User>,
    is_authenticated: bool,
}

#[derive(Debug, thiserror::Error)]
enum RecordError {
    #[error("record is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported record version {0}")]
    Version(u32),

    #[error("token and user disagree")]
    Torn,

    #[error(transparent)]
    Credentials(#[from] SessionError),
}

impl From<&AuthState> for PersistedRecord {
    fn from(state: &AuthState) -> Self {
        Self {
            state: PersistedAuth {
                token: state.token().map(ToOwned::to_owned),
                user: state.user().cloned(),
                is_authenticated: state.is_authenticated(),
            },
            version: AUTH_STORAGE_VERSION,
        }
    }
}

fn decode_record(raw: &str) -> Result<AuthState, RecordError> {
    let record: PersistedRecord = serde_json::from_str(raw)?;
    if record.version != AUTH_STORAGE_VERSION {
        return Err(RecordError::Version(record.version));
    }
    let PersistedAuth { token, user, is_authenticated } = record.state;
    match (token, user) {
        (Some(token), Some(user)) if is_authenticated => {
            check_credentials(&token, &user)?;
            Ok(AuthState { credentials: Some(Credentials { token, user }) })
        }
        (None, None) if !is_authenticated => Ok(AuthState::empty()),
        _ => Err(RecordError::Torn),
    }
}

// =============================================================================
// STORE
// =============================================================================

struct Inner {
    state: RwLock<AuthState>,
    storage: Arc<dyn SessionStorage>,
}

/// Shared handle to the process-wide session. Clones refer to the same state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Build a store from whatever `storage` holds under [`AUTH_STORAGE_KEY`].
    pub fn hydrate(storage: Arc<dyn SessionStorage>) -> Self {
        let state = match storage.load(AUTH_STORAGE_KEY) {
            Ok(Some(raw)) => decode_record(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "discarding persisted session");
                AuthState::empty()
            }),
            Ok(None) => AuthState::empty(),
            Err(e) => {
                tracing::warn!(error = %e, "persisted session unreadable");
                AuthState::empty()
            }
        };
        tracing::debug!(authenticated = state.is_authenticated(), "session hydrated");
        Self { inner: Arc::new(Inner { state: RwLock::new(state), storage }) }
    }

    /// A store backed by fresh in-memory storage.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::hydrate(Arc::new(MemoryStorage::new()))
    }

    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// The current bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token()
            .map(ToOwned::to_owned)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner).is_authenticated()
    }

    /// Replace the session with `token` and `user` and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the session untouched, if the token is empty
    /// or not sendable as a header, or the user has no id.
    pub fn set_auth(&self, token: impl Into<String>, user: User) -> Result<(), SessionError> {
        let token = token.into();
        check_credentials(&token, &user)?;

        let mut state = self.inner.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = AuthState { credentials: Some(Credentials { token, user }) };
        self.persist(&state);
        tracing::info!(user_id = state.user().map(|u| u.id.as_str()), "session established");
        Ok(())
    }

    /// Clear the session and its persisted copy. Idempotent.
    pub fn logout(&self) {
        let mut state = self.inner.state.write().unwrap_or_else(PoisonError::into_inner);
        let was_authenticated = state.is_authenticated();
        *state = AuthState::empty();
        if let Err(e) = self.inner.storage.remove(AUTH_STORAGE_KEY) {
            tracing::warn!(error = %e, "failed to remove persisted session");
        }
        if was_authenticated {
            tracing::info!("session cleared");
        }
    }

    fn persist(&self, state: &AuthState) {
        let raw = match serde_json::to_string(&PersistedRecord::from(state)) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode session record");
                return;
            }
        };
        if let Err(e) = self.inner.storage.save(AUTH_STORAGE_KEY, &raw) {
            tracing::warn!(error = %e, "failed to persist session");
        }
    }
}
