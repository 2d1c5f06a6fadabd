//! Session identifier cache
//!
//! Holds the identifier returned by `login` for the lifetime of a client.
//! Acquisition is single-flight: concurrent first callers serialize on the
//! write lock and only the first one performs the login.

use crate::error::Result;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Opaque session token returned by `login`
#[derive(Clone, PartialEq, Eq)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap a raw session token
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw token, as sent on every call
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionId(***)")
    }
}

/// Lifecycle of a client's session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No successful login yet
    Unauthenticated,
    /// A session identifier is cached
    Authenticated,
}

/// Cached session identifier with single-flight acquisition
#[derive(Default)]
pub struct SessionCache {
    session: RwLock<Option<SessionId>>,
    logins: AtomicU64,
}

impl SessionCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached session, running `login` if there is none yet.
    ///
    /// A failed login leaves the cache empty; the error is returned as is.
    pub async fn get_or_login<F, Fut>(&self, login: F) -> Result<SessionId>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SessionId>>,
    {
        {
            let cached = self.session.read().await;
            if let Some(session) = cached.as_ref() {
                return Ok(session.clone());
            }
        }

        let mut cached = self.session.write().await;

        // Another caller may have logged in while we waited for the lock
        if let Some(session) = cached.as_ref() {
            return Ok(session.clone());
        }

        self.logins.fetch_add(1, Ordering::SeqCst);
        let session = login().await?;
        *cached = Some(session.clone());

        Ok(session)
    }

    /// Current lifecycle state
    pub async fn state(&self) -> SessionState {
        if self.session.read().await.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    /// Number of login attempts made through this cache
    pub fn login_count(&self) -> u64 {
        self.logins.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCache")
            .field("login_count", &self.login_count())
            .finish_non_exhaustive()
    }
}
