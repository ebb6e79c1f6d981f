//! Session state
//!
//! The access token and user id are only ever stored and replaced together,
//! so a reader never sees a token paired with another session's user id.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::sync::{PoisonError, RwLock};

use crate::error::{Error, Result};

/// An access token and the id of the user it belongs to.
#[derive(Clone)]
pub struct Credentials {
    access_token: SecretString,
    user_id: String,
}

impl Credentials {
    /// Create credentials from a token and user id.
    pub fn new(access_token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            user_id: user_id.into(),
        }
    }

    /// The access token.
    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    /// The authenticated user's id.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// In-memory session of one client.
///
/// Empty on construction. Nothing clears it implicitly: a rejected token is
/// reported to the caller and stays in place until it is replaced.
#[derive(Debug, Default)]
pub struct Session {
    credentials: RwLock<Option<Credentials>>,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of the current credentials.
    pub fn credentials(&self) -> Option<Credentials> {
        self.credentials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the credentials.
    pub fn set(&self, credentials: Credentials) {
        *self
            .credentials
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(credentials);
    }

    /// Whether a token is present.
    pub fn is_authorized(&self) -> bool {
        self.credentials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The current credentials, or [`Error::NotAuthorized`] if there are none.
    pub(crate) fn require(&self) -> Result<Credentials> {
        self.credentials().ok_or(Error::NotAuthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_empty_on_construction() {
        let session = Session::new();
        assert!(!session.is_authorized());
        assert_eq!(session.require().unwrap_err(), Error::NotAuthorized);
    }

    #[test]
    fn test_set_replaces_pair() {
        let session = Session::new();
        session.set(Credentials::new("token-a", "user-a"));
        session.set(Credentials::new("token-b", "user-b"));

        let credentials = session.require().unwrap();
        assert_eq!(credentials.access_token(), "token-b");
        assert_eq!(credentials.user_id(), "user-b");
    }

    #[test]
    fn test_debug_redacts_token() {
        let credentials = Credentials::new("very-secret", "42");
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("42"));
    }

    #[test]
    fn test_readers_never_see_mixed_pairs() {
        let session = Arc::new(Session::new());
        session.set(Credentials::new("token-0", "user-0"));

        let writer = {
            let session = Arc::clone(&session);
            std::thread::spawn(move || {
                for i in 1..500 {
                    session.set(Credentials::new(format!("token-{i}"), format!("user-{i}")));
                }
            })
        };

        for _ in 0..500 {
            let credentials = session.credentials().unwrap();
            let token_n = credentials.access_token().trim_start_matches("token-");
            let user_n = credentials.user_id().trim_start_matches("user-");
            assert_eq!(token_n, user_n);
        }

        writer.join().unwrap();
    }
}
