//! Per-client session state and the teacher authorization gate.
//!
//! Session data travels in a signed cookie. Handlers read it into a
//! [`Session`] value, run authorizer operations on that value, and write it
//! back to the cookie jar.

use crate::credentials::{CredentialStore, CredentialStoreError, Credentials};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

/// Name of the cookie holding session data.
pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Teacher login required")]
    Forbidden,
    #[error("Teacher credential store is unavailable")]
    CredentialStoreUnavailable(#[source] CredentialStoreError),
}

/// State of one client's session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Response body of the auth status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStatus {
    pub authenticated: bool,
    pub username: Option<String>,
}

impl Session {
    /// Read the session from a cookie jar. A missing, tampered, or
    /// undecodable cookie yields an anonymous session.
    pub fn from_jar(jar: &SignedCookieJar) -> Self {
        jar.get(SESSION_COOKIE)
            .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
            .unwrap_or_default()
    }

    /// Store the session in the jar, or drop the cookie when anonymous.
    pub fn save(&self, jar: SignedCookieJar) -> SignedCookieJar {
        if *self == Self::default() {
            return jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
        }
        // Serializing two plain fields cannot fail.
        let value = serde_json::to_string(self).unwrap_or_default();
        jar.add(
            Cookie::build((SESSION_COOKIE, value))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax),
        )
    }

    /// Mark the session as a logged-in teacher if the credentials match.
    /// A failed attempt leaves the session untouched.
    pub fn authenticate(
        &mut self,
        credentials: &Credentials,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        if !credentials.verify(username, password) {
            return Err(AuthError::InvalidCredentials);
        }
        self.is_admin = true;
        self.username = Some(username.to_string());
        Ok(())
    }

    pub fn logout(&mut self) {
        *self = Self::default();
    }

    pub fn status(&self) -> AuthStatus {
        AuthStatus {
            authenticated: self.is_admin,
            username: if self.is_admin {
                self.username.clone()
            } else {
                None
            },
        }
    }

    /// Gate for roster mutations.
    pub fn require_admin(&self) -> Result<(), AuthError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

/// Authenticates sessions against a credential store.
#[derive(Clone)]
pub struct SessionAuthorizer {
    store: Arc<dyn CredentialStore>,
}

impl SessionAuthorizer {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Load the current credentials and authenticate `session` with them.
    pub async fn authenticate(
        &self,
        session: &mut Session,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        let store = Arc::clone(&self.store);
        let credentials = tokio::task::spawn_blocking(move || store.load())
            .await
            .map_err(CredentialStoreError::from)
            .and_then(|loaded| loaded)
            .map_err(|e| {
                error!(error = %e, "Failed to load teacher credentials");
                AuthError::CredentialStoreUnavailable(e)
            })?;

        session.authenticate(&credentials, username, password)
    }
}
