//! Shared application state.

use crate::activity::ActivityRegistry;
use crate::credentials::CredentialStore;
use crate::session::SessionAuthorizer;
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use std::sync::Arc;

/// State handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ActivityRegistry>,
    pub authorizer: SessionAuthorizer,
    /// Signs and verifies session cookies.
    pub key: Key,
}

impl AppState {
    pub fn new(
        registry: ActivityRegistry,
        credentials: Arc<dyn CredentialStore>,
        key: Key,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            authorizer: SessionAuthorizer::new(credentials),
            key,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}
