//! Server configuration from command-line flags and environment.

use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use std::path::PathBuf;
use tracing::warn;

#[derive(clap::Args, Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "8000")]
    pub port: u16,

    /// Teacher credential file ({"teachers": [{"username", "password"}]})
    #[arg(long, env = "TEACHERS_FILE", default_value = "teachers.json")]
    pub teachers_file: PathBuf,

    /// Directory served under /static
    #[arg(long, env = "STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Secret used to sign session cookies
    #[arg(long, env = "SESSION_SECRET_KEY", hide_env_values = true)]
    pub session_secret: Option<String>,
}

impl ServerConfig {
    /// Cookie signing key derived from the configured secret.
    ///
    /// Without a secret a random key is generated, so sessions do not
    /// survive a restart.
    pub fn signing_key(&self) -> Key {
        match self.session_secret.as_deref() {
            Some(secret) if !secret.is_empty() => key_from_secret(secret),
            _ => {
                warn!(
                    "SESSION_SECRET_KEY is not set; using a random session key. \
                     Set it in production so sessions survive restarts"
                );
                Key::generate()
            }
        }
    }
}

/// Stretch a secret of any length to a 64-byte cookie key.
pub fn key_from_secret(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}
