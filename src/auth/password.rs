// src/auth/password.rs
use rusqlite::Connection;
use tracing::warn;

use crate::auth::sessions::create_session;
use crate::auth::token::{digest, digests_match};
use crate::config::{AuthMode, AuthSettings};
use crate::errors::ServerError;

/// Gate in front of the customer manager.
#[derive(Debug, Clone)]
pub struct PasswordGate {
    settings: AuthSettings,
}

impl PasswordGate {
    pub fn new(settings: AuthSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AuthSettings {
        &self.settings
    }

    pub fn check(&self, submitted: &str) -> bool {
        match (self.settings.mode, self.settings.admin_password.as_deref()) {
            (AuthMode::Anonymous, _) => true,
            (AuthMode::Password, Some(expected)) => {
                digests_match(&digest(submitted), &digest(expected))
            }
            (AuthMode::Password, None) => false,
        }
    }

    /// Checks the password and opens a session on success.
    pub fn sign_in(
        &self,
        conn: &Connection,
        submitted: &str,
        now: i64,
    ) -> Result<String, ServerError> {
        if !self.check(submitted) {
            warn!("rejected sign-in attempt");
            return Err(ServerError::Unauthorized(
                "Incorrect password. Please try again.".into(),
            ));
        }
        create_session(conn, self.settings.session_ttl_secs, now)
    }

    /// Anonymous mode signs every visitor in; password mode never does.
    pub fn sign_in_anonymously(
        &self,
        conn: &Connection,
        now: i64,
    ) -> Result<Option<String>, ServerError> {
        match self.settings.mode {
            AuthMode::Anonymous => create_session(conn, self.settings.session_ttl_secs, now).map(Some),
            AuthMode::Password => Ok(None),
        }
    }
}
