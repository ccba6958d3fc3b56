//! Server configuration, read from CLI flags with environment fallbacks.

use clap::{Parser, ValueEnum};

use crate::errors::ServerError;

/// How operators get a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AuthMode {
    /// Shared admin password, entered on the login page.
    Password,
    /// Every visitor is signed in on first request.
    Anonymous,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "customer_desk", about = "Customer lifecycle admin panel", long_about = None)]
pub struct AppConfig {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind
    #[arg(short, long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// SQLite database file
    #[arg(long = "database", env = "DATABASE_PATH", default_value = "customers.sqlite3")]
    pub database_path: String,

    /// Schema applied at startup
    #[arg(long = "schema", env = "SCHEMA_PATH", default_value = "sql/schema.sql")]
    pub schema_path: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "AUTH_MODE", value_enum, default_value = "password")]
    pub auth_mode: AuthMode,

    /// Required in password mode
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,

    #[arg(long, env = "SESSION_TTL_SECS", default_value_t = 60 * 60 * 24 * 7)]
    pub session_ttl_secs: i64,

    #[arg(long, env = "MAX_WORKERS", default_value_t = 8)]
    pub max_workers: usize,

    /// Insert demo customers into an empty collection
    #[arg(long, env = "SEED_DEMO")]
    pub seed_demo: bool,
}

impl AppConfig {
    /// Load `.env` (if present), then parse flags and environment.
    pub fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();
        Self::try_parse()
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn auth_settings(&self) -> Result<AuthSettings, ServerError> {
        let password = match self.auth_mode {
            AuthMode::Password => {
                let password = self
                    .admin_password
                    .as_deref()
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .ok_or_else(|| {
                        ServerError::BadRequest(
                            "ADMIN_PASSWORD must be set when AUTH_MODE=password".into(),
                        )
                    })?;
                Some(password.to_string())
            }
            AuthMode::Anonymous => None,
        };

        Ok(AuthSettings {
            mode: self.auth_mode,
            admin_password: password,
            session_ttl_secs: self.session_ttl_secs,
        })
    }
}

/// The part of the config the request handlers need.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub mode: AuthMode,
    pub admin_password: Option<String>,
    pub session_ttl_secs: i64,
}

#[cfg(test)]
impl AuthSettings {
    pub fn password(password: &str) -> Self {
        Self {
            mode: AuthMode::Password,
            admin_password: Some(password.to_string()),
            session_ttl_secs: 60 * 60 * 24 * 7,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            mode: AuthMode::Anonymous,
            admin_password: None,
            session_ttl_secs: 60 * 60 * 24 * 7,
        }
    }
}
