// src/auth/sessions.rs
use rusqlite::{params, Connection, OptionalExtension};

use crate::auth::token::{digest, generate_session_token};
use crate::errors::ServerError;

pub const SESSION_COOKIE: &str = "session";

/// Stores a new session and returns the raw token for the cookie.
/// Dead rows are cleared first so the table stays bounded.
pub fn create_session(conn: &Connection, ttl_secs: i64, now: i64) -> Result<String, ServerError> {
    purge_stale_sessions(conn, now)?;

    let raw_token = generate_session_token();
    let hash = digest(&raw_token);

    conn.execute(
        r#"
        insert into sessions (token_hash, created_at, expires_at)
        values (?, ?, ?)
        "#,
        params![hash.as_slice(), now, now + ttl_secs],
    )
    .map_err(|e| ServerError::DbError(format!("create session failed: {e}")))?;

    Ok(raw_token)
}

/// Deletes expired and revoked sessions. Returns how many went.
pub fn purge_stale_sessions(conn: &Connection, now: i64) -> Result<usize, ServerError> {
    conn.execute(
        "delete from sessions where expires_at <= ? or revoked_at is not null",
        params![now],
    )
    .map_err(|e| ServerError::DbError(format!("purge sessions failed: {e}")))
}

/// The session id for a live (unexpired, unrevoked) token.
pub fn find_session(conn: &Connection, raw_token: &str, now: i64) -> Result<Option<i64>, ServerError> {
    let hash = digest(raw_token);

    conn.query_row(
        r#"
        select id
        from sessions
        where token_hash = ?
          and expires_at > ?
          and revoked_at is null
        "#,
        params![hash.as_slice(), now],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("session lookup failed: {e}")))
}

pub fn revoke_session(conn: &Connection, raw_token: &str, now: i64) -> Result<(), ServerError> {
    let hash = digest(raw_token);
    conn.execute(
        "update sessions set revoked_at = ? where token_hash = ? and revoked_at is null",
        params![now, hash.as_slice()],
    )
    .map_err(|e| ServerError::DbError(format!("revoke session failed: {e}")))?;
    Ok(())
}

/// Pulls the session token out of a `Cookie` header value.
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then_some(value)
    })
}

pub fn session_cookie(token: &str, ttl_secs: i64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_secs}")
}

pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
