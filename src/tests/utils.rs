use crate::auth::sessions::create_session;
use crate::config::AuthSettings;
use crate::db::customers::new_customer_id;
use crate::db::{init_db, Database};
use crate::domain::Customer;
use crate::router::AppState;
use astra::{Body, Request, Response};
use chrono::{DateTime, TimeZone, Utc};
use http::Method;
use std::io::Read;

pub const PASSWORD: &str = "shopXzone";

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// Initialize a fresh test DB (its own file) using the production schema
pub fn init_test_db() -> Database {
    let path = std::env::temp_dir().join(format!("customer_desk_test_{}.sqlite3", new_customer_id()));
    let db = Database::new(path.to_string_lossy().into_owned());

    init_db(&db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    db
}

pub fn password_state() -> AppState {
    AppState::new(init_test_db(), AuthSettings::password(PASSWORD))
}

pub fn anonymous_state() -> AppState {
    AppState::new(init_test_db(), AuthSettings::anonymous())
}

/// A live session token for `state`.
pub fn sign_in(state: &AppState) -> String {
    state
        .manager
        .database()
        .with_conn(|conn| create_session(conn, 3600, now().timestamp()))
        .unwrap()
}

pub fn get(uri: &str, token: Option<&str>) -> Request {
    let mut builder = http::Request::builder().method(Method::GET).uri(uri);
    if let Some(t) = token {
        builder = builder.header("Cookie", format!("session={t}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post(uri: &str, token: Option<&str>, form: &[(&str, &str)]) -> Request {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(form)
        .finish();
    let mut builder = http::Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded");
    if let Some(t) = token {
        builder = builder.header("Cookie", format!("session={t}"));
    }
    builder.body(Body::from(body)).unwrap()
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn header(resp: &Response, name: &str) -> String {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

pub fn customer_by_email(state: &AppState, email: &str) -> Customer {
    state
        .manager
        .all()
        .unwrap()
        .into_iter()
        .find(|c| c.email == email)
        .unwrap_or_else(|| panic!("no customer {email}"))
}
