// src/db/customers.rs
//
// The customer collection: one JSON document per row, keyed by id.

use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;

use crate::auth::token::generate_token;
use crate::domain::Customer;
use crate::errors::ServerError;

const ID_BYTES: usize = 15;

/// Random URL-safe document id (20 chars).
pub fn new_customer_id() -> String {
    generate_token(&mut OsRng, ID_BYTES)
}

fn decode(id: &str, document: &str) -> Result<Customer, ServerError> {
    serde_json::from_str(document)
        .map_err(|e| ServerError::DbError(format!("customer {id} has a malformed document: {e}")))
}

fn encode(customer: &Customer) -> Result<String, ServerError> {
    serde_json::to_string(customer)
        .map_err(|e| ServerError::DbError(format!("encode customer failed: {e}")))
}

/// Every readable customer. Rows whose document does not decode are logged and left out.
pub fn list_customers(conn: &Connection) -> Result<Vec<Customer>, ServerError> {
    let mut stmt = conn
        .prepare("select id, document from customers order by created_at, id")
        .map_err(|e| ServerError::DbError(format!("prepare list customers failed: {e}")))?;

    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
        .map_err(|e| ServerError::DbError(format!("list customers failed: {e}")))?;

    let mut out = Vec::new();
    for r in rows {
        let (id, document) = r.map_err(|e| ServerError::DbError(e.to_string()))?;
        match decode(&id, &document) {
            Ok(customer) => out.push(customer),
            Err(e) => warn!(customer_id = %id, error = %e, "skipping malformed customer document"),
        }
    }
    Ok(out)
}

pub fn get_customer(conn: &Connection, id: &str) -> Result<Option<Customer>, ServerError> {
    let document: Option<String> = conn
        .query_row(
            "select document from customers where id = ?",
            params![id],
            |r| r.get(0),
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("select customer failed: {e}")))?;

    document.map(|d| decode(id, &d)).transpose()
}

pub fn insert_customer(
    conn: &Connection,
    customer: &Customer,
    now: DateTime<Utc>,
) -> Result<(), ServerError> {
    conn.execute(
        "insert into customers (id, document, created_at, updated_at) values (?, ?, ?, ?)",
        params![customer.id, encode(customer)?, now, now],
    )
    .map_err(|e| ServerError::DbError(format!("insert customer failed: {e}")))?;
    Ok(())
}

/// Overwrite an existing document. Missing rows are `NotFound`.
pub fn save_customer(
    conn: &Connection,
    customer: &Customer,
    now: DateTime<Utc>,
) -> Result<(), ServerError> {
    let updated = conn
        .execute(
            "update customers set document = ?, updated_at = ? where id = ?",
            params![encode(customer)?, now, customer.id],
        )
        .map_err(|e| ServerError::DbError(format!("update customer failed: {e}")))?;

    if updated == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}

pub fn delete_customer(conn: &Connection, id: &str) -> Result<bool, ServerError> {
    let deleted = conn
        .execute("delete from customers where id = ?", params![id])
        .map_err(|e| ServerError::DbError(format!("delete customer failed: {e}")))?;
    Ok(deleted > 0)
}

pub fn count_customers(conn: &Connection) -> Result<i64, ServerError> {
    conn.query_row("select count(*) from customers", [], |r| r.get(0))
        .map_err(|e| ServerError::DbError(format!("count customers failed: {e}")))
}
