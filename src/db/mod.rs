pub mod connection;
pub mod customers;

pub use connection::{init_db, Database};
