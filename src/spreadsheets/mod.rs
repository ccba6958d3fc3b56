pub mod customers_xlsx;

pub use customers_xlsx::{export_customers_xlsx, EXPORT_FILENAME};
