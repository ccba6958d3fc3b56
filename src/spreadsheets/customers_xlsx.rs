use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Format, Workbook};

use crate::domain::display::export_days_remaining;
use crate::domain::Customer;
use crate::errors::ServerError;

pub const EXPORT_FILENAME: &str = "customers.xlsx";
pub const SHEET_NAME: &str = "Customers";

/// Header and width of each column, left to right.
pub const COLUMNS: [(&str, f64); 3] = [("Email", 30.0), ("Days Remaining", 15.0), ("Phone Number", 20.0)];

/// Cell text for each customer, in the order given.
pub fn export_rows(customers: &[&Customer], now: DateTime<Utc>) -> Vec<[String; 3]> {
    customers
        .iter()
        .map(|c| [c.email.clone(), export_days_remaining(c, now), c.phone.clone()])
        .collect()
}

/// One spreadsheet row per customer, in the order given.
pub fn export_customers_xlsx(
    customers: &[&Customer],
    now: DateTime<Utc>,
) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .map_err(|e| ServerError::XlsxError(format!("Failed to name sheet: {e}")))?;

    let bold = Format::new().set_bold();
    for (col, (header, width)) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        worksheet
            .write_string_with_format(0, col, *header, &bold)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write header '{header}': {e}")))?;
        worksheet
            .set_column_width(col, *width)
            .map_err(|e| ServerError::XlsxError(format!("Failed to size column {col}: {e}")))?;
    }

    for (i, row) in export_rows(customers, now).iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            worksheet
                .write_string(r, col as u16, value)
                .map_err(|e| ServerError::XlsxError(format!("Failed to write row {r}: {e}")))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {e}")))
}
