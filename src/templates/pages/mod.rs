pub mod customers;
pub mod login;

pub use customers::{customers_page, CustomersPageVm};
pub use login::login_page;
