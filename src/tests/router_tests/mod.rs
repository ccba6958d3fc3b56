mod auth_tests;
mod customer_tests;
mod export_tests;
