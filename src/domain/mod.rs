pub mod apps;
pub mod confirm;
pub mod customer;
pub mod display;
pub mod follow_up;
pub mod lifecycle;
pub mod validation;
pub mod view;
pub mod view_state;

pub use customer::{Customer, CustomerStatus, PlanDuration};
