pub mod password;
pub mod sessions;
pub mod token;
