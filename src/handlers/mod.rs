pub mod auth;
pub mod gateway;
pub mod orders;
pub mod points;
