pub mod gateway;
pub mod intent_store;
pub mod models;
pub mod order_repo;
pub mod point_repo;
