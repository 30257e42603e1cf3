pub mod order_service;
pub mod payment_service;
pub mod point_service;

#[cfg(test)]
pub(crate) mod fixtures;
