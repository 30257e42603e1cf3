pub mod errors;
pub mod order;
pub mod payment;
pub mod point;
pub mod ports;
pub mod split;
