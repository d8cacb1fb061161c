pub mod backends;
pub mod executor;
pub mod factory;
