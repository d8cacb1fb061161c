//! crewkit-cli library: modules exposed for unit and integration tests.

pub mod app;
pub mod commands;
pub mod scenarios;
pub mod utils;
