//! crewkit core: definition loading, crew assembly, quality checks and
//! sequential execution.

pub mod api;
pub mod check;
pub mod config;
pub mod crew;
pub mod definition;
pub mod error;
pub mod executor;
pub mod template;
