#[allow(clippy::module_inception)]
pub mod error;
pub mod backend;
pub mod definition;
pub mod executor;

pub use backend::BackendError;
pub use definition::DefinitionError;
pub use error::CliError;
pub use executor::ExecutorError;
