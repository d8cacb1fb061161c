pub mod completion;
pub mod opts;
pub mod output;

pub use completion::*;
pub use opts::*;
pub use output::*;
