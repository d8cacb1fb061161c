pub mod backend;
pub mod renderer;
pub mod strategy;

pub use backend::*;
pub use renderer::*;
pub use strategy::*;
