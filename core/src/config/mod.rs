mod env_file;
mod load;
mod types;

pub use env_file::parse_env_file;
pub use load::{
    apply_env_layers, apply_overrides, get_crewkit_data_dir, load_default, load_explicit,
    load_from_path,
};
pub use types::*;
