pub mod dry_run;
pub mod openai;

pub use dry_run::DryRunBackend;
pub use openai::OpenAiBackend;
