//! Offline quality checks over an assembled workflow.
//!
//! Checks never call a backend. They assert static attributes of roles and
//! tasks (field presence, wiring, expected-output wording) and produce an
//! expected-versus-actual report. [`inspect_json`] is the one helper that looks
//! at run results instead.

mod output;
mod report;
mod rules;

pub use output::{inspect_json, JsonShape};
pub use report::{CheckCase, CheckReport};
pub use rules::{generic_checks, run_checks, CheckSpec};
