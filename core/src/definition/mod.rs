//! Bold-label definition documents.
//!
//! Roles and tasks are described in small markdown files where each field is
//! introduced by a bold marker and runs until the next blank line followed by a
//! bold marker:
//!
//! ```text
//! **Role:** Security Engineer
//!
//! **Goal:** Identify vulnerabilities in code ...
//!
//! **Backstory:** You are an expert Security Engineer ...
//! ```
//!
//! A missing label is not an error: the field loads as an empty string and the
//! record constructors in [`crate::crew`] decide whether that is acceptable.
//!
//! There is no escaping. A body paragraph that itself starts with `**` after a
//! blank line ends the current section.

mod loader;
mod section;

pub use loader::{load_definition, DefinitionRecord};
pub use section::{extract_section, Label};

/// Version of the bold-label format understood by this crate.
pub const FORMAT_VERSION: u32 = 1;
