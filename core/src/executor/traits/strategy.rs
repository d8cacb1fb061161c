use std::time::Duration;

use crate::error::BackendError;

/// Delay policy between backend attempts of one task.
///
/// The attempt budget itself comes from the role's `max_iter`.
pub trait RetryStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// Delay before attempt `attempt + 1`, where `attempt` is the 1-based attempt that failed.
    fn next_delay(&self, attempt: u32) -> Duration;

    fn is_fatal_error(&self, error: &BackendError) -> bool {
        !error.is_transient()
    }
}
