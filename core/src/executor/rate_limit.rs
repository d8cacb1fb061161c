use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

/// Spaces consecutive requests of the same role at least `60s / max_rpm` apart.
#[derive(Debug, Default)]
pub struct RequestPacer {
    last_request: HashMap<String, Instant>,
}

impl RequestPacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_interval(max_rpm: u32) -> Duration {
        Duration::from_secs(60) / max_rpm.max(1)
    }

    /// Waits until `role_id` may issue another request, then records it.
    ///
    /// Returns the time spent waiting.
    pub async fn wait(&mut self, role_id: &str, max_rpm: Option<u32>) -> Duration {
        let now = Instant::now();
        let mut waited = Duration::ZERO;

        if let (Some(rpm), Some(last)) = (max_rpm, self.last_request.get(role_id)) {
            let ready_at = *last + Self::min_interval(rpm);
            if ready_at > now {
                waited = ready_at - now;
                tracing::debug!(role = role_id, wait_ms = waited.as_millis() as u64, "pacing request");
                tokio::time::sleep_until(ready_at).await;
            }
        }

        self.last_request.insert(role_id.to_string(), Instant::now());
        waited
    }
}
