use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Terminal progress for a sequential crew run.
///
/// One overall bar counts finished tasks; a spinner shows the task in flight.
pub struct ProgressMonitor {
    multi: MultiProgress,
    overall: ProgressBar,
    current: Option<(String, ProgressBar)>,
    enabled: bool,
}

impl ProgressMonitor {
    /// `enabled` should be false for JSONL output or when stderr is not a terminal.
    pub fn new(total_tasks: usize, enabled: bool) -> Self {
        if !enabled {
            return Self {
                multi: MultiProgress::new(),
                overall: ProgressBar::hidden(),
                current: None,
                enabled: false,
            };
        }

        let multi = MultiProgress::new();
        let overall = multi.add(ProgressBar::new(total_tasks as u64));
        overall.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} tasks {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓▒░  "),
        );
        overall.set_message("starting");

        Self {
            multi,
            overall,
            current: None,
            enabled: true,
        }
    }

    pub fn start_task(&mut self, task_name: &str, agent: &str) {
        if !self.enabled {
            return;
        }

        let bar = self.multi.add(ProgressBar::new_spinner());
        bar.set_style(
            ProgressStyle::with_template("  {spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        bar.set_message(format!("{task_name} ({agent})"));
        bar.enable_steady_tick(Duration::from_millis(100));
        self.overall.set_message(task_name.to_string());
        self.current = Some((task_name.to_string(), bar));
    }

    pub fn note_retry(&self, attempt: u32) {
        if let Some((name, bar)) = &self.current {
            bar.set_message(format!("{name} (retry {attempt})"));
        }
    }

    pub fn complete_task(&mut self, success: bool, duration_ms: u64) {
        if !self.enabled {
            return;
        }

        if let Some((name, bar)) = self.current.take() {
            let icon = if success { "✅" } else { "❌" };
            bar.finish_with_message(format!("{icon} {name} ({duration_ms}ms)"));
        }
        if success {
            self.overall.inc(1);
        }
    }

    pub fn finish(&self, success: bool) {
        if !self.enabled {
            return;
        }

        let msg = if success { "done" } else { "failed" };
        self.overall.finish_with_message(msg);
    }
}

impl Drop for ProgressMonitor {
    fn drop(&mut self) {
        if let Some((_, bar)) = self.current.take() {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_monitor_is_inert() {
        let mut monitor = ProgressMonitor::new(3, false);
        monitor.start_task("Review Security", "Security Engineer");
        monitor.note_retry(2);
        monitor.complete_task(true, 10);
        monitor.finish(true);
        assert!(monitor.current.is_none());
    }

    #[test]
    fn enabled_monitor_tracks_current_task() {
        let mut monitor = ProgressMonitor::new(2, true);
        monitor.start_task("Analyze Code Quality", "Senior Developer");
        assert!(monitor.current.is_some());
        monitor.complete_task(true, 100);
        assert!(monitor.current.is_none());
        assert_eq!(monitor.overall.position(), 1);
        monitor.finish(true);
    }
}
