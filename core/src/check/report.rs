use std::fmt::Write as _;

use serde::Serialize;

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckCase {
    pub name: String,
    pub failed: bool,
    pub msg: String,
    pub want: String,
    pub got: String,
}

impl CheckCase {
    pub fn new(
        name: impl Into<String>,
        ok: bool,
        msg: impl Into<String>,
        want: impl ToString,
        got: impl ToString,
    ) -> Self {
        Self {
            name: name.into(),
            failed: !ok,
            msg: msg.into(),
            want: want.to_string(),
            got: got.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub cases: Vec<CheckCase>,
}

impl CheckReport {
    pub fn new(cases: Vec<CheckCase>) -> Self {
        Self { cases }
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckCase> {
        self.cases.iter().filter(|c| c.failed)
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    pub fn passed(&self) -> bool {
        self.failed_count() == 0
    }

    /// Human-readable summary: one block per failure, or a single success line.
    pub fn render(&self) -> String {
        let failed = self.failed_count();
        if failed == 0 {
            return format!("All checks passed! ({} checks)\n", self.cases.len());
        }

        let mut out = String::new();
        for case in self.failures() {
            let _ = writeln!(out, "Failed {}:\n{}", case.name, case.msg);
            let _ = writeln!(out, "Expected: {}", case.want);
            let _ = writeln!(out, "got: {}\n", case.got);
        }
        let _ = writeln!(out, "{failed} of {} checks failed", self.cases.len());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_lists_failures_with_expected_and_got() {
        let report = CheckReport::new(vec![
            CheckCase::new("task_count", true, "crew has all tasks", 3, 3),
            CheckCase::new(
                "context_len",
                false,
                "make_review_decision reads both reviews",
                2,
                1,
            ),
        ]);

        assert!(!report.passed());
        let text = report.render();
        assert!(text.contains("Failed context_len:"));
        assert!(text.contains("Expected: 2"));
        assert!(text.contains("got: 1"));
        assert!(text.contains("1 of 2 checks failed"));
        assert!(!text.contains("task_count"));
    }

    #[test]
    fn render_success() {
        let report = CheckReport::new(vec![CheckCase::new("x", true, "m", "a", "a")]);
        assert_eq!(report.render(), "All checks passed! (1 checks)\n");
    }
}
