//! Crews compiled into the binary, so `crewkit run --scenario <name>` works
//! without a checkout of the definition files.

use std::path::{Path, PathBuf};

use crewkit_core::api::{Crew, CrewManifest, DefinitionError, DefinitionSource, ExecutorError};

macro_rules! crew_file {
    ($dir:literal, $file:literal) => {
        (
            $file,
            include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/crews/", $dir, "/", $file)),
        )
    };
}

/// A built-in crew: its manifest plus every file the manifest references.
pub struct Scenario {
    pub name: &'static str,
    pub summary: &'static str,
    manifest: &'static str,
    files: &'static [(&'static str, &'static str)],
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "code-review",
        summary: "Security and quality review of a diff, then a merge decision",
        manifest: include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/crews/code_review/crew.toml")),
        files: &[
            crew_file!("code_review", "agent_definitions/senior_developer.md"),
            crew_file!("code_review", "agent_definitions/security_engineer.md"),
            crew_file!("code_review", "agent_definitions/tech_lead.md"),
            crew_file!("code_review", "task_definitions/analyze_code_quality.md"),
            crew_file!("code_review", "task_definitions/review_security.md"),
            crew_file!("code_review", "task_definitions/make_review_decision.md"),
            crew_file!("code_review", "code_changes.txt"),
        ],
    },
    Scenario {
        name: "content",
        summary: "One strategist drafting a weekly short-video content plan",
        manifest: include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/crews/content/crew.toml")),
        files: &[
            crew_file!("content", "agent_definitions/micro_history_strategist.md"),
            crew_file!("content", "task_definitions/weekly_content_plan.md"),
        ],
    },
    Scenario {
        name: "research",
        summary: "Plan, gather, verify and write up research on a query",
        manifest: include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/crews/research/crew.toml")),
        files: &[
            crew_file!("research", "agent_definitions/research_planner.md"),
            crew_file!("research", "agent_definitions/internet_researcher.md"),
            crew_file!("research", "agent_definitions/fact_checker.md"),
            crew_file!("research", "agent_definitions/report_writer.md"),
            crew_file!("research", "task_definitions/create_research_plan.md"),
            crew_file!("research", "task_definitions/gather_research_data.md"),
            crew_file!("research", "task_definitions/verify_information_quality.md"),
            crew_file!("research", "task_definitions/write_final_report.md"),
        ],
    },
];

/// Looks a scenario up by name; `_` and `-` are interchangeable.
pub fn find(name: &str) -> Option<&'static Scenario> {
    let wanted = name.trim().replace('_', "-");
    SCENARIOS.iter().find(|s| s.name == wanted)
}

impl Scenario {
    pub fn load(&self) -> Result<Crew, ExecutorError> {
        let origin = self.source().describe("crew.toml");
        let manifest = CrewManifest::parse(self.manifest, &origin)?;
        manifest.build(&self.source())
    }

    fn source(&self) -> EmbeddedSource {
        EmbeddedSource {
            scenario: self.name,
            files: self.files,
        }
    }
}

struct EmbeddedSource {
    scenario: &'static str,
    files: &'static [(&'static str, &'static str)],
}

impl DefinitionSource for EmbeddedSource {
    fn read_to_string(&self, relative: &str) -> Result<String, DefinitionError> {
        let relative = relative.trim_start_matches("./");
        self.files
            .iter()
            .find(|(path, _)| Path::new(path) == Path::new(relative))
            .map(|(_, content)| content.to_string())
            .ok_or_else(|| DefinitionError::NotFound {
                path: self.describe(relative),
            })
    }

    fn describe(&self, relative: &str) -> PathBuf {
        PathBuf::from(format!("<builtin:{}>", self.scenario)).join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_scenario_loads() {
        for scenario in SCENARIOS {
            let crew = scenario.load().unwrap();
            assert!(!crew.workflow.is_empty(), "{} has no tasks", scenario.name);
        }
    }

    #[test]
    fn lookup_accepts_underscores() {
        assert_eq!(find("code_review").map(|s| s.name), Some("code-review"));
        assert!(find("unknown").is_none());
    }

    #[test]
    fn code_review_reads_embedded_diff() {
        let crew = find("code-review").unwrap().load().unwrap();
        assert!(crew.inputs["code_changes"].starts_with("diff --git"));
        assert_eq!(
            crew.workflow.execution_order(),
            vec!["review_security", "analyze_code_quality", "make_review_decision"]
        );
    }

    #[test]
    fn missing_embedded_file_names_scenario() {
        let source = find("content").unwrap().source();
        let err = source.read_to_string("nope.md").unwrap_err();
        assert!(err.to_string().contains("<builtin:content>"));
    }
}
