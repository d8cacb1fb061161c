//! CLI assembly layer: resolves the crew, merges config overrides, wires
//! backend, renderer and retry strategy, and dispatches each subcommand.
use std::fmt::Write as _;
use std::path::Path;

use crewkit_core::api as core_api;
use crewkit_core::api::{
    AppConfig, BackendConfig, CliError, Crew, DryRunBackendConfig, ExecutionEngine,
    ExecutionOpts,
};
use crewkit_plugins::factory;

use crate::commands::cli::{CrewArgs, RunArgs, ShowArgs};
use crate::scenarios;
use crate::utils::merge_inputs;

const BANNER_WIDTH: usize = 50;

pub fn load_config(path: Option<&Path>) -> Result<AppConfig, CliError> {
    match path {
        Some(path) => core_api::load_explicit(path),
        None => core_api::load_default(),
    }
    .map_err(|e| CliError::Config(e.to_string()))
}

pub fn resolve_crew(args: &CrewArgs) -> Result<Crew, CliError> {
    if let Some(path) = &args.crew {
        return Ok(Crew::load(path)?);
    }
    let name = args.scenario.as_deref().unwrap_or_default();
    let scenario = scenarios::find(name).ok_or_else(|| {
        let known: Vec<_> = scenarios::SCENARIOS.iter().map(|s| s.name).collect();
        CliError::Config(format!(
            "unknown scenario '{name}' (available: {})",
            known.join(", ")
        ))
    })?;
    Ok(scenario.load()?)
}

/// Folds `run` flags into the loaded config; flags win.
pub fn apply_run_flags(cfg: &mut AppConfig, run: &RunArgs) {
    if run.dry_run {
        cfg.backend = BackendConfig::DryRun(DryRunBackendConfig {
            model: run.model.clone(),
        });
    }
    if let BackendConfig::OpenAi(ref mut oai) = cfg.backend {
        if let Some(model) = &run.model {
            oai.model = model.clone();
        }
        if let Some(url) = &run.base_url {
            oai.base_url = url.trim_end_matches('/').to_string();
        }
    }
    if let Some(format) = run.stream_format {
        cfg.execution.stream_format = format.as_str().to_string();
    }
}

pub fn banner(title: &str) -> String {
    let rule = "=".repeat(BANNER_WIDTH);
    format!("\n{rule}\n{title}\n{rule}")
}

#[tracing::instrument(name = "cli.run", skip_all)]
pub async fn run_crew(mut cfg: AppConfig, run: RunArgs) -> Result<i32, CliError> {
    let crew = resolve_crew(&run.crew)?;
    let inputs = merge_inputs(&crew.inputs, &run.input, &run.input_file)?;
    apply_run_flags(&mut cfg, &run);

    let stream_format = cfg.execution.stream_format.clone();
    let text_output = stream_format != "jsonl";
    if !atty::is(atty::Stream::Stderr) {
        cfg.execution.progress_bar = false;
    }

    let backend = factory::build_backend(&cfg).map_err(|e| {
        match e.downcast::<core_api::BackendError>() {
            Ok(be) => CliError::Backend(be),
            Err(e) => CliError::Anyhow(e),
        }
    })?;
    tracing::debug!(
        crew = %crew.name,
        backend = backend.name(),
        model = backend.model_name(),
        stream_format = %stream_format,
        "run initialized"
    );

    let engine = ExecutionEngine::builder(backend)
        .opts(ExecutionOpts::from_config(&cfg.execution))
        .renderer(factory::build_renderer(&stream_format, run.verbose))
        .retry_strategy(factory::build_retry(&cfg.execution.retry))
        .build();

    let output = engine.run(&crew.workflow, &inputs).await?;

    if let Some(path) = &run.output {
        output.write_json(path)?;
        tracing::info!(path = %path.display(), "crew output written");
    }

    if text_output {
        println!("{}", banner(&crew.title));
        println!("{}", output.raw);
    }

    if run.inspect_json {
        for task in &output.tasks_output {
            let line = format!(
                "{} ({}): {}",
                task.name,
                task.task_id,
                core_api::inspect_json(&task.raw).describe()
            );
            // Keep stdout a clean event stream in jsonl mode.
            if text_output {
                println!("{line}");
            } else {
                eprintln!("{line}");
            }
        }
    }

    Ok(0)
}

pub fn check_crew(args: &CrewArgs) -> Result<i32, CliError> {
    let crew = resolve_crew(args)?;
    let report = core_api::run_checks(&crew.workflow, &crew.checks);
    print!("{}", report.render());
    if report.passed() {
        Ok(0)
    } else {
        Err(CliError::Checks(report.failed_count()))
    }
}

pub fn show_crew(args: &ShowArgs) -> Result<i32, CliError> {
    let crew = resolve_crew(&args.crew)?;
    if args.json {
        let json = serde_json::to_string_pretty(&crew.workflow)
            .map_err(|e| CliError::Anyhow(e.into()))?;
        println!("{json}");
    } else {
        print!("{}", describe_crew(&crew));
    }
    Ok(0)
}

pub fn list_scenarios() -> i32 {
    for scenario in scenarios::SCENARIOS {
        println!("{:<12} {}", scenario.name, scenario.summary);
    }
    0
}

/// Plain-text outline of a crew: roles, tasks in execution order, inputs.
pub fn describe_crew(crew: &Crew) -> String {
    let wf = &crew.workflow;
    let mut out = String::new();

    let _ = writeln!(out, "{} ({})", crew.title, crew.name);
    let _ = writeln!(out, "\nRoles:");
    for role in wf.roles() {
        let mut limits = Vec::new();
        if let Some(n) = role.max_iter {
            limits.push(format!("max_iter={n}"));
        }
        if let Some(n) = role.max_rpm {
            limits.push(format!("max_rpm={n}"));
        }
        if let Some(model) = &role.model {
            limits.push(format!("model={model}"));
        }
        if !role.tools.is_empty() {
            limits.push(format!("tools={}", role.tools.join(",")));
        }
        let _ = write!(out, "  - {}: {}", role.id, role.role);
        if !limits.is_empty() {
            let _ = write!(out, " [{}]", limits.join(" "));
        }
        out.push('\n');
    }

    let _ = writeln!(out, "\nTasks (execution order):");
    for (idx, step) in wf.steps().iter().enumerate() {
        let context = if step.context.is_empty() {
            "none".to_string()
        } else {
            step.context.join(", ")
        };
        let _ = writeln!(
            out,
            "  {}. {} \"{}\" -> {} (context: {})",
            idx + 1,
            step.task.id,
            step.task.name,
            step.task.agent,
            context
        );
        let mut tokens = core_api::placeholders(&step.task.description);
        tokens.extend(core_api::placeholders(&step.task.expected_output));
        if !tokens.is_empty() {
            let names: Vec<_> = tokens.into_iter().collect();
            let _ = writeln!(out, "     placeholders: {}", names.join(", "));
        }
    }

    let stages: Vec<String> = wf
        .stages()
        .iter()
        .map(|stage| format!("[{}]", stage.join(", ")))
        .collect();
    let _ = writeln!(out, "\nDependency stages: {}", stages.join(" -> "));

    if !crew.inputs.is_empty() {
        let _ = writeln!(out, "\nInputs:");
        for (key, value) in &crew.inputs {
            let first = value.lines().next().unwrap_or_default();
            let more = if value.lines().nth(1).is_some() { " ..." } else { "" };
            let _ = writeln!(out, "  {key} = {first}{more}");
        }
    }

    out
}
