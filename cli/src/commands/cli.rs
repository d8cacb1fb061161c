use std::path::PathBuf;

use clap::{ArgGroup, Args as ClapArgs, Parser, Subcommand};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFormat {
    Text,
    Jsonl,
}

impl StreamFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamFormat::Text => "text",
            StreamFormat::Jsonl => "jsonl",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "crewkit", version, about = "Run role-playing agent crews defined in markdown")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of ~/.crewkit/config.toml or ./crewkit.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Which crew to operate on: a manifest on disk or a built-in scenario.
#[derive(ClapArgs, Debug, Clone)]
#[command(group(ArgGroup::new("crew_source").required(true).args(["crew", "scenario"])))]
pub struct CrewArgs {
    /// Path to a crew.toml manifest.
    #[arg(long)]
    pub crew: Option<PathBuf>,

    /// Name of a built-in scenario (see `crewkit list`).
    #[arg(long)]
    pub scenario: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub crew: CrewArgs,

    /// Run-time input (KEY=VALUE). Can be specified multiple times.
    #[arg(long = "input", action = clap::ArgAction::Append)]
    pub input: Vec<String>,

    /// Run-time input read from a file (KEY=PATH). Can be specified multiple times.
    #[arg(long = "input-file", action = clap::ArgAction::Append)]
    pub input_file: Vec<String>,

    /// Write the full crew output as JSON to this path.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Answer every task offline instead of calling a model.
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, value_enum)]
    pub stream_format: Option<StreamFormat>,

    /// Overrides the configured model for roles without their own.
    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub base_url: Option<String>,

    /// Print each task's output as it completes.
    #[arg(long, short)]
    pub verbose: bool,

    /// Report whether each task's output parses as a JSON object.
    #[arg(long)]
    pub inspect_json: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub crew: CrewArgs,

    /// Print the assembled workflow as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute a crew against the configured backend.
    Run(RunArgs),
    /// Run the offline quality checks of a crew.
    Check(CrewArgs),
    /// Print the assembled roles, tasks and execution order.
    Show(ShowArgs),
    /// List built-in scenarios.
    List,
}
