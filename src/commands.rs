use crate::agents::AgentOutcome;
use crate::config::{load_workflow_definition, ConfigError, Credentials};
use crate::orchestration::{AgentRegistry, PipelineEngine, PipelineRunReport, StepStatus};
use crate::templates::{starter_workflow_yaml, DEFAULT_WORKFLOW_FILE_NAME};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    let mut args = args.into_iter();
    match args.next().as_deref() {
        Some("run") => cmd_run(args.next().map(PathBuf::from)),
        Some("init") => cmd_init(args.next().map(PathBuf::from)),
        Some("help") | None => Ok(help_lines().join("\n")),
        Some(other) => Err(format!("unknown command `{other}`; try `leadflow help`")),
    }
}

pub fn help_lines() -> Vec<&'static str> {
    vec![
        "Usage:",
        "  leadflow run [workflow-file]   Run the pipeline (default: workflow.yaml)",
        "  leadflow init [workflow-file]  Write a starter workflow definition",
        "  leadflow help                  Show this help",
        "",
        "Provider credentials come from the environment:",
        "  CLAY_API_KEY, APOLLO_API_KEY, PDL_API_KEY, OPENAI_KEY",
    ]
}

fn cmd_run(path: Option<PathBuf>) -> Result<String, String> {
    let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_WORKFLOW_FILE_NAME));
    let workflow = load_workflow_definition(&path).map_err(|err| err.to_string())?;
    let registry = AgentRegistry::builtin(&Credentials::from_env());
    // Run logs land next to the workflow file.
    let log_root = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let engine = PipelineEngine::new(registry).with_log_root(log_root);
    let report = engine.run_all(&workflow).map_err(|err| err.to_string())?;
    Ok(render_run_report(&report))
}

fn render_run_report(report: &PipelineRunReport) -> String {
    let mut lines = Vec::new();
    lines.push("Pipeline run summary:".to_string());
    for step in &report.steps {
        let status = match &step.status {
            StepStatus::Completed {
                outcome: AgentOutcome::Fresh,
            } => "completed".to_string(),
            StepStatus::Completed {
                outcome: AgentOutcome::Degraded,
            } => "completed (degraded)".to_string(),
            StepStatus::Skipped { reason } => format!("skipped ({reason})"),
        };
        lines.push(format!("  {} [{}]: {status}", step.step_id, step.agent));
    }

    let recommendations = collect_recommendations(report);
    if !recommendations.is_empty() {
        lines.push(String::new());
        lines.push("Recommendations:".to_string());
        for recommendation in recommendations {
            lines.push(format!("  - {recommendation}"));
        }
    }
    lines.join("\n")
}

fn collect_recommendations(report: &PipelineRunReport) -> Vec<String> {
    let mut recommendations = Vec::new();
    for step_id in report.outputs.step_ids() {
        let Some(output) = report.outputs.output(step_id) else {
            continue;
        };
        if let Some(items) = output.get("recommendations").and_then(Value::as_array) {
            recommendations.extend(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string),
            );
        }
    }
    recommendations
}

fn cmd_init(path: Option<PathBuf>) -> Result<String, String> {
    let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_WORKFLOW_FILE_NAME));
    write_starter_workflow(&path).map_err(|err| err.to_string())?;
    Ok(format!("wrote starter workflow to {}", path.display()))
}

fn write_starter_workflow(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists {
            path: path.display().to_string(),
        });
    }
    fs::write(path, starter_workflow_yaml()).map_err(|source| ConfigError::Write {
        path: path.display().to_string(),
        source,
    })
}
