use crate::agents::AgentOutcome;
use crate::config::WorkflowDefinition;
use crate::orchestration::dispatcher::{execute_step, StepOutcome};
use crate::orchestration::error::OrchestratorError;
use crate::orchestration::output_store::OutputStore;
use crate::orchestration::registry::AgentRegistry;
use crate::shared::logging::append_pipeline_log_line;
use chrono::Utc;
use serde_json::Value;
use std::path::PathBuf;

const OUTPUT_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq)]
pub enum StepStatus {
    Completed { outcome: AgentOutcome },
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub step_id: String,
    pub agent: String,
    pub status: StepStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRunReport {
    pub outputs: OutputStore,
    pub steps: Vec<StepReport>,
}

/// Runs a workflow's steps strictly in declaration order. This is a linear
/// pipeline, not a dependency graph: no parallelism, no retries, no
/// data-driven branching. Each step sees a snapshot of all prior outputs
/// and its result is merged into the store before the next step begins.
pub struct PipelineEngine {
    registry: AgentRegistry,
    log_root: Option<PathBuf>,
}

impl PipelineEngine {
    pub fn new(registry: AgentRegistry) -> Self {
        Self {
            registry,
            log_root: None,
        }
    }

    pub fn with_log_root(mut self, log_root: PathBuf) -> Self {
        self.log_root = Some(log_root);
        self
    }

    pub fn run_all(
        &self,
        workflow: &WorkflowDefinition,
    ) -> Result<PipelineRunReport, OrchestratorError> {
        let mut outputs = OutputStore::new();
        let mut steps = Vec::with_capacity(workflow.steps.len());

        for step in &workflow.steps {
            println!("\n=== Running Step: {} ({}) ===", step.id, step.agent);
            self.log(&format!(
                "step_id={} agent={} decision=execute",
                step.id, step.agent
            ));

            match execute_step(step, &outputs, &workflow.config, &self.registry)? {
                StepOutcome::Completed { output, outcome } => {
                    let preview = output_preview(&output);
                    outputs.record(&step.id, output)?;
                    println!("Step {} completed. Output: {preview}...", step.id);
                    self.log(&format!(
                        "step_id={} agent={} transition=completed outcome={} output_preview={preview}",
                        step.id,
                        step.agent,
                        outcome_label(outcome),
                    ));
                    steps.push(StepReport {
                        step_id: step.id.clone(),
                        agent: step.agent.clone(),
                        status: StepStatus::Completed { outcome },
                    });
                }
                StepOutcome::Skipped { reason } => {
                    self.log(&format!(
                        "step_id={} agent={} transition=skipped reason={reason}",
                        step.id, step.agent
                    ));
                    steps.push(StepReport {
                        step_id: step.id.clone(),
                        agent: step.agent.clone(),
                        status: StepStatus::Skipped { reason },
                    });
                }
            }
        }

        println!("\n=== Workflow Completed ===");
        self.log("transition=completed");
        Ok(PipelineRunReport { outputs, steps })
    }

    // Console and file output are side effects, not part of the run
    // contract; a log write failure never fails the run.
    fn log(&self, line: &str) {
        if let Some(log_root) = &self.log_root {
            let _ = append_pipeline_log_line(
                log_root,
                &format!("{} {line}", Utc::now().to_rfc3339()),
            );
        }
    }
}

fn outcome_label(outcome: AgentOutcome) -> &'static str {
    match outcome {
        AgentOutcome::Fresh => "fresh",
        AgentOutcome::Degraded => "degraded",
    }
}

fn output_preview(output: &Value) -> String {
    output.to_string().chars().take(OUTPUT_PREVIEW_CHARS).collect()
}
