use crate::agents::AgentOutcome;
use crate::config::{PipelineConfig, StepConfig};
use crate::orchestration::error::OrchestratorError;
use crate::orchestration::output_store::OutputStore;
use crate::orchestration::registry::AgentRegistry;
use crate::orchestration::resolver::resolve;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Completed {
        output: Value,
        outcome: AgentOutcome,
    },
    Skipped {
        reason: String,
    },
}

/// Executes one step against a consistent snapshot of all prior outputs:
/// resolve the declared inputs, look up the agent, invoke it through the
/// uniform contract, and hand the output back for the engine to record.
///
/// An unknown agent name is reportable but non-fatal: the step is skipped
/// and the run continues. An error escaping the agent is fatal to the run;
/// provider failures never surface here because agents recover them locally
/// into degraded results.
pub fn execute_step(
    step: &StepConfig,
    outputs: &OutputStore,
    config: &PipelineConfig,
    registry: &AgentRegistry,
) -> Result<StepOutcome, OrchestratorError> {
    let resolved_inputs = resolve(&step.inputs, outputs);

    let Some(agent) = registry.lookup(&step.agent) else {
        eprintln!("Unknown agent: {}", step.agent);
        return Ok(StepOutcome::Skipped {
            reason: format!("unknown agent `{}`", step.agent),
        });
    };

    let result = agent
        .execute(&resolved_inputs, config)
        .map_err(|err| OrchestratorError::StepExecution {
            step_id: step.id.clone(),
            reason: err.to_string(),
        })?;

    Ok(StepOutcome::Completed {
        output: result.value,
        outcome: result.outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{Agent, AgentError, AgentResult};
    use serde_json::json;

    struct EchoAgent;

    impl Agent for EchoAgent {
        fn name(&self) -> &'static str {
            "EchoAgent"
        }

        fn execute(
            &self,
            inputs: &Value,
            _config: &PipelineConfig,
        ) -> Result<AgentResult, AgentError> {
            Ok(AgentResult::fresh(inputs.clone()))
        }
    }

    fn step(id: &str, agent: &str, inputs: Value) -> StepConfig {
        StepConfig {
            id: id.to_string(),
            agent: agent.to_string(),
            inputs,
        }
    }

    #[test]
    fn dispatcher_resolves_inputs_before_invoking_the_agent() {
        let mut registry = AgentRegistry::new();
        registry.register(Box::new(EchoAgent));
        let mut store = OutputStore::new();
        store
            .record("search", json!({"leads": [{"email": "a@x.com"}]}))
            .expect("record");

        let outcome = execute_step(
            &step("echo", "EchoAgent", json!({"leads": "{{search.output.leads}}"})),
            &store,
            &PipelineConfig::default(),
            &registry,
        )
        .expect("execute");

        match outcome {
            StepOutcome::Completed { output, outcome } => {
                assert_eq!(output, json!({"leads": [{"email": "a@x.com"}]}));
                assert_eq!(outcome, AgentOutcome::Fresh);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn unknown_agent_is_skipped_not_fatal() {
        let registry = AgentRegistry::new();
        let outcome = execute_step(
            &step("mystery", "NoSuchAgent", json!({})),
            &OutputStore::new(),
            &PipelineConfig::default(),
            &registry,
        )
        .expect("execute");
        assert_eq!(
            outcome,
            StepOutcome::Skipped {
                reason: "unknown agent `NoSuchAgent`".to_string()
            }
        );
    }
}
