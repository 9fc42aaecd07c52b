pub mod content;
pub mod enrichment;
pub mod feedback;
pub mod outreach_executor;
pub mod prospect_search;
pub mod response_tracker;
pub mod scoring;

pub use content::OutreachContentAgent;
pub use enrichment::DataEnrichmentAgent;
pub use feedback::FeedbackTrainerAgent;
pub use outreach_executor::OutreachExecutorAgent;
pub use prospect_search::ProspectSearchAgent;
pub use response_tracker::ResponseTrackerAgent;
pub use scoring::ScoringAgent;

use crate::config::PipelineConfig;
use serde_json::Value;

/// A single pipeline stage: a stateless call-out behind a uniform contract.
/// Each implementation extracts its own arguments from the resolved inputs;
/// the dispatcher never branches on agent identity.
pub trait Agent {
    fn name(&self) -> &'static str;
    fn execute(&self, inputs: &Value, config: &PipelineConfig)
        -> Result<AgentResult, AgentError>;
}

/// Distinguishes real provider data from fallback data produced after a
/// provider failure. Degraded results keep the same value shape so the
/// downstream pipeline is unaffected; only reporting differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentOutcome {
    Fresh,
    Degraded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentResult {
    pub value: Value,
    pub outcome: AgentOutcome,
}

impl AgentResult {
    pub fn fresh(value: Value) -> Self {
        Self {
            value,
            outcome: AgentOutcome::Fresh,
        }
    }

    pub fn degraded(value: Value) -> Self {
        Self {
            value,
            outcome: AgentOutcome::Degraded,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.outcome == AgentOutcome::Degraded
    }
}

/// Failures an agent cannot recover locally. Provider-call failures never
/// surface here; they are converted to degraded results inside the agent.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("failed to encode agent payload: {0}")]
    Encode(#[from] serde_json::Error),
}

pub(crate) fn api_base_from_env(env_var: &str, default: &str) -> String {
    std::env::var(env_var)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub(crate) fn input_array(inputs: &Value, key: &str) -> Vec<Value> {
    inputs
        .get(key)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

pub(crate) fn input_str<'a>(inputs: &'a Value, key: &str, default: &'a str) -> &'a str {
    inputs.get(key).and_then(Value::as_str).unwrap_or(default)
}
