use super::{input_array, Agent, AgentError, AgentResult};
use crate::config::PipelineConfig;
use serde_json::{json, Value};

const OPEN_RATE_THRESHOLD: f64 = 20.0;
const CLICK_RATE_THRESHOLD: f64 = 10.0;
const REPLY_RATE_THRESHOLD: f64 = 5.0;

/// Turns campaign response events into human-readable recommendations by
/// comparing aggregate open/click/reply rates against fixed thresholds.
#[derive(Debug, Clone, Default)]
pub struct FeedbackTrainerAgent;

impl FeedbackTrainerAgent {
    pub fn new() -> Self {
        Self
    }
}

fn rate(responses: &[Value], field: &str) -> f64 {
    if responses.is_empty() {
        return 0.0;
    }
    let hits = responses
        .iter()
        .filter(|event| event.get(field).and_then(Value::as_bool).unwrap_or(false))
        .count();
    hits as f64 / responses.len() as f64 * 100.0
}

fn analyze_responses(responses: &[Value]) -> Vec<String> {
    if responses.is_empty() {
        return vec!["No responses to analyze.".to_string()];
    }

    let open_rate = rate(responses, "opened");
    let click_rate = rate(responses, "clicked");
    let reply_rate = rate(responses, "replied");

    let mut recommendations = Vec::new();
    if open_rate < OPEN_RATE_THRESHOLD {
        recommendations
            .push("Consider improving email subject lines to increase opens.".to_string());
    }
    if click_rate < CLICK_RATE_THRESHOLD {
        recommendations.push("Include clearer CTA or links to increase clicks.".to_string());
    }
    if reply_rate < REPLY_RATE_THRESHOLD {
        recommendations
            .push("Personalize emails further or adjust targeting (ICP).".to_string());
    }
    if reply_rate >= REPLY_RATE_THRESHOLD {
        recommendations
            .push("Current approach is effective, continue testing variations.".to_string());
    }
    recommendations
}

impl Agent for FeedbackTrainerAgent {
    fn name(&self) -> &'static str {
        "FeedbackTrainerAgent"
    }

    fn execute(
        &self,
        inputs: &Value,
        _config: &PipelineConfig,
    ) -> Result<AgentResult, AgentError> {
        let responses = input_array(inputs, "responses");
        let recommendations = analyze_responses(&responses);
        for recommendation in &recommendations {
            println!("[FeedbackTrainerAgent] Recommendation: {recommendation}");
        }
        Ok(AgentResult::fresh(
            json!({"recommendations": recommendations}),
        ))
    }
}
