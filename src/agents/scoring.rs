use super::{input_array, Agent, AgentError, AgentResult};
use crate::config::{PipelineConfig, ScoringWeights};
use serde_json::{json, Value};

const EMPLOYEE_COUNT_RANGE: (u64, u64) = (100, 1000);
const REVENUE_RANGE: (u64, u64) = (20_000_000, 200_000_000);
const PREFERRED_ROLES: [&str; 4] = ["CEO", "CTO", "VP Sales", "Founder"];
const DESIRED_TECHNOLOGIES: [&str; 3] = ["Python", "Salesforce", "AWS"];

/// Scores enriched leads against the configured ICP weights and returns
/// them ranked by descending score. Purely local; no provider calls.
#[derive(Debug, Clone, Default)]
pub struct ScoringAgent;

impl ScoringAgent {
    pub fn new() -> Self {
        Self
    }
}

fn score_lead(lead: &Value, weights: &ScoringWeights) -> f64 {
    let mut score = 0.0;

    let employee_count = lead
        .get("employee_count")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    if (EMPLOYEE_COUNT_RANGE.0..=EMPLOYEE_COUNT_RANGE.1).contains(&employee_count) {
        score += weights.employee_count;
    }

    let revenue = lead.get("revenue").and_then(Value::as_u64).unwrap_or(0);
    if (REVENUE_RANGE.0..=REVENUE_RANGE.1).contains(&revenue) {
        score += weights.revenue;
    }

    let role = lead
        .get("role")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_lowercase();
    if PREFERRED_ROLES
        .iter()
        .any(|preferred| role.contains(&preferred.to_lowercase()))
    {
        score += weights.role_match;
    }

    let technologies = lead
        .get("technologies")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if technologies
        .iter()
        .filter_map(Value::as_str)
        .any(|tech| DESIRED_TECHNOLOGIES.contains(&tech))
    {
        score += weights.tech_stack_match;
    }

    score
}

impl Agent for ScoringAgent {
    fn name(&self) -> &'static str {
        "ScoringAgent"
    }

    fn execute(&self, inputs: &Value, config: &PipelineConfig) -> Result<AgentResult, AgentError> {
        let leads = input_array(inputs, "enriched_leads");
        let mut scored: Vec<(f64, Value)> = Vec::with_capacity(leads.len());
        for lead in leads {
            let score = score_lead(&lead, &config.scoring);
            let mut record = lead.as_object().cloned().unwrap_or_default();
            record.insert("score".to_string(), json!(score));
            scored.push((score, Value::Object(record)));
        }
        // Stable sort: equal scores keep their input order.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        let ranked: Vec<Value> = scored.into_iter().map(|(_, lead)| lead).collect();
        Ok(AgentResult::fresh(json!({"ranked_leads": ranked})))
    }
}
