use super::{api_base_from_env, Agent, AgentError, AgentResult};
use crate::config::{Credentials, PipelineConfig};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_APOLLO_API_BASE: &str = "https://api.apollo.io";
const RESPONSES_PATH: &str = "v1/campaigns/responses";

/// Fetches open/click/reply/meeting events for sent campaigns and flattens
/// them into one event sequence.
#[derive(Debug, Clone)]
pub struct ResponseTrackerAgent {
    api_base: String,
    api_key: Option<String>,
    request_pause: Duration,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct CampaignResponses {
    #[serde(default)]
    results: Vec<CampaignEvent>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct CampaignEvent {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    opened: bool,
    #[serde(default)]
    clicked: bool,
    #[serde(default)]
    replied: bool,
    #[serde(default)]
    meeting_booked: bool,
    #[serde(default)]
    timestamp: Option<String>,
}

impl ResponseTrackerAgent {
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            api_base: api_base_from_env("LEADFLOW_APOLLO_API_BASE", DEFAULT_APOLLO_API_BASE),
            api_key: credentials.apollo_api_key.clone(),
            request_pause: Duration::from_millis(500),
        }
    }

    pub fn with_api_base(mut self, api_base: String) -> Self {
        self.api_base = api_base;
        self
    }

    pub fn with_request_pause(mut self, request_pause: Duration) -> Self {
        self.request_pause = request_pause;
        self
    }

    fn campaign_responses(&self, campaign_id: &str) -> Result<Vec<Value>, String> {
        let url = format!(
            "{}/{RESPONSES_PATH}?campaign_id={}",
            self.api_base.trim_end_matches('/'),
            urlencoding::encode(campaign_id)
        );
        let token = self.api_key.as_deref().unwrap_or_default();
        let response = ureq::get(&url)
            .set("Authorization", &format!("Bearer {token}"))
            .call()
            .map_err(|e| e.to_string())?;
        let responses = response
            .into_json::<CampaignResponses>()
            .map_err(|e| e.to_string())?;
        Ok(responses
            .results
            .into_iter()
            .map(|event| {
                json!({
                    "lead": event.email,
                    "opened": event.opened,
                    "clicked": event.clicked,
                    "replied": event.replied,
                    "meeting_booked": event.meeting_booked,
                    "timestamp": event.timestamp,
                })
            })
            .collect())
    }
}

/// Accepts either plain id strings or records carrying a `campaign_id`
/// field (the shape the executor reports), under `campaign_ids` or the
/// legacy `campaign_id` key.
fn extract_campaign_ids(inputs: &Value) -> Vec<String> {
    let items = inputs
        .get("campaign_ids")
        .or_else(|| inputs.get("campaign_id"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(id) => Some(id.clone()),
            Value::Object(record) => record
                .get("campaign_id")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        })
        .filter(|id| !id.is_empty())
        .collect()
}

impl Agent for ResponseTrackerAgent {
    fn name(&self) -> &'static str {
        "ResponseTrackerAgent"
    }

    fn execute(
        &self,
        inputs: &Value,
        _config: &PipelineConfig,
    ) -> Result<AgentResult, AgentError> {
        let campaign_ids = extract_campaign_ids(inputs);
        let mut degraded = false;
        let mut responses = Vec::new();
        for campaign_id in &campaign_ids {
            match self.campaign_responses(campaign_id) {
                Ok(mut events) => responses.append(&mut events),
                Err(err) => {
                    eprintln!(
                        "[ResponseTrackerAgent] tracking failed for campaign {campaign_id}: {err}"
                    );
                    degraded = true;
                }
            }
            // Advisory provider rate limiting only.
            std::thread::sleep(self.request_pause);
        }

        let value = json!({"responses": responses});
        Ok(if degraded {
            AgentResult::degraded(value)
        } else {
            AgentResult::fresh(value)
        })
    }
}
