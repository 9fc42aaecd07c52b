use super::{api_base_from_env, input_array, input_str, Agent, AgentError, AgentResult};
use crate::config::{Credentials, PipelineConfig};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

const DEFAULT_APOLLO_API_BASE: &str = "https://api.apollo.io";
const SEND_PATH: &str = "v1/campaigns/send_email";
const DEFAULT_SUBJECT: &str = "Quick Introduction";

/// Sends generated outreach emails through the Apollo campaign API and
/// reports per-message delivery status.
#[derive(Debug, Clone)]
pub struct OutreachExecutorAgent {
    api_base: String,
    api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct SendEmailResponse {
    #[serde(default)]
    campaign_id: Option<String>,
}

impl OutreachExecutorAgent {
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            api_base: api_base_from_env("LEADFLOW_APOLLO_API_BASE", DEFAULT_APOLLO_API_BASE),
            api_key: credentials.apollo_api_key.clone(),
        }
    }

    pub fn with_api_base(mut self, api_base: String) -> Self {
        self.api_base = api_base;
        self
    }

    fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<SendEmailResponse, String> {
        let url = format!("{}/{SEND_PATH}", self.api_base.trim_end_matches('/'));
        let token = self.api_key.as_deref().unwrap_or_default();
        let response = ureq::post(&url)
            .set("Authorization", &format!("Bearer {token}"))
            .send_json(json!({"to": to, "subject": subject, "body": body}))
            .map_err(|e| e.to_string())?;
        response
            .into_json::<SendEmailResponse>()
            .map_err(|e| e.to_string())
    }
}

impl Agent for OutreachExecutorAgent {
    fn name(&self) -> &'static str {
        "OutreachExecutorAgent"
    }

    fn execute(
        &self,
        inputs: &Value,
        _config: &PipelineConfig,
    ) -> Result<AgentResult, AgentError> {
        let messages = input_array(inputs, "messages");
        let subject = input_str(inputs, "subject", DEFAULT_SUBJECT);

        let mut degraded = false;
        let mut sent_status = Vec::with_capacity(messages.len());
        for message in &messages {
            let lead = message.get("lead").and_then(Value::as_str).unwrap_or_default();
            let body = message
                .get("email_body")
                .and_then(Value::as_str)
                .unwrap_or_default();
            match self.send_email(lead, subject, body) {
                Ok(response) => sent_status.push(json!({
                    "lead": lead,
                    "status": "sent",
                    "campaign_id": response.campaign_id,
                    "sent_at": Utc::now().to_rfc3339(),
                })),
                Err(err) => {
                    eprintln!("[OutreachExecutorAgent] send failed for {lead}: {err}");
                    degraded = true;
                    sent_status.push(json!({
                        "lead": lead,
                        "status": "failed",
                        "error": err,
                    }));
                }
            }
        }

        let value = json!({"sent_status": sent_status});
        Ok(if degraded {
            AgentResult::degraded(value)
        } else {
            AgentResult::fresh(value)
        })
    }
}
