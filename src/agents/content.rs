use super::{api_base_from_env, input_array, input_str, Agent, AgentError, AgentResult};
use crate::config::{Credentials, PipelineConfig};
use serde::Deserialize;
use serde_json::{json, Value};

const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const FALLBACK_EMAIL_BODY: &str = "Could not generate email.";

/// Generates one personalized outreach email per ranked lead via the OpenAI
/// chat-completions endpoint. Generation failure yields a fixed sentinel
/// body; leads are never omitted.
#[derive(Debug, Clone)]
pub struct OutreachContentAgent {
    api_base: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ChatChoice {
    #[serde(default)]
    message: ChatMessage,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

impl OutreachContentAgent {
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            api_base: api_base_from_env("LEADFLOW_OPENAI_API_BASE", DEFAULT_OPENAI_API_BASE),
            api_key: credentials.openai_api_key.clone(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: String) -> Self {
        self.api_base = api_base;
        self
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    fn generate_email(&self, lead: &Value, persona: &str, tone: &str) -> Result<String, String> {
        let url = format!(
            "{}/v1/chat/completions",
            self.api_base.trim_end_matches('/')
        );
        let token = self.api_key.as_deref().unwrap_or_default();
        let response = ureq::post(&url)
            .set("Authorization", &format!("Bearer {token}"))
            .send_json(json!({
                "model": self.model,
                "messages": [{"role": "user", "content": email_prompt(lead, persona, tone)}],
                "temperature": 0.7,
                "max_tokens": 250,
            }))
            .map_err(|e| e.to_string())?;
        let completion = response
            .into_json::<ChatCompletion>()
            .map_err(|e| e.to_string())?;
        completion
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| "completion returned no choices".to_string())
    }
}

fn email_prompt(lead: &Value, persona: &str, tone: &str) -> String {
    let technologies = lead
        .get("technologies")
        .and_then(Value::as_array)
        .map(|techs| {
            techs
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();
    format!(
        "You are a {persona} writing a {tone} outreach email.\n\n\
Lead details:\n\
- Name: {name}\n\
- Company: {company}\n\
- Role: {role}\n\
- Technologies: {technologies}\n\n\
Write a concise, personalized email introducing your company, and suggest a next step for a call or demo.",
        name = lead.get("contact").and_then(Value::as_str).unwrap_or_default(),
        company = lead.get("company").and_then(Value::as_str).unwrap_or_default(),
        role = lead.get("role").and_then(Value::as_str).unwrap_or_default(),
    )
}

impl Agent for OutreachContentAgent {
    fn name(&self) -> &'static str {
        "OutreachContentAgent"
    }

    fn execute(
        &self,
        inputs: &Value,
        _config: &PipelineConfig,
    ) -> Result<AgentResult, AgentError> {
        let ranked_leads = input_array(inputs, "ranked_leads");
        let persona = input_str(inputs, "persona", "SDR");
        let tone = input_str(inputs, "tone", "friendly");

        let mut degraded = false;
        let mut messages = Vec::with_capacity(ranked_leads.len());
        for lead in &ranked_leads {
            let email_body = match self.generate_email(lead, persona, tone) {
                Ok(body) => body,
                Err(err) => {
                    eprintln!("[OutreachContentAgent] generation failed: {err}");
                    degraded = true;
                    FALLBACK_EMAIL_BODY.to_string()
                }
            };
            messages.push(json!({
                "lead": lead.get("email").cloned().unwrap_or(Value::Null),
                "email_body": email_body,
            }));
        }

        let value = json!({"messages": messages});
        Ok(if degraded {
            AgentResult::degraded(value)
        } else {
            AgentResult::fresh(value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prompt_carries_lead_details_and_parameters() {
        let lead = json!({
            "contact": "John Doe",
            "company": "Acme Corp",
            "role": "CTO",
            "technologies": ["Python", "AWS"],
        });
        let prompt = email_prompt(&lead, "SDR", "friendly");
        assert!(prompt.contains("You are a SDR writing a friendly outreach email."));
        assert!(prompt.contains("- Name: John Doe"));
        assert!(prompt.contains("- Company: Acme Corp"));
        assert!(prompt.contains("- Technologies: Python, AWS"));
    }

    #[test]
    fn generation_failure_yields_sentinel_message_per_lead() {
        let agent = OutreachContentAgent::new(&Credentials::default())
            .with_api_base("http://127.0.0.1:9".to_string());
        let inputs = json!({"ranked_leads": [
            {"email": "john@acme.com", "contact": "John Doe", "company": "Acme Corp"},
            {"email": "jane@beta.com", "contact": "Jane Smith", "company": "Beta Inc"},
        ]});
        let result = agent
            .execute(&inputs, &PipelineConfig::default())
            .expect("execute");
        assert!(result.is_degraded());
        let messages = result.value["messages"].as_array().expect("messages");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["lead"], json!("john@acme.com"));
        assert_eq!(messages[0]["email_body"], json!(FALLBACK_EMAIL_BODY));
        assert_eq!(messages[1]["lead"], json!("jane@beta.com"));
    }

    #[test]
    fn persona_and_tone_default_when_absent() {
        let prompt = email_prompt(&json!({}), "SDR", "friendly");
        assert!(prompt.starts_with("You are a SDR writing a friendly"));
    }
}
