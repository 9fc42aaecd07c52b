use super::{api_base_from_env, input_array, Agent, AgentError, AgentResult};
use crate::config::{Credentials, PipelineConfig};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_PDL_API_BASE: &str = "https://api.peopledatalabs.com";
const ENRICH_PATH: &str = "v5/person/enrich";

/// Enriches lead records with role and technology data from People Data
/// Labs. A per-record provider failure yields a degraded record with
/// placeholder fields; records are never omitted.
#[derive(Debug, Clone)]
pub struct DataEnrichmentAgent {
    api_base: String,
    api_key: Option<String>,
    request_pause: Duration,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct PersonEnrichment {
    #[serde(default)]
    job_title: Option<String>,
    #[serde(default)]
    tech: Vec<String>,
}

impl DataEnrichmentAgent {
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            api_base: api_base_from_env("LEADFLOW_PDL_API_BASE", DEFAULT_PDL_API_BASE),
            api_key: credentials.pdl_api_key.clone(),
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

    fn enrich_lead(&self, lead: &Value) -> Result<PersonEnrichment, String> {
        let email = lead.get("email").and_then(Value::as_str).unwrap_or_default();
        let company = lead
            .get("company")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let query = [
            ("email", email),
            ("company", company),
            ("api_key", self.api_key.as_deref().unwrap_or_default()),
        ]
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
        let url = format!(
            "{}/{ENRICH_PATH}?{query}",
            self.api_base.trim_end_matches('/')
        );

        let response = ureq::get(&url).call().map_err(|e| e.to_string())?;
        response
            .into_json::<PersonEnrichment>()
            .map_err(|e| e.to_string())
    }
}

/// Augments the incoming lead record in place; identity fields such as
/// `email` and `linkedin` pass through untouched.
fn enriched_record(lead: &Value, enrichment: Option<PersonEnrichment>) -> Value {
    let mut record = lead.as_object().cloned().unwrap_or_default();
    let enrichment = enrichment.unwrap_or_default();
    if let Some(contact) = record.get("contact_name").cloned() {
        record.entry("contact".to_string()).or_insert(contact);
    }
    record.insert(
        "role".to_string(),
        Value::String(enrichment.job_title.unwrap_or_else(|| "N/A".to_string())),
    );
    record.insert("technologies".to_string(), json!(enrichment.tech));
    Value::Object(record)
}

impl Agent for DataEnrichmentAgent {
    fn name(&self) -> &'static str {
        "DataEnrichmentAgent"
    }

    fn execute(
        &self,
        inputs: &Value,
        _config: &PipelineConfig,
    ) -> Result<AgentResult, AgentError> {
        let leads = input_array(inputs, "leads");
        let mut degraded = false;
        let mut enriched_leads = Vec::with_capacity(leads.len());
        for lead in &leads {
            match self.enrich_lead(lead) {
                Ok(enrichment) => enriched_leads.push(enriched_record(lead, Some(enrichment))),
                Err(err) => {
                    eprintln!(
                        "[DataEnrichmentAgent] enrichment failed for {}: {err}",
                        lead.get("email").and_then(Value::as_str).unwrap_or("<no email>")
                    );
                    degraded = true;
                    enriched_leads.push(enriched_record(lead, None));
                }
            }
            // Advisory provider rate limiting only.
            std::thread::sleep(self.request_pause);
        }

        let value = json!({"enriched_leads": enriched_leads});
        Ok(if degraded {
            AgentResult::degraded(value)
        } else {
            AgentResult::fresh(value)
        })
    }
}
