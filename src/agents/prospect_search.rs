use super::{api_base_from_env, Agent, AgentError, AgentResult};
use crate::config::{Credentials, PipelineConfig};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

const DEFAULT_CLAY_API_BASE: &str = "https://api.clay.com";
const DEFAULT_APOLLO_API_BASE: &str = "https://api.apollo.io";

/// Searches for B2B prospects matching an ICP plus buying signals against
/// Clay and Apollo, merging both result sets and deduplicating by email.
#[derive(Debug, Clone)]
pub struct ProspectSearchAgent {
    clay_api_base: String,
    apollo_api_base: String,
    clay_api_key: Option<String>,
    apollo_api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct SearchResults {
    #[serde(default)]
    results: Vec<ProviderLead>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ProviderLead {
    #[serde(default)]
    company_name: Option<String>,
    #[serde(default)]
    contact_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    linkedin: Option<String>,
    #[serde(default)]
    signal: Option<String>,
}

impl ProspectSearchAgent {
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            clay_api_base: api_base_from_env("LEADFLOW_CLAY_API_BASE", DEFAULT_CLAY_API_BASE),
            apollo_api_base: api_base_from_env("LEADFLOW_APOLLO_API_BASE", DEFAULT_APOLLO_API_BASE),
            clay_api_key: credentials.clay_api_key.clone(),
            apollo_api_key: credentials.apollo_api_key.clone(),
        }
    }

    pub fn with_api_bases(mut self, clay_api_base: String, apollo_api_base: String) -> Self {
        self.clay_api_base = clay_api_base;
        self.apollo_api_base = apollo_api_base;
        self
    }

    fn search_provider(
        &self,
        api_base: &str,
        path: &str,
        api_key: Option<&str>,
        icp: &Value,
        signals: &Value,
    ) -> Result<Vec<Value>, String> {
        let url = format!("{}/{}", api_base.trim_end_matches('/'), path);
        let token = api_key.unwrap_or_default();
        let response = ureq::post(&url)
            .set("Authorization", &format!("Bearer {token}"))
            .send_json(json!({"icp": icp, "signals": signals}))
            .map_err(|e| e.to_string())?;
        let results = response
            .into_json::<SearchResults>()
            .map_err(|e| e.to_string())?;
        Ok(results.results.into_iter().map(lead_record).collect())
    }
}

fn lead_record(lead: ProviderLead) -> Value {
    json!({
        "company": lead.company_name,
        "contact_name": lead.contact_name,
        "email": lead.email,
        "linkedin": lead.linkedin,
        "signal": lead.signal,
    })
}

/// First-seen email keeps its position; a later duplicate replaces the
/// record in place. Leads without an email key by the empty string.
fn dedupe_by_email(leads: Vec<Value>) -> Vec<Value> {
    let mut order: Vec<String> = Vec::new();
    let mut by_email: HashMap<String, Value> = HashMap::new();
    for lead in leads {
        let email = lead
            .get("email")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if !by_email.contains_key(&email) {
            order.push(email.clone());
        }
        by_email.insert(email, lead);
    }
    order
        .into_iter()
        .filter_map(|email| by_email.remove(&email))
        .collect()
}

impl Agent for ProspectSearchAgent {
    fn name(&self) -> &'static str {
        "ProspectSearchAgent"
    }

    fn execute(
        &self,
        inputs: &Value,
        _config: &PipelineConfig,
    ) -> Result<AgentResult, AgentError> {
        let icp = inputs
            .get("icp")
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        let signals = inputs
            .get("signals")
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()));

        let mut degraded = false;
        let mut combined = Vec::new();

        match self.search_provider(
            &self.clay_api_base,
            "search",
            self.clay_api_key.as_deref(),
            &icp,
            &signals,
        ) {
            Ok(mut leads) => combined.append(&mut leads),
            Err(err) => {
                eprintln!("[ProspectSearchAgent] clay search failed: {err}");
                degraded = true;
            }
        }
        match self.search_provider(
            &self.apollo_api_base,
            "v1/mixed_search",
            self.apollo_api_key.as_deref(),
            &icp,
            &signals,
        ) {
            Ok(mut leads) => combined.append(&mut leads),
            Err(err) => {
                eprintln!("[ProspectSearchAgent] apollo search failed: {err}");
                degraded = true;
            }
        }

        let leads = dedupe_by_email(combined);
        let value = json!({"leads": leads});
        Ok(if degraded {
            AgentResult::degraded(value)
        } else {
            AgentResult::fresh(value)
        })
    }
}
