use super::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub steps: Vec<StepConfig>,
    #[serde(default)]
    pub config: PipelineConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepConfig {
    pub id: String,
    pub agent: String,
    #[serde(default = "empty_inputs")]
    pub inputs: Value,
}

fn empty_inputs() -> Value {
    Value::Object(Map::new())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PipelineConfig {
    #[serde(default)]
    pub scoring: ScoringWeights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    #[serde(default = "default_employee_count_weight")]
    pub employee_count: f64,
    #[serde(default = "default_revenue_weight")]
    pub revenue: f64,
    #[serde(default = "default_role_match_weight")]
    pub role_match: f64,
    #[serde(default = "default_tech_stack_match_weight")]
    pub tech_stack_match: f64,
}

fn default_employee_count_weight() -> f64 {
    0.3
}

fn default_revenue_weight() -> f64 {
    0.3
}

fn default_role_match_weight() -> f64 {
    0.2
}

fn default_tech_stack_match_weight() -> f64 {
    0.2
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            employee_count: default_employee_count_weight(),
            revenue: default_revenue_weight(),
            role_match: default_role_match_weight(),
            tech_stack_match: default_tech_stack_match_weight(),
        }
    }
}

impl WorkflowDefinition {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
            serde_json::from_str(&raw).map_err(|source| ConfigError::ParseJson {
                path: path.display().to_string(),
                source,
            })
        } else {
            serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen_ids = HashSet::new();
        for step in &self.steps {
            validate_identifier("step id", &step.id)?;
            if step.agent.trim().is_empty() {
                return Err(ConfigError::Workflow(format!(
                    "step `{}` must declare a non-empty agent",
                    step.id
                )));
            }
            if !seen_ids.insert(step.id.as_str()) {
                return Err(ConfigError::Workflow(format!(
                    "duplicate step id `{}`",
                    step.id
                )));
            }
        }
        Ok(())
    }
}

fn validate_identifier(kind: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Workflow(format!("{kind} must be non-empty")));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ConfigError::Workflow(format!(
            "{kind} `{value}` may only contain alphanumerics, `_`, and `-`"
        )));
    }
    Ok(())
}

pub fn load_workflow_definition(path: &Path) -> Result<WorkflowDefinition, ConfigError> {
    let workflow = WorkflowDefinition::from_path(path)?;
    workflow.validate()?;
    Ok(workflow)
}
