use crate::orchestration::error::OrchestratorError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const OUTPUT_KEY: &str = "output";

/// Run-scoped record of every completed step's result, keyed by step id.
/// Entries are written at most once, immediately after a step completes,
/// and are never mutated afterward. The engine owns the store; steps only
/// ever see a shared borrow of it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputStore {
    entries: BTreeMap<String, Value>,
}

impl OutputStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completed step's output under `{"output": ...}`. A second
    /// write for the same step id is a contract violation.
    pub fn record(&mut self, step_id: &str, output: Value) -> Result<(), OrchestratorError> {
        if self.entries.contains_key(step_id) {
            return Err(OrchestratorError::DuplicateStepOutput {
                step_id: step_id.to_string(),
            });
        }
        let mut entry = Map::new();
        entry.insert(OUTPUT_KEY.to_string(), output);
        self.entries.insert(step_id.to_string(), Value::Object(entry));
        Ok(())
    }

    /// The full `{"output": ...}` record for a step, if it has completed.
    pub fn entry(&self, step_id: &str) -> Option<&Value> {
        self.entries.get(step_id)
    }

    /// The inner output value for a step, if it has completed.
    pub fn output(&self, step_id: &str) -> Option<&Value> {
        self.entries.get(step_id).and_then(|entry| entry.get(OUTPUT_KEY))
    }

    pub fn contains(&self, step_id: &str) -> bool {
        self.entries.contains_key(step_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn step_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Renders the whole store as one mapping, step id -> record.
    pub fn to_value(&self) -> Value {
        Value::Object(Map::from_iter(
            self.entries
                .iter()
                .map(|(step_id, entry)| (step_id.clone(), entry.clone())),
        ))
    }
}
