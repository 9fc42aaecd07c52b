use leadflow::agents::{Agent, AgentError, AgentOutcome, AgentResult};
use leadflow::config::{PipelineConfig, WorkflowDefinition};
use leadflow::orchestration::{AgentRegistry, PipelineEngine, StepStatus};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
struct RecordingAgent {
    name: &'static str,
    calls: Arc<Mutex<Vec<(String, Value)>>>,
    result: Value,
}

impl RecordingAgent {
    fn new(name: &'static str, calls: Arc<Mutex<Vec<(String, Value)>>>, result: Value) -> Self {
        Self {
            name,
            calls,
            result,
        }
    }
}

impl Agent for RecordingAgent {
    fn name(&self) -> &'static str {
        self.name
    }

    fn execute(
        &self,
        inputs: &Value,
        _config: &PipelineConfig,
    ) -> Result<AgentResult, AgentError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((self.name.to_string(), inputs.clone()));
        Ok(AgentResult::fresh(self.result.clone()))
    }
}

struct FailingAgent;

impl Agent for FailingAgent {
    fn name(&self) -> &'static str {
        "FailingAgent"
    }

    fn execute(
        &self,
        _inputs: &Value,
        _config: &PipelineConfig,
    ) -> Result<AgentResult, AgentError> {
        let err = serde_json::from_str::<Value>("not json").expect_err("invalid json");
        Err(AgentError::Encode(err))
    }
}

struct DegradedAgent;

impl Agent for DegradedAgent {
    fn name(&self) -> &'static str {
        "DegradedAgent"
    }

    fn execute(
        &self,
        _inputs: &Value,
        _config: &PipelineConfig,
    ) -> Result<AgentResult, AgentError> {
        Ok(AgentResult::degraded(json!({"leads": []})))
    }
}

fn registry_with_recorders(
    calls: &Arc<Mutex<Vec<(String, Value)>>>,
) -> AgentRegistry {
    let mut registry = AgentRegistry::new();
    for name in ["AlphaAgent", "BetaAgent", "GammaAgent"] {
        registry.register(Box::new(RecordingAgent::new(
            name,
            Arc::clone(calls),
            json!({"from": name}),
        )));
    }
    registry
}

fn workflow(yaml: &str) -> WorkflowDefinition {
    serde_yaml::from_str(yaml).expect("parse workflow")
}

#[test]
fn engine_executes_steps_in_declared_order() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let engine = PipelineEngine::new(registry_with_recorders(&calls));
    let report = engine
        .run_all(&workflow(
            r#"
steps:
  - id: first
    agent: AlphaAgent
  - id: second
    agent: BetaAgent
  - id: third
    agent: GammaAgent
"#,
        ))
        .expect("run");

    let order: Vec<String> = calls
        .lock()
        .expect("calls lock")
        .iter()
        .map(|(name, _)| name.clone())
        .collect();
    assert_eq!(order, vec!["AlphaAgent", "BetaAgent", "GammaAgent"]);
    assert_eq!(report.outputs.len(), 3);
}

#[test]
fn reordering_the_declaration_reorders_execution_identically() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let engine = PipelineEngine::new(registry_with_recorders(&calls));
    engine
        .run_all(&workflow(
            r#"
steps:
  - id: third
    agent: GammaAgent
  - id: first
    agent: AlphaAgent
  - id: second
    agent: BetaAgent
"#,
        ))
        .expect("run");

    let order: Vec<String> = calls
        .lock()
        .expect("calls lock")
        .iter()
        .map(|(name, _)| name.clone())
        .collect();
    assert_eq!(order, vec!["GammaAgent", "AlphaAgent", "BetaAgent"]);
}

#[test]
fn later_step_receives_earlier_step_output_through_placeholders() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let engine = PipelineEngine::new(registry_with_recorders(&calls));
    let report = engine
        .run_all(&workflow(
            r#"
steps:
  - id: a
    agent: AlphaAgent
  - id: b
    agent: BetaAgent
    inputs:
      wired: "{{a.output}}"
"#,
        ))
        .expect("run");

    assert!(report.outputs.contains("a"));
    assert!(report.outputs.contains("b"));
    let recorded = calls.lock().expect("calls lock");
    let (_, beta_inputs) = &recorded[1];
    assert_eq!(
        beta_inputs,
        &json!({"wired": {"from": "AlphaAgent"}}),
    );
    assert_eq!(
        beta_inputs["wired"],
        report.outputs.output("a").expect("a output").clone()
    );
}

#[test]
fn unknown_agent_is_skipped_and_the_run_continues() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let engine = PipelineEngine::new(registry_with_recorders(&calls));
    let report = engine
        .run_all(&workflow(
            r#"
steps:
  - id: a
    agent: AlphaAgent
  - id: mystery
    agent: UnregisteredAgent
  - id: c
    agent: GammaAgent
"#,
        ))
        .expect("run");

    assert!(report.outputs.contains("a"));
    assert!(!report.outputs.contains("mystery"));
    assert!(report.outputs.contains("c"));
    assert_eq!(report.steps.len(), 3);
    match &report.steps[1].status {
        StepStatus::Skipped { reason } => assert!(reason.contains("UnregisteredAgent")),
        other => panic!("unexpected status: {other:?}"),
    }
    assert_eq!(
        report.steps[2].status,
        StepStatus::Completed {
            outcome: AgentOutcome::Fresh
        }
    );
}

#[test]
fn forward_references_degrade_to_empty_mapping() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let engine = PipelineEngine::new(registry_with_recorders(&calls));
    engine
        .run_all(&workflow(
            r#"
steps:
  - id: early
    agent: AlphaAgent
    inputs:
      premature: "{{late.output}}"
  - id: late
    agent: BetaAgent
"#,
        ))
        .expect("run");

    let recorded = calls.lock().expect("calls lock");
    let (_, alpha_inputs) = &recorded[0];
    assert_eq!(alpha_inputs, &json!({"premature": {}}));
}

#[test]
fn degraded_step_completes_and_is_tagged_in_the_report() {
    let mut registry = AgentRegistry::new();
    registry.register(Box::new(DegradedAgent));
    let engine = PipelineEngine::new(registry);
    let report = engine
        .run_all(&workflow(
            r#"
steps:
  - id: search
    agent: DegradedAgent
"#,
        ))
        .expect("run");

    assert_eq!(
        report.steps[0].status,
        StepStatus::Completed {
            outcome: AgentOutcome::Degraded
        }
    );
    // Degraded values are recorded exactly like fresh ones.
    assert_eq!(
        report.outputs.output("search"),
        Some(&json!({"leads": []}))
    );
}

#[test]
fn error_escaping_an_agent_is_fatal_to_the_run() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut registry = registry_with_recorders(&calls);
    registry.register(Box::new(FailingAgent));
    let engine = PipelineEngine::new(registry);
    let err = engine
        .run_all(&workflow(
            r#"
steps:
  - id: a
    agent: AlphaAgent
  - id: boom
    agent: FailingAgent
  - id: c
    agent: GammaAgent
"#,
        ))
        .expect_err("run must fail");

    assert!(err.to_string().contains("boom"));
    // No step after the failure executed.
    let order: Vec<String> = calls
        .lock()
        .expect("calls lock")
        .iter()
        .map(|(name, _)| name.clone())
        .collect();
    assert_eq!(order, vec!["AlphaAgent"]);
}

#[test]
fn engine_appends_run_log_lines_under_the_log_root() {
    let temp = tempfile::tempdir().expect("temp dir");
    let calls = Arc::new(Mutex::new(Vec::new()));
    let engine = PipelineEngine::new(registry_with_recorders(&calls))
        .with_log_root(temp.path().to_path_buf());
    engine
        .run_all(&workflow(
            r#"
steps:
  - id: only
    agent: AlphaAgent
"#,
        ))
        .expect("run");

    let log = std::fs::read_to_string(temp.path().join("logs/pipeline.log")).expect("read log");
    assert!(log.contains("step_id=only agent=AlphaAgent decision=execute"));
    assert!(log.contains("transition=completed outcome=fresh"));
}
