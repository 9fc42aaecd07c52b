#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("step `{step_id}` wrote its output more than once")]
    DuplicateStepOutput { step_id: String },
    #[error("step execution failed for step `{step_id}`: {reason}")]
    StepExecution { step_id: String, reason: String },
}
