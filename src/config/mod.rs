pub mod credentials;
pub mod error;
pub mod workflow_file;

pub use credentials::Credentials;
pub use error::ConfigError;
pub use workflow_file::{
    load_workflow_definition, PipelineConfig, ScoringWeights, StepConfig, WorkflowDefinition,
};
