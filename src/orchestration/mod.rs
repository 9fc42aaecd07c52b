pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod output_store;
pub mod registry;
pub mod resolver;

pub use dispatcher::{execute_step, StepOutcome};
pub use engine::{PipelineEngine, PipelineRunReport, StepReport, StepStatus};
pub use error::OrchestratorError;
pub use output_store::{OutputStore, OUTPUT_KEY};
pub use registry::AgentRegistry;
pub use resolver::resolve;
