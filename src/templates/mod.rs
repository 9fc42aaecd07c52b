pub mod workflow_defaults;

pub use workflow_defaults::{starter_workflow_yaml, DEFAULT_WORKFLOW_FILE_NAME};
