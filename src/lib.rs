pub mod agents;
pub mod commands;
pub mod config;
pub mod orchestration;
pub mod shared;
pub mod templates;
