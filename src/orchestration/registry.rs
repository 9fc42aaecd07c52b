use crate::agents::{
    Agent, DataEnrichmentAgent, FeedbackTrainerAgent, OutreachContentAgent, OutreachExecutorAgent,
    ProspectSearchAgent, ResponseTrackerAgent, ScoringAgent,
};
use crate::config::Credentials;
use std::collections::BTreeMap;

/// Static table from a step's declared agent name to its implementation.
/// Built once at startup; there is no runtime registration.
#[derive(Default)]
pub struct AgentRegistry {
    agents: BTreeMap<String, Box<dyn Agent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The seven pipeline agents, wired from environment credentials.
    pub fn builtin(credentials: &Credentials) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ProspectSearchAgent::new(credentials)));
        registry.register(Box::new(DataEnrichmentAgent::new(credentials)));
        registry.register(Box::new(ScoringAgent::new()));
        registry.register(Box::new(OutreachContentAgent::new(credentials)));
        registry.register(Box::new(OutreachExecutorAgent::new(credentials)));
        registry.register(Box::new(ResponseTrackerAgent::new(credentials)));
        registry.register(Box::new(FeedbackTrainerAgent::new()));
        registry
    }

    pub fn register(&mut self, agent: Box<dyn Agent>) {
        self.agents.insert(agent.name().to_string(), agent);
    }

    pub fn lookup(&self, agent_name: &str) -> Option<&dyn Agent> {
        self.agents.get(agent_name).map(Box::as_ref)
    }

    pub fn agent_names(&self) -> impl Iterator<Item = &str> {
        self.agents.keys().map(String::as_str)
    }
}
