pub const DEFAULT_WORKFLOW_FILE_NAME: &str = "workflow.yaml";

/// The canonical seven-step lead-generation pipeline written by
/// `leadflow init`. Placeholder expressions wire each step to the output
/// of the step before it.
pub fn starter_workflow_yaml() -> &'static str {
    r#"config:
  scoring:
    employee_count: 0.3
    revenue: 0.3
    role_match: 0.2
    tech_stack_match: 0.2
steps:
  - id: prospect_search
    agent: ProspectSearchAgent
    inputs:
      icp:
        industry: SaaS
        location: USA
        employee_count:
          min: 100
          max: 1000
        revenue:
          min: 20000000
          max: 200000000
      signals: [recent_funding, hiring_for_sales]
  - id: enrichment
    agent: DataEnrichmentAgent
    inputs:
      leads: "{{prospect_search.output.leads}}"
  - id: scoring
    agent: ScoringAgent
    inputs:
      enriched_leads: "{{enrichment.output.enriched_leads}}"
  - id: content
    agent: OutreachContentAgent
    inputs:
      ranked_leads: "{{scoring.output.ranked_leads}}"
      persona: SDR
      tone: friendly
  - id: outreach
    agent: OutreachExecutorAgent
    inputs:
      messages: "{{content.output.messages}}"
  - id: tracking
    agent: ResponseTrackerAgent
    inputs:
      campaign_ids: "{{outreach.output.sent_status}}"
  - id: feedback
    agent: FeedbackTrainerAgent
    inputs:
      responses: "{{tracking.output.responses}}"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkflowDefinition;

    #[test]
    fn starter_workflow_parses_and_validates() {
        let workflow: WorkflowDefinition =
            serde_yaml::from_str(starter_workflow_yaml()).expect("parse starter workflow");
        workflow.validate().expect("validate starter workflow");
        assert_eq!(workflow.steps.len(), 7);
        assert_eq!(workflow.steps[0].agent, "ProspectSearchAgent");
        assert_eq!(workflow.steps[6].agent, "FeedbackTrainerAgent");
    }

    #[test]
    fn starter_workflow_steps_chain_via_placeholders() {
        let workflow: WorkflowDefinition =
            serde_yaml::from_str(starter_workflow_yaml()).expect("parse starter workflow");
        assert_eq!(
            workflow.steps[1].inputs["leads"],
            serde_json::json!("{{prospect_search.output.leads}}")
        );
        assert_eq!(
            workflow.steps[6].inputs["responses"],
            serde_json::json!("{{tracking.output.responses}}")
        );
    }
}
