use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const SYSTEM_ACTOR: &str = "SYSTEM";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Applied,
    PolicyChecked,
    AiScored,
    Shortlisted,
    Rejected,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Applied => "APPLIED",
            AuditAction::PolicyChecked => "POLICY_CHECKED",
            AuditAction::AiScored => "AI_SCORED",
            AuditAction::Shortlisted => "SHORTLISTED",
            AuditAction::Rejected => "REJECTED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyOutcome {
    Passed,
    Failed,
}

impl PolicyOutcome {
    pub fn from_passed(passed: bool) -> Self {
        if passed {
            PolicyOutcome::Passed
        } else {
            PolicyOutcome::Failed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyOutcome::Passed => "PASSED",
            PolicyOutcome::Failed => "FAILED",
        }
    }
}

/// One immutable decision-log entry. Never mutated after it is appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub candidate_id: String,
    pub drive_id: String,
    pub action: AuditAction,
    pub policy_check: Option<PolicyOutcome>,
    pub policy_details: Value,
    pub ai_score: Option<f64>,
    pub missing_skills: Vec<String>,
    pub final_decision: Option<String>,
    pub reasoning: Option<String>,
    pub actor: String,
}

impl AuditRecord {
    /// Starts a record stamped with a fresh id and the current time, attributed to the system.
    pub fn new(candidate_id: &str, drive_id: &str, action: AuditAction) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            candidate_id: candidate_id.to_string(),
            drive_id: drive_id.to_string(),
            action,
            policy_check: None,
            policy_details: Value::Object(Default::default()),
            ai_score: None,
            missing_skills: vec![],
            final_decision: None,
            reasoning: None,
            actor: SYSTEM_ACTOR.to_string(),
        }
    }

    pub fn with_policy(mut self, outcome: PolicyOutcome, details: Value) -> Self {
        self.policy_check = Some(outcome);
        self.policy_details = details;
        self
    }

    pub fn with_score(mut self, ai_score: f64, missing_skills: Vec<String>) -> Self {
        self.ai_score = Some(ai_score);
        self.missing_skills = missing_skills;
        self
    }

    pub fn with_decision(mut self, decision: &str) -> Self {
        self.final_decision = Some(decision.to_string());
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    pub fn with_actor(mut self, actor: &str) -> Self {
        self.actor = actor.to_string();
        self
    }
}
