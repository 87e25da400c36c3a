//! Screening pipeline: policy gateway first, fitness scoring only for eligible candidates.
//!
//! No embedding work happens for a candidate the gateway rejects.

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use crate::audit::{AuditQuery, AuditStore};
use crate::embedding::EmbeddingContext;
use crate::errors::AppError;
use crate::models::audit::{AuditAction, AuditRecord, PolicyOutcome};
use crate::models::candidate::Candidate;
use crate::models::drive::Drive;
use crate::screening::fitness::{compute_fitness, ScoreResult};
use crate::screening::policy_gateway::{evaluate, EligibilityResult};

pub const DECISION_ELIGIBLE: &str = "ELIGIBLE";
pub const DECISION_REJECTED: &str = "REJECTED";
pub const DECISION_SHORTLISTED: &str = "SHORTLISTED";

#[derive(Debug, Clone, Serialize)]
pub struct ScreeningOutcome {
    pub candidate_id: String,
    pub drive_id: String,
    pub eligibility: EligibilityResult,
    /// Present only when the candidate passed the policy gateway.
    pub score: Option<ScoreResult>,
    pub decision: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    pub rank: usize,
    pub candidate_id: String,
    pub name: String,
    pub score: ScoreResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct RejectedCandidate {
    pub candidate_id: String,
    pub name: String,
    pub failed_rules: Vec<String>,
    pub reasoning: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShortlistReport {
    pub drive_id: String,
    pub ranked: Vec<RankedCandidate>,
    pub rejected: Vec<RejectedCandidate>,
}

/// Runs the policy gateway alone and records the check.
pub fn check_eligibility(
    audit: &dyn AuditStore,
    candidate: &Candidate,
    drive: &Drive,
) -> Result<EligibilityResult, AppError> {
    let eligibility = evaluate(candidate, drive);
    record_policy_check(audit, candidate, drive, &eligibility)?;
    Ok(eligibility)
}

/// Runs both stages, appending POLICY_CHECKED and then either REJECTED or AI_SCORED.
pub async fn screen(
    embeddings: &EmbeddingContext,
    audit: &dyn AuditStore,
    candidate: &Candidate,
    drive: &Drive,
) -> Result<ScreeningOutcome, AppError> {
    let eligibility = evaluate(candidate, drive);
    let (outcome, policy_details) = record_policy_check(audit, candidate, drive, &eligibility)?;

    if !eligibility.passed {
        info!(
            "Candidate {} rejected for drive {}: {:?}",
            candidate.id, drive.id, eligibility.failed_rules
        );
        audit.append(
            AuditRecord::new(&candidate.id, &drive.id, AuditAction::Rejected)
                .with_policy(outcome, policy_details)
                .with_decision(DECISION_REJECTED)
                .with_reasoning(eligibility.reasoning.clone()),
        );
        return Ok(ScreeningOutcome {
            candidate_id: candidate.id.clone(),
            drive_id: drive.id.clone(),
            eligibility,
            score: None,
            decision: DECISION_REJECTED.to_string(),
        });
    }

    let score = compute_fitness(embeddings, candidate, drive).await;
    info!(
        "Candidate {} scored CRS {} for drive {}",
        candidate.id, score.crs_score, drive.id
    );
    audit.append(
        AuditRecord::new(&candidate.id, &drive.id, AuditAction::AiScored)
            .with_policy(outcome, policy_details)
            .with_score(score.crs_score, score.missing_skills.clone())
            .with_decision(DECISION_ELIGIBLE)
            .with_reasoning(format!(
                "CRS {} (semantic {}, project {}, completeness {}). Matched {} of {} required skills.",
                score.crs_score,
                score.semantic_score,
                score.project_score,
                score.completeness_score,
                score.matched_skills.len(),
                drive.required_skills.len()
            )),
    );

    Ok(ScreeningOutcome {
        candidate_id: candidate.id.clone(),
        drive_id: drive.id.clone(),
        eligibility,
        score: Some(score),
        decision: DECISION_ELIGIBLE.to_string(),
    })
}

fn record_policy_check(
    audit: &dyn AuditStore,
    candidate: &Candidate,
    drive: &Drive,
    eligibility: &EligibilityResult,
) -> Result<(PolicyOutcome, serde_json::Value), AppError> {
    let policy_details =
        serde_json::to_value(eligibility).context("Failed to serialize eligibility result")?;
    let outcome = PolicyOutcome::from_passed(eligibility.passed);

    audit.append(
        AuditRecord::new(&candidate.id, &drive.id, AuditAction::PolicyChecked)
            .with_policy(outcome, policy_details.clone())
            .with_reasoning(eligibility.reasoning.clone()),
    );
    Ok((outcome, policy_details))
}

/// Screens an application to an active drive and writes every step to the audit log.
pub async fn apply(
    embeddings: &EmbeddingContext,
    audit: &dyn AuditStore,
    candidate: &Candidate,
    drive: &Drive,
) -> Result<ScreeningOutcome, AppError> {
    if !drive.accepts_applications() {
        return Err(AppError::Validation(format!(
            "Drive {} is not accepting applications",
            drive.id
        )));
    }

    audit.append(
        AuditRecord::new(&candidate.id, &drive.id, AuditAction::Applied)
            .with_reasoning(format!("Applied to {} ({})", drive.company_name, drive.job_role)),
    );

    screen(embeddings, audit, candidate, drive).await
}

/// Screens every candidate and ranks the eligible ones by CRS, highest first.
/// Equal scores are ordered by candidate id.
pub async fn shortlist(
    embeddings: &EmbeddingContext,
    audit: &dyn AuditStore,
    drive: &Drive,
    candidates: &[Candidate],
) -> Result<ShortlistReport, AppError> {
    let mut scored = Vec::new();
    let mut rejected = Vec::new();

    for candidate in candidates {
        let outcome = screen(embeddings, audit, candidate, drive).await?;
        match outcome.score {
            Some(score) => scored.push((candidate, score)),
            None => rejected.push(RejectedCandidate {
                candidate_id: candidate.id.clone(),
                name: candidate.name.clone(),
                failed_rules: outcome.eligibility.failed_rules,
                reasoning: outcome.eligibility.reasoning,
            }),
        }
    }

    scored.sort_by(|(ca, a), (cb, b)| {
        b.crs_score
            .total_cmp(&a.crs_score)
            .then_with(|| ca.id.cmp(&cb.id))
    });

    let ranked = scored
        .into_iter()
        .enumerate()
        .map(|(i, (candidate, score))| RankedCandidate {
            rank: i + 1,
            candidate_id: candidate.id.clone(),
            name: candidate.name.clone(),
            score,
        })
        .collect();

    Ok(ShortlistReport {
        drive_id: drive.id.clone(),
        ranked,
        rejected,
    })
}

/// Records a human shortlisting decision.
///
/// Only a pair the screening already scored as eligible can be shortlisted.
pub fn approve(
    audit: &dyn AuditStore,
    candidate_id: &str,
    drive_id: &str,
    approved_by: &str,
) -> Result<AuditRecord, AppError> {
    let filter = AuditQuery {
        candidate_id: Some(candidate_id.to_string()),
        drive_id: Some(drive_id.to_string()),
        limit: None,
    };
    let scored_eligible = audit.query(&filter, usize::MAX).iter().any(|r| {
        r.action == AuditAction::AiScored && r.final_decision.as_deref() == Some(DECISION_ELIGIBLE)
    });
    if !scored_eligible {
        return Err(AppError::Validation(format!(
            "Candidate {candidate_id} has no eligible screening for drive {drive_id}"
        )));
    }

    let record = AuditRecord::new(candidate_id, drive_id, AuditAction::Shortlisted)
        .with_decision(DECISION_SHORTLISTED)
        .with_reasoning(format!("Shortlisted by {approved_by}"))
        .with_actor(approved_by);
    audit.append(record.clone());
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::InMemoryAuditStore;
    use crate::embedding::{EmbeddingBackend, EmbeddingError};
    use crate::models::drive::DriveStatus;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn tcs_drive() -> Drive {
        Drive {
            id: "DRIVE_TCS_2026".to_string(),
            company_name: "TCS".to_string(),
            job_role: "Software Developer".to_string(),
            jd_text: Some("Software developer with Python or Java, SQL databases and REST APIs".to_string()),
            required_skills: strings(&["Python", "Java", "SQL", "REST APIs", "Problem Solving"]),
            min_cgpa: Some(6.0),
            max_backlogs: Some(0),
            eligible_branches: strings(&["CSE", "IT", "ECE", "MCA"]),
            ..Default::default()
        }
    }

    fn make_candidate(id: &str, cgpa: f64, backlogs: u32, skills: &[&str]) -> Candidate {
        Candidate {
            id: id.to_string(),
            name: format!("Candidate {id}"),
            branch: "CSE".to_string(),
            cgpa,
            active_backlogs: backlogs,
            skills: strings(skills),
            ..Default::default()
        }
    }

    struct CountingBackend(AtomicUsize);

    #[async_trait]
    impl EmbeddingBackend for CountingBackend {
        fn name(&self) -> &str {
            "counting"
        }

        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, EmbeddingError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(texts.iter().map(|_| vec![1.0]).collect())
        }
    }

    #[tokio::test]
    async fn test_failed_gate_never_touches_embeddings() {
        let backend = Arc::new(CountingBackend(AtomicUsize::new(0)));
        let ctx = EmbeddingContext::new(Some(backend.clone()), Duration::from_secs(1));
        let candidate = make_candidate("STU_2024_0005", 6.8, 2, &["C++"]);

        let audit = InMemoryAuditStore::new();
        let outcome = screen(&ctx, &audit, &candidate, &tcs_drive()).await.unwrap();
        assert!(outcome.score.is_none());
        assert_eq!(outcome.decision, DECISION_REJECTED);
        assert_eq!(outcome.eligibility.failed_rules, vec!["Active Backlogs"]);
        assert_eq!(backend.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_apply_rejected_writes_policy_and_rejection() {
        let ctx = EmbeddingContext::fallback_only();
        let audit = InMemoryAuditStore::new();
        let candidate = make_candidate("STU_2024_0005", 6.8, 2, &["C++"]);

        let outcome = apply(&ctx, &audit, &candidate, &tcs_drive()).await.unwrap();
        assert_eq!(outcome.decision, DECISION_REJECTED);

        let records = audit.query(&AuditQuery::default(), 10);
        let actions: Vec<AuditAction> = records.iter().map(|r| r.action).collect();
        assert_eq!(actions.len(), 3);
        assert!(actions.contains(&AuditAction::Applied));
        assert!(actions.contains(&AuditAction::PolicyChecked));
        assert!(actions.contains(&AuditAction::Rejected));
        assert!(!actions.contains(&AuditAction::AiScored));

        let checked = records
            .iter()
            .find(|r| r.action == AuditAction::PolicyChecked)
            .unwrap();
        assert_eq!(checked.policy_check, Some(PolicyOutcome::Failed));
        assert_eq!(checked.policy_details["failed_rules"], serde_json::json!(["Active Backlogs"]));
    }

    #[tokio::test]
    async fn test_apply_eligible_writes_score() {
        let ctx = EmbeddingContext::fallback_only();
        let audit = InMemoryAuditStore::new();
        let candidate = make_candidate("STU_2024_0001", 8.7, 0, &["Python", "Java", "SQL"]);

        let outcome = apply(&ctx, &audit, &candidate, &tcs_drive()).await.unwrap();
        let score = outcome.score.unwrap();
        assert_eq!(outcome.decision, DECISION_ELIGIBLE);

        let records = audit.query(&AuditQuery::default(), 10);
        let scored = records
            .iter()
            .find(|r| r.action == AuditAction::AiScored)
            .unwrap();
        assert_eq!(scored.ai_score, Some(score.crs_score));
        assert_eq!(scored.missing_skills, strings(&["REST APIs", "Problem Solving"]));
        assert_eq!(scored.final_decision.as_deref(), Some(DECISION_ELIGIBLE));
        assert_eq!(scored.policy_check, Some(PolicyOutcome::Passed));
    }

    #[tokio::test]
    async fn test_apply_to_closed_drive_is_rejected_without_logging() {
        let ctx = EmbeddingContext::fallback_only();
        let audit = InMemoryAuditStore::new();
        let drive = Drive {
            status: DriveStatus::Closed,
            ..tcs_drive()
        };
        let candidate = make_candidate("STU_1", 9.0, 0, &[]);

        let result = apply(&ctx, &audit, &candidate, &drive).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(audit.query(&AuditQuery::default(), 10).is_empty());
    }

    #[tokio::test]
    async fn test_shortlist_ranks_by_crs_then_id() {
        let ctx = EmbeddingContext::fallback_only();
        let candidates = vec![
            make_candidate("STU_B", 8.0, 0, &["Python"]),
            make_candidate("STU_A", 8.0, 0, &["Python"]),
            make_candidate("STU_C", 9.0, 0, &["Python", "Java", "SQL", "REST APIs"]),
            make_candidate("STU_D", 5.0, 0, &["Python"]),
        ];

        let audit = InMemoryAuditStore::new();
        let report = shortlist(&ctx, &audit, &tcs_drive(), &candidates).await.unwrap();
        let order: Vec<&str> = report.ranked.iter().map(|r| r.candidate_id.as_str()).collect();
        assert_eq!(order, vec!["STU_C", "STU_A", "STU_B"]);
        assert_eq!(report.ranked[0].rank, 1);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].candidate_id, "STU_D");
        assert_eq!(report.rejected[0].failed_rules, vec!["Minimum CGPA"]);
    }

    #[tokio::test]
    async fn test_shortlist_records_every_evaluation() {
        let ctx = EmbeddingContext::fallback_only();
        let audit = InMemoryAuditStore::new();
        let candidates = vec![
            make_candidate("STU_A", 8.0, 0, &["Python"]),
            make_candidate("STU_D", 5.0, 0, &["Python"]),
        ];

        shortlist(&ctx, &audit, &tcs_drive(), &candidates).await.unwrap();

        let records = audit.query(&AuditQuery::default(), 100);
        assert_eq!(records.len(), 4);
        let actions_for = |id: &str| -> Vec<AuditAction> {
            records
                .iter()
                .filter(|r| r.candidate_id == id)
                .map(|r| r.action)
                .collect()
        };
        assert_eq!(
            actions_for("STU_A"),
            vec![AuditAction::AiScored, AuditAction::PolicyChecked]
        );
        assert_eq!(
            actions_for("STU_D"),
            vec![AuditAction::Rejected, AuditAction::PolicyChecked]
        );
    }

    #[test]
    fn test_check_eligibility_records_policy_check_only() {
        let audit = InMemoryAuditStore::new();
        let candidate = make_candidate("STU_1", 9.0, 0, &[]);

        let result = check_eligibility(&audit, &candidate, &tcs_drive()).unwrap();
        assert!(result.passed);

        let records = audit.query(&AuditQuery::default(), 10);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].action, AuditAction::PolicyChecked);
        assert_eq!(records[0].policy_check, Some(PolicyOutcome::Passed));
        assert!(records[0].final_decision.is_none());
    }

    #[tokio::test]
    async fn test_approve_records_actor() {
        let ctx = EmbeddingContext::fallback_only();
        let audit = InMemoryAuditStore::new();
        let candidate = make_candidate("STU_1", 9.0, 0, &["Python"]);
        apply(&ctx, &audit, &candidate, &tcs_drive()).await.unwrap();

        let record = approve(&audit, "STU_1", "DRIVE_TCS_2026", "TPO").unwrap();
        assert_eq!(record.action, AuditAction::Shortlisted);
        assert_eq!(record.actor, "TPO");
        assert_eq!(record.final_decision.as_deref(), Some(DECISION_SHORTLISTED));
        assert_eq!(audit.get(record.id).unwrap().actor, "TPO");
    }

    #[tokio::test]
    async fn test_approve_after_rejection_fails() {
        let ctx = EmbeddingContext::fallback_only();
        let audit = InMemoryAuditStore::new();
        let candidate = make_candidate("STU_2024_0005", 6.8, 2, &["C++"]);
        apply(&ctx, &audit, &candidate, &tcs_drive()).await.unwrap();

        let result = approve(&audit, "STU_2024_0005", "DRIVE_TCS_2026", "TPO");
        assert!(matches!(result, Err(AppError::Validation(_))));

        let actions: Vec<AuditAction> = audit
            .query(&AuditQuery::default(), 10)
            .iter()
            .map(|r| r.action)
            .collect();
        assert!(!actions.contains(&AuditAction::Shortlisted));
        assert_eq!(actions.len(), 3);
    }

    #[test]
    fn test_approve_without_screening_fails() {
        let audit = InMemoryAuditStore::new();
        let result = approve(&audit, "STU_1", "DRIVE_A", "TPO");
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(audit.query(&AuditQuery::default(), 10).is_empty());
    }
}
