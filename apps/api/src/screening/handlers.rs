//! Axum route handlers for the Screening API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::models::audit::AuditRecord;
use crate::models::candidate::Candidate;
use crate::models::drive::Drive;
use crate::screening::pipeline::{self, ScreeningOutcome, ShortlistReport};
use crate::screening::policy_gateway::{summarize_policy, EligibilityResult};
use crate::screening::skills::extract_skills;
use crate::state::AppState;

const DEFAULT_APPROVER: &str = "TPO";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct EvaluationRequest {
    pub candidate: Candidate,
    pub drive: Drive,
}

#[derive(Debug, Deserialize)]
pub struct ShortlistRequest {
    pub drive: Drive,
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub candidate_id: String,
    pub drive_id: String,
    pub approved_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractSkillsRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractSkillsResponse {
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PolicySummaryResponse {
    pub drive_id: String,
    pub rules: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/eligibility
///
/// Policy gateway only. Never triggers fitness scoring. The check is recorded as POLICY_CHECKED.
pub async fn handle_eligibility(
    State(state): State<AppState>,
    Json(request): Json<EvaluationRequest>,
) -> Result<Json<EligibilityResult>, AppError> {
    validate_ids(&request.candidate, &request.drive)?;
    let result =
        pipeline::check_eligibility(state.audit.as_ref(), &request.candidate, &request.drive)?;
    Ok(Json(result))
}

/// POST /api/v1/fitness
///
/// Gateway, then fitness scoring if the gateway passes. `score` is null otherwise.
/// Both stages are recorded; unlike `/apply` there is no APPLIED record and drive status is ignored.
pub async fn handle_fitness(
    State(state): State<AppState>,
    Json(request): Json<EvaluationRequest>,
) -> Result<Json<ScreeningOutcome>, AppError> {
    validate_ids(&request.candidate, &request.drive)?;
    let outcome = pipeline::screen(
        &state.embeddings,
        state.audit.as_ref(),
        &request.candidate,
        &request.drive,
    )
    .await?;
    Ok(Json(outcome))
}

/// POST /api/v1/apply
///
/// Full screening of one application with every step appended to the audit log.
pub async fn handle_apply(
    State(state): State<AppState>,
    Json(request): Json<EvaluationRequest>,
) -> Result<Json<ScreeningOutcome>, AppError> {
    validate_ids(&request.candidate, &request.drive)?;
    let outcome = pipeline::apply(
        &state.embeddings,
        state.audit.as_ref(),
        &request.candidate,
        &request.drive,
    )
    .await?;
    Ok(Json(outcome))
}

/// POST /api/v1/shortlist
///
/// Screens a batch of candidates against one drive and ranks the eligible ones.
pub async fn handle_shortlist(
    State(state): State<AppState>,
    Json(request): Json<ShortlistRequest>,
) -> Result<Json<ShortlistReport>, AppError> {
    if request.drive.id.trim().is_empty() {
        return Err(AppError::Validation("drive.id cannot be empty".to_string()));
    }
    let report = pipeline::shortlist(
        &state.embeddings,
        state.audit.as_ref(),
        &request.drive,
        &request.candidates,
    )
    .await?;
    Ok(Json(report))
}

/// POST /api/v1/shortlist/approve
///
/// 400 unless the pair has an AI_SCORED record with decision ELIGIBLE.
pub async fn handle_approve(
    State(state): State<AppState>,
    Json(request): Json<ApproveRequest>,
) -> Result<Json<AuditRecord>, AppError> {
    if request.candidate_id.trim().is_empty() || request.drive_id.trim().is_empty() {
        return Err(AppError::Validation(
            "candidate_id and drive_id are required".to_string(),
        ));
    }
    let approved_by = request
        .approved_by
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .unwrap_or(DEFAULT_APPROVER);
    let record = pipeline::approve(
        state.audit.as_ref(),
        &request.candidate_id,
        &request.drive_id,
        approved_by,
    )?;
    Ok(Json(record))
}

/// POST /api/v1/policy/summary
///
/// Informational rule list for a drive. Not authoritative.
pub async fn handle_policy_summary(Json(drive): Json<Drive>) -> Json<PolicySummaryResponse> {
    Json(PolicySummaryResponse {
        rules: summarize_policy(&drive),
        drive_id: drive.id,
    })
}

/// POST /api/v1/skills/extract
pub async fn handle_extract_skills(
    Json(request): Json<ExtractSkillsRequest>,
) -> Json<ExtractSkillsResponse> {
    Json(ExtractSkillsResponse {
        skills: extract_skills(&request.text).into_iter().collect(),
    })
}

/// POST /api/v1/skills/extract-resume
///
/// Multipart upload with a PDF in the `file` field. Text is extracted, then skills.
pub async fn handle_extract_resume(
    mut multipart: Multipart,
) -> Result<Json<ExtractSkillsResponse>, AppError> {
    let mut pdf: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
            pdf = Some(data);
            break;
        }
    }

    let pdf = pdf.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    let text = extract_pdf_text(pdf).await?;
    debug!("Extracted {} characters of resume text", text.len());

    Ok(Json(ExtractSkillsResponse {
        skills: extract_skills(&text).into_iter().collect(),
    }))
}

async fn extract_pdf_text(pdf: Bytes) -> Result<String, AppError> {
    if pdf.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(|e| AppError::UnprocessableEntity(format!("Could not read PDF: {e}")))
}

fn validate_ids(candidate: &Candidate, drive: &Drive) -> Result<(), AppError> {
    if candidate.id.trim().is_empty() {
        return Err(AppError::Validation("candidate.id cannot be empty".to_string()));
    }
    if drive.id.trim().is_empty() {
        return Err(AppError::Validation("drive.id cannot be empty".to_string()));
    }
    Ok(())
}
