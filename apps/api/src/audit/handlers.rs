//! Axum route handlers for the audit log.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::audit::export::{export_csv, export_json};
use crate::audit::AuditQuery;
use crate::errors::AppError;
use crate::models::audit::AuditRecord;
use crate::state::AppState;

fn run_query(state: &AppState, query: &AuditQuery) -> Vec<AuditRecord> {
    let limit = query.limit.unwrap_or(state.config.audit_query_limit);
    state.audit.query(query, limit)
}

/// Exports are uncapped unless the caller passes `limit`.
fn run_export_query(state: &AppState, query: &AuditQuery) -> Vec<AuditRecord> {
    state.audit.query(query, query.limit.unwrap_or(usize::MAX))
}

/// GET /api/v1/audit-logs
pub async fn handle_list(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> Json<Vec<AuditRecord>> {
    Json(run_query(&state, &query))
}

/// GET /api/v1/audit-logs/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AuditRecord>, AppError> {
    state
        .audit
        .get(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Audit record {id} not found")))
}

/// GET /api/v1/audit-logs/export/json
pub async fn handle_export_json(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> Result<impl IntoResponse, AppError> {
    let body = export_json(&run_export_query(&state, &query)).map_err(anyhow::Error::from)?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"audit_logs.json\"",
            ),
        ],
        body,
    ))
}

/// GET /api/v1/audit-logs/export/csv
pub async fn handle_export_csv(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> impl IntoResponse {
    let body = export_csv(&run_export_query(&state, &query));
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"audit_logs.csv\"",
            ),
        ],
        body,
    )
}
