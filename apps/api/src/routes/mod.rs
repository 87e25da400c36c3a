pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::audit::handlers as audit;
use crate::screening::handlers as screening;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Screening API
        .route("/api/v1/eligibility", post(screening::handle_eligibility))
        .route("/api/v1/fitness", post(screening::handle_fitness))
        .route("/api/v1/apply", post(screening::handle_apply))
        .route("/api/v1/shortlist", post(screening::handle_shortlist))
        .route(
            "/api/v1/shortlist/approve",
            post(screening::handle_approve),
        )
        .route(
            "/api/v1/policy/summary",
            post(screening::handle_policy_summary),
        )
        .route(
            "/api/v1/skills/extract",
            post(screening::handle_extract_skills),
        )
        .route(
            "/api/v1/skills/extract-resume",
            post(screening::handle_extract_resume),
        )
        // Audit API
        .route("/api/v1/audit-logs", get(audit::handle_list))
        .route("/api/v1/audit-logs/:id", get(audit::handle_get))
        .route(
            "/api/v1/audit-logs/export/json",
            get(audit::handle_export_json),
        )
        .route(
            "/api/v1/audit-logs/export/csv",
            get(audit::handle_export_csv),
        )
        .with_state(state)
}
