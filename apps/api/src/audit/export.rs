//! Verbatim exports of audit records: pretty JSON and CSV.

use crate::models::audit::{AuditRecord, SYSTEM_ACTOR};

const CSV_COLUMNS: &[&str] = &[
    "id",
    "timestamp",
    "candidate_id",
    "drive_id",
    "action",
    "policy_check",
    "ai_score",
    "missing_skills",
    "final_decision",
    "reasoning",
    "actor",
];

/// Pretty-printed JSON array, two-space indented.
pub fn export_json(records: &[AuditRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

/// CSV with a header row. Missing skills are pipe-joined; absent values are empty.
pub fn export_csv(records: &[AuditRecord]) -> String {
    let mut out = String::new();
    out.push_str(&CSV_COLUMNS.join(","));
    out.push_str("\r\n");

    for record in records {
        let ai_score = record.ai_score.map(|s| s.to_string()).unwrap_or_default();
        let actor = if record.actor.is_empty() {
            SYSTEM_ACTOR
        } else {
            record.actor.as_str()
        };
        let fields = [
            record.id.to_string(),
            record.timestamp.to_rfc3339(),
            record.candidate_id.clone(),
            record.drive_id.clone(),
            record.action.as_str().to_string(),
            record
                .policy_check
                .map(|p| p.as_str().to_string())
                .unwrap_or_default(),
            ai_score,
            record.missing_skills.join("|"),
            record.final_decision.clone().unwrap_or_default(),
            record.reasoning.clone().unwrap_or_default(),
            actor.to_string(),
        ];
        let row: Vec<String> = fields.iter().map(|f| escape_csv(f)).collect();
        out.push_str(&row.join(","));
        out.push_str("\r\n");
    }

    out
}

/// RFC 4180 quoting: fields containing a comma, quote or line break are quoted,
/// with embedded quotes doubled.
fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
