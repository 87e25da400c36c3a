//! Append-only audit records of every screening step.
//!
//! `AuditStore` is the seam to a durable log; `InMemoryAuditStore` is the
//! process-local default.

use std::sync::RwLock;

use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::models::audit::AuditRecord;

pub mod export;
pub mod handlers;

/// Filter for audit queries. Unset fields match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    pub candidate_id: Option<String>,
    pub drive_id: Option<String>,
    pub limit: Option<usize>,
}

impl AuditQuery {
    fn matches(&self, record: &AuditRecord) -> bool {
        self.candidate_id
            .as_deref()
            .map_or(true, |id| record.candidate_id == id)
            && self
                .drive_id
                .as_deref()
                .map_or(true, |id| record.drive_id == id)
    }
}

pub trait AuditStore: Send + Sync {
    /// Appends a record. Records are never updated or removed.
    fn append(&self, record: AuditRecord);

    /// Matching records, newest first, at most `limit` of them.
    fn query(&self, filter: &AuditQuery, limit: usize) -> Vec<AuditRecord>;

    fn get(&self, id: Uuid) -> Option<AuditRecord>;
}

#[derive(Default)]
pub struct InMemoryAuditStore {
    records: RwLock<Vec<AuditRecord>>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditStore for InMemoryAuditStore {
    fn append(&self, record: AuditRecord) {
        debug!(
            "Audit: {} candidate={} drive={}",
            record.action.as_str(),
            record.candidate_id,
            record.drive_id
        );
        // A poisoned lock still holds a consistent Vec: pushes cannot be observed half-done.
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        records.push(record);
    }

    fn query(&self, filter: &AuditQuery, limit: usize) -> Vec<AuditRecord> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        let mut matching: Vec<AuditRecord> = records
            .iter()
            .rev()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        // Reverse insertion order already approximates newest-first; the stable sort
        // keeps that order for records sharing a timestamp.
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matching.truncate(limit);
        matching
    }

    fn get(&self, id: Uuid) -> Option<AuditRecord> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        records.iter().find(|r| r.id == id).cloned()
    }
}
