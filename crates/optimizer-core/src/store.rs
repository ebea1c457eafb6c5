//! In-memory ledger of optimization requests. Lost on restart.

use crate::schema::{OptimizationInput, OptimizationRecord, OptimizationResult};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Concurrent id → record map with a monotonically increasing id counter.
#[derive(Debug)]
pub struct RequestStore {
    records: DashMap<u64, OptimizationRecord>,
    next_id: AtomicU64,
}

impl Default for RequestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Store a computed result under a fresh id (ids start at 1).
    pub fn create(&self, input: OptimizationInput, result: OptimizationResult) -> OptimizationRecord {
        self.create_at(input, result, Utc::now())
    }

    pub fn create_at(
        &self,
        input: OptimizationInput,
        result: OptimizationResult,
        created_at: DateTime<Utc>,
    ) -> OptimizationRecord {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let record = OptimizationRecord {
            id,
            input,
            created_at,
            recommendations: result.recommendations.clone(),
            model_recommendations: result.models.clone(),
            cost_estimate: result,
        };
        self.records.insert(id, record.clone());
        tracing::debug!(id, "[STORE] optimization request recorded");
        record
    }

    pub fn get(&self, id: u64) -> Option<OptimizationRecord> {
        self.records.get(&id).map(|r| r.value().clone())
    }

    /// Every record ordered by id.
    pub fn all(&self) -> Vec<OptimizationRecord> {
        let mut out: Vec<OptimizationRecord> = self.records.iter().map(|r| r.value().clone()).collect();
        out.sort_by_key(|r| r.id);
        out
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
