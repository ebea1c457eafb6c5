//! Optimizer service: agent call → extraction, with the baseline plan as the
//! single fallback. Owns the request store.

use crate::agent_bridge::{AgentBridge, AgentBridgeError};
use crate::analytics::{self, AnalyticsSummary};
use crate::config::AgentConfig;
use crate::extraction;
use crate::planner;
use crate::report::OptimizationReport;
use crate::schema::{OptimizationInput, OptimizationRecord, OptimizationResult};
use crate::store::RequestStore;
use chrono::{DateTime, Utc};

pub struct Optimizer {
    bridge: Option<AgentBridge>,
    store: RequestStore,
}

impl Optimizer {
    /// Build from agent settings. An unusable agent config leaves the optimizer in baseline mode.
    pub fn new(agent: AgentConfig) -> Self {
        let bridge = match AgentBridge::new(agent) {
            Ok(b) => {
                tracing::info!(model = b.model(), "[OPTIMIZER] Agent bridge online");
                Some(b)
            }
            Err(AgentBridgeError::NotConfigured) => {
                tracing::info!("[OPTIMIZER] No agent configured; serving baseline plans");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "[OPTIMIZER] Agent bridge unavailable; serving baseline plans");
                None
            }
        };
        Self {
            bridge,
            store: RequestStore::new(),
        }
    }

    pub fn baseline_only() -> Self {
        Self {
            bridge: None,
            store: RequestStore::new(),
        }
    }

    pub fn with_bridge(bridge: AgentBridge) -> Self {
        Self {
            bridge: Some(bridge),
            store: RequestStore::new(),
        }
    }

    pub fn agent_enabled(&self) -> bool {
        self.bridge.is_some()
    }

    pub fn store(&self) -> &RequestStore {
        &self.store
    }

    /// Analyze without storing. Any agent failure degrades to the baseline plan.
    pub async fn analyze(&self, input: &OptimizationInput) -> OptimizationResult {
        let Some(bridge) = &self.bridge else {
            return planner::baseline(input);
        };

        match bridge.ask(input).await {
            Ok(reply) => extraction::extract(&reply, input),
            Err(e) => {
                tracing::warn!(error = %e, "[OPTIMIZER] Agent analysis failed; falling back to baseline");
                planner::baseline(input)
            }
        }
    }

    /// Analyze and record the request.
    pub async fn optimize(&self, input: OptimizationInput) -> OptimizationRecord {
        let result = self.analyze(&input).await;
        let record = self.store.create(input, result);
        tracing::info!(
            id = record.id,
            monthly = record.cost_estimate.total_monthly_cost,
            source = ?record.cost_estimate.source,
            "[OPTIMIZER] Optimization stored"
        );
        record
    }

    pub fn get(&self, id: u64) -> Option<OptimizationRecord> {
        self.store.get(id)
    }

    pub fn analytics(&self) -> AnalyticsSummary {
        analytics::summarize(&self.store.all())
    }

    pub fn report(&self, id: u64, now: DateTime<Utc>) -> Option<OptimizationReport> {
        self.store
            .get(id)
            .map(|r| OptimizationReport::from_record(&r, now))
    }
}
