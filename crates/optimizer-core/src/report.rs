//! Downloadable JSON report for a stored optimization.

use crate::schema::{CostBreakdown, ModelRecommendation, OptimizationRecord, Performance};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const REPORT_TITLE: &str = "AI Cost Optimization Report";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationReport {
    pub title: String,
    pub generated_on: DateTime<Utc>,
    pub request_id: u64,
    pub use_case: String,
    pub total_monthly_cost: f64,
    pub cost_per_request: f64,
    pub efficiency: f64,
    pub models: Vec<ModelRecommendation>,
    pub cost_breakdown: Vec<CostBreakdown>,
    pub performance: Performance,
}

impl OptimizationReport {
    pub fn from_record(record: &OptimizationRecord, now: DateTime<Utc>) -> Self {
        let result = &record.cost_estimate;
        Self {
            title: REPORT_TITLE.to_string(),
            generated_on: now,
            request_id: record.id,
            use_case: record.input.user_description.clone(),
            total_monthly_cost: result.total_monthly_cost,
            cost_per_request: result.cost_per_request,
            efficiency: result.efficiency,
            models: result.models.clone(),
            cost_breakdown: result.cost_breakdown.clone(),
            performance: result.performance,
        }
    }

    /// Pretty-printed JSON body.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `ai-cost-optimization-report-YYYY-MM-DD.json`
pub fn file_name(now: DateTime<Utc>) -> String {
    format!("ai-cost-optimization-report-{}.json", now.format("%Y-%m-%d"))
}
