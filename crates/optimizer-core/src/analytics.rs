//! Aggregate insights over stored optimization requests.

use crate::planner::{round_to, DAYS_PER_MONTH};
use crate::schema::OptimizationRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Label for records submitted without a use-case category.
pub const UNSPECIFIED_USE_CASE: &str = "Unspecified";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPopularity {
    pub name: String,
    /// Share of analyses where this was the primary model, in percent.
    pub usage: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UseCaseShare {
    #[serde(rename = "type")]
    pub label: String,
    pub percentage: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    /// `YYYY-MM`.
    pub month: String,
    pub cost: f64,
    pub requests: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_analyses: usize,
    pub avg_monthly_cost: f64,
    pub avg_efficiency: f64,
    pub cost_savings: f64,
    pub popular_models: Vec<ModelPopularity>,
    pub use_case_distribution: Vec<UseCaseShare>,
    pub monthly_trends: Vec<MonthlyTrend>,
}

pub fn summarize(records: &[OptimizationRecord]) -> AnalyticsSummary {
    let total = records.len();
    if total == 0 {
        return AnalyticsSummary {
            total_analyses: 0,
            avg_monthly_cost: 0.0,
            avg_efficiency: 0.0,
            cost_savings: 0.0,
            popular_models: Vec::new(),
            use_case_distribution: Vec::new(),
            monthly_trends: Vec::new(),
        };
    }

    let n = total as f64;
    let cost_sum: f64 = records.iter().map(|r| r.cost_estimate.total_monthly_cost).sum();
    let efficiency_sum: f64 = records.iter().map(|r| r.cost_estimate.efficiency).sum();
    let savings_sum: f64 = records
        .iter()
        .map(|r| r.cost_estimate.hybrid_strategy.savings)
        .sum();

    let mut by_model: BTreeMap<String, usize> = BTreeMap::new();
    for r in records {
        if let Some(name) = r.cost_estimate.primary_model() {
            *by_model.entry(name.to_string()).or_default() += 1;
        }
    }
    let mut popular_models: Vec<ModelPopularity> = by_model
        .into_iter()
        .map(|(name, count)| ModelPopularity {
            name,
            usage: percent(count, total),
            count,
        })
        .collect();
    // BTreeMap order breaks ties by name; stable sort keeps it.
    popular_models.sort_by(|a, b| b.count.cmp(&a.count));

    let mut by_use_case: BTreeMap<&'static str, usize> = BTreeMap::new();
    for r in records {
        let label = r
            .input
            .use_case_type
            .map(|u| u.label())
            .unwrap_or(UNSPECIFIED_USE_CASE);
        *by_use_case.entry(label).or_default() += 1;
    }
    let mut use_case_distribution: Vec<UseCaseShare> = by_use_case
        .into_iter()
        .map(|(label, count)| UseCaseShare {
            label: label.to_string(),
            percentage: percent(count, total),
            count,
        })
        .collect();
    use_case_distribution.sort_by(|a, b| b.count.cmp(&a.count));

    let mut by_month: BTreeMap<String, (f64, u64)> = BTreeMap::new();
    for r in records {
        let key = r.created_at.format("%Y-%m").to_string();
        let entry = by_month.entry(key).or_insert((0.0, 0));
        entry.0 += r.cost_estimate.total_monthly_cost;
        let monthly_requests = r
            .input
            .daily_requests_or_default()
            .saturating_mul(DAYS_PER_MONTH as u64);
        entry.1 = entry.1.saturating_add(monthly_requests);
    }
    let monthly_trends = by_month
        .into_iter()
        .map(|(month, (cost, requests))| MonthlyTrend {
            month,
            cost: cost.round(),
            requests,
        })
        .collect();

    AnalyticsSummary {
        total_analyses: total,
        avg_monthly_cost: (cost_sum / n).round(),
        avg_efficiency: round_to(efficiency_sum / n, 1),
        cost_savings: savings_sum.round(),
        popular_models,
        use_case_distribution,
        monthly_trends,
    }
}

fn percent(count: usize, total: usize) -> f64 {
    round_to(count as f64 / total as f64 * 100.0, 1)
}
