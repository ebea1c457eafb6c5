//! Baseline cost planner. Produces the deterministic plan used whenever the
//! agent is unavailable, and assembles results from extracted figures.

use crate::catalog::{self, AgentRole, ModelProfile};
use crate::schema::{
    AgentNode, CostBreakdown, HybridStrategy, HybridTier, NodeStatus, OptimizationInput,
    OptimizationResult, Performance, Position, RecommendationKind, ResultSource, UseCase,
    WorkflowRecommendation,
};

/// Dollars per request at medium complexity.
pub const BASE_REQUEST_COST: f64 = 0.01;
pub const DAYS_PER_MONTH: f64 = 30.0;
pub const BASELINE_EFFICIENCY: f64 = 94.2;
pub const BASELINE_SAVINGS_PERCENTAGE: f64 = 21.3;

/// Percent of traffic routed to the premium model, and its share of optimized spend.
const HIGH_COMPLEXITY_TRAFFIC: f64 = 30.0;
const HIGH_COMPLEXITY_COST_SHARE: f64 = 0.365;
const STANDARD_COST_SHARE: f64 = 0.635;

/// (label, share of total, chart color). The first entry is the LLM line.
const BREAKDOWN_SHARES: [(&str, f64, &str); 4] = [
    ("LLM Processing", 0.719, "#0F62FE"),
    ("Infrastructure & Hosting", 0.169, "#42BE65"),
    ("Memory & Storage", 0.079, "#FF832B"),
    ("Monitoring & Analytics", 0.034, "#8A3FFC"),
];

/// Headline numbers a result is derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Figures {
    /// Unrounded monthly spend in dollars.
    pub monthly_cost: f64,
    pub cost_per_request: f64,
    pub efficiency: f64,
    pub savings_percentage: f64,
}

impl Figures {
    pub fn baseline(input: &OptimizationInput) -> Self {
        let per_request = BASE_REQUEST_COST * input.complexity_or_default().multiplier();
        let monthly = input.daily_requests_or_default() as f64 * per_request * DAYS_PER_MONTH;
        Self {
            monthly_cost: monthly,
            cost_per_request: per_request,
            efficiency: BASELINE_EFFICIENCY,
            savings_percentage: BASELINE_SAVINGS_PERCENTAGE,
        }
    }
}

/// Deterministic plan from the form alone.
pub fn baseline(input: &OptimizationInput) -> OptimizationResult {
    let models = catalog::baseline_profiles();
    assemble(input, Figures::baseline(input), &models, &[], ResultSource::Baseline)
}

/// Build a full result from headline figures, an ordered model list and any
/// extra workflow roles.
pub fn assemble(
    input: &OptimizationInput,
    figures: Figures,
    models: &[&ModelProfile],
    roles: &[AgentRole],
    source: ResultSource,
) -> OptimizationResult {
    let ranked = catalog::rank_models(models);
    let primary = ranked
        .first()
        .map(|m| m.name.clone())
        .unwrap_or_else(|| "LLM".to_string());
    let secondary = ranked.get(1).map(|m| m.name.clone());

    let cost_per_request = round_to(figures.cost_per_request, 3);
    OptimizationResult {
        total_monthly_cost: figures.monthly_cost.round(),
        cost_per_request,
        efficiency: round_to(figures.efficiency, 1),
        agents: agents(input, &primary, cost_per_request, roles),
        recommendations: recommendations(&primary, secondary.as_deref(), figures.savings_percentage),
        cost_breakdown: cost_breakdown(figures.monthly_cost, &primary),
        hybrid_strategy: hybrid_strategy(
            figures.monthly_cost,
            figures.savings_percentage,
            &primary,
            secondary.as_deref().unwrap_or(primary.as_str()),
        ),
        performance: performance(input, figures.efficiency),
        models: ranked,
        source,
        insights: None,
    }
}

fn agents(
    input: &OptimizationInput,
    primary_model: &str,
    analysis_cost: f64,
    roles: &[AgentRole],
) -> Vec<AgentNode> {
    let mut nodes = vec![
        node("input", "Input Agent", "Request processing & validation", 0.002, NodeStatus::Success, 50.0, 50.0),
        node(
            "analysis",
            "Analysis Agent",
            &format!("{} processing", primary_model),
            analysis_cost,
            NodeStatus::Success,
            300.0,
            50.0,
        ),
        node("output", "Output Agent", "Response formatting", 0.001, NodeStatus::Warning, 550.0, 50.0),
        node("memory", "Memory Agent", "Context & caching", 0.0005, NodeStatus::Active, 300.0, 200.0),
    ];

    let mut extra: Vec<AgentRole> = Vec::new();
    if input.use_case_type == Some(UseCase::Automation) {
        extra.push(AgentRole::Orchestrator);
    }
    for role in roles {
        if !extra.contains(role) {
            extra.push(*role);
        }
    }
    // Stable diagram layout regardless of detection order.
    for role in AgentRole::ALL.iter().filter(|r| extra.contains(r)) {
        nodes.push(role.node());
    }
    nodes
}

fn node(
    id: &str,
    name: &str,
    description: &str,
    cost: f64,
    status: NodeStatus,
    x: f64,
    y: f64,
) -> AgentNode {
    AgentNode {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        cost,
        status,
        position: Position { x, y },
    }
}

fn cost_breakdown(total: f64, primary_model: &str) -> Vec<CostBreakdown> {
    BREAKDOWN_SHARES
        .iter()
        .enumerate()
        .map(|(i, (label, share, color))| CostBreakdown {
            component: if i == 0 {
                format!("{} ({})", label, primary_model)
            } else {
                label.to_string()
            },
            cost: (total * share).round(),
            percentage: round_to(share * 100.0, 1),
            color: color.to_string(),
        })
        .collect()
}

fn recommendations(
    primary: &str,
    secondary: Option<&str>,
    savings_percentage: f64,
) -> Vec<WorkflowRecommendation> {
    let mut out = vec![WorkflowRecommendation {
        kind: RecommendationKind::Recommended,
        title: format!("Parallel processing with {} for high accuracy", primary),
        description: "Optimized for your performance requirements".to_string(),
        savings: None,
    }];
    if let Some(alt) = secondary {
        let pct = format_percentage(savings_percentage);
        out.push(WorkflowRecommendation {
            kind: RecommendationKind::Alternative,
            title: format!("Consider {} for cost optimization", alt),
            description: format!(
                "Potential {} cost reduction with minimal performance impact",
                pct
            ),
            savings: Some(pct),
        });
    }
    out
}

fn hybrid_strategy(
    monthly: f64,
    savings_percentage: f64,
    premium_model: &str,
    standard_model: &str,
) -> HybridStrategy {
    let optimized = monthly * (1.0 - savings_percentage / 100.0);
    HybridStrategy {
        high_complexity: HybridTier {
            percentage: HIGH_COMPLEXITY_TRAFFIC,
            cost: (optimized * HIGH_COMPLEXITY_COST_SHARE).round(),
            model: premium_model.to_string(),
        },
        standard: HybridTier {
            percentage: 100.0 - HIGH_COMPLEXITY_TRAFFIC,
            cost: (optimized * STANDARD_COST_SHARE).round(),
            model: standard_model.to_string(),
        },
        total_optimized_cost: optimized.round(),
        savings: (monthly - optimized).round(),
        savings_percentage: round_to(savings_percentage, 1),
    }
}

fn performance(input: &OptimizationInput, efficiency: f64) -> Performance {
    let latency = input.response_time_or_default().base_latency_ms();
    Performance {
        latency,
        throughput: (1000.0 / latency as f64 * 95.0).round() as u32,
        accuracy: round_to(efficiency, 1),
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn format_percentage(p: f64) -> String {
    let rounded = round_to(p, 1);
    if rounded.fract() == 0.0 {
        format!("{:.0}%", rounded)
    } else {
        format!("{:.1}%", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Complexity, ResponseTime};

    fn input(daily: u64, complexity: Complexity) -> OptimizationInput {
        OptimizationInput {
            daily_requests: Some(daily),
            complexity: Some(complexity),
            ..OptimizationInput::new("customer support bot")
        }
    }

    #[test]
    fn baseline_costs_scale_with_complexity() {
        let r = baseline(&input(10_000, Complexity::High));
        // 10_000 * 0.015 * 30
        assert_eq!(r.total_monthly_cost, 4500.0);
        assert_eq!(r.cost_per_request, 0.015);
        assert_eq!(r.efficiency, 94.2);
        assert_eq!(r.source, ResultSource::Baseline);
    }

    #[test]
    fn baseline_breakdown_matches_shares() {
        let r = baseline(&input(10_000, Complexity::Medium));
        assert_eq!(r.total_monthly_cost, 3000.0);
        let costs: Vec<f64> = r.cost_breakdown.iter().map(|c| c.cost).collect();
        assert_eq!(costs, vec![2157.0, 507.0, 237.0, 102.0]);
        assert_eq!(r.cost_breakdown[0].component, "LLM Processing (GPT-4 Turbo)");
        assert_eq!(r.cost_breakdown[3].percentage, 3.4);
    }

    #[test]
    fn hybrid_strategy_splits_optimized_spend() {
        let r = baseline(&input(10_000, Complexity::Medium));
        let h = &r.hybrid_strategy;
        // 3000 * 0.787 = 2361
        assert_eq!(h.total_optimized_cost, 2361.0);
        assert_eq!(h.savings, 639.0);
        assert_eq!(h.high_complexity.cost, 862.0);
        assert_eq!(h.standard.cost, 1499.0);
        assert_eq!(h.high_complexity.model, "GPT-4 Turbo");
        assert_eq!(h.standard.model, "Claude-3 Sonnet");
        assert_eq!(h.standard.percentage, 70.0);
    }

    #[test]
    fn automation_adds_orchestrator() {
        let mut i = input(1000, Complexity::Low);
        assert_eq!(baseline(&i).agents.len(), 4);
        i.use_case_type = Some(UseCase::Automation);
        let agents = baseline(&i).agents;
        assert_eq!(agents.len(), 5);
        assert_eq!(agents[4].id, "orchestrator");
        assert_eq!(agents[4].position, Position { x: 400.0, y: 150.0 });
    }

    #[test]
    fn roles_are_deduplicated_and_laid_out_in_fixed_order() {
        let mut i = input(1000, Complexity::Medium);
        i.use_case_type = Some(UseCase::Automation);
        let models = catalog::baseline_profiles();
        let r = assemble(
            &i,
            Figures::baseline(&i),
            &models,
            &[AgentRole::Monitoring, AgentRole::Orchestrator, AgentRole::Retrieval],
            ResultSource::Agent,
        );
        let ids: Vec<&str> = r.agents.iter().skip(4).map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["orchestrator", "retrieval", "monitoring"]);
    }

    #[test]
    fn performance_follows_response_time() {
        let mut i = input(1000, Complexity::Medium);
        i.response_time = Some(ResponseTime::Realtime);
        let p = baseline(&i).performance;
        assert_eq!(p.latency, 100);
        assert_eq!(p.throughput, 950);

        i.response_time = None;
        let p = baseline(&i).performance;
        assert_eq!(p.latency, 500);
        assert_eq!(p.throughput, 190);
    }

    #[test]
    fn alternative_recommendation_quotes_savings() {
        let r = baseline(&input(1000, Complexity::Medium));
        assert_eq!(r.recommendations.len(), 2);
        assert_eq!(r.recommendations[1].savings.as_deref(), Some("21.3%"));
        assert!(r.recommendations[1].title.contains("Claude-3 Sonnet"));
    }

    #[test]
    fn single_model_has_no_alternative() {
        let i = input(1000, Complexity::Medium);
        let only = [catalog::profile("gpt4o").unwrap()];
        let r = assemble(&i, Figures::baseline(&i), &only, &[], ResultSource::Agent);
        assert_eq!(r.recommendations.len(), 1);
        assert_eq!(r.hybrid_strategy.standard.model, "GPT-4o");
    }
}
