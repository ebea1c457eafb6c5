//! Known model profiles and the agent roles the workflow diagram can show.

use crate::schema::{AgentNode, FitScore, ModelRecommendation, ModelStatus, NodeStatus, Position};

/// Static profile of a hosted model. `pattern` is a case-insensitive regex
/// fragment matched against agent replies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub provider: &'static str,
    pub performance: u32,
    pub cost_per_1k: f64,
    pub latency: u32,
    pub pattern: &'static str,
}

/// Ordered so that more specific names come before their prefixes
/// ("GPT-4o mini" before "GPT-4o", "Llama 3 8B" before bare "Llama 3").
pub const MODEL_CATALOG: &[ModelProfile] = &[
    ModelProfile {
        id: "gpt4o-mini",
        name: "GPT-4o mini",
        provider: "OpenAI",
        performance: 82,
        cost_per_1k: 0.0006,
        latency: 110,
        pattern: r"gpt[-\s]?4o[-\s]?mini",
    },
    ModelProfile {
        id: "gpt4o",
        name: "GPT-4o",
        provider: "OpenAI",
        performance: 93,
        cost_per_1k: 0.01,
        latency: 150,
        pattern: r"gpt[-\s]?4o\b",
    },
    ModelProfile {
        id: "gpt4-turbo",
        name: "GPT-4 Turbo",
        provider: "OpenAI",
        performance: 94,
        cost_per_1k: 0.03,
        latency: 180,
        pattern: r"gpt[-\s]?4(?:[-\s]?turbo)?\b",
    },
    ModelProfile {
        id: "gpt35-turbo",
        name: "GPT-3.5 Turbo",
        provider: "OpenAI",
        performance: 75,
        cost_per_1k: 0.0015,
        latency: 90,
        pattern: r"gpt[-\s]?3\.5",
    },
    ModelProfile {
        id: "claude3-opus",
        name: "Claude 3 Opus",
        provider: "Anthropic",
        performance: 95,
        cost_per_1k: 0.075,
        latency: 260,
        pattern: r"claude[-\s]?3[-\s]?opus|claude\s+opus",
    },
    ModelProfile {
        id: "claude35-sonnet",
        name: "Claude 3.5 Sonnet",
        provider: "Anthropic",
        performance: 93,
        cost_per_1k: 0.015,
        latency: 140,
        pattern: r"claude[-\s]?3\.5[-\s]?sonnet",
    },
    ModelProfile {
        id: "claude3-sonnet",
        name: "Claude-3 Sonnet",
        provider: "Anthropic",
        performance: 89,
        cost_per_1k: 0.015,
        latency: 145,
        pattern: r"claude[-\s]?3[-\s]?sonnet|claude\s+sonnet",
    },
    ModelProfile {
        id: "claude3-haiku",
        name: "Claude 3 Haiku",
        provider: "Anthropic",
        performance: 78,
        cost_per_1k: 0.00125,
        latency: 80,
        pattern: r"claude[-\s]?3[-\s]?haiku|claude\s+haiku",
    },
    ModelProfile {
        id: "llama3-8b",
        name: "Llama 3 8B",
        provider: "Meta",
        performance: 68,
        cost_per_1k: 0.0002,
        latency: 60,
        pattern: r"llama[-\s]?3(?:\.\d)?[-\s]?8b",
    },
    ModelProfile {
        id: "llama3-70b",
        name: "Llama 3 70B",
        provider: "Meta",
        performance: 82,
        cost_per_1k: 0.008,
        latency: 120,
        pattern: r"llama[-\s]?3(?:\.\d)?[-\s]?70b|llama[-\s]?3\b",
    },
    ModelProfile {
        id: "mistral-large",
        name: "Mistral Large",
        provider: "Mistral AI",
        performance: 86,
        cost_per_1k: 0.008,
        latency: 150,
        pattern: r"mistral[-\s]?large",
    },
    ModelProfile {
        id: "mixtral-8x7b",
        name: "Mixtral 8x7B",
        provider: "Mistral AI",
        performance: 77,
        cost_per_1k: 0.0007,
        latency: 100,
        pattern: r"mixtral",
    },
    ModelProfile {
        id: "gemini15-pro",
        name: "Gemini 1.5 Pro",
        provider: "Google",
        performance: 90,
        cost_per_1k: 0.007,
        latency: 170,
        pattern: r"gemini(?:[-\s]?1\.5)?[-\s]?pro",
    },
    ModelProfile {
        id: "gemini15-flash",
        name: "Gemini 1.5 Flash",
        provider: "Google",
        performance: 80,
        cost_per_1k: 0.00035,
        latency: 85,
        pattern: r"gemini(?:[-\s]?1\.5)?[-\s]?flash",
    },
];

/// Model ids used when a reply names no known model.
pub const BASELINE_MODEL_IDS: [&str; 3] = ["gpt4-turbo", "claude3-sonnet", "llama3-70b"];

pub fn profile(id: &str) -> Option<&'static ModelProfile> {
    MODEL_CATALOG.iter().find(|p| p.id == id)
}

pub fn baseline_profiles() -> Vec<&'static ModelProfile> {
    BASELINE_MODEL_IDS.iter().filter_map(|id| profile(id)).collect()
}

/// Turn an ordered list of profiles into recommendations; rank decides fit and status.
pub fn rank_models(profiles: &[&ModelProfile]) -> Vec<ModelRecommendation> {
    profiles
        .iter()
        .enumerate()
        .map(|(rank, p)| {
            let (fit_score, status) = match rank {
                0 => (FitScore::Excellent, ModelStatus::Active),
                1 => (FitScore::Good, ModelStatus::Warning),
                _ => (FitScore::Fair, ModelStatus::Info),
            };
            ModelRecommendation {
                id: p.id.to_string(),
                name: p.name.to_string(),
                provider: p.provider.to_string(),
                performance: p.performance,
                cost_per_1k: p.cost_per_1k,
                latency: p.latency,
                fit_score,
                status,
            }
        })
        .collect()
}

/// Specialized workflow stages added on top of the four core nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentRole {
    Orchestrator,
    Retrieval,
    Validation,
    Monitoring,
}

impl AgentRole {
    pub const ALL: [AgentRole; 4] = [
        AgentRole::Orchestrator,
        AgentRole::Retrieval,
        AgentRole::Validation,
        AgentRole::Monitoring,
    ];

    /// Case-insensitive regex fragment for reply scanning.
    pub fn pattern(&self) -> &'static str {
        match self {
            AgentRole::Orchestrator => r"orchestrat|coordinat|router\s+agent|supervisor",
            AgentRole::Retrieval => r"\brag\b|retriev|vector\s+(?:store|database|db)|knowledge\s+base",
            AgentRole::Validation => r"validat|guardrail|moderat|fact[-\s]?check",
            AgentRole::Monitoring => r"monitor|observab|telemetry",
        }
    }

    pub fn node(&self) -> AgentNode {
        let (id, name, description, cost, status, x, y) = match self {
            AgentRole::Orchestrator => (
                "orchestrator",
                "Orchestrator Agent",
                "Workflow coordination",
                0.003,
                NodeStatus::Success,
                400.0,
                150.0,
            ),
            AgentRole::Retrieval => (
                "retrieval",
                "Retrieval Agent",
                "Knowledge lookup & grounding",
                0.0015,
                NodeStatus::Success,
                50.0,
                200.0,
            ),
            AgentRole::Validation => (
                "validation",
                "Validation Agent",
                "Output checks & guardrails",
                0.001,
                NodeStatus::Warning,
                550.0,
                200.0,
            ),
            AgentRole::Monitoring => (
                "monitoring",
                "Monitoring Agent",
                "Usage & quality telemetry",
                0.0002,
                NodeStatus::Active,
                300.0,
                350.0,
            ),
        };
        AgentNode {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            cost,
            status,
            position: Position { x, y },
        }
    }
}
