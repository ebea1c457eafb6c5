//! Request and result types shared by the planner, extraction and the gateway.
//! JSON field names are camelCase to match the dashboard client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Use-case categories offered by the dashboard form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UseCase {
    Chatbot,
    Analysis,
    Content,
    Automation,
    Prediction,
}

impl UseCase {
    pub const ALL: [UseCase; 5] = [
        UseCase::Chatbot,
        UseCase::Analysis,
        UseCase::Content,
        UseCase::Automation,
        UseCase::Prediction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UseCase::Chatbot => "chatbot",
            UseCase::Analysis => "analysis",
            UseCase::Content => "content",
            UseCase::Automation => "automation",
            UseCase::Prediction => "prediction",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UseCase::Chatbot => "Customer Service Chatbot",
            UseCase::Analysis => "Data Analysis & Insights",
            UseCase::Content => "Content Generation",
            UseCase::Automation => "Process Automation",
            UseCase::Prediction => "Predictive Analytics",
        }
    }
}

/// Workload complexity; scales the per-request cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    #[default]
    Medium,
    High,
}

impl Complexity {
    pub const ALL: [Complexity; 3] = [Complexity::Low, Complexity::Medium, Complexity::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            Complexity::Low => 0.8,
            Complexity::Medium => 1.0,
            Complexity::High => 1.5,
        }
    }
}

/// Response-time tier requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseTime {
    Realtime,
    Fast,
    #[default]
    Standard,
    Batch,
}

impl ResponseTime {
    pub const ALL: [ResponseTime; 4] = [
        ResponseTime::Realtime,
        ResponseTime::Fast,
        ResponseTime::Standard,
        ResponseTime::Batch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseTime::Realtime => "realtime",
            ResponseTime::Fast => "fast",
            ResponseTime::Standard => "standard",
            ResponseTime::Batch => "batch",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResponseTime::Realtime => "Real-time (< 100ms)",
            ResponseTime::Fast => "Fast (< 1s)",
            ResponseTime::Standard => "Standard (< 5s)",
            ResponseTime::Batch => "Batch Processing",
        }
    }

    /// Base latency in milliseconds.
    pub fn base_latency_ms(&self) -> u32 {
        match self {
            ResponseTime::Realtime => 100,
            ResponseTime::Fast => 250,
            ResponseTime::Standard => 500,
            ResponseTime::Batch => 1000,
        }
    }
}

/// Monthly budget bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Budget {
    Small,
    Medium,
    Large,
    Enterprise,
}

impl Budget {
    pub const ALL: [Budget; 4] = [Budget::Small, Budget::Medium, Budget::Large, Budget::Enterprise];

    pub fn as_str(&self) -> &'static str {
        match self {
            Budget::Small => "small",
            Budget::Medium => "medium",
            Budget::Large => "large",
            Budget::Enterprise => "enterprise",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Budget::Small => "$1K - $5K",
            Budget::Medium => "$5K - $25K",
            Budget::Large => "$25K - $100K",
            Budget::Enterprise => "$100K+",
        }
    }
}

/// Error for an enum string that matches none of the known variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub value: String,
    pub expected: Vec<&'static str>,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid enum value. Expected {}, received '{}'",
            self.expected
                .iter()
                .map(|v| format!("'{}'", v))
                .collect::<Vec<_>>()
                .join(" | "),
            self.value
        )
    }
}

macro_rules! impl_from_str {
    ($ty:ty) => {
        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim();
                <$ty>::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(needle))
                    .ok_or_else(|| UnknownVariant {
                        value: s.to_string(),
                        expected: <$ty>::ALL.iter().map(|v| v.as_str()).collect(),
                    })
            }
        }
    };
}

impl_from_str!(UseCase);
impl_from_str!(Complexity);
impl_from_str!(ResponseTime);
impl_from_str!(Budget);

/// Validated form input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationInput {
    pub user_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_case_type: Option<UseCase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_requests: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<ResponseTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<Budget>,
}

/// Daily volume assumed when the form leaves it blank.
pub const DEFAULT_DAILY_REQUESTS: u64 = 1000;

impl OptimizationInput {
    pub fn new(user_description: impl Into<String>) -> Self {
        Self {
            user_description: user_description.into(),
            use_case_type: None,
            complexity: None,
            users: None,
            daily_requests: None,
            response_time: None,
            budget: None,
        }
    }

    pub fn complexity_or_default(&self) -> Complexity {
        self.complexity.unwrap_or_default()
    }

    pub fn response_time_or_default(&self) -> ResponseTime {
        self.response_time.unwrap_or_default()
    }

    pub fn daily_requests_or_default(&self) -> u64 {
        self.daily_requests.unwrap_or(DEFAULT_DAILY_REQUESTS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Active,
    Warning,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A labeled stage in the workflow diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentNode {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Dollars per request.
    pub cost: f64,
    pub status: NodeStatus,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Recommended,
    Alternative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRecommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub component: String,
    pub cost: f64,
    pub percentage: f64,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitScore {
    Excellent,
    Good,
    Fair,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    Active,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRecommendation {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub performance: u32,
    #[serde(rename = "costPer1K")]
    pub cost_per_1k: f64,
    /// Milliseconds.
    pub latency: u32,
    pub fit_score: FitScore,
    pub status: ModelStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridTier {
    pub percentage: f64,
    pub cost: f64,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HybridStrategy {
    pub high_complexity: HybridTier,
    pub standard: HybridTier,
    pub total_optimized_cost: f64,
    pub savings: f64,
    pub savings_percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    pub latency: u32,
    pub throughput: u32,
    pub accuracy: f64,
}

/// Where the figures of a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Agent,
    Baseline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub total_monthly_cost: f64,
    pub cost_per_request: f64,
    pub efficiency: f64,
    pub agents: Vec<AgentNode>,
    pub recommendations: Vec<WorkflowRecommendation>,
    pub cost_breakdown: Vec<CostBreakdown>,
    pub models: Vec<ModelRecommendation>,
    pub hybrid_strategy: HybridStrategy,
    pub performance: Performance,
    pub source: ResultSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<String>,
}

impl OptimizationResult {
    /// First (highest-ranked) model name, if any.
    pub fn primary_model(&self) -> Option<&str> {
        self.models.first().map(|m| m.name.as_str())
    }
}

/// Stored optimization request with its computed result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationRecord {
    pub id: u64,
    #[serde(flatten)]
    pub input: OptimizationInput,
    pub created_at: DateTime<Utc>,
    pub recommendations: Vec<WorkflowRecommendation>,
    pub cost_estimate: OptimizationResult,
    pub model_recommendations: Vec<ModelRecommendation>,
}
