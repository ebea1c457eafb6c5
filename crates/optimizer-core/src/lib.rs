//! AI cost optimizer core library.
//! Schema, baseline planner, agent bridge, reply extraction and the in-memory ledger.

pub mod agent_bridge;
pub mod analytics;
pub mod catalog;
pub mod config;
pub mod extraction;
pub mod optimizer;
pub mod planner;
pub mod report;
pub mod schema;
pub mod store;
pub mod validation;

pub use agent_bridge::{AgentBridge, AgentBridgeError};
pub use analytics::AnalyticsSummary;
pub use config::{AgentConfig, OptimizerConfig};
pub use optimizer::Optimizer;
pub use report::OptimizationReport;
pub use schema::{OptimizationInput, OptimizationRecord, OptimizationResult, ResultSource};
pub use store::RequestStore;
pub use validation::{FieldIssue, RawOptimizationInput, ValidationError};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
