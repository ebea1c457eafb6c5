//! Optimizer configuration loaded from the environment (`.env` is read by the gateway).
//!
//! | Env | Default | Description |
//! |-----|---------|-------------|
//! | OPTIMIZER_BIND_ADDR | 127.0.0.1:8000 | Gateway listen address. |
//! | OPTIMIZER_AGENT_ENABLED | true | Set false to always serve the baseline plan. |
//! | OPTIMIZER_AGENT_URL | OpenRouter chat completions | OpenAI-compatible chat endpoint. |
//! | OPTIMIZER_AGENT_API_KEY / OPENROUTER_API_KEY | (unset) | Bearer token; unset disables the agent. |
//! | OPTIMIZER_AGENT_MODEL | openai/gpt-3.5-turbo | Model requested from the endpoint. |
//! | OPTIMIZER_AGENT_TIMEOUT_SECS | 30 | Per-call timeout. |
//! | OPTIMIZER_CORS_ALLOW_ANY | true | Permissive CORS for the dashboard dev server. |

use serde::Serialize;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_AGENT_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_AGENT_MODEL: &str = "openai/gpt-3.5-turbo";
pub const DEFAULT_AGENT_TIMEOUT_SECS: u64 = 30;

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

/// Remote conversational agent settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentConfig {
    pub enabled: bool,
    pub url: String,
    /// Never serialized back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: DEFAULT_AGENT_URL.to_string(),
            api_key: None,
            model: DEFAULT_AGENT_MODEL.to_string(),
            timeout_secs: DEFAULT_AGENT_TIMEOUT_SECS,
        }
    }
}

impl AgentConfig {
    /// Enabled and holding a key.
    pub fn is_usable(&self) -> bool {
        self.enabled && self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizerConfig {
    pub bind_addr: String,
    pub cors_allow_any: bool,
    pub agent: AgentConfig,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            cors_allow_any: true,
            agent: AgentConfig::default(),
        }
    }
}

impl OptimizerConfig {
    /// Load from environment. Unset or invalid values fall back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_addr: env_opt_string("OPTIMIZER_BIND_ADDR").unwrap_or_else(default_bind_addr),
            cors_allow_any: env_bool("OPTIMIZER_CORS_ALLOW_ANY", true),
            agent: AgentConfig {
                enabled: env_bool("OPTIMIZER_AGENT_ENABLED", true),
                url: env_opt_string("OPTIMIZER_AGENT_URL")
                    .unwrap_or_else(|| DEFAULT_AGENT_URL.to_string()),
                api_key: env_opt_string("OPTIMIZER_AGENT_API_KEY")
                    .or_else(|| env_opt_string("OPENROUTER_API_KEY")),
                model: env_opt_string("OPTIMIZER_AGENT_MODEL")
                    .unwrap_or_else(|| DEFAULT_AGENT_MODEL.to_string()),
                timeout_secs: env_timeout_secs(),
            },
        }
    }
}

fn env_bool(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => parse_bool(&v, default),
        Err(_) => default,
    }
}

fn parse_bool(v: &str, default: bool) -> bool {
    let t = v.trim();
    if t.is_empty() {
        return default;
    }
    matches!(t.to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

fn env_timeout_secs() -> u64 {
    match std::env::var("OPTIMIZER_AGENT_TIMEOUT_SECS") {
        Ok(v) => parse_timeout(&v),
        Err(_) => DEFAULT_AGENT_TIMEOUT_SECS,
    }
}

fn parse_timeout(v: &str) -> u64 {
    v.trim()
        .parse::<u64>()
        .ok()
        .filter(|s| *s > 0)
        .unwrap_or(DEFAULT_AGENT_TIMEOUT_SECS)
        .min(600)
}

fn env_opt_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
