//! Agent Bridge: sends the use-case description to the remote conversational
//! agent (OpenAI-compatible chat completions) and returns its prose reply.

use crate::config::AgentConfig;
use crate::schema::OptimizationInput;
use std::time::Duration;

const ADVISOR_SYSTEM_PROMPT: &str = "You are an AI infrastructure cost advisor. \
Given a description of an AI use case, recommend how to build it cost-effectively. \
Always state: the estimated total monthly cost in dollars (e.g. '$2,400 per month'), \
the cost per request in dollars (e.g. '$0.004 per request'), the expected efficiency or accuracy as a percentage, \
and the potential savings percentage from a hybrid model strategy. \
Name the specific models you recommend (e.g. GPT-4 Turbo, Claude 3 Sonnet, Llama 3 70B) in order of preference, \
and mention any supporting agents the workflow needs (orchestration, retrieval, validation, monitoring). \
Answer in plain prose without tables or code blocks.";

/// Chat message.
#[derive(serde::Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Chat-completions request body.
#[derive(serde::Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Debug, serde::Deserialize)]
struct ChatResponse {
    choices: Option<Vec<ChatChoice>>,
}

#[derive(Debug, serde::Deserialize)]
struct ChatChoice {
    message: Option<ChatReply>,
}

#[derive(Debug, serde::Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AgentBridgeError {
    #[error("agent not configured (no API key or disabled)")]
    NotConfigured,
    #[error("agent client: {0}")]
    Client(reqwest::Error),
    #[error("agent request: {0}")]
    Request(reqwest::Error),
    #[error("agent {0}: {1}")]
    Status(u16, String),
    #[error("agent response parse: {0}")]
    Json(#[from] serde_json::Error),
    #[error("agent returned an empty reply")]
    EmptyReply,
}

/// Client for the remote advisor agent.
#[derive(Debug, Clone)]
pub struct AgentBridge {
    client: reqwest::Client,
    config: AgentConfig,
}

impl AgentBridge {
    pub fn new(config: AgentConfig) -> Result<Self, AgentBridgeError> {
        if !config.is_usable() {
            return Err(AgentBridgeError::NotConfigured);
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(AgentBridgeError::Client)?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Ask the agent about one use case; returns the raw reply text.
    pub async fn ask(&self, input: &OptimizationInput) -> Result<String, AgentBridgeError> {
        tracing::info!(
            model = %self.config.model,
            "[AGENT BRIDGE] External analysis requested"
        );

        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: ADVISOR_SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: render_user_message(input),
                },
            ],
            stream: false,
        };

        let api_key = self.config.api_key.as_deref().unwrap_or_default();
        let res = self
            .client
            .post(&self.config.url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(AgentBridgeError::Request)?;

        let status = res.status();
        let text = res.text().await.map_err(AgentBridgeError::Request)?;

        if !status.is_success() {
            let snippet: String = text.chars().take(300).collect();
            return Err(AgentBridgeError::Status(status.as_u16(), snippet));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)?;
        let content = parsed
            .choices
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(AgentBridgeError::EmptyReply)?;

        tracing::info!(chars = content.len(), "[AGENT BRIDGE] Reply received");
        Ok(content)
    }
}

/// User turn: the free-text description plus whatever structured hints the form carried.
pub fn render_user_message(input: &OptimizationInput) -> String {
    let mut lines = vec![format!("Use case: {}", input.user_description)];
    if let Some(u) = input.use_case_type {
        lines.push(format!("Category: {}", u.label()));
    }
    if let Some(c) = input.complexity {
        lines.push(format!("Complexity: {}", c.as_str()));
    }
    if let Some(u) = input.users {
        lines.push(format!("Users: {}", u));
    }
    if let Some(d) = input.daily_requests {
        lines.push(format!("Daily requests: {}", d));
    }
    if let Some(r) = input.response_time {
        lines.push(format!("Response time target: {}", r.label()));
    }
    if let Some(b) = input.budget {
        lines.push(format!("Monthly budget: {}", b.label()));
    }
    lines.join("\n")
}
