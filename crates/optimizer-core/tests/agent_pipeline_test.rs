//! End-to-end tests for the agent → extraction → store pipeline against a mock
//! chat-completions endpoint.

use httpmock::prelude::*;
use optimizer_core::schema::{Complexity, UseCase};
use optimizer_core::{
    AgentBridge, AgentBridgeError, AgentConfig, OptimizationInput, Optimizer, ResultSource,
};
use serde_json::json;

fn config(server: &MockServer) -> AgentConfig {
    AgentConfig {
        enabled: true,
        url: server.url("/v1/chat/completions"),
        api_key: Some("sk-test".to_string()),
        model: "test/advisor".to_string(),
        timeout_secs: 5,
    }
}

fn chat_reply(content: &str) -> serde_json::Value {
    json!({
        "id": "cmpl-1",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
    })
}

fn input() -> OptimizationInput {
    OptimizationInput {
        use_case_type: Some(UseCase::Chatbot),
        complexity: Some(Complexity::High),
        daily_requests: Some(20_000),
        ..OptimizationInput::new("Tier-1 customer support for an ISP")
    }
}

const REPLY: &str = "For this workload I recommend Claude 3 Haiku for routine tickets and GPT-4o for escalations. \
Expect roughly $2,400 per month, or about $0.004 per request. \
A retrieval layer over your knowledge base plus a validation step keeps accuracy near 91%. \
Routing 70% of traffic to the cheaper model should cut costs by 38%.";

#[tokio::test]
async fn bridge_posts_chat_request_with_bearer_auth() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer sk-test");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(chat_reply("Use GPT-4o."));
        })
        .await;

    let bridge = AgentBridge::new(config(&server)).unwrap();
    let reply = bridge.ask(&input()).await.unwrap();
    assert_eq!(reply, "Use GPT-4o.");
    mock.assert_async().await;
}

#[tokio::test]
async fn bridge_surfaces_http_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(401).body("invalid api key");
        })
        .await;

    let bridge = AgentBridge::new(config(&server)).unwrap();
    let err = bridge.ask(&input()).await.unwrap_err();
    match err {
        AgentBridgeError::Status(code, body) => {
            assert_eq!(code, 401);
            assert!(body.contains("invalid api key"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn bridge_rejects_empty_choices() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(json!({ "choices": [] }));
        })
        .await;

    let bridge = AgentBridge::new(config(&server)).unwrap();
    let err = bridge.ask(&input()).await.unwrap_err();
    assert!(matches!(err, AgentBridgeError::EmptyReply));
}

#[tokio::test]
async fn bridge_rejects_unparsable_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).body("<html>oops</html>");
        })
        .await;

    let bridge = AgentBridge::new(config(&server)).unwrap();
    let err = bridge.ask(&input()).await.unwrap_err();
    assert!(matches!(err, AgentBridgeError::Json(_)), "got {err:?}");
}

#[tokio::test]
async fn optimizer_falls_back_when_agent_body_is_not_json() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).body("<html>oops</html>");
        })
        .await;

    let optimizer = Optimizer::with_bridge(AgentBridge::new(config(&server)).unwrap());
    let result = optimizer.analyze(&input()).await;
    assert_eq!(result.source, ResultSource::Baseline);
    assert_eq!(result.total_monthly_cost, 9000.0);
    assert!(result.insights.is_none());
}

#[tokio::test]
async fn optimizer_extracts_figures_from_agent_reply() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(chat_reply(REPLY));
        })
        .await;

    let optimizer = Optimizer::with_bridge(AgentBridge::new(config(&server)).unwrap());
    let result = optimizer.analyze(&input()).await;

    assert_eq!(result.source, ResultSource::Agent);
    assert_eq!(result.total_monthly_cost, 2400.0);
    assert_eq!(result.cost_per_request, 0.004);
    assert_eq!(result.efficiency, 91.0);
    assert_eq!(result.hybrid_strategy.savings_percentage, 38.0);

    let models: Vec<&str> = result.models.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(models, vec!["Claude 3 Haiku", "GPT-4o"]);
    assert_eq!(result.hybrid_strategy.high_complexity.model, "Claude 3 Haiku");

    let agent_ids: Vec<&str> = result.agents.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(
        agent_ids,
        vec!["input", "analysis", "output", "memory", "retrieval", "validation"]
    );
    assert!(result.insights.as_deref().unwrap_or_default().starts_with("For this workload"));
}

#[tokio::test]
async fn optimizer_falls_back_to_baseline_when_agent_fails() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(503).body("upstream overloaded");
        })
        .await;

    let optimizer = Optimizer::with_bridge(AgentBridge::new(config(&server)).unwrap());
    let record = optimizer.optimize(input()).await;

    assert_eq!(record.id, 1);
    assert_eq!(record.cost_estimate.source, ResultSource::Baseline);
    // 20_000 * 0.015 * 30
    assert_eq!(record.cost_estimate.total_monthly_cost, 9000.0);
    assert_eq!(optimizer.get(1), Some(record));
    assert_eq!(optimizer.analytics().total_analyses, 1);
}

#[tokio::test]
async fn optimizer_without_key_never_calls_out() {
    let optimizer = Optimizer::new(AgentConfig::default());
    assert!(!optimizer.agent_enabled());
    let result = optimizer.analyze(&input()).await;
    assert_eq!(result.source, ResultSource::Baseline);
    assert!(result.insights.is_none());
}
