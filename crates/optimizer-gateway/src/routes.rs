//! HTTP routes for the dashboard API.

use crate::error::{ApiError, ApiResult};
use axum::{
    body::Body,
    extract::{rejection::JsonRejection, ConnectInfo, Path, State},
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use optimizer_core::{
    AnalyticsSummary, OptimizationRecord, OptimizationResult, Optimizer, RawOptimizationInput,
    ValidationError,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

pub struct AppState {
    pub optimizer: Optimizer,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/status", get(status))
        .route("/api/analyze", post(analyze_handler))
        .route("/api/optimize", post(optimize_handler))
        .route("/api/optimize/:id", get(get_optimization_handler))
        .route("/api/optimize/:id/report", get(report_handler))
        .route("/api/analytics", get(analytics_handler))
        .with_state(state)
        .layer(axum::middleware::from_fn(log_requests))
}

async fn log_requests(
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(request).await;
    tracing::info!(
        peer = ?connect_info.map(|ConnectInfo(addr)| addr),
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "[GATEWAY] request served"
    );
    response
}

async fn health() -> &'static str {
    "OK"
}

async fn status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "version": optimizer_core::version(),
        "agentEnabled": state.optimizer.agent_enabled(),
        "storedRequests": state.optimizer.store().len(),
    }))
}

fn validated(
    payload: Result<Json<RawOptimizationInput>, JsonRejection>,
) -> ApiResult<optimizer_core::OptimizationInput> {
    let Json(raw) = payload
        .map_err(|rejection| ValidationError::single("body", rejection.body_text()))?;
    Ok(raw.validate()?)
}

/// POST /api/analyze: live analysis, nothing stored.
async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RawOptimizationInput>, JsonRejection>,
) -> ApiResult<Json<OptimizationResult>> {
    let input = validated(payload)?;
    Ok(Json(state.optimizer.analyze(&input).await))
}

/// POST /api/optimize: analyze and record.
async fn optimize_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RawOptimizationInput>, JsonRejection>,
) -> ApiResult<Json<OptimizationRecord>> {
    let input = validated(payload)?;
    Ok(Json(state.optimizer.optimize(input).await))
}

fn parse_id(raw: &str) -> ApiResult<u64> {
    raw.trim().parse::<u64>().map_err(|_| ApiError::InvalidId)
}

async fn get_optimization_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<OptimizationRecord>> {
    let id = parse_id(&id)?;
    state.optimizer.get(id).map(Json).ok_or(ApiError::NotFound)
}

/// GET /api/optimize/:id/report: JSON report as a file download.
async fn report_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id(&id)?;
    let now = chrono::Utc::now();
    let report = state.optimizer.report(id, now).ok_or(ApiError::NotFound)?;
    let body = report
        .to_pretty_json()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        optimizer_core::report::file_name(now)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

async fn analytics_handler(State(state): State<Arc<AppState>>) -> Json<AnalyticsSummary> {
    Json(state.optimizer.analytics())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn app() -> Router {
        router(Arc::new(AppState {
            optimizer: Optimizer::baseline_only(),
        }))
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let res = app().oneshot(get("/health")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn analyze_returns_baseline_plan() {
        let res = app()
            .oneshot(post_json(
                "/api/analyze",
                json!({
                    "userDescription": "Automate invoice approvals",
                    "useCaseType": "automation",
                    "complexity": "medium",
                    "dailyRequests": 5000,
                    "responseTime": "fast"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let v = body_json(res).await;
        assert_eq!(v["totalMonthlyCost"], 1500.0);
        assert_eq!(v["source"], "baseline");
        assert_eq!(v["agents"].as_array().unwrap().len(), 5);
        assert_eq!(v["performance"]["latency"], 250);
        assert_eq!(v["models"][0]["costPer1K"], 0.03);
    }

    #[tokio::test]
    async fn invalid_body_lists_every_issue() {
        let res = app()
            .oneshot(post_json("/api/analyze", json!({ "complexity": "extreme" })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let v = body_json(res).await;
        assert_eq!(v["message"], "Invalid request data");
        let errors = v["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["path"], "userDescription");
        assert_eq!(errors[1]["path"], "complexity");
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/optimize")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let res = app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let v = body_json(res).await;
        assert_eq!(v["message"], "Invalid request data");
        assert_eq!(v["errors"][0]["path"], "body");
    }

    #[tokio::test]
    async fn optimize_then_fetch_and_report() {
        let app = app();
        let res = app
            .clone()
            .oneshot(post_json(
                "/api/optimize",
                json!({ "userDescription": "FAQ bot", "useCase": "chatbot" }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let created = body_json(res).await;
        assert_eq!(created["id"], 1);
        assert_eq!(created["userDescription"], "FAQ bot");
        assert_eq!(created["useCaseType"], "chatbot");
        assert_eq!(created["costEstimate"]["totalMonthlyCost"], 300.0);

        let res = app.clone().oneshot(get("/api/optimize/1")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await["id"], 1);

        let res = app.clone().oneshot(get("/api/optimize/1/report")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let disposition = res
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"ai-cost-optimization-report-"));
        let report = body_json(res).await;
        assert_eq!(report["title"], "AI Cost Optimization Report");
        assert_eq!(report["useCase"], "FAQ bot");

        let res = app.oneshot(get("/api/analytics")).await.unwrap();
        let summary = body_json(res).await;
        assert_eq!(summary["totalAnalyses"], 1);
        assert_eq!(summary["useCaseDistribution"][0]["type"], "Customer Service Chatbot");
    }

    #[tokio::test]
    async fn bad_and_unknown_ids() {
        let res = app().oneshot(get("/api/optimize/abc")).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["message"], "Invalid ID");

        let res = app().oneshot(get("/api/optimize/42")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(res).await["message"],
            "Optimization request not found"
        );

        let res = app().oneshot(get("/api/optimize/42/report")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn status_reports_mode_and_stored_count() {
        let app = app();
        let res = app.clone().oneshot(get("/api/status")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let v = body_json(res).await;
        assert_eq!(v["agentEnabled"], false);
        assert_eq!(v["storedRequests"], 0);
        assert_eq!(v["version"], optimizer_core::version());

        let res = app
            .clone()
            .oneshot(post_json("/api/optimize", json!({ "userDescription": "triage" })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = app.oneshot(get("/api/status")).await.unwrap();
        assert_eq!(body_json(res).await["storedRequests"], 1);
    }

    #[tokio::test]
    async fn oversized_daily_requests_rejected_and_analytics_stays_up() {
        let app = app();
        let res = app
            .clone()
            .oneshot(post_json(
                "/api/optimize",
                json!({ "userDescription": "x", "dailyRequests": 1_000_000_000_000_000_000_u64 }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let v = body_json(res).await;
        assert_eq!(v["errors"][0]["path"], "dailyRequests");
        assert_eq!(
            v["errors"][0]["message"],
            "Number must be less than or equal to 2147483647"
        );

        let res = app
            .clone()
            .oneshot(post_json(
                "/api/optimize",
                json!({ "userDescription": "x", "dailyRequests": 2_147_483_647_u64 }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = app.oneshot(get("/api/analytics")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let summary = body_json(res).await;
        assert_eq!(summary["totalAnalyses"], 1);
        assert_eq!(summary["monthlyTrends"][0]["requests"], 2_147_483_647_u64 * 30);
    }
}
