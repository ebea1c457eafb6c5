//! AI cost optimizer gateway.
//! Serves the dashboard API; analyses go to the advisor agent when a key is configured.

mod error;
mod routes;

use axum::http::{HeaderValue, Method};
use optimizer_core::{Optimizer, OptimizerConfig};
use routes::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn cors_layer(allow_any: bool) -> CorsLayer {
    let origin = if allow_any {
        AllowOrigin::any()
    } else {
        // Local dashboard dev servers only.
        AllowOrigin::predicate(|origin: &HeaderValue, _| {
            let s = origin.to_str().unwrap_or("");
            s.starts_with("http://localhost:") || s.starts_with("http://127.0.0.1:")
        })
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .expose_headers(Any)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = OptimizerConfig::from_env();
    let state = Arc::new(AppState {
        optimizer: Optimizer::new(config.agent.clone()),
    });

    let app = routes::router(state).layer(cors_layer(config.cors_allow_any));

    let listener = tokio::net::TcpListener::bind(config.bind_addr.as_str()).await?;
    tracing::info!(
        addr = %config.bind_addr,
        version = optimizer_core::version(),
        "[GATEWAY] listening"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
