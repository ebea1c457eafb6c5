//! Load probe: concurrent dashboard users hitting /api/analyze and /api/optimize.
//! Run with the gateway up: cargo run --bin load_probe
//! Target defaults to http://127.0.0.1:8000; override with OPTIMIZER_PROBE_URL.

use futures_util::future::join_all;
use reqwest::Client;
use serde_json::json;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const CONCURRENT_USERS: usize = 8;
const REQUESTS_PER_USER: usize = 5;

const DESCRIPTIONS: &[&str] = &[
    "Tier-1 support chatbot for a regional ISP",
    "Summarize quarterly earnings calls for analysts",
    "Forecast weekly demand for 300 store locations",
    "Generate product descriptions for a catalog of 40k items",
    "Route incoming invoices to the right approver",
];
const USE_CASES: &[&str] = &["chatbot", "analysis", "prediction", "content", "automation"];
const COMPLEXITY: &[&str] = &["low", "medium", "high"];

#[tokio::main]
async fn main() {
    let base_url =
        std::env::var("OPTIMIZER_PROBE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    println!(
        "[LOAD PROBE] {} users x {} requests = {} total against {}",
        CONCURRENT_USERS,
        REQUESTS_PER_USER,
        CONCURRENT_USERS * REQUESTS_PER_USER,
        base_url
    );

    let success = Arc::new(AtomicU32::new(0));
    let failure = Arc::new(AtomicU32::new(0));
    let latencies: Arc<RwLock<Vec<u64>>> = Arc::new(RwLock::new(Vec::new()));
    let client = Client::new();

    let users = (0..CONCURRENT_USERS).map(|user| {
        let client = client.clone();
        let base_url = base_url.clone();
        let success = Arc::clone(&success);
        let failure = Arc::clone(&failure);
        let latencies = Arc::clone(&latencies);

        tokio::spawn(async move {
            for r in 0..REQUESTS_PER_USER {
                let i = user + r;
                let body = json!({
                    "userDescription": DESCRIPTIONS[i % DESCRIPTIONS.len()],
                    "useCaseType": USE_CASES[i % USE_CASES.len()],
                    "complexity": COMPLEXITY[i % COMPLEXITY.len()],
                    "dailyRequests": 1000 * (i as u64 + 1),
                });
                // Every other request is persisted.
                let route = if i % 2 == 0 { "analyze" } else { "optimize" };

                let start = Instant::now();
                let res = client
                    .post(format!("{}/api/{}", base_url, route))
                    .json(&body)
                    .send()
                    .await;
                let elapsed_ms = start.elapsed().as_millis() as u64;

                match res {
                    Ok(resp) if resp.status().is_success() => {
                        success.fetch_add(1, Ordering::Relaxed);
                        latencies.write().await.push(elapsed_ms);
                    }
                    _ => {
                        failure.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }
        })
    });
    join_all(users).await;

    let s = success.load(Ordering::Relaxed);
    let f = failure.load(Ordering::Relaxed);
    let total = s + f;
    let success_rate = if total > 0 { (s as f64 / total as f64) * 100.0 } else { 0.0 };
    let latencies = latencies.read().await;
    let avg_latency_ms = if latencies.is_empty() {
        0.0
    } else {
        latencies.iter().sum::<u64>() as f64 / latencies.len() as f64
    };
    let max_latency_ms = latencies.iter().copied().max().unwrap_or(0);

    println!(
        "[LOAD PROBE] Success rate: {:.1}% | Avg latency: {:.0}ms | Max: {}ms",
        success_rate, avg_latency_ms, max_latency_ms
    );
    println!("[LOAD PROBE] Total: {} | Success: {} | Failure: {}", total, s, f);

    match client.get(format!("{}/api/analytics", base_url)).send().await {
        Ok(resp) => match resp.json::<serde_json::Value>().await {
            Ok(summary) => println!(
                "[LOAD PROBE] Stored analyses: {} | Avg monthly cost: {}",
                summary["totalAnalyses"], summary["avgMonthlyCost"]
            ),
            Err(e) => println!("[LOAD PROBE] Analytics body unreadable: {}", e),
        },
        Err(e) => println!("[LOAD PROBE] Analytics unavailable: {}", e),
    }
}
