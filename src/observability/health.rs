//! Health check HTTP server
//!
//! Optional side channel for operators: the MCP protocol itself runs on
//! stdio, so this endpoint only reports liveness and metrics.

use crate::observability::metrics::MetricsCollector;
use serde::Serialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use warp::http::StatusCode;
use warp::Filter;

/// Failure ratio above which the server reports itself degraded
const ERROR_RATE_THRESHOLD: f64 = 0.5;
/// Invocations required before the error rate is judged
const ERROR_RATE_MIN_SAMPLES: u64 = 10;

/// HTTP health check server
pub struct HealthServer {
    server_name: String,
    addr: SocketAddr,
    metrics: Arc<MetricsCollector>,
    serving: AtomicBool,
}

impl HealthServer {
    /// Create new health server
    pub fn new(server_name: String, addr: SocketAddr, metrics: Arc<MetricsCollector>) -> Self {
        Self {
            server_name,
            addr,
            metrics,
            serving: AtomicBool::new(false),
        }
    }

    /// Record whether the stdio loop is accepting requests
    pub fn set_serving(&self, serving: bool) {
        self.serving.store(serving, Ordering::Relaxed);
    }

    /// Warp routes: `GET /health`, `GET /live`, `GET /metrics`
    pub fn routes(
        self: Arc<Self>,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        let with_server = warp::any().map(move || self.clone());

        let health_route = warp::path("health")
            .and(warp::path::end())
            .and(warp::get())
            .and(with_server.clone())
            .map(|server: Arc<HealthServer>| {
                let status = server.health_status();
                let code = if status.status == "healthy" {
                    StatusCode::OK
                } else {
                    StatusCode::SERVICE_UNAVAILABLE
                };
                warp::reply::with_status(warp::reply::json(&status), code)
            });

        let live_route = warp::path("live")
            .and(warp::path::end())
            .and(warp::get())
            .map(|| {
                warp::reply::json(&LivenessResponse {
                    alive: true,
                    timestamp: current_timestamp(),
                })
            });

        let metrics_route = warp::path("metrics")
            .and(warp::path::end())
            .and(warp::get())
            .and(with_server)
            .map(|server: Arc<HealthServer>| warp::reply::json(&server.metrics.get_metrics()));

        health_route.or(live_route).or(metrics_route)
    }

    /// Bind and serve until the process exits
    pub async fn start(self: Arc<Self>) -> Result<(), warp::Error> {
        let addr = self.addr;
        let (bound, server) = warp::serve(self.routes()).try_bind_ephemeral(addr)?;
        tracing::info!(addr = %bound, "Health server listening");
        server.await;
        Ok(())
    }

    fn health_status(&self) -> HealthStatus {
        let snapshot = self.metrics.get_metrics();
        let mut checks = HashMap::new();

        checks.insert(
            "transport".to_string(),
            check_transport(self.serving.load(Ordering::Relaxed)),
        );
        checks.insert(
            "invocations".to_string(),
            check_error_rate(snapshot.invocations.succeeded, snapshot.invocations.failed),
        );

        let healthy = checks.values().all(|check| check.status == "healthy");

        HealthStatus {
            status: if healthy { "healthy" } else { "degraded" }.to_string(),
            timestamp: snapshot.timestamp,
            server: self.server_name.clone(),
            uptime_seconds: snapshot.uptime_seconds,
            checks,
        }
    }
}

/// Transport health (pure function)
fn check_transport(serving: bool) -> HealthCheck {
    if serving {
        HealthCheck::new("healthy", "stdio transport accepting requests")
    } else {
        HealthCheck::new("unhealthy", "stdio transport not running")
    }
}

/// Remote error-rate health (pure function)
fn check_error_rate(succeeded: u64, failed: u64) -> HealthCheck {
    let total = succeeded + failed;
    if total < ERROR_RATE_MIN_SAMPLES {
        return HealthCheck::new("healthy", "Not enough invocations to judge error rate");
    }

    let rate = failed as f64 / total as f64;
    if rate > ERROR_RATE_THRESHOLD {
        HealthCheck::new(
            "degraded",
            format!("{failed} of {total} invocations failed"),
        )
    } else {
        HealthCheck::new("healthy", format!("{failed} of {total} invocations failed"))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: Option<String>,
    pub last_check: u64,
}

impl HealthCheck {
    fn new(status: &str, message: impl Into<String>) -> Self {
        Self {
            status: status.to_string(),
            message: Some(message.into()),
            last_check: current_timestamp(),
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: String,
    timestamp: u64,
    server: String,
    uptime_seconds: u64,
    checks: HashMap<String, HealthCheck>,
}

#[derive(Debug, Serialize)]
struct LivenessResponse {
    alive: bool,
    timestamp: u64,
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn server(metrics: Arc<MetricsCollector>) -> Arc<HealthServer> {
        Arc::new(HealthServer::new(
            "naver-search-mcp".to_string(),
            ([127, 0, 0, 1], 0).into(),
            metrics,
        ))
    }

    #[test]
    fn test_error_rate_check() {
        assert_eq!(check_error_rate(0, 3).status, "healthy");
        assert_eq!(check_error_rate(8, 4).status, "healthy");
        assert_eq!(check_error_rate(2, 10).status, "degraded");
    }

    #[test]
    fn test_transport_check() {
        assert_eq!(check_transport(true).status, "healthy");
        assert_eq!(check_transport(false).status, "unhealthy");
    }

    #[tokio::test]
    async fn test_health_route_reflects_serving_state() {
        let health = server(Arc::new(MetricsCollector::new()));
        let routes = health.clone().routes();

        let response = warp::test::request()
            .method("GET")
            .path("/health")
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        health.set_serving(true);
        let response = warp::test::request()
            .method("GET")
            .path("/health")
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["server"], "naver-search-mcp");
    }

    #[tokio::test]
    async fn test_metrics_route_exports_snapshot() {
        let metrics = Arc::new(MetricsCollector::new());
        metrics.tool_executed("news-search", Duration::from_millis(10), true);
        let routes = server(metrics).routes();

        let response = warp::test::request()
            .method("GET")
            .path("/metrics")
            .reply(&routes)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["tools"]["tool_stats"]["news-search"]["executions"], 1);
    }

    #[tokio::test]
    async fn test_live_route() {
        let routes = server(Arc::new(MetricsCollector::new())).routes();

        let response = warp::test::request()
            .method("GET")
            .path("/live")
            .reply(&routes)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
    }
}
