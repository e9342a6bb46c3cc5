use axum::{Json, Router, http::StatusCode, routing::get};
use futures::future::join_all;
use serde_json::{Value, json};
use std::future::Future;
use std::pin::Pin;

/// A boxed future for health checks with a string error
pub type HealthCheckFuture<'a> = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'a>>;

/// Runs multiple health checks concurrently and returns aggregated results.
///
/// 200 with `{"status": "ready", "<name>": "connected", ...}` when every check
/// passes, otherwise 503 with `"not ready"` and the failing checks marked
/// `"disconnected"`.
///
/// # Example
/// ```ignore
/// let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
///     "mongodb",
///     Box::pin(async { check_health(&client).await.map_err(|e| e.to_string()) }),
/// )];
/// run_health_checks(checks).await
/// ```
pub async fn run_health_checks(
    checks: Vec<(&str, HealthCheckFuture<'_>)>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let names: Vec<_> = checks.iter().map(|(name, _)| *name).collect();
    let futures: Vec<_> = checks.into_iter().map(|(_, check)| check).collect();
    let results = join_all(futures).await;

    let mut response = serde_json::Map::new();
    let mut all_healthy = true;

    for (name, result) in names.into_iter().zip(results) {
        let status = match result {
            Ok(_) => "connected",
            Err(e) => {
                tracing::error!(check = name, error = %e, "Readiness check failed");
                all_healthy = false;
                "disconnected"
            }
        };
        response.insert(name.to_string(), json!(status));
    }

    response.insert(
        "status".to_string(),
        json!(if all_healthy { "ready" } else { "not ready" }),
    );

    if all_healthy {
        Ok((StatusCode::OK, Json(Value::Object(response))))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(Value::Object(response))))
    }
}

/// Liveness probe: 200 with body `ok` whenever the process serves requests.
pub async fn health_handler() -> &'static str {
    "ok"
}

/// Creates a router with the `/_healthz` liveness endpoint.
pub fn health_router() -> Router {
    Router::new().route("/_healthz", get(health_handler))
}
