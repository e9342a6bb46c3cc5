//! Readiness endpoint

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use serde_json::Value;

use crate::state::AppState;

/// `/_readyz`: 200 when MongoDB answers a ping, 503 otherwise
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/_readyz", get(readiness_check))
        .with_state(state)
}

async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let client = state.mongo_client.clone();
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "mongodb",
        Box::pin(async move {
            let status = database::mongodb::check_health_detailed(&client).await;
            tracing::debug!(response_time_ms = status.response_time_ms, "MongoDB ping");
            if status.healthy {
                Ok(())
            } else {
                Err(status.message.unwrap_or_default())
            }
        }),
    )];

    match run_health_checks(checks).await {
        Ok(ready) => ready,
        Err(not_ready) => not_ready,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment};
    use axum::body::Body;
    use axum::http::Request;
    use core_config::{app_info, server::ServerConfig};
    use database::mongodb::MongoConfig;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_readyz_reports_unreachable_mongodb() {
        let uri = "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200";
        let mongo_client = mongodb::Client::with_uri_str(uri).await.unwrap();
        let state = AppState {
            config: Config {
                app: app_info!(),
                mongodb: MongoConfig::with_database(uri, "users"),
                server: ServerConfig::default(),
                environment: Environment::Development,
            },
            db: mongo_client.database("users"),
            mongo_client,
        };

        let response = router(state)
            .oneshot(Request::builder().uri("/_readyz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "not ready");
        assert_eq!(body["mongodb"], "disconnected");
    }
}
