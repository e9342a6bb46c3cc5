//! # Axum Helpers
//!
//! Shared building blocks for the HTTP surface of the workspace's services.
//!
//! ## Modules
//!
//! - **[`server`]**: Router assembly, health endpoints, graceful shutdown
//! - **[`http`]**: HTTP middleware (security headers)
//! - **[`errors`]**: The `{ "message": ... }` error envelope and `AppError`
//! - **[`extractors`]**: Validating JSON body and query extractors
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::server::ServerConfig;
//! use std::time::Duration;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = ServerConfig::default();
//!     let app = create_router::<ApiDoc>(Router::new(), &config).merge(health_router());
//!     create_production_app(app, &config, Duration::from_secs(30), async {}).await
//! }
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

// Re-export server types
pub use server::{
    API_BASE_PATH, HealthCheckFuture, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

// Re-export HTTP middleware
pub use http::security_headers;

// Re-export error types
pub use errors::{AppError, ErrorResponse};

// Re-export extractors
pub use extractors::{ValidatedJson, ValidatedQuery};
