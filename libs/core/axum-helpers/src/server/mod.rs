//! Server infrastructure.
//!
//! - Router assembly with OpenAPI documentation and cross-cutting layers
//! - Liveness and readiness endpoints
//! - Graceful shutdown coordination
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//!
//! let app = create_router::<ApiDoc>(api_routes, &server_config).merge(health_router());
//! create_production_app(app, &server_config, Duration::from_secs(30), async {}).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{API_BASE_PATH, create_production_app, create_router};
pub use health::{HealthCheckFuture, health_router, run_health_checks};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
