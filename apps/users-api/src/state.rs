//! Shared application state.

use mongodb::{Client, Database};

/// Cloned into every router that needs it; all fields are cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// Shares the driver's connection pool across clones
    pub mongo_client: Client,
    pub db: Database,
}
