//! Wires the users domain to MongoDB.

use axum::Router;
use domain_users::{MongoUserRepository, UserService, handlers};
use tracing::info;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = MongoUserRepository::new(state.db.clone());
    handlers::router(UserService::new(repository))
}

/// Create the indexes the users collection relies on
pub async fn init_indexes(db: &mongodb::Database) -> eyre::Result<()> {
    MongoUserRepository::new(db.clone())
        .init_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create user indexes: {}", e))?;
    info!("User collection indexes created");
    Ok(())
}
