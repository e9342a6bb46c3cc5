//! Database connectivity for the user service
//!
//! Connection management, configuration and health checks for MongoDB,
//! plus the retry helpers used while the process starts up.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB support
//! - `config` - Loading `MongoConfig` through `core_config::FromEnv`
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_from_config_with_retry};
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "users");
//! let client = connect_from_config_with_retry(&config, None).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
