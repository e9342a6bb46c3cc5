//! Users Domain
//!
//! CRUD over a single collection of user records, stored in MongoDB.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, fixed per-operation error messages
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Password hashing, delegation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Trait + MongoDB and in-memory implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entity, DTOs, query parameters
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{handlers, MongoUserRepository, UserService};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("users");
//!
//! let repository = MongoUserRepository::new(db);
//! repository.init_indexes().await?;
//!
//! let router = handlers::router(UserService::new(repository));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod password;
pub mod repository;
pub mod service;

pub use crate::mongodb::MongoUserRepository;
pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use memory::InMemoryUserRepository;
pub use models::{
    CreateUserResponse, ListQuery, ListUsersResponse, User, UserCreateData, UserUpdateData,
};
pub use repository::UserRepository;
pub use service::UserService;
