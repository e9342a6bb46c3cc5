use async_trait::async_trait;

use crate::error::UserResult;
use crate::models::{ListQuery, User, UserCreateData, UserUpdateData};

/// Persistence contract for users.
///
/// Identifiers are opaque strings; translating them to a store-native form
/// is the implementation's job. A malformed identifier behaves exactly like
/// one that matches nothing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Newest first. `query.page` records are skipped before a window of
    /// `query.limit`; an empty result is not an error.
    async fn list(&self, query: ListQuery) -> UserResult<Vec<User>>;

    /// Stores a new user and returns its identifier. `data.password` must
    /// already be hashed.
    async fn create(&self, data: UserCreateData) -> UserResult<String>;

    /// Applies the present fields of `patch`, refreshes `updated_at` and
    /// returns the record as it is after the update.
    async fn update(&self, id: &str, patch: UserUpdateData) -> UserResult<User>;

    async fn delete(&self, id: &str) -> UserResult<()>;
}
