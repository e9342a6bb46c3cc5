use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// User as returned by the API. Carries no password field at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// 24-character hex identifier
    #[schema(example = "65a1f0c2e4b0a1b2c3d4e5f6")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub email: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserCreateData {
    #[validate(length(min = 1))]
    #[schema(example = "Alice")]
    pub first_name: String,

    #[validate(length(min = 1))]
    #[schema(example = "Smith")]
    pub last_name: String,

    #[validate(length(min = 1))]
    #[schema(example = "al")]
    pub nickname: String,

    #[validate(length(min = 1))]
    #[schema(example = "alice@example.com")]
    pub email: String,

    #[validate(length(min = 1))]
    #[schema(example = "s3cret")]
    pub password: String,

    #[validate(length(min = 1))]
    #[schema(example = "UK")]
    pub country: String,
}

/// Request body for updating a user
///
/// Absent and `null` fields are left unchanged. An empty `password` is
/// treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateData {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub country: Option<String>,
}

impl UserUpdateData {
    /// Drops an empty password so it is never written.
    pub(crate) fn normalize_password(&mut self) {
        if self.password.as_deref().is_some_and(str::is_empty) {
            self.password = None;
        }
    }
}

/// Query parameters for listing users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Number of matching records to skip
    #[serde(default)]
    pub page: u64,

    /// Page size
    #[serde(default = "default_limit")]
    #[validate(range(min = 1))]
    #[param(minimum = 1, default = 10)]
    pub limit: i64,

    /// Exact-match country filter
    pub country: Option<String>,

    /// Exact-match email filter
    pub email: Option<String>,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 0,
            limit: DEFAULT_PAGE_LIMIT,
            country: None,
            email: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListUsersResponse {
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserResponse {
    #[schema(example = "65a1f0c2e4b0a1b2c3d4e5f6")]
    pub id: String,
}
