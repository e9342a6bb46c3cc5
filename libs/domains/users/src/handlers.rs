use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppError, ErrorResponse, ValidatedJson, ValidatedQuery,
    errors::responses::{BadRequestResponse, InternalServerErrorResponse},
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{
    CreateUserResponse, ListQuery, ListUsersResponse, User, UserCreateData, UserUpdateData,
};
use crate::repository::UserRepository;
use crate::service::UserService;

const GET_USERS_FAILED: &str = "failed to get users";
const CREATE_USER_FAILED: &str = "failed to create user";
const UPDATE_USER_FAILED: &str = "failed to update user";
const DELETE_USER_FAILED: &str = "failed to delete user";

/// OpenAPI documentation for Users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, update_user, delete_user),
    components(
        schemas(
            User,
            UserCreateData,
            UserUpdateData,
            ListUsersResponse,
            CreateUserResponse,
            ErrorResponse
        ),
        responses(BadRequestResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "Users", description = "User management endpoints (MongoDB)")
    )
)]
pub struct ApiDoc;

/// Create the users router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/{id}",
            axum::routing::patch(update_user)
                .put(update_user)
                .delete(delete_user),
        )
        .with_state(shared_service)
}

/// List users, newest first
#[utoipa::path(
    get,
    path = "",
    tag = "Users",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of users", body = ListUsersResponse),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedQuery(query): ValidatedQuery<ListQuery>,
) -> Result<Json<ListUsersResponse>, AppError> {
    let users = service
        .list_users(query)
        .await
        .map_err(|e| e.into_app_error(GET_USERS_FAILED))?;
    Ok(Json(ListUsersResponse { users }))
}

/// Create a user
#[utoipa::path(
    post,
    path = "",
    tag = "Users",
    request_body = UserCreateData,
    responses(
        (status = 201, description = "User created", body = CreateUserResponse),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<UserCreateData>,
) -> Result<impl IntoResponse, AppError> {
    let id = service
        .create_user(input)
        .await
        .map_err(|e| e.into_app_error(CREATE_USER_FAILED))?;
    Ok((StatusCode::CREATED, Json(CreateUserResponse { id })))
}

/// Update a user; only the fields present in the body are changed
#[utoipa::path(
    method(patch, put),
    path = "/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID (24-character hex)")
    ),
    request_body = UserUpdateData,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<UserUpdateData>,
) -> Result<Json<User>, AppError> {
    let user = service
        .update_user(&id, patch)
        .await
        .map_err(|e| e.into_app_error(UPDATE_USER_FAILED))?;
    Ok(Json(user))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID (24-character hex)")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    service
        .delete_user(&id)
        .await
        .map_err(|e| e.into_app_error(DELETE_USER_FAILED))?;
    Ok(StatusCode::NO_CONTENT)
}
