//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({ "message": "failed to update user" })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - body or parameters could not be decoded",
    content_type = "application/json",
    example = json!({ "message": "failed to parse request body" })
)]
pub struct BadRequestResponse(pub ErrorResponse);
