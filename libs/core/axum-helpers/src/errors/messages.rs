//! Fixed client-facing messages shared across services

pub const PARSE_BODY_FAILED: &str = "failed to parse request body";
pub const INVALID_QUERY: &str = "invalid query parameters";
pub const ROUTE_NOT_FOUND: &str = "the requested resource was not found";
pub const REQUEST_TIMED_OUT: &str = "request timed out";
