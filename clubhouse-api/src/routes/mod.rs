/// API route handlers, organized by resource
///
/// - `health`: liveness and database connectivity
/// - `clubs`: clubs, membership and roles
/// - `feeds`: club feeds
/// - `comments`: comments on feeds
/// - `users`: registration and profiles
///
/// Every handler answers with the success envelope; creations use HTTP 201.

use axum::{http::StatusCode, Json};
use clubhouse_shared::response::SuccessResponse;
use serde::Serialize;

pub mod clubs;
pub mod comments;
pub mod feeds;
pub mod health;
pub mod users;

pub type Envelope<T> = Json<SuccessResponse<T>>;

/// Payload of create and delete responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IdPayload {
    pub id: i64,
}

pub(crate) fn ok<T>(data: T, message: &str) -> Envelope<T> {
    Json(SuccessResponse::with_data(data, message))
}

pub(crate) fn created(id: i64, message: &str) -> (StatusCode, Envelope<IdPayload>) {
    (StatusCode::CREATED, ok(IdPayload { id }, message))
}
