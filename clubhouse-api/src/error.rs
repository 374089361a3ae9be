/// Transport error type
///
/// Handlers return [`ApiResult`]. Every failure renders as the failure
/// envelope `{status, code, data, message}` with the HTTP status taken from
/// the registry entry.
///
/// Request-shape problems (bad JSON, bad path or query values, `validator`
/// failures) are `BadRequest` entries; validation failures list the offending
/// fields in `data.errors`.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use clubhouse_shared::{auth::jwt::JwtError, error::ServiceError, response::ErrorResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::ValidationErrors;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Validation failed: {} errors", .0.len())]
    Validation(Vec<ValidationErrorDetail>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    pub field: String,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(reason: impl Into<String>) -> Self {
        ApiError::Service(ServiceError::bad_request(reason))
    }

    fn envelope(&self) -> ErrorResponse {
        match self {
            ApiError::Service(err) => ErrorResponse::from_error(err),
            ApiError::Validation(details) => {
                ErrorResponse::from_error(&ServiceError::bad_request("validation failed"))
                    .with_data(json!({ "errors": details }))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Service(ServiceError::InternalServerError(detail)) => {
                tracing::error!(detail = %detail, "Internal error");
            }
            ApiError::Service(err) => tracing::debug!(error = %err, "Request failed"),
            ApiError::Validation(details) => {
                tracing::debug!(count = details.len(), "Request validation failed")
            }
        }

        let body = self.envelope();
        let status =
            StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(body)).into_response()
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        ApiError::Service(err.into())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                let field = field.to_string();
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.clone(),
                    message: error
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| error.code.to_string()),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::Validation(details)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::from(ServiceError::ClubNotFound);
        assert_eq!(err.to_string(), "Club not found");

        let err = ApiError::Validation(vec![]);
        assert_eq!(err.to_string(), "Validation failed: 0 errors");
    }

    #[test]
    fn test_status_follows_registry() {
        let response = ApiError::from(ServiceError::TokenExpired).into_response();
        assert_eq!(response.status().as_u16(), 419);

        let response = ApiError::from(ServiceError::MembershipAlreadyExists).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_validation_errors_become_bad_request() {
        let errors = Sample {
            name: String::new(),
        }
        .validate()
        .unwrap_err();

        let err = ApiError::from(errors);
        let envelope = err.envelope();
        assert_eq!(envelope.status, 400);
        assert_eq!(envelope.code, 40000);
        assert_eq!(
            envelope.data,
            Some(json!({ "errors": [{ "field": "name", "message": "Name is required" }] }))
        );
    }

    #[test]
    fn test_expired_token_maps_to_registry() {
        let err = ApiError::from(JwtError::Expired);
        assert!(matches!(err, ApiError::Service(ServiceError::TokenExpired)));
    }
}
