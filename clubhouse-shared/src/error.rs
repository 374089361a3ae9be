/// Error registry
///
/// Every failure a service can report is one of the fixed entries below. Each
/// entry carries an HTTP-style status, a domain code and a default message;
/// services never build ad-hoc status/code pairs.
///
/// | Entry | Status | Code |
/// |---|---|---|
/// | `BadRequest` | 400 | 40000 |
/// | `PasswordNotMatch` | 401 | 40100 |
/// | `InvalidToken` | 401 | 40101 |
/// | `TokenExpired` | 419 | 41900 |
/// | `UserNotFound` | 404 | 40400 |
/// | `ClubNotFound` | 404 | 40401 |
/// | `CategoryNotFound` | 404 | 40402 |
/// | `FeedNotFound` | 404 | 40403 |
/// | `CommentNotFound` | 404 | 40404 |
/// | `ClubNameAlreadyExists` | 409 | 40900 |
/// | `CategoryNameAlreadyExists` | 409 | 40901 |
/// | `MembershipAlreadyExists` | 409 | 40902 |
/// | `InternalServerError` | 500 | 50000 |
///
/// # Example
///
/// ```
/// use clubhouse_shared::error::ServiceError;
///
/// let err = ServiceError::ClubNotFound;
/// assert_eq!(err.status(), 404);
/// assert_eq!(err.code(), 40401);
/// ```

use serde_json::{json, Value};

use crate::repository::{constraints, StoreError};

/// Result alias used by every service operation
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Registry entry: the (status, code, message) triple bound to a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorEntry {
    /// HTTP-style status
    pub status: u16,

    /// Domain-specific code
    pub code: u32,

    /// Default human-readable message
    pub message: &'static str,
}

/// The failure conditions a service may raise
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Malformed input reaching a service, or a refused ownership/role check
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Credential mismatch
    #[error("Password does not match")]
    PasswordNotMatch,

    /// Unparseable or forged identity token
    #[error("Invalid token")]
    InvalidToken,

    /// Identity token past validity
    #[error("Token expired")]
    TokenExpired,

    #[error("User not found")]
    UserNotFound,

    #[error("Club not found")]
    ClubNotFound,

    /// Reserved for the category subsystem
    #[error("Category not found")]
    CategoryNotFound,

    /// Feed absent, deleted, or hidden from the requester
    #[error("Feed not found")]
    FeedNotFound,

    /// Comment absent, deleted, or hidden from the requester
    #[error("Comment not found")]
    CommentNotFound,

    #[error("Club name already exists")]
    ClubNameAlreadyExists,

    /// Reserved for the category subsystem
    #[error("Category name already exists")]
    CategoryNameAlreadyExists,

    /// A live membership already exists for the (user, club) pair
    #[error("Membership already exists")]
    MembershipAlreadyExists,

    /// Any fault without a registry entry of its own
    ///
    /// The detail is logged but never sent to callers.
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl ServiceError {
    /// Shorthand for a `BadRequest` with a reason
    pub fn bad_request(reason: impl Into<String>) -> Self {
        ServiceError::BadRequest(reason.into())
    }

    /// Shorthand for an `InternalServerError` with a detail
    pub fn internal(detail: impl Into<String>) -> Self {
        ServiceError::InternalServerError(detail.into())
    }

    /// Returns the registry entry for this failure
    pub fn entry(&self) -> ErrorEntry {
        let (status, code, message) = match self {
            ServiceError::BadRequest(_) => (400, 40000, "Bad request."),
            ServiceError::PasswordNotMatch => (401, 40100, "Password does not match."),
            ServiceError::InvalidToken => (401, 40101, "Invalid token."),
            ServiceError::TokenExpired => (419, 41900, "Token has expired."),
            ServiceError::UserNotFound => (404, 40400, "User not found."),
            ServiceError::ClubNotFound => (404, 40401, "Club not found."),
            ServiceError::CategoryNotFound => (404, 40402, "Category not found."),
            ServiceError::FeedNotFound => (404, 40403, "Feed not found."),
            ServiceError::CommentNotFound => (404, 40404, "Comment not found."),
            ServiceError::ClubNameAlreadyExists => (409, 40900, "Club name already exists."),
            ServiceError::CategoryNameAlreadyExists => {
                (409, 40901, "Category name already exists.")
            }
            ServiceError::MembershipAlreadyExists => {
                (409, 40902, "User is already a member of this club.")
            }
            ServiceError::InternalServerError(_) => (
                500,
                50000,
                "Internal server error. Please contact the administrator.",
            ),
        };

        ErrorEntry {
            status,
            code,
            message,
        }
    }

    pub fn status(&self) -> u16 {
        self.entry().status
    }

    pub fn code(&self) -> u32 {
        self.entry().code
    }

    pub fn message(&self) -> &'static str {
        self.entry().message
    }

    /// Structured payload attached to the failure envelope
    ///
    /// Only `BadRequest` carries one (its reason). Internal details stay in the logs.
    pub fn data(&self) -> Option<Value> {
        match self {
            ServiceError::BadRequest(reason) => Some(json!({ "reason": reason })),
            _ => None,
        }
    }
}

/// Translates storage faults into registry entries
///
/// Unique violations are mapped by constraint name so a writer that loses a
/// race still sees the proper conflict entry.
impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(constraint) => match constraint.as_str() {
                constraints::CLUB_NAME => ServiceError::ClubNameAlreadyExists,
                constraints::MEMBERSHIP_PAIR => ServiceError::MembershipAlreadyExists,
                constraints::USER_EMAIL => ServiceError::bad_request("email is already in use"),
                constraints::USER_SOCIAL_ID => {
                    ServiceError::bad_request("social id is already in use")
                }
                other => {
                    tracing::error!(constraint = other, "Unmapped unique constraint violation");
                    ServiceError::internal(format!("unique constraint violated: {}", other))
                }
            },
            StoreError::Backend(detail) => ServiceError::InternalServerError(detail),
        }
    }
}

impl From<crate::auth::password::PasswordError> for ServiceError {
    fn from(err: crate::auth::password::PasswordError) -> Self {
        ServiceError::internal(format!("Password operation failed: {}", err))
    }
}

impl From<crate::auth::jwt::JwtError> for ServiceError {
    fn from(err: crate::auth::jwt::JwtError) -> Self {
        match err {
            crate::auth::jwt::JwtError::Expired => ServiceError::TokenExpired,
            crate::auth::jwt::JwtError::CreateError(msg) => ServiceError::InternalServerError(msg),
            _ => ServiceError::InvalidToken,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_entries() {
        let cases = [
            (ServiceError::bad_request("x"), 400, 40000),
            (ServiceError::PasswordNotMatch, 401, 40100),
            (ServiceError::InvalidToken, 401, 40101),
            (ServiceError::TokenExpired, 419, 41900),
            (ServiceError::UserNotFound, 404, 40400),
            (ServiceError::ClubNotFound, 404, 40401),
            (ServiceError::CategoryNotFound, 404, 40402),
            (ServiceError::FeedNotFound, 404, 40403),
            (ServiceError::CommentNotFound, 404, 40404),
            (ServiceError::ClubNameAlreadyExists, 409, 40900),
            (ServiceError::CategoryNameAlreadyExists, 409, 40901),
            (ServiceError::MembershipAlreadyExists, 409, 40902),
            (ServiceError::internal("boom"), 500, 50000),
        ];

        for (err, status, code) in cases {
            assert_eq!(err.status(), status, "{:?}", err);
            assert_eq!(err.code(), code, "{:?}", err);
            assert!(!err.message().is_empty());
        }
    }

    #[test]
    fn test_unique_violation_mapping() {
        let err: ServiceError = StoreError::UniqueViolation(constraints::CLUB_NAME.to_string()).into();
        assert_eq!(err, ServiceError::ClubNameAlreadyExists);

        let err: ServiceError =
            StoreError::UniqueViolation(constraints::MEMBERSHIP_PAIR.to_string()).into();
        assert_eq!(err, ServiceError::MembershipAlreadyExists);

        let err: ServiceError = StoreError::UniqueViolation(constraints::USER_EMAIL.to_string()).into();
        assert_eq!(err.code(), 40000);
    }

    #[test]
    fn test_unmapped_faults_become_internal() {
        let err: ServiceError = StoreError::UniqueViolation("mystery_key".to_string()).into();
        assert_eq!(err.code(), 50000);

        let err: ServiceError = StoreError::Backend("connection reset".to_string()).into();
        assert_eq!(err.code(), 50000);
        assert!(err.data().is_none());
    }

    #[test]
    fn test_bad_request_carries_reason() {
        let err = ServiceError::bad_request("limit must be positive");
        assert_eq!(err.data(), Some(json!({ "reason": "limit must be positive" })));
    }
}
