/// Response envelope
///
/// Every boundary call answers with exactly one of two shapes, both serialized
/// as `{status, code, data, message}`:
///
/// - [`SuccessResponse`]: status 200, code 20000, optional payload
/// - [`ErrorResponse`]: status and code of the registry entry that produced it
///
/// # Example
///
/// ```
/// use clubhouse_shared::response::{ErrorResponse, SuccessResponse};
/// use clubhouse_shared::error::ServiceError;
///
/// let ok = SuccessResponse::new(Some(7_i64), "Club created.");
/// assert_eq!(ok.code, 20000);
///
/// let failure = ErrorResponse::from_error(&ServiceError::ClubNotFound);
/// assert_eq!(failure.status, 404);
/// ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ServiceError;

pub const SUCCESS_STATUS: u16 = 200;
pub const SUCCESS_CODE: u32 = 20000;

/// Success envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    pub status: u16,
    pub code: u32,
    pub data: Option<T>,
    pub message: String,
}

impl<T> SuccessResponse<T> {
    pub fn new(data: Option<T>, message: impl Into<String>) -> Self {
        Self {
            status: SUCCESS_STATUS,
            code: SUCCESS_CODE,
            data,
            message: message.into(),
        }
    }

    /// Success with a payload
    pub fn with_data(data: T, message: impl Into<String>) -> Self {
        Self::new(Some(data), message)
    }
}

/// Failure envelope
///
/// Built only from a [`ServiceError`], so the status/code pair always comes
/// from the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub code: u32,
    pub data: Option<Value>,
    pub message: String,
}

impl ErrorResponse {
    pub fn from_error(err: &ServiceError) -> Self {
        let entry = err.entry();
        Self {
            status: entry.status,
            code: entry.code,
            data: err.data(),
            message: entry.message.to_string(),
        }
    }

    /// Replaces the structured payload
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

impl From<&ServiceError> for ErrorResponse {
    fn from(err: &ServiceError) -> Self {
        ErrorResponse::from_error(err)
    }
}
