//! Response envelope

use crate::error::ApiError;
use scoring_domain::StatusCode;
use serde_json::{json, Value};

/// Result of one pipeline run, ready to be rendered
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Response code; also the HTTP status
    pub code: StatusCode,
    /// Handler payload on success, error message otherwise
    pub body: Result<Value, String>,
}

impl Outcome {
    /// Successful outcome carrying `payload`
    pub fn ok(payload: Value) -> Self {
        Self {
            code: StatusCode::Ok,
            body: Ok(payload),
        }
    }

    /// `{"response": ..., "code": 200}` or `{"error": ..., "code": ...}`
    pub fn to_json(&self) -> Value {
        match &self.body {
            Ok(payload) => json!({ "response": payload, "code": self.code.as_u16() }),
            Err(message) => json!({ "error": message, "code": self.code.as_u16() }),
        }
    }
}

impl From<ApiError> for Outcome {
    fn from(error: ApiError) -> Self {
        Self {
            code: error.status(),
            body: Err(error.to_string()),
        }
    }
}

impl From<Result<Value, ApiError>> for Outcome {
    fn from(result: Result<Value, ApiError>) -> Self {
        match result {
            Ok(payload) => Outcome::ok(payload),
            Err(error) => error.into(),
        }
    }
}
