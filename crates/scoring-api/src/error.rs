//! Error types of the request pipeline and the server bootstrap

use scoring_domain::StatusCode;
use scoring_gatekeeper::ValidationError;
use thiserror::Error;

/// Failure of a single request
///
/// Every variant maps to a response code; none leaves the pipeline
/// unconverted.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body is not a JSON object
    #[error("Bad Request: {0}")]
    BadRequest(String),

    /// Token does not match the claimed identity
    #[error("Forbidden")]
    Forbidden,

    /// Unknown method or route
    #[error("Not Found: {0}")]
    NotFound(String),

    /// Schema violation
    #[error("Invalid Request: {0}")]
    Invalid(#[from] ValidationError),

    /// Arguments are well-formed but break a method rule
    #[error("Invalid Request: {0}")]
    BusinessRule(String),

    /// Anything else
    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Response code of this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BadRequest,
            ApiError::Forbidden => StatusCode::Forbidden,
            ApiError::NotFound(_) => StatusCode::NotFound,
            ApiError::Invalid(_) | ApiError::BusinessRule(_) => StatusCode::InvalidRequest,
            ApiError::Internal(_) => StatusCode::InternalError,
        }
    }
}

/// Failure to start or run the server
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Store could not be opened
    #[error("Store error: {0}")]
    Store(#[from] scoring_store::StoreError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Logging could not be initialized
    #[error("Logging setup failed: {0}")]
    Telemetry(String),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoring_gatekeeper::Rule;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BadRequest);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::Forbidden);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NotFound);
        assert_eq!(ApiError::BusinessRule("x".into()).status(), StatusCode::InvalidRequest);
        assert_eq!(ApiError::Internal("x".into()).status(), StatusCode::InternalError);
    }

    #[test]
    fn test_validation_error_message() {
        let error = ApiError::from(ValidationError::Field {
            field: "phone",
            rule: Rule::Phone {
                length: 11,
                prefix: '7',
            },
        });
        assert_eq!(error.status(), StatusCode::InvalidRequest);
        assert_eq!(
            error.to_string(),
            "Invalid Request: field 'phone' must be 11 digits starting with '7'"
        );
    }
}
