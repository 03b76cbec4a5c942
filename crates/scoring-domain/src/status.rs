//! Response status codes carried in the `code` field of every response

/// Outcome code of a handled request
///
/// The numeric value doubles as the HTTP status of the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// 200: handled successfully
    Ok,

    /// 400: body is not a JSON object
    BadRequest,

    /// 403: token does not match the claimed identity
    Forbidden,

    /// 404: unknown method or route
    NotFound,

    /// 422: schema or business-rule violation
    InvalidRequest,

    /// 500: unexpected internal failure
    InternalError,
}

impl StatusCode {
    /// Numeric code
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::InvalidRequest => 422,
            StatusCode::InternalError => 500,
        }
    }

    /// Default message for error responses
    pub fn reason(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::InvalidRequest => "Invalid Request",
            StatusCode::InternalError => "Internal Server Error",
        }
    }

    /// Whether the code denotes an error
    pub fn is_error(&self) -> bool {
        !matches!(self, StatusCode::Ok)
    }
}
