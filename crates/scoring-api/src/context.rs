//! Per-request observability record.
//!
//! Handlers note what they saw here; the transport logs it once the response
//! is produced. Nothing in it influences a result.

/// What a single request did, for the access log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Caller-supplied or generated request id
    pub request_id: String,

    /// `online_score`: argument names the caller supplied
    pub has: Option<Vec<&'static str>>,

    /// `clients_interests`: number of ids processed
    pub nclients: Option<usize>,
}

impl RequestContext {
    /// Fresh context for the request `request_id`
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            ..Default::default()
        }
    }
}
