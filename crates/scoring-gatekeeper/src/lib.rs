//! Scoring Gatekeeper
//!
//! Validates untrusted request payloads before anything acts on them.
//!
//! The Gatekeeper provides:
//! - Field constraints (type, nullability and format rules per field)
//! - Schemas binding ordered field tables to typed requests
//! - A fail-fast Validator producing typed, immutable requests
//!
//! # Examples
//!
//! ```
//! use scoring_gatekeeper::{Validator, METHOD_ENVELOPE};
//! use serde_json::json;
//!
//! let validator = Validator::default_config();
//! let today = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let raw = json!({"login": "h&f", "token": "", "method": "online_score", "arguments": {}});
//!
//! let request = validator.validate(&METHOD_ENVELOPE, &raw, today).unwrap();
//! assert_eq!(request.value().method, "online_score");
//! ```

#![warn(missing_docs)]

mod config;
mod error;
pub mod field;
pub mod request;
pub mod schema;
mod validator;

pub use config::ValidationConfig;
pub use error::{Rule, ValidationError};
pub use field::{FieldConstraint, FieldKind, FieldValue};
pub use request::{
    ClientsInterestsRequest, MethodRequest, OnlineScoreRequest, CLIENTS_INTERESTS_ARGS,
    METHOD_ENVELOPE, ONLINE_SCORE_ARGS,
};
pub use schema::{FieldSpec, Schema};
pub use validator::{ValidatedRequest, Validator};
