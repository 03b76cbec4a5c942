//! Gatekeeper error types

use thiserror::Error;

/// First violation found while validating a request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Input is not a JSON object
    #[error("request must be a JSON object")]
    NotAnObject,

    /// A field every request of this shape must carry is absent
    #[error("missing required field '{0}'")]
    MissingJoint(&'static str),

    /// A single field broke its constraint
    #[error("field '{field}' {rule}")]
    Field {
        /// Name of the offending field
        field: &'static str,
        /// The rule it broke
        rule: Rule,
    },
}

impl ValidationError {
    /// Name of the field that failed, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::NotAnObject => None,
            ValidationError::MissingJoint(field) => Some(field),
            ValidationError::Field { field, .. } => Some(field),
        }
    }
}

/// Rule broken by a field value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Absent but required
    #[error("is required")]
    Required,

    /// Empty value for a non-nullable field
    #[error("must not be empty")]
    Empty,

    /// Not a string
    #[error("must be a string")]
    NotString,

    /// Not an object
    #[error("must be an object")]
    NotObject,

    /// Not exactly one '@' between non-empty parts
    #[error("must be an email address with exactly one '@'")]
    Email,

    /// Wrong digit count or prefix
    #[error("must be {length} digits starting with '{prefix}'")]
    Phone {
        /// Expected digit count
        length: usize,
        /// Expected leading digit
        prefix: char,
    },

    /// Not a DD.MM.YYYY date
    #[error("must be a date in DD.MM.YYYY format")]
    Date,

    /// Birth year before the lower bound
    #[error("must not be earlier than {0}")]
    TooOld(i32),

    /// Younger than the minimum age
    #[error("must describe someone at least {0} years old")]
    Underage(u32),

    /// Gender code outside {0, 1, 2}
    #[error("must be one of 0, 1, 2")]
    Gender,

    /// Not a list
    #[error("must be a list")]
    NotList,

    /// Empty id list
    #[error("must contain at least one id")]
    EmptyIds,

    /// List element is not an integer
    #[error("must contain only integers")]
    NonIntegerId,

    /// Integer id outside the signed 64-bit range
    #[error("must contain ids within the signed 64-bit range")]
    IdOutOfRange,
}
