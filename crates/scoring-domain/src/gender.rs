//! Gender module - the coded gender carried by scoring requests

/// Gender code supplied by clients
///
/// Encoded on the wire as an integer:
/// - 0: Unknown
/// - 1: Male
/// - 2: Female
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    /// Not disclosed (code 0)
    Unknown,

    /// Code 1
    Male,

    /// Code 2
    Female,
}

impl Gender {
    /// Get the wire code
    pub fn code(&self) -> i64 {
        match self {
            Gender::Unknown => 0,
            Gender::Male => 1,
            Gender::Female => 2,
        }
    }

    /// Parse a gender from its wire code
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Gender::Unknown),
            1 => Some(Gender::Male),
            2 => Some(Gender::Female),
            _ => None,
        }
    }

    /// Whether the gender was actually disclosed
    pub fn is_known(&self) -> bool {
        !matches!(self, Gender::Unknown)
    }
}
