//! Gatekeeper configuration

/// Limits applied by the field rules
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Earliest accepted birth year
    pub min_birth_year: i32,

    /// Minimum age in whole years on the evaluation date
    pub min_age: u32,

    /// Exact digit count of a phone number
    pub phone_length: usize,

    /// Leading digit of a phone number
    pub phone_prefix: char,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_birth_year: 1920,
            min_age: 18,
            phone_length: 11,
            phone_prefix: '7',
        }
    }
}
