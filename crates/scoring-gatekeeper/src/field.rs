//! Field constraints
//!
//! A [`FieldConstraint`] decides whether one raw JSON value satisfies a named
//! field's contract and normalizes it. Presence and emptiness are checked
//! uniformly first, then the [`FieldKind`] rule runs.

use crate::error::{Rule, ValidationError};
use crate::ValidationConfig;
use chrono::{Datelike, NaiveDate};
use scoring_domain::Gender;
use serde_json::{Map, Value};

/// Accepted date layout (day.month.year)
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Value kinds a field can be constrained to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any string
    Char,
    /// A JSON object
    Arguments,
    /// A string with exactly one '@' between non-empty parts
    Email,
    /// Digits (string or integer) of fixed length and prefix
    Phone,
    /// A DD.MM.YYYY string
    Date,
    /// A date bounded by the earliest year and the minimum age
    BirthDay,
    /// An integer gender code
    Gender,
    /// A non-empty list of integers
    ClientIds,
}

/// Normalized value of a field that passed its rule
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Char, Email and Phone values
    Text(String),
    /// Arguments value
    Map(Map<String, Value>),
    /// Date and BirthDay values
    Date(NaiveDate),
    /// Gender value
    Gender(Gender),
    /// ClientIds value
    Ids(Vec<i64>),
}

impl FieldValue {
    /// Text payload, if this is a text value
    pub fn into_text(self) -> Option<String> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Map payload, if this is a map value
    pub fn into_map(self) -> Option<Map<String, Value>> {
        match self {
            FieldValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Date payload, if this is a date value
    pub fn into_date(self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(date) => Some(date),
            _ => None,
        }
    }

    /// Gender payload, if this is a gender value
    pub fn into_gender(self) -> Option<Gender> {
        match self {
            FieldValue::Gender(gender) => Some(gender),
            _ => None,
        }
    }

    /// Id list payload, if this is an id list
    pub fn into_ids(self) -> Option<Vec<i64>> {
        match self {
            FieldValue::Ids(ids) => Some(ids),
            _ => None,
        }
    }
}

/// Contract of a single named field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldConstraint {
    /// Field name as it appears in the request
    pub name: &'static str,
    /// Kind rule applied to present values
    pub kind: FieldKind,
    /// Absence is an error
    pub required: bool,
    /// Empty-equivalent values are accepted
    pub nullable: bool,
}

impl FieldConstraint {
    /// Optional, nullable field of the given kind
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            nullable: true,
        }
    }

    /// Mark the field as required
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Reject empty-equivalent values
    pub const fn non_nullable(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Check a raw value (`None` when absent) and normalize it
    ///
    /// Returns `Ok(None)` for an absent optional field.
    pub fn check(
        &self,
        value: Option<&Value>,
        config: &ValidationConfig,
        today: NaiveDate,
    ) -> Result<Option<FieldValue>, ValidationError> {
        let Some(value) = value else {
            if self.required {
                return Err(self.violation(Rule::Required));
            }
            return Ok(None);
        };

        if !self.nullable && is_empty_equivalent(value) {
            return Err(self.violation(Rule::Empty));
        }

        self.kind
            .apply(value, config, today)
            .map(Some)
            .map_err(|rule| self.violation(rule))
    }

    fn violation(&self, rule: Rule) -> ValidationError {
        ValidationError::Field {
            field: self.name,
            rule,
        }
    }
}

impl FieldKind {
    /// Apply this kind's rule to a present value
    pub fn apply(
        &self,
        value: &Value,
        config: &ValidationConfig,
        today: NaiveDate,
    ) -> Result<FieldValue, Rule> {
        match self {
            FieldKind::Char => as_str(value).map(|s| FieldValue::Text(s.to_string())),
            FieldKind::Arguments => value
                .as_object()
                .map(|map| FieldValue::Map(map.clone()))
                .ok_or(Rule::NotObject),
            FieldKind::Email => check_email(as_str(value)?).map(FieldValue::Text),
            FieldKind::Phone => check_phone(value, config).map(FieldValue::Text),
            FieldKind::Date => parse_date(value).map(FieldValue::Date),
            FieldKind::BirthDay => check_birthday(parse_date(value)?, config, today)
                .map(FieldValue::Date),
            FieldKind::Gender => value
                .as_i64()
                .and_then(Gender::from_code)
                .map(FieldValue::Gender)
                .ok_or(Rule::Gender),
            FieldKind::ClientIds => check_client_ids(value).map(FieldValue::Ids),
        }
    }
}

/// Empty string, empty object, empty list or numeric zero
pub fn is_empty_equivalent(value: &Value) -> bool {
    match value {
        Value::String(s) => s.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

fn as_str(value: &Value) -> Result<&str, Rule> {
    value.as_str().ok_or(Rule::NotString)
}

fn check_email(email: &str) -> Result<String, Rule> {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => {
            Ok(email.to_string())
        }
        _ => Err(Rule::Email),
    }
}

fn check_phone(value: &Value, config: &ValidationConfig) -> Result<String, Rule> {
    let rule = || Rule::Phone {
        length: config.phone_length,
        prefix: config.phone_prefix,
    };

    let digits = match value {
        Value::String(s) => phone_digits(s).ok_or_else(rule)?,
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().and_then(integral_u64))
            .map(|n| n.to_string())
            .ok_or_else(rule)?,
        _ => return Err(rule()),
    };

    if digits.len() != config.phone_length || !digits.starts_with(config.phone_prefix) {
        return Err(rule());
    }
    Ok(digits)
}

/// Digits of a phone string: surrounding whitespace and one leading '+' allowed
fn phone_digits(text: &str) -> Option<String> {
    let text = text.trim();
    let digits = text.strip_prefix('+').unwrap_or(text);
    (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())).then(|| digits.to_string())
}

/// Non-negative whole number below 2^53, where every integer is exact
fn integral_u64(n: f64) -> Option<u64> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    (n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n < MAX_EXACT).then_some(n as u64)
}

fn parse_date(value: &Value) -> Result<NaiveDate, Rule> {
    let text = value.as_str().ok_or(Rule::Date)?;
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| Rule::Date)
}

fn check_birthday(
    birthday: NaiveDate,
    config: &ValidationConfig,
    today: NaiveDate,
) -> Result<NaiveDate, Rule> {
    if birthday.year() < config.min_birth_year {
        return Err(Rule::TooOld(config.min_birth_year));
    }
    if age_on(birthday, today) < i64::from(config.min_age) {
        return Err(Rule::Underage(config.min_age));
    }
    Ok(birthday)
}

/// Whole years between `birthday` and `today` (negative for future dates)
fn age_on(birthday: NaiveDate, today: NaiveDate) -> i64 {
    let mut years = i64::from(today.year()) - i64::from(birthday.year());
    if (today.month(), today.day()) < (birthday.month(), birthday.day()) {
        years -= 1;
    }
    years
}

fn check_client_ids(value: &Value) -> Result<Vec<i64>, Rule> {
    let items = value.as_array().ok_or(Rule::NotList)?;
    if items.is_empty() {
        return Err(Rule::EmptyIds);
    }
    items
        .iter()
        .map(|item| match item.as_i64() {
            Some(id) => Ok(id),
            None if item.is_u64() => Err(Rule::IdOutOfRange),
            None => Err(Rule::NonIntegerId),
        })
        .collect()
}
