//! Request validation logic

use crate::schema::Schema;
use crate::{ValidationConfig, ValidationError};
use chrono::NaiveDate;
use serde_json::{Map, Value};

/// Typed request produced by a successful validation pass
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest<T> {
    value: T,
    supplied: Vec<&'static str>,
}

impl<T> ValidatedRequest<T> {
    /// The typed request
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Names of the schema fields the caller supplied, in schema order
    pub fn supplied(&self) -> &[&'static str] {
        &self.supplied
    }

    /// Whether the caller supplied `field`
    pub fn has(&self, field: &str) -> bool {
        self.supplied.iter().any(|name| *name == field)
    }

    /// Consume into the typed request
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// The Validator applies schemas to raw JSON input
///
/// Stateless apart from its limits; safe to share between requests.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new Validator with the given limits
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Create a Validator with default limits
    pub fn default_config() -> Self {
        Self::new(ValidationConfig::default())
    }

    /// Validate a raw JSON value against `schema`
    ///
    /// # Arguments
    ///
    /// * `schema` - Field table to apply
    /// * `raw` - Untrusted input; must be a JSON object
    /// * `today` - Evaluation date for age rules
    ///
    /// # Returns
    ///
    /// The typed request, or the first violation found
    pub fn validate<T: Default + 'static>(
        &self,
        schema: &Schema<T>,
        raw: &Value,
        today: NaiveDate,
    ) -> Result<ValidatedRequest<T>, ValidationError> {
        let map = raw.as_object().ok_or(ValidationError::NotAnObject)?;
        self.validate_map(schema, map, today)
    }

    /// Validate an already-decoded JSON object against `schema`
    ///
    /// Keys the schema does not declare are ignored. `null` counts as absent.
    pub fn validate_map<T: Default + 'static>(
        &self,
        schema: &Schema<T>,
        map: &Map<String, Value>,
        today: NaiveDate,
    ) -> Result<ValidatedRequest<T>, ValidationError> {
        let lookup = |name: &str| map.get(name).filter(|value| !value.is_null());

        if let Some(missing) = schema
            .jointly_required
            .iter()
            .copied()
            .find(|name| lookup(name).is_none())
        {
            return Err(ValidationError::MissingJoint(missing));
        }

        let mut value = T::default();
        let mut supplied = Vec::new();

        for spec in schema.fields {
            let constraint = &spec.constraint;
            if let Some(normalized) = constraint.check(lookup(constraint.name), &self.config, today)? {
                (spec.set)(&mut value, normalized);
                supplied.push(constraint.name);
            }
        }

        Ok(ValidatedRequest { value, supplied })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Rule;
    use crate::request::{CLIENTS_INTERESTS_ARGS, METHOD_ENVELOPE, ONLINE_SCORE_ARGS};
    use scoring_domain::Gender;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn create_test_envelope() -> Value {
        json!({
            "account": "horns&hoofs",
            "login": "h&f",
            "method": "online_score",
            "token": "55cc9ce545bcd144300fe9efc28e65d415b923ebb6be1e19d2750a2c03e80dd209a27954dca045e5bb12418e7d89b6d718a9e35af34e14e1d5bcd5a08f21fc95",
            "arguments": {"phone": "79175002040", "email": "stupnikov@otus.ru"}
        })
    }

    #[test]
    fn test_valid_envelope() {
        let validator = Validator::default_config();
        let result = validator
            .validate(&METHOD_ENVELOPE, &create_test_envelope(), today())
            .unwrap();

        let request = result.value();
        assert_eq!(request.account, "horns&hoofs");
        assert_eq!(request.login, "h&f");
        assert_eq!(request.method, "online_score");
        assert_eq!(request.arguments.len(), 2);
        assert_eq!(
            result.supplied(),
            &["account", "login", "token", "arguments", "method"]
        );
    }

    #[test]
    fn test_not_an_object() {
        let validator = Validator::default_config();
        for raw in [json!([]), json!("text"), json!(1), Value::Null] {
            let result = validator.validate(&METHOD_ENVELOPE, &raw, today());
            assert_eq!(result.unwrap_err(), ValidationError::NotAnObject);
        }
    }

    #[test]
    fn test_empty_envelope() {
        let validator = Validator::default_config();
        let result = validator.validate(&METHOD_ENVELOPE, &json!({}), today());
        assert_eq!(result.unwrap_err(), ValidationError::MissingJoint("login"));
    }

    #[test]
    fn test_jointly_required_fields() {
        let validator = Validator::default_config();
        for field in ["login", "method", "arguments"] {
            let mut raw = create_test_envelope();
            raw.as_object_mut().unwrap().remove(field);
            let result = validator.validate(&METHOD_ENVELOPE, &raw, today());
            assert_eq!(result.unwrap_err(), ValidationError::MissingJoint(field));
        }
    }

    #[test]
    fn test_null_counts_as_absent() {
        let validator = Validator::default_config();
        let mut raw = create_test_envelope();
        raw["token"] = Value::Null;
        let result = validator.validate(&METHOD_ENVELOPE, &raw, today());
        assert_eq!(
            result.unwrap_err(),
            ValidationError::Field {
                field: "token",
                rule: Rule::Required
            }
        );

        let mut raw = create_test_envelope();
        raw["account"] = Value::Null;
        let result = validator.validate(&METHOD_ENVELOPE, &raw, today()).unwrap();
        assert!(!result.has("account"));
        assert_eq!(result.value().account, "");
    }

    #[test]
    fn test_empty_method_rejected() {
        let validator = Validator::default_config();
        let mut raw = create_test_envelope();
        raw["method"] = json!("");
        let result = validator.validate(&METHOD_ENVELOPE, &raw, today());
        assert_eq!(
            result.unwrap_err(),
            ValidationError::Field {
                field: "method",
                rule: Rule::Empty
            }
        );
    }

    #[test]
    fn test_wrong_types_rejected() {
        let validator = Validator::default_config();
        let cases = [
            ("login", json!(1), Rule::NotString),
            ("token", json!(["x"]), Rule::NotString),
            ("arguments", json!("phone"), Rule::NotObject),
            ("method", json!({"a": 1}), Rule::NotString),
        ];
        for (field, value, rule) in cases {
            let mut raw = create_test_envelope();
            raw[field] = value;
            let result = validator.validate(&METHOD_ENVELOPE, &raw, today());
            assert_eq!(result.unwrap_err(), ValidationError::Field { field, rule });
        }
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let validator = Validator::default_config();
        let mut raw = create_test_envelope();
        raw["__class__"] = json!("os.system('rm -rf /')");
        raw["extra"] = json!({"nested": true});
        assert!(validator.validate(&METHOD_ENVELOPE, &raw, today()).is_ok());
    }

    #[test]
    fn test_first_failure_wins() {
        let validator = Validator::default_config();
        let raw = json!({"email": "bad", "phone": "bad", "gender": 9});
        let result = validator.validate(&ONLINE_SCORE_ARGS, &raw, today());
        assert_eq!(
            result.unwrap_err(),
            ValidationError::Field {
                field: "email",
                rule: Rule::Email
            }
        );
    }

    #[test]
    fn test_online_score_arguments() {
        let validator = Validator::default_config();
        let raw = json!({
            "phone": 79175002040u64,
            "email": "stupnikov@otus.ru",
            "first_name": "Stanislav",
            "last_name": "Stupnikov",
            "birthday": "01.01.1990",
            "gender": 1
        });
        let result = validator.validate(&ONLINE_SCORE_ARGS, &raw, today()).unwrap();
        let request = result.value();
        assert_eq!(request.phone.as_deref(), Some("79175002040"));
        assert_eq!(request.birthday, NaiveDate::from_ymd_opt(1990, 1, 1));
        assert_eq!(request.gender, Some(Gender::Male));
        assert_eq!(result.supplied().len(), 6);
    }

    #[test]
    fn test_online_score_partial_arguments() {
        let validator = Validator::default_config();
        let raw = json!({"first_name": "a"});
        let result = validator.validate(&ONLINE_SCORE_ARGS, &raw, today()).unwrap();
        assert!(result.has("first_name"));
        assert!(!result.has("last_name"));
        assert!(result.value().last_name.is_none());
    }

    #[test]
    fn test_clients_interests_arguments() {
        let validator = Validator::default_config();
        let raw = json!({"client_ids": [1, 2, 3], "date": "19.07.2017"});
        let result = validator
            .validate(&CLIENTS_INTERESTS_ARGS, &raw, today())
            .unwrap();
        assert_eq!(result.value().client_ids, vec![1, 2, 3]);
        assert_eq!(result.value().date, NaiveDate::from_ymd_opt(2017, 7, 19));
    }

    #[test]
    fn test_clients_interests_invalid() {
        let validator = Validator::default_config();
        let cases = [
            (json!({}), Rule::Required),
            (json!({"client_ids": []}), Rule::Empty),
            (json!({"client_ids": {"1": 2}}), Rule::NotList),
            (json!({"client_ids": ["1", "2"]}), Rule::NonIntegerId),
        ];
        for (raw, rule) in cases {
            let result = validator.validate(&CLIENTS_INTERESTS_ARGS, &raw, today());
            assert_eq!(
                result.unwrap_err(),
                ValidationError::Field {
                    field: "client_ids",
                    rule
                }
            );
        }

        let raw = json!({"client_ids": [1, 2], "date": "XXX"});
        let result = validator.validate(&CLIENTS_INTERESTS_ARGS, &raw, today());
        assert_eq!(
            result.unwrap_err(),
            ValidationError::Field {
                field: "date",
                rule: Rule::Date
            }
        );
    }

    #[test]
    fn test_validation_is_repeatable() {
        let validator = Validator::default_config();
        let raw = create_test_envelope();
        let first = validator.validate(&METHOD_ENVELOPE, &raw, today()).unwrap();
        let second = validator.validate(&METHOD_ENVELOPE, &raw, today()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_limits() {
        let validator = Validator::new(ValidationConfig {
            min_age: 21,
            ..ValidationConfig::default()
        });
        let raw = json!({"birthday": "01.01.2005"});
        let result = validator.validate(&ONLINE_SCORE_ARGS, &raw, today());
        assert_eq!(
            result.unwrap_err(),
            ValidationError::Field {
                field: "birthday",
                rule: Rule::Underage(21)
            }
        );
    }
}
