//! Typed requests and the schemas that populate them

use crate::field::{FieldConstraint, FieldKind, FieldValue};
use crate::schema::{FieldSpec, Schema};
use chrono::NaiveDate;
use scoring_domain::{AuthIdentity, Gender, ScoreQuery};
use serde_json::{Map, Value};

/// Outer envelope of every call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodRequest {
    /// Partner account, empty when absent
    pub account: String,
    /// Caller login
    pub login: String,
    /// Caller token
    pub token: String,
    /// Method-specific arguments, validated later by the method's own schema
    pub arguments: Map<String, Value>,
    /// Method name
    pub method: String,
}

impl MethodRequest {
    /// Claimed identity of the caller
    pub fn identity(&self, admin_login: &str) -> AuthIdentity {
        AuthIdentity::new(
            self.account.clone(),
            self.login.clone(),
            self.token.clone(),
            admin_login,
        )
    }
}

/// Schema of the outer envelope
pub static METHOD_ENVELOPE: Schema<MethodRequest> = Schema {
    name: "MethodEnvelope",
    fields: &[
        FieldSpec::new(FieldConstraint::new("account", FieldKind::Char), set_account),
        FieldSpec::new(FieldConstraint::new("login", FieldKind::Char).required(), set_login),
        FieldSpec::new(FieldConstraint::new("token", FieldKind::Char).required(), set_token),
        FieldSpec::new(
            FieldConstraint::new("arguments", FieldKind::Arguments).required(),
            set_arguments,
        ),
        FieldSpec::new(
            FieldConstraint::new("method", FieldKind::Char)
                .required()
                .non_nullable(),
            set_method,
        ),
    ],
    jointly_required: &["login", "method", "arguments"],
};

fn set_account(request: &mut MethodRequest, value: FieldValue) {
    request.account = value.into_text().unwrap_or_default();
}

fn set_login(request: &mut MethodRequest, value: FieldValue) {
    request.login = value.into_text().unwrap_or_default();
}

fn set_token(request: &mut MethodRequest, value: FieldValue) {
    request.token = value.into_text().unwrap_or_default();
}

fn set_arguments(request: &mut MethodRequest, value: FieldValue) {
    request.arguments = value.into_map().unwrap_or_default();
}

fn set_method(request: &mut MethodRequest, value: FieldValue) {
    request.method = value.into_text().unwrap_or_default();
}

/// Arguments of `online_score`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OnlineScoreRequest {
    /// Given name
    pub first_name: Option<String>,
    /// Family name
    pub last_name: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Normalized phone digits
    pub phone: Option<String>,
    /// Date of birth
    pub birthday: Option<NaiveDate>,
    /// Gender code
    pub gender: Option<Gender>,
}

impl OnlineScoreRequest {
    /// Store query carrying the supplied fields
    pub fn to_query(&self) -> ScoreQuery {
        ScoreQuery {
            phone: self.phone.clone(),
            email: self.email.clone(),
            birthday: self.birthday,
            gender: self.gender,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

/// Schema of `online_score` arguments
pub static ONLINE_SCORE_ARGS: Schema<OnlineScoreRequest> = Schema {
    name: "OnlineScoreArgs",
    fields: &[
        FieldSpec::new(FieldConstraint::new("first_name", FieldKind::Char), set_first_name),
        FieldSpec::new(FieldConstraint::new("last_name", FieldKind::Char), set_last_name),
        FieldSpec::new(FieldConstraint::new("email", FieldKind::Email), set_email),
        FieldSpec::new(FieldConstraint::new("phone", FieldKind::Phone), set_phone),
        FieldSpec::new(FieldConstraint::new("birthday", FieldKind::BirthDay), set_birthday),
        FieldSpec::new(FieldConstraint::new("gender", FieldKind::Gender), set_gender),
    ],
    jointly_required: &[],
};

fn set_first_name(request: &mut OnlineScoreRequest, value: FieldValue) {
    request.first_name = value.into_text();
}

fn set_last_name(request: &mut OnlineScoreRequest, value: FieldValue) {
    request.last_name = value.into_text();
}

fn set_email(request: &mut OnlineScoreRequest, value: FieldValue) {
    request.email = value.into_text();
}

fn set_phone(request: &mut OnlineScoreRequest, value: FieldValue) {
    request.phone = value.into_text();
}

fn set_birthday(request: &mut OnlineScoreRequest, value: FieldValue) {
    request.birthday = value.into_date();
}

fn set_gender(request: &mut OnlineScoreRequest, value: FieldValue) {
    request.gender = value.into_gender();
}

/// Arguments of `clients_interests`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientsInterestsRequest {
    /// Clients to look up
    pub client_ids: Vec<i64>,
    /// Date the interests are requested for
    pub date: Option<NaiveDate>,
}

/// Schema of `clients_interests` arguments
pub static CLIENTS_INTERESTS_ARGS: Schema<ClientsInterestsRequest> = Schema {
    name: "ClientsInterestsArgs",
    fields: &[
        FieldSpec::new(
            FieldConstraint::new("client_ids", FieldKind::ClientIds)
                .required()
                .non_nullable(),
            set_client_ids,
        ),
        FieldSpec::new(FieldConstraint::new("date", FieldKind::Date), set_date),
    ],
    jointly_required: &[],
};

fn set_client_ids(request: &mut ClientsInterestsRequest, value: FieldValue) {
    request.client_ids = value.into_ids().unwrap_or_default();
}

fn set_date(request: &mut ClientsInterestsRequest, value: FieldValue) {
    request.date = value.into_date();
}
