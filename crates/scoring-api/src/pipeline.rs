//! The request pipeline: parse, validate, authenticate, dispatch.
//!
//! Everything here is synchronous and independent of the transport. Each
//! stage either hands a typed value to the next or stops with an
//! [`ApiError`], which [`Outcome`] turns into a code and message.

use crate::auth::Authenticator;
use crate::config::ScoringConfig;
use crate::context::RequestContext;
use crate::dispatch::{MethodCall, MethodRouter};
use crate::error::ApiError;
use crate::response::Outcome;
use chrono::NaiveDateTime;
use scoring_domain::ScoreStore;
use scoring_gatekeeper::{ValidationError, Validator, METHOD_ENVELOPE};
use serde_json::Value;
use std::fmt::Display;
use tracing::{debug, info};

/// Validator, authenticator, router and store wired together
pub struct Pipeline<S: ScoreStore> {
    validator: Validator,
    authenticator: Authenticator,
    router: MethodRouter<S>,
    admin_login: String,
    store: S,
}

impl<S> Pipeline<S>
where
    S: ScoreStore + 'static,
    S::Error: Display,
{
    /// Assemble a pipeline from its parts
    pub fn new(
        validator: Validator,
        authenticator: Authenticator,
        router: MethodRouter<S>,
        admin_login: impl Into<String>,
        store: S,
    ) -> Self {
        Self {
            validator,
            authenticator,
            router,
            admin_login: admin_login.into(),
            store,
        }
    }

    /// Build the standard pipeline described by `config`
    pub fn from_config(config: &ScoringConfig, store: S) -> Self {
        let validator = Validator::new(config.validation.to_validation_config());
        let router = MethodRouter::new(&validator, config.auth.admin_score);
        Self::new(
            validator,
            Authenticator::new(&config.auth.salt, &config.auth.admin_salt),
            router,
            &config.auth.admin_login,
            store,
        )
    }

    /// Authenticator in use
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    /// Run one request body through every stage
    ///
    /// `now` drives both the admin token hour and the date rules.
    pub fn handle(&self, body: &[u8], ctx: &mut RequestContext, now: NaiveDateTime) -> Outcome {
        let result = self.run(body, ctx, now);
        if let Err(ApiError::Invalid(e)) = &result {
            debug!(
                request_id = %ctx.request_id,
                field = e.field().unwrap_or("-"),
                error = %e,
                "request rejected"
            );
        }
        result.into()
    }

    fn run(
        &self,
        body: &[u8],
        ctx: &mut RequestContext,
        now: NaiveDateTime,
    ) -> Result<Value, ApiError> {
        let raw: Value = serde_json::from_slice(body)
            .map_err(|e| ApiError::BadRequest(format!("body is not valid JSON: {}", e)))?;

        let envelope = self
            .validator
            .validate(&METHOD_ENVELOPE, &raw, now.date())
            .map_err(|e| match e {
                ValidationError::NotAnObject => {
                    ApiError::BadRequest("body is not a JSON object".to_string())
                }
                other => ApiError::Invalid(other),
            })?;
        let request = envelope.into_inner();

        let identity = request.identity(&self.admin_login);
        if !self.authenticator.check(&identity, now) {
            info!(request_id = %ctx.request_id, login = %identity.login, "authentication failed");
            return Err(ApiError::Forbidden);
        }
        debug!(request_id = %ctx.request_id, login = %identity.login, admin = identity.is_admin, "authenticated");

        let call = MethodCall {
            arguments: &request.arguments,
            identity: &identity,
            today: now.date(),
        };
        self.router
            .dispatch(&request.method, &call, &self.store, ctx)
    }
}
