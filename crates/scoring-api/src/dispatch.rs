//! Method routing and the business handlers.
//!
//! The router maps a method name to exactly one [`Handler`]. Unknown names
//! are answered with `NotFound`.

use crate::context::RequestContext;
use crate::error::ApiError;
use chrono::NaiveDate;
use scoring_domain::{AuthIdentity, ScoreStore};
use scoring_gatekeeper::{
    OnlineScoreRequest, ValidatedRequest, Validator, CLIENTS_INTERESTS_ARGS, ONLINE_SCORE_ARGS,
};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::fmt::Display;
use tracing::{debug, warn};

/// Score answered when the store cannot compute one
pub const FALLBACK_SCORE: f64 = 0.0;

/// Argument pairs of which `online_score` needs at least one
pub const SCORE_PAIRS: [(&str, &str); 3] = [
    ("phone", "email"),
    ("first_name", "last_name"),
    ("gender", "birthday"),
];

/// An authenticated call, ready for a handler
#[derive(Debug, Clone, Copy)]
pub struct MethodCall<'a> {
    /// Raw method arguments, not yet validated
    pub arguments: &'a Map<String, Value>,
    /// Authenticated caller
    pub identity: &'a AuthIdentity,
    /// Evaluation date for date rules
    pub today: NaiveDate,
}

/// A business operation reachable through the router
pub trait Handler<S: ScoreStore>: Send + Sync {
    /// Validate the call's arguments and produce the response payload
    fn handle(
        &self,
        call: &MethodCall<'_>,
        store: &S,
        ctx: &mut RequestContext,
    ) -> Result<Value, ApiError>;
}

/// Validate `online_score` arguments and enforce the pair rule
fn online_score_request(
    validator: &Validator,
    call: &MethodCall<'_>,
    ctx: &mut RequestContext,
) -> Result<ValidatedRequest<OnlineScoreRequest>, ApiError> {
    let request = validator.validate_map(&ONLINE_SCORE_ARGS, call.arguments, call.today)?;

    if !SCORE_PAIRS
        .iter()
        .any(|(left, right)| request.has(left) && request.has(right))
    {
        return Err(ApiError::BusinessRule(
            "at least one of the pairs phone/email, first_name/last_name, gender/birthday is required"
                .to_string(),
        ));
    }

    ctx.has = Some(request.supplied().to_vec());
    Ok(request)
}

/// `online_score` for administrators: a fixed score
#[derive(Debug, Clone)]
pub struct AdminScore {
    validator: Validator,
    score: f64,
}

impl AdminScore {
    /// Answer `score` to every valid request
    pub fn new(validator: Validator, score: f64) -> Self {
        Self { validator, score }
    }
}

impl<S: ScoreStore> Handler<S> for AdminScore {
    fn handle(
        &self,
        call: &MethodCall<'_>,
        _store: &S,
        ctx: &mut RequestContext,
    ) -> Result<Value, ApiError> {
        online_score_request(&self.validator, call, ctx)?;
        Ok(json!({ "score": self.score }))
    }
}

/// `online_score` for regular users: the store computes the score
#[derive(Debug, Clone)]
pub struct StoreScore {
    validator: Validator,
}

impl StoreScore {
    /// Delegate scoring to the store
    pub fn new(validator: Validator) -> Self {
        Self { validator }
    }
}

impl<S> Handler<S> for StoreScore
where
    S: ScoreStore,
    S::Error: Display,
{
    fn handle(
        &self,
        call: &MethodCall<'_>,
        store: &S,
        ctx: &mut RequestContext,
    ) -> Result<Value, ApiError> {
        let request = online_score_request(&self.validator, call, ctx)?;
        let score = store
            .score(&request.value().to_query())
            .unwrap_or_else(|e| {
                warn!(request_id = %ctx.request_id, error = %e, "store unavailable, answering fallback score");
                FALLBACK_SCORE
            });
        Ok(json!({ "score": score }))
    }
}

/// `online_score`: picks the admin or store branch by identity
#[derive(Debug, Clone)]
pub struct OnlineScoreHandler {
    admin: AdminScore,
    regular: StoreScore,
}

impl OnlineScoreHandler {
    /// Create the handler; administrators get `admin_score`
    pub fn new(validator: Validator, admin_score: f64) -> Self {
        Self {
            admin: AdminScore::new(validator.clone(), admin_score),
            regular: StoreScore::new(validator),
        }
    }
}

impl<S> Handler<S> for OnlineScoreHandler
where
    S: ScoreStore,
    S::Error: Display,
{
    fn handle(
        &self,
        call: &MethodCall<'_>,
        store: &S,
        ctx: &mut RequestContext,
    ) -> Result<Value, ApiError> {
        if call.identity.is_admin {
            self.admin.handle(call, store, ctx)
        } else {
            self.regular.handle(call, store, ctx)
        }
    }
}

/// `clients_interests`: interests of every requested client
#[derive(Debug, Clone)]
pub struct ClientsInterestsHandler {
    validator: Validator,
}

impl ClientsInterestsHandler {
    /// Create the handler
    pub fn new(validator: Validator) -> Self {
        Self { validator }
    }
}

impl<S> Handler<S> for ClientsInterestsHandler
where
    S: ScoreStore,
    S::Error: Display,
{
    fn handle(
        &self,
        call: &MethodCall<'_>,
        store: &S,
        ctx: &mut RequestContext,
    ) -> Result<Value, ApiError> {
        let client_ids = self
            .validator
            .validate_map(&CLIENTS_INTERESTS_ARGS, call.arguments, call.today)?
            .into_inner()
            .client_ids;

        let mut interests = Map::new();
        for &client_id in &client_ids {
            let list = store.interests(client_id).unwrap_or_else(|e| {
                warn!(request_id = %ctx.request_id, client_id, error = %e, "store unavailable, answering no interests");
                Vec::new()
            });
            interests.insert(format!("client_id{}", client_id), json!(list));
        }

        ctx.nclients = Some(client_ids.len());
        Ok(Value::Object(interests))
    }
}

/// Maps method names to handlers
pub struct MethodRouter<S: ScoreStore> {
    handlers: HashMap<&'static str, Box<dyn Handler<S>>>,
}

impl<S> MethodRouter<S>
where
    S: ScoreStore + 'static,
    S::Error: Display,
{
    /// Router with no methods
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Router serving `online_score` and `clients_interests`
    pub fn new(validator: &Validator, admin_score: f64) -> Self {
        let mut router = Self::empty();
        router.register(
            "online_score",
            OnlineScoreHandler::new(validator.clone(), admin_score),
        );
        router.register(
            "clients_interests",
            ClientsInterestsHandler::new(validator.clone()),
        );
        router
    }

    /// Register (or replace) the handler of `method`
    pub fn register<H: Handler<S> + 'static>(&mut self, method: &'static str, handler: H) {
        self.handlers.insert(method, Box::new(handler));
    }

    /// Registered method names
    pub fn methods(&self) -> Vec<&'static str> {
        let mut methods: Vec<_> = self.handlers.keys().copied().collect();
        methods.sort_unstable();
        methods
    }

    /// Run the handler registered for `method`
    pub fn dispatch(
        &self,
        method: &str,
        call: &MethodCall<'_>,
        store: &S,
        ctx: &mut RequestContext,
    ) -> Result<Value, ApiError> {
        let handler = self.handlers.get(method).ok_or_else(|| {
            ApiError::NotFound(format!(
                "unknown method '{}', expected one of: {}",
                method,
                self.methods().join(", ")
            ))
        })?;
        debug!(request_id = %ctx.request_id, method, "dispatching");
        handler.handle(call, store, ctx)
    }
}
