//! Argument munging: the pure steps that turn what a caller passed into the
//! positional params a JSON-RPC endpoint expects.
//!
//! A pipeline has at most one *leading* step, which must be declared before
//! any plain step and also receives a [`MungerContext`] (the module the
//! method is bound to and the target endpoint). Every later step sees only the
//! evolving argument list. Steps run in declaration order and may change
//! arity; nothing checks arity besides the endpoint.
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use super::error::Error;
use super::namespace::Module;

/// Positional JSON-RPC arguments.
pub type Params = Vec<Value>;

/// Why a step could not handle the arguments it was given.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct MungerError(String);

impl MungerError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    pub fn missing(index: usize, what: &str) -> Self {
        Self(format!("missing argument {index} ({what})"))
    }

    pub fn invalid(index: usize, what: &str, got: &Value) -> Self {
        Self(format!("argument {index} ({what}) is invalid: got {got}"))
    }
}

pub type MungeResult = Result<Params, MungerError>;

/// What the leading step sees besides the arguments.
#[derive(Clone, Copy)]
pub struct MungerContext<'a> {
    module: &'a Module,
    endpoint: &'a str,
}

impl<'a> MungerContext<'a> {
    pub fn new(module: &'a Module, endpoint: &'a str) -> Self {
        Self { module, endpoint }
    }

    pub fn module(&self) -> &'a Module {
        self.module
    }

    pub fn endpoint(&self) -> &'a str {
        self.endpoint
    }

    /// Shorthand for [`Module::default_value`] on the bound module.
    pub fn default_value(&self, key: &str) -> Option<Value> {
        self.module.default_value(key)
    }
}

type LeadingFn = dyn Fn(&MungerContext<'_>, Params) -> MungeResult + Send + Sync;
type StepFn = dyn Fn(Params) -> MungeResult + Send + Sync;

/// Context-aware first step.
#[derive(Clone)]
pub struct LeadingMunger(Arc<LeadingFn>);

impl LeadingMunger {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&MungerContext<'_>, Params) -> MungeResult + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }
}

impl fmt::Debug for LeadingMunger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LeadingMunger(..)")
    }
}

/// Plain step over the argument list.
#[derive(Clone)]
pub struct Munger(Arc<StepFn>);

impl Munger {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Params) -> MungeResult + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }
}

impl fmt::Debug for Munger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Munger(..)")
    }
}

#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    leading: Option<LeadingMunger>,
    steps: Vec<Munger>,
    misordered: Option<MungerError>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the context-aware first step. Declaring it after a plain step
    /// would break declaration order, so the pipeline is marked invalid
    /// instead and [`Pipeline::validate`] reports it.
    pub fn set_leading(&mut self, step: LeadingMunger) {
        if !self.steps.is_empty() {
            self.misordered = Some(MungerError::new(format!(
                "leading munger declared after {} plain step(s)",
                self.steps.len()
            )));
            return;
        }
        self.leading = Some(step);
    }

    pub fn push(&mut self, step: Munger) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len() + usize::from(self.leading.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn validate(&self) -> Result<(), MungerError> {
        match &self.misordered {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Run every step in order. An empty pipeline returns `args` untouched.
    pub fn apply(&self, ctx: &MungerContext<'_>, args: Params) -> Result<Params, Error> {
        self.validate().map_err(|e| Error::InvalidPipeline {
            endpoint: ctx.endpoint().to_string(),
            reason: e.to_string(),
        })?;
        let failure = |e: MungerError| Error::MungerFailure {
            endpoint: ctx.endpoint().to_string(),
            reason: e.to_string(),
        };

        let mut args = match &self.leading {
            Some(lead) => (lead.0)(ctx, args).map_err(failure)?,
            None => args,
        };
        for step in &self.steps {
            args = (step.0)(args).map_err(failure)?;
        }
        Ok(args)
    }
}

/// Borrow argument `index`, failing with a readable reason when absent.
pub fn arg<'p>(params: &'p [Value], index: usize, what: &str) -> Result<&'p Value, MungerError> {
    params
        .get(index)
        .ok_or_else(|| MungerError::missing(index, what))
}

/// Argument `index` as an unsigned integer.
pub fn arg_u64(params: &[Value], index: usize, what: &str) -> Result<u64, MungerError> {
    let v = arg(params, index, what)?;
    v.as_u64()
        .ok_or_else(|| MungerError::invalid(index, what, v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::testing::detached;
    use serde_json::json;

    #[test]
    fn empty_pipeline_passes_arguments_through() {
        let (_, module) = detached("m");
        let ctx = MungerContext::new(&module, "eth_call");
        let args = vec![json!(1), json!("two"), json!({"three": 3})];
        let out = Pipeline::new().apply(&ctx, args.clone()).unwrap();
        assert_eq!(out, args);
    }

    #[test]
    fn leading_step_runs_first_and_sees_context() {
        let (_, module) = detached("ctx_mod");
        module.set_default("answer", json!(42));

        let mut pipeline = Pipeline::new();
        pipeline.set_leading(LeadingMunger::new(|ctx, mut args| {
            args.push(json!(ctx.module().name()));
            args.push(ctx.default_value("answer").unwrap_or(Value::Null));
            args.push(json!(ctx.endpoint()));
            Ok(args)
        }));
        pipeline.push(Munger::new(|mut args| {
            args.push(json!("plain"));
            Ok(args)
        }));
        assert_eq!(pipeline.len(), 2);
        assert!(pipeline.validate().is_ok());

        let ctx = MungerContext::new(&module, "eth_chainId");
        let out = pipeline.apply(&ctx, vec![]).unwrap();
        assert_eq!(out, vec![json!("ctx_mod"), json!(42), json!("eth_chainId"), json!("plain")]);
    }

    #[test]
    fn leading_step_after_plain_step_is_refused() {
        let (_, module) = detached("m");
        let mut pipeline = Pipeline::new();
        pipeline.push(Munger::new(|_| panic!("must not run")));
        pipeline.set_leading(LeadingMunger::new(|_, _| panic!("must not run")));

        let err = pipeline.validate().unwrap_err();
        assert_eq!(err, MungerError::new("leading munger declared after 1 plain step(s)"));

        let ctx = MungerContext::new(&module, "eth_chainId");
        match pipeline.apply(&ctx, vec![]).unwrap_err() {
            Error::InvalidPipeline { endpoint, .. } => assert_eq!(endpoint, "eth_chainId"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn second_leading_step_replaces_the_first() {
        let (_, module) = detached("m");
        let mut pipeline = Pipeline::new();
        pipeline.set_leading(LeadingMunger::new(|_, _| Ok(vec![json!("first")])));
        pipeline.set_leading(LeadingMunger::new(|_, _| Ok(vec![json!("second")])));
        assert_eq!(pipeline.len(), 1);

        let ctx = MungerContext::new(&module, "x");
        assert_eq!(pipeline.apply(&ctx, vec![]).unwrap(), vec![json!("second")]);
    }

    #[test]
    fn steps_may_change_arity() {
        let (_, module) = detached("m");
        let mut pipeline = Pipeline::new();
        pipeline.push(Munger::new(|args| Ok(args.into_iter().take(1).collect())));
        pipeline.push(Munger::new(|args| {
            let n = arg_u64(&args, 0, "n")?;
            Ok(vec![json!(n), json!(n * 2), json!(n * 3)])
        }));

        let ctx = MungerContext::new(&module, "x");
        let out = pipeline.apply(&ctx, vec![json!(2), json!("dropped")]).unwrap();
        assert_eq!(out, vec![json!(2), json!(4), json!(6)]);
    }

    #[test]
    fn failing_step_aborts_the_rest() {
        let (_, module) = detached("m");
        let mut pipeline = Pipeline::new();
        pipeline.push(Munger::new(|args| {
            arg(&args, 3, "fourth")?;
            Ok(args)
        }));
        pipeline.push(Munger::new(|_| panic!("must not run after a failure")));

        let ctx = MungerContext::new(&module, "eth_getBlockByNumber");
        let err = pipeline.apply(&ctx, vec![json!(1)]).unwrap_err();
        match err {
            Error::MungerFailure { endpoint, reason } => {
                assert_eq!(endpoint, "eth_getBlockByNumber");
                assert_eq!(reason, "missing argument 3 (fourth)");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
