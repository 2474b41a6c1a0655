// Jinja-backed expression engine.
//
// Each call compiles the expression in a fresh environment; rule sets are
// small and per-run, so there is nothing worth caching across calls.

use indexmap::IndexMap;
use serde_json::Value;

use crate::rules::{EngineError, ExpressionEngine};

/// [`ExpressionEngine`] backed by Jinja2 expression syntax, the dialect the
/// rule surface is written in.
#[derive(Debug, Clone, Copy, Default)]
pub struct JinjaEngine;

impl JinjaEngine {
    pub fn new() -> Self {
        Self
    }

    fn eval_raw(
        expression: &str,
        vars: &IndexMap<String, Value>,
    ) -> Result<minijinja::Value, EngineError> {
        let env = minijinja::Environment::new();
        let compiled = env
            .compile_expression(expression)
            .map_err(|e| engine_error(expression, &e))?;
        compiled
            .eval(minijinja::Value::from_serialize(vars))
            .map_err(|e| engine_error(expression, &e))
    }
}

fn engine_error(expression: &str, error: &minijinja::Error) -> EngineError {
    EngineError {
        expression: expression.to_owned(),
        message: error.to_string(),
    }
}

impl ExpressionEngine for JinjaEngine {
    fn evaluate(
        &self,
        expression: &str,
        vars: &IndexMap<String, Value>,
    ) -> Result<Value, EngineError> {
        let result = Self::eval_raw(expression, vars)?;
        serde_json::to_value(&result).map_err(|e| EngineError {
            expression: expression.to_owned(),
            message: e.to_string(),
        })
    }

    fn test(&self, expression: &str, vars: &IndexMap<String, Value>) -> Result<bool, EngineError> {
        Ok(Self::eval_raw(expression, vars)?.is_true())
    }
}
