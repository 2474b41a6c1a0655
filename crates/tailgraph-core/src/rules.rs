// Constructed rules
//
// Runs user-supplied expressions against each host's materialized variables,
// in three fixed passes: composed variables first, then conditional groups,
// then keyed groups. Composed results are folded into the working variable
// set before the later passes run, so a conditional group can test a
// variable composed moments earlier. Expression evaluation itself lives
// behind the `ExpressionEngine` trait.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::graph::InventoryGraph;

/// An expression failed to parse or evaluate.
#[derive(Debug, Error)]
#[error("expression `{expression}` failed: {message}")]
pub struct EngineError {
    pub expression: String,
    pub message: String,
}

/// A rule failed for a host while `strict` was set.
#[derive(Debug, Error)]
#[error("rule failed for host `{host}`")]
pub struct RuleError {
    pub host: String,
    #[source]
    pub source: EngineError,
}

/// Evaluates expressions against a host's variable mapping.
pub trait ExpressionEngine {
    /// Evaluate an expression to a value.
    fn evaluate(
        &self,
        expression: &str,
        vars: &IndexMap<String, Value>,
    ) -> Result<Value, EngineError>;

    /// Evaluate an expression to a boolean, using the engine's truthiness.
    fn test(&self, expression: &str, vars: &IndexMap<String, Value>) -> Result<bool, EngineError>;
}

fn default_separator() -> String {
    "_".to_owned()
}

/// One keyed-group rule: a group per distinct value of `key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyedGroup {
    /// Expression yielding the group key (a scalar or a list of scalars).
    pub key: String,
    /// Prepended to each group name.
    #[serde(default)]
    pub prefix: String,
    /// Joins prefix and key value.
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Used in place of an empty or null key value. Without it such values
    /// produce no group.
    #[serde(default)]
    pub default_value: Option<String>,
}

/// The full constructed-rule surface, applied per host in declaration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Composed variables: name to expression.
    pub compose: IndexMap<String, String>,
    /// Conditional groups: group name to membership expression.
    pub groups: IndexMap<String, String>,
    /// Keyed groups.
    pub keyed_groups: Vec<KeyedGroup>,
}

impl RuleSet {
    pub fn is_empty(&self) -> bool {
        self.compose.is_empty() && self.groups.is_empty() && self.keyed_groups.is_empty()
    }
}

/// Apply a rule set to every host in the graph.
///
/// In strict mode the first failing expression aborts with the offending
/// host attached; otherwise failures are logged and that single rule is
/// skipped for that single host.
pub fn apply_rules<E: ExpressionEngine>(
    engine: &E,
    rules: &RuleSet,
    graph: &mut InventoryGraph,
    strict: bool,
) -> Result<(), RuleError> {
    if rules.is_empty() {
        return Ok(());
    }

    let host_names: Vec<String> = graph.hosts().map(|(name, _)| name.clone()).collect();

    for host_name in host_names {
        let Some(mut vars) = graph.variables(&host_name).cloned() else {
            continue;
        };

        for (var_name, expression) in &rules.compose {
            match engine.evaluate(expression, &vars) {
                Ok(value) => {
                    vars.insert(var_name.clone(), value.clone());
                    graph.set_variable(&host_name, var_name, value);
                }
                Err(source) => {
                    if strict {
                        return Err(RuleError { host: host_name, source });
                    }
                    warn!(host = %host_name, var = %var_name, error = %source, "skipping composed variable");
                }
            }
        }

        for (group_name, expression) in &rules.groups {
            match engine.test(expression, &vars) {
                Ok(true) => graph.add_host_to_group(&host_name, group_name),
                Ok(false) => {}
                Err(source) => {
                    if strict {
                        return Err(RuleError { host: host_name, source });
                    }
                    warn!(host = %host_name, group = %group_name, error = %source, "skipping conditional group");
                }
            }
        }

        for keyed in &rules.keyed_groups {
            match engine.evaluate(&keyed.key, &vars) {
                Ok(value) => {
                    for group_name in keyed_group_names(keyed, &value) {
                        graph.add_host_to_group(&host_name, &group_name);
                    }
                }
                Err(source) => {
                    if strict {
                        return Err(RuleError { host: host_name, source });
                    }
                    warn!(host = %host_name, key = %keyed.key, error = %source, "skipping keyed group");
                }
            }
        }
    }

    Ok(())
}

/// The group names one keyed-group rule derives from an evaluated key value.
///
/// A scalar yields one group, a list one group per scalar element. Null and
/// empty strings fall back to `default_value` when set and are otherwise
/// dropped; maps never name a group.
fn keyed_group_names(rule: &KeyedGroup, value: &Value) -> Vec<String> {
    let keys: Vec<String> = match value {
        Value::Array(items) => items.iter().filter_map(|v| scalar_key(rule, v)).collect(),
        other => scalar_key(rule, other).into_iter().collect(),
    };

    keys.into_iter()
        .map(|key| {
            if rule.prefix.is_empty() {
                key
            } else {
                format!("{}{}{}", rule.prefix, rule.separator, key)
            }
        })
        .collect()
}

fn scalar_key(rule: &KeyedGroup, value: &Value) -> Option<String> {
    let raw = match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        Value::Array(_) | Value::Object(_) => {
            warn!(key = %rule.key, "keyed group value is not a scalar, skipping");
            return None;
        }
    };

    match raw {
        Some(s) if !s.is_empty() => Some(s),
        _ => match &rule.default_value {
            Some(default) if !default.is_empty() => Some(default.clone()),
            _ => {
                debug!(key = %rule.key, "empty keyed group value with no default, skipping");
                None
            }
        },
    }
}
