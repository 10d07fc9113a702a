// Per-node action results

use serde::Serialize;
use serde_json::{json, Value};

/// Which phase of a node's unit of work failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// The connect phase failed; the action was never invoked.
    Connect,
    /// The action itself failed on a connected node.
    Execution,
}

/// The immutable outcome of one action on one node.
///
/// Exactly one of these exists per node per execution. Per-node faults are
/// carried as data, never thrown across the worker-pool boundary; the
/// executor only inspects the error flag, the payload is opaque.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeResult {
    Ok(Value),
    Err { kind: FaultKind, message: String },
}

impl NodeResult {
    pub fn ok(value: Value) -> Self {
        NodeResult::Ok(value)
    }

    pub fn connect_error(message: impl Into<String>) -> Self {
        NodeResult::Err {
            kind: FaultKind::Connect,
            message: message.into(),
        }
    }

    pub fn execution_error(message: impl Into<String>) -> Self {
        NodeResult::Err {
            kind: FaultKind::Execution,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, NodeResult::Ok(_))
    }

    pub fn is_err(&self) -> bool {
        matches!(self, NodeResult::Err { .. })
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            NodeResult::Ok(value) => Some(value),
            NodeResult::Err { .. } => None,
        }
    }

    pub fn fault(&self) -> Option<(FaultKind, &str)> {
        match self {
            NodeResult::Ok(_) => None,
            NodeResult::Err { kind, message } => Some((*kind, message.as_str())),
        }
    }

    /// JSON representation used for structured logging.
    pub fn to_json(&self) -> Value {
        match self {
            NodeResult::Ok(value) => json!({ "value": value }),
            NodeResult::Err { kind, message } => json!({
                "error": { "kind": kind, "message": message }
            }),
        }
    }
}
