//! Structured outbound result of one invocation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use fsx_drt_core::{ErrorKind, OrchestrationError, TaskReceipt};

/// Success payload or classified failure, tagged by `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvocationOutcome {
    Succeeded {
        task: TaskReceipt,
    },
    Failed {
        kind: ErrorKind,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        remote_code: Option<String>,
    },
}

impl InvocationOutcome {
    pub fn from_result(result: &Result<TaskReceipt, OrchestrationError>) -> Self {
        match result {
            Ok(task) => InvocationOutcome::Succeeded { task: task.clone() },
            Err(err) => Self::from_error(err),
        }
    }

    pub fn from_error(err: &OrchestrationError) -> Self {
        InvocationOutcome::Failed {
            kind: err.kind(),
            message: err.to_string(),
            remote_code: err.remote_code().map(str::to_owned),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, InvocationOutcome::Succeeded { .. })
    }

    pub fn to_json(&self) -> Value {
        // Serializing a plain enum of strings cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
