use std::time::Duration;

use serde_json::Value;

use fsx_drt_core::{config, DataRepositoryApi, OrchestrationError, RawConfig};
use fsx_drt_tasks::{pipeline, InvocationOutcome};

/// Resolve configuration, run one invocation within `budget`, and return the
/// success payload. Failures are logged as a structured outcome and handed
/// back to the runtime so the invocation is marked failed.
pub async fn handle<A>(
    api: &A,
    raw: &RawConfig,
    budget: Duration,
) -> Result<Value, OrchestrationError>
where
    A: DataRepositoryApi + ?Sized,
{
    let result = match config::resolve(raw) {
        Ok(task_config) => pipeline::run_with_deadline(api, &task_config, budget).await,
        Err(err) => {
            let err = OrchestrationError::from(err);
            tracing::error!(
                step = "resolve",
                kind = %err.kind(),
                error = %err,
                "configuration rejected"
            );
            Err(err)
        }
    };

    let outcome = InvocationOutcome::from_result(&result);
    match result {
        Ok(_) => {
            tracing::info!(outcome = %outcome.to_json(), "invocation succeeded");
            Ok(outcome.to_json())
        }
        Err(err) => {
            tracing::error!(outcome = %outcome.to_json(), "invocation failed");
            Err(err)
        }
    }
}
