//! Shared invocation entrypoint used by the CLI and the Lambda handler.
//!
//! One invocation is strictly sequential: locate the association, build the
//! request, submit it. Nothing is retried here; a failed run is retried by
//! the next scheduled trigger.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tracing::Instrument;

use fsx_drt_core::{
    DataRepositoryApi, OrchestrationError, ResolvedAssociation, TaskConfig, TaskReceipt,
    TaskRequest,
};

use crate::{locator, requester};

/// What an invocation would submit, and against which association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub association: ResolvedAssociation,
    pub request: TaskRequest,
}

/// Locate the association and build the request without submitting it.
pub async fn plan<A>(api: &A, config: &TaskConfig) -> Result<Plan, OrchestrationError>
where
    A: DataRepositoryApi + ?Sized,
{
    let association = locator::locate(api, &config.file_system_id)
        .await
        .inspect_err(|err| {
            tracing::error!(
                step = "locate",
                file_system_id = %config.file_system_id,
                kind = %err.kind(),
                error = %err,
                "association lookup failed"
            )
        })?;
    tracing::info!(
        repository_path = %association.repository_base_path,
        file_system_path = %association.file_system_base_path,
        "resolved data repository association"
    );

    let request = requester::build_request(config, &association);
    tracing::info!(
        paths = ?request.paths,
        report_path = %request.report.path,
        "built data repository task request"
    );
    Ok(Plan {
        association,
        request,
    })
}

/// Run one invocation end to end: plan, then submit exactly one task.
pub async fn run<A>(api: &A, config: &TaskConfig) -> Result<TaskReceipt, OrchestrationError>
where
    A: DataRepositoryApi + ?Sized,
{
    let span = tracing::info_span!(
        "invocation",
        file_system_id = %config.file_system_id,
        direction = %config.direction,
    );
    async move {
        let planned = plan(api, config).await?;
        let receipt = requester::submit(api, &planned.request)
            .await
            .inspect_err(|err| {
                tracing::error!(
                    step = "create_task",
                    request = ?planned.request,
                    kind = %err.kind(),
                    remote_code = err.remote_code().unwrap_or("-"),
                    error = %err,
                    "task creation failed"
                )
            })?;
        tracing::info!(
            task_id = %receipt.task_id,
            lifecycle = %receipt.lifecycle,
            "created data repository task"
        );
        Ok::<_, OrchestrationError>(receipt)
    }
    .instrument(span)
    .await
}

/// [`run`] bounded by a wall-clock `deadline`.
///
/// On expiry the invocation is abandoned and reported as
/// [`OrchestrationError::TimedOut`]; a create call already in flight is not
/// cancelled remotely.
pub async fn run_with_deadline<A>(
    api: &A,
    config: &TaskConfig,
    deadline: Duration,
) -> Result<TaskReceipt, OrchestrationError>
where
    A: DataRepositoryApi + ?Sized,
{
    within_deadline(config, deadline, run(api, config)).await
}

/// [`plan`] bounded by a wall-clock `deadline`.
pub async fn plan_with_deadline<A>(
    api: &A,
    config: &TaskConfig,
    deadline: Duration,
) -> Result<Plan, OrchestrationError>
where
    A: DataRepositoryApi + ?Sized,
{
    within_deadline(config, deadline, plan(api, config)).await
}

/// Bound any invocation step for `config` by `deadline`, logging expiry.
///
/// Callers that must also build their client under the bound pass the whole
/// async block here.
pub async fn within_deadline<T, F>(
    config: &TaskConfig,
    deadline: Duration,
    work: F,
) -> Result<T, OrchestrationError>
where
    F: Future<Output = Result<T, OrchestrationError>>,
{
    match tokio::time::timeout(deadline, work).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!(
                step = "deadline",
                file_system_id = %config.file_system_id,
                deadline_secs = deadline.as_secs(),
                "invocation exceeded its time budget"
            );
            Err(OrchestrationError::TimedOut { after: deadline })
        }
    }
}
