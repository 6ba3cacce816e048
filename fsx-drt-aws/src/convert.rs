//! SDK shape ↔ domain type conversions.

use aws_sdk_fsx::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_fsx::primitives::DateTime as SdkDateTime;
use aws_sdk_fsx::types::{DataRepositoryAssociation, DataRepositoryTask};
use chrono::{DateTime, Utc};

use fsx_drt_core::{
    AssociationLifecycle, CreatedTask, RemoteError, RemoteOperation, RepositoryAssociation,
    TaskLifecycle,
};

/// Stand-in for an enum value the service left out.
const UNKNOWN: &str = "UNKNOWN";

pub(crate) fn association_from_sdk(a: &DataRepositoryAssociation) -> RepositoryAssociation {
    RepositoryAssociation {
        association_id: a.association_id().map(str::to_owned),
        repository_path: a.data_repository_path().unwrap_or_default().to_owned(),
        file_system_path: a.file_system_path().unwrap_or_default().to_owned(),
        lifecycle: a
            .lifecycle()
            .map(|l| AssociationLifecycle::from(l.as_str()))
            .unwrap_or_else(|| AssociationLifecycle::Other(UNKNOWN.to_owned())),
    }
}

pub(crate) fn task_from_sdk(task: &DataRepositoryTask) -> Result<CreatedTask, RemoteError> {
    let operation = RemoteOperation::CreateDataRepositoryTask;
    let task_id = task
        .task_id()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| RemoteError::new(operation, None, "created task has no task id"))?;
    let creation_time = task
        .creation_time()
        .ok_or_else(|| RemoteError::new(operation, None, "created task has no creation time"))
        .and_then(|ts| {
            to_utc(ts).ok_or_else(|| {
                RemoteError::new(operation, None, "task creation time is out of range")
            })
        })?;

    Ok(CreatedTask {
        task_id: task_id.to_owned(),
        lifecycle: task
            .lifecycle()
            .map(|l| TaskLifecycle::from(l.as_str()))
            .unwrap_or_else(|| TaskLifecycle::Other(UNKNOWN.to_owned())),
        task_type: task
            .r#type()
            .map(|t| t.as_str())
            .unwrap_or(UNKNOWN)
            .to_owned(),
        paths: task.paths().to_vec(),
        resource_arn: task.resource_arn().map(str::to_owned),
        failure_message: task
            .failure_details()
            .and_then(|d| d.message())
            .map(str::to_owned),
        creation_time,
        start_time: task.start_time().and_then(to_utc),
        end_time: task.end_time().and_then(to_utc),
    })
}

pub(crate) fn to_utc(ts: &SdkDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())
}

/// Keep the service's error code and message verbatim; fall back to the
/// full error chain for transport failures that carry neither.
pub(crate) fn remote_error<E, R>(operation: RemoteOperation, err: SdkError<E, R>) -> RemoteError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let code = err.code().map(str::to_owned);
    let message = err
        .message()
        .map(str::to_owned)
        .unwrap_or_else(|| DisplayErrorContext(&err).to_string());
    tracing::debug!(%operation, code = code.as_deref().unwrap_or("-"), "remote call failed");
    RemoteError::new(operation, code, message)
}
