//! Task construction and submission.
//!
//! Path derivation:
//! - `EXPORT_TO_REPOSITORY` → `[file system base path]`; caller-supplied
//!   target paths are accepted but superseded, export always covers the whole
//!   mapped subtree.
//! - `IMPORT_METADATA_FROM_REPOSITORY` → `[repository base path]`, with
//!   caller paths superseded the same way.
//!
//! The completion report always lands under the repository base path.

use fsx_drt_core::{
    paths, DataRepositoryApi, OrchestrationError, ReportSpec, ResolvedAssociation, TaskConfig,
    TaskDirection, TaskReceipt, TaskRequest,
};

/// Paths the task operates on for `direction`.
pub fn derive_paths(direction: TaskDirection, association: &ResolvedAssociation) -> Vec<String> {
    match direction {
        TaskDirection::Export => vec![association.file_system_base_path.clone()],
        TaskDirection::Import => vec![association.repository_base_path.clone()],
    }
}

/// Build the one request this invocation will submit. Pure apart from logging.
pub fn build_request(config: &TaskConfig, association: &ResolvedAssociation) -> TaskRequest {
    let task_paths = derive_paths(config.direction, association);

    if config.target_paths != task_paths {
        tracing::warn!(
            direction = %config.direction,
            configured = ?config.target_paths,
            submitted = ?task_paths,
            "tasks always cover the association's base path; configured paths are not used"
        );
    }

    TaskRequest {
        file_system_id: config.file_system_id.clone(),
        direction: config.direction,
        paths: task_paths,
        report: ReportSpec::failed_files_csv(paths::join(
            &association.repository_base_path,
            &config.report_sub_path,
        )),
    }
}

/// Submit `request` once and normalize the service's answer.
pub async fn submit<A>(api: &A, request: &TaskRequest) -> Result<TaskReceipt, OrchestrationError>
where
    A: DataRepositoryApi + ?Sized,
{
    let created = api.create_task(request).await?;
    Ok(TaskReceipt::from(created))
}
