//! The seam between orchestration logic and the remote task service.

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::types::{CreatedTask, FileSystemId, RepositoryAssociation, TaskRequest};

/// The two FSx operations an invocation needs.
///
/// Implementations make exactly one logical call per method and never retry.
#[async_trait]
pub trait DataRepositoryApi: Send + Sync {
    /// Every association bound to `file_system_id`, in service order.
    async fn list_associations(
        &self,
        file_system_id: &FileSystemId,
    ) -> Result<Vec<RepositoryAssociation>, RemoteError>;

    /// Submit one data repository task.
    async fn create_task(&self, request: &TaskRequest) -> Result<CreatedTask, RemoteError>;
}
