//! AWS SDK FSx client implementation.

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use aws_sdk_fsx::types::{
    CompletionReport, DataRepositoryTaskType, Filter, FilterName, ReportFormat, ReportScope,
};
use aws_sdk_fsx::Client as FsxSdkClient;

use fsx_drt_core::{
    CreatedTask, DataRepositoryApi, FileSystemId, RemoteError, RemoteOperation,
    RepositoryAssociation, TaskRequest,
};

use crate::convert::{association_from_sdk, remote_error, task_from_sdk};

/// Connection settings for [`FsxClient`].
#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    /// Region override; `None` defers to the SDK provider chain
    /// (`AWS_REGION`, profile, instance metadata).
    pub region: Option<String>,
}

/// `DataRepositoryApi` implementation using the AWS SDK for Rust.
///
/// SDK-level retries are disabled: a failed call is reported once and the
/// next scheduled invocation is the retry.
pub struct FsxClient {
    client: FsxSdkClient,
}

impl FsxClient {
    /// Create a client from the default credential chain.
    pub async fn new(settings: ClientSettings) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).retry_config(RetryConfig::disabled());
        if let Some(region) = settings.region {
            loader = loader.region(aws_sdk_fsx::config::Region::new(region));
        }
        let sdk_config = loader.load().await;
        Self {
            client: FsxSdkClient::new(&sdk_config),
        }
    }

    /// Wrap a pre-configured SDK client.
    pub fn from_client(client: FsxSdkClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataRepositoryApi for FsxClient {
    async fn list_associations(
        &self,
        file_system_id: &FileSystemId,
    ) -> Result<Vec<RepositoryAssociation>, RemoteError> {
        let filter = Filter::builder()
            .name(FilterName::FileSystemId)
            .values(file_system_id.as_str())
            .build();

        let mut associations = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let output = self
                .client
                .describe_data_repository_associations()
                .filters(filter.clone())
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|err| {
                    remote_error(RemoteOperation::DescribeDataRepositoryAssociations, err)
                })?;

            associations.extend(output.associations().iter().map(association_from_sdk));

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_owned()),
                _ => break,
            }
        }

        tracing::debug!(
            file_system_id = %file_system_id,
            count = associations.len(),
            "described data repository associations"
        );
        Ok(associations)
    }

    async fn create_task(&self, request: &TaskRequest) -> Result<CreatedTask, RemoteError> {
        let operation = RemoteOperation::CreateDataRepositoryTask;

        let report = CompletionReport::builder()
            .enabled(request.report.enabled)
            .path(request.report.path.as_str())
            .format(ReportFormat::from(request.report.format.as_str()))
            .scope(ReportScope::from(request.report.scope.as_str()))
            .build();

        let output = self
            .client
            .create_data_repository_task()
            .file_system_id(request.file_system_id.as_str())
            .r#type(DataRepositoryTaskType::from(
                request.direction.service_value(),
            ))
            .set_paths(Some(request.paths.clone()))
            .report(report)
            .send()
            .await
            .map_err(|err| remote_error(operation, err))?;

        let task = output.data_repository_task().ok_or_else(|| {
            RemoteError::new(operation, None, "response did not describe the created task")
        })?;
        task_from_sdk(task)
    }
}
