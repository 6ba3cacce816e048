//! Domain types for data repository associations and tasks.
//!
//! Service-facing string values (`EXPORT_TO_REPOSITORY`, `AVAILABLE`, ...) are
//! the serialized form of every enum here, so JSON output matches what the
//! FSx API and CLI print.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed FSx file system identifier (`fs-0123456789abcdef0`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileSystemId(pub String);

impl FileSystemId {
    pub const PREFIX: &'static str = "fs-";

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` when the identifier carries the `fs-` prefix the service issues.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() > Self::PREFIX.len() && self.0.starts_with(Self::PREFIX)
    }
}

impl fmt::Display for FileSystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for FileSystemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for FileSystemId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which way a data repository task moves data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskDirection {
    /// Push changed file-system content to the repository.
    #[serde(rename = "EXPORT_TO_REPOSITORY")]
    Export,
    /// Pull repository metadata into the file system.
    #[serde(rename = "IMPORT_METADATA_FROM_REPOSITORY")]
    Import,
}

impl TaskDirection {
    pub const ALL: [TaskDirection; 2] = [TaskDirection::Export, TaskDirection::Import];

    /// The value the FSx API expects in the task `Type` field.
    pub fn service_value(self) -> &'static str {
        match self {
            TaskDirection::Export => "EXPORT_TO_REPOSITORY",
            TaskDirection::Import => "IMPORT_METADATA_FROM_REPOSITORY",
        }
    }
}

impl fmt::Display for TaskDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.service_value())
    }
}

impl FromStr for TaskDirection {
    type Err = String;

    /// Accepts the short form (`export`) or the service value
    /// (`EXPORT_TO_REPOSITORY`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EXPORT" | "EXPORT_TO_REPOSITORY" => Ok(TaskDirection::Export),
            "IMPORT" | "IMPORT_METADATA_FROM_REPOSITORY" => Ok(TaskDirection::Import),
            other => Err(format!(
                "unknown task direction '{other}'; expected: EXPORT, IMPORT, \
                 EXPORT_TO_REPOSITORY, IMPORT_METADATA_FROM_REPOSITORY"
            )),
        }
    }
}

/// Lifecycle of a data repository association.
///
/// Values this build does not know are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssociationLifecycle {
    Creating,
    Available,
    Misconfigured,
    Updating,
    Deleting,
    Failed,
    Other(String),
}

impl AssociationLifecycle {
    pub fn as_str(&self) -> &str {
        match self {
            AssociationLifecycle::Creating => "CREATING",
            AssociationLifecycle::Available => "AVAILABLE",
            AssociationLifecycle::Misconfigured => "MISCONFIGURED",
            AssociationLifecycle::Updating => "UPDATING",
            AssociationLifecycle::Deleting => "DELETING",
            AssociationLifecycle::Failed => "FAILED",
            AssociationLifecycle::Other(value) => value,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, AssociationLifecycle::Available)
    }
}

impl From<&str> for AssociationLifecycle {
    fn from(s: &str) -> Self {
        match s {
            "CREATING" => AssociationLifecycle::Creating,
            "AVAILABLE" => AssociationLifecycle::Available,
            "MISCONFIGURED" => AssociationLifecycle::Misconfigured,
            "UPDATING" => AssociationLifecycle::Updating,
            "DELETING" => AssociationLifecycle::Deleting,
            "FAILED" => AssociationLifecycle::Failed,
            other => AssociationLifecycle::Other(other.to_owned()),
        }
    }
}

impl From<String> for AssociationLifecycle {
    fn from(s: String) -> Self {
        AssociationLifecycle::from(s.as_str())
    }
}

impl From<AssociationLifecycle> for String {
    fn from(l: AssociationLifecycle) -> Self {
        l.as_str().to_owned()
    }
}

impl fmt::Display for AssociationLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a created task, advanced by the remote service only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskLifecycle {
    Pending,
    Executing,
    Failed,
    Succeeded,
    Canceled,
    Canceling,
    Other(String),
}

impl TaskLifecycle {
    pub fn as_str(&self) -> &str {
        match self {
            TaskLifecycle::Pending => "PENDING",
            TaskLifecycle::Executing => "EXECUTING",
            TaskLifecycle::Failed => "FAILED",
            TaskLifecycle::Succeeded => "SUCCEEDED",
            TaskLifecycle::Canceled => "CANCELED",
            TaskLifecycle::Canceling => "CANCELING",
            TaskLifecycle::Other(value) => value,
        }
    }
}

impl From<&str> for TaskLifecycle {
    fn from(s: &str) -> Self {
        match s {
            "PENDING" => TaskLifecycle::Pending,
            "EXECUTING" => TaskLifecycle::Executing,
            "FAILED" => TaskLifecycle::Failed,
            "SUCCEEDED" => TaskLifecycle::Succeeded,
            "CANCELED" => TaskLifecycle::Canceled,
            "CANCELING" => TaskLifecycle::Canceling,
            other => TaskLifecycle::Other(other.to_owned()),
        }
    }
}

impl From<String> for TaskLifecycle {
    fn from(s: String) -> Self {
        TaskLifecycle::from(s.as_str())
    }
}

impl From<TaskLifecycle> for String {
    fn from(l: TaskLifecycle) -> Self {
        l.as_str().to_owned()
    }
}

impl fmt::Display for TaskLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Associations
// ---------------------------------------------------------------------------

/// Snapshot of a data repository association as listed by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryAssociation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub association_id: Option<String>,
    /// Object-store prefix, e.g. `s3://bucket/prefix/`.
    pub repository_path: String,
    /// Mount-relative path inside the file system, e.g. `/fsx/data`.
    pub file_system_path: String,
    pub lifecycle: AssociationLifecycle,
}

/// The usable association selected for one invocation, base paths normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedAssociation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub association_id: Option<String>,
    pub repository_base_path: String,
    pub file_system_base_path: String,
}

// ---------------------------------------------------------------------------
// Task request
// ---------------------------------------------------------------------------

/// Completion report settings attached to every task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSpec {
    pub enabled: bool,
    pub path: String,
    pub format: String,
    pub scope: String,
}

impl ReportSpec {
    /// The only report format the service supports.
    pub const FORMAT: &'static str = "REPORT_CSV_20191124";
    /// Successful entries are never reported.
    pub const SCOPE: &'static str = "FAILED_FILES_ONLY";

    /// Enabled, CSV, failed-files-only report written to `path`.
    pub fn failed_files_csv(path: impl Into<String>) -> Self {
        Self {
            enabled: true,
            path: path.into(),
            format: Self::FORMAT.to_owned(),
            scope: Self::SCOPE.to_owned(),
        }
    }
}

/// Outbound `CreateDataRepositoryTask` descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRequest {
    pub file_system_id: FileSystemId,
    #[serde(rename = "type")]
    pub direction: TaskDirection,
    pub paths: Vec<String>,
    pub report: ReportSpec,
}

impl TaskRequest {
    /// Equivalent `aws fsx create-data-repository-task` invocation, for
    /// operators reproducing a request by hand.
    pub fn cli_equivalent(&self) -> String {
        format!(
            "aws fsx create-data-repository-task --file-system-id {} --type {} --paths {} \
             --report Enabled=true,Path={},Format={},Scope={}",
            self.file_system_id,
            self.direction.service_value(),
            self.paths.join(","),
            self.report.path,
            self.report.format,
            self.report.scope,
        )
    }
}

// ---------------------------------------------------------------------------
// Task result
// ---------------------------------------------------------------------------

/// The service's description of a freshly created task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTask {
    pub task_id: String,
    pub lifecycle: TaskLifecycle,
    pub task_type: String,
    pub paths: Vec<String>,
    pub resource_arn: Option<String>,
    pub failure_message: Option<String>,
    pub creation_time: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

/// Serializable success payload; every timestamp is an RFC 3339 string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskReceipt {
    pub task_id: String,
    pub lifecycle: TaskLifecycle,
    pub task_type: String,
    pub paths: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
    pub creation_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// Canonical textual form for timestamps: UTC, `Z` suffix, sub-second digits
/// kept only when present.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl From<CreatedTask> for TaskReceipt {
    fn from(task: CreatedTask) -> Self {
        Self {
            task_id: task.task_id,
            lifecycle: task.lifecycle,
            task_type: task.task_type,
            paths: task.paths,
            resource_arn: task.resource_arn,
            failure_message: task.failure_message,
            creation_time: format_timestamp(task.creation_time),
            start_time: task.start_time.map(format_timestamp),
            end_time: task.end_time.map(format_timestamp),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
