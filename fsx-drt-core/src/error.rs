//! Error types for fsx-drt.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{AssociationLifecycle, FileSystemId};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// One malformed configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigProblem {
    pub key: &'static str,
    pub reason: String,
}

impl fmt::Display for ConfigProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.reason)
    }
}

/// All errors that can arise while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required values absent or blank. Lists every missing key, in
    /// declaration order.
    #[error("missing configuration values: {}", .keys.join(", "))]
    Missing { keys: Vec<&'static str> },

    /// Values present but malformed.
    #[error("invalid configuration: {}", join_display(.problems))]
    Invalid { problems: Vec<ConfigProblem> },

    /// Config file could not be read.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid YAML for the expected shape.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

// ---------------------------------------------------------------------------
// Remote service
// ---------------------------------------------------------------------------

/// The two remote calls an invocation makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoteOperation {
    DescribeDataRepositoryAssociations,
    CreateDataRepositoryTask,
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteOperation::DescribeDataRepositoryAssociations => {
                f.write_str("DescribeDataRepositoryAssociations")
            }
            RemoteOperation::CreateDataRepositoryTask => f.write_str("CreateDataRepositoryTask"),
        }
    }
}

/// A rejected or failed remote call. `code` and `message` are the service's
/// own, verbatim; `code` is `None` for transport failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed ({}): {message}", .code.as_deref().unwrap_or("no error code"))]
pub struct RemoteError {
    pub operation: RemoteOperation,
    pub code: Option<String>,
    pub message: String,
}

impl RemoteError {
    pub fn new(
        operation: RemoteOperation,
        code: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            code,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

/// Stable classification of an invocation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    ConfigurationError,
    NoAssociationFound,
    NoAvailableAssociationFound,
    RemoteServiceError,
    UnclassifiedError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::ConfigurationError => "ConfigurationError",
            ErrorKind::NoAssociationFound => "NoAssociationFound",
            ErrorKind::NoAvailableAssociationFound => "NoAvailableAssociationFound",
            ErrorKind::RemoteServiceError => "RemoteServiceError",
            ErrorKind::UnclassifiedError => "UnclassifiedError",
        };
        f.write_str(s)
    }
}

/// Every way an invocation can fail. Nothing here is retried locally.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no data repository associations found for {file_system_id}")]
    NoAssociationFound { file_system_id: FileSystemId },

    #[error(
        "no AVAILABLE data repository association for {file_system_id} (observed: {})",
        join_display(.observed)
    )]
    NoAvailableAssociationFound {
        file_system_id: FileSystemId,
        observed: Vec<AssociationLifecycle>,
    },

    #[error("remote service error: {0}")]
    Remote(#[from] RemoteError),

    #[error("invocation timed out after {}s", .after.as_secs())]
    TimedOut { after: Duration },

    #[error("association is unusable: {reason}")]
    UnusableAssociation { reason: String },

    #[error("unclassified error: {0}")]
    Unclassified(String),
}

impl OrchestrationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrchestrationError::Config(_) => ErrorKind::ConfigurationError,
            OrchestrationError::NoAssociationFound { .. } => ErrorKind::NoAssociationFound,
            OrchestrationError::NoAvailableAssociationFound { .. } => {
                ErrorKind::NoAvailableAssociationFound
            }
            OrchestrationError::Remote(_) | OrchestrationError::TimedOut { .. } => {
                ErrorKind::RemoteServiceError
            }
            OrchestrationError::UnusableAssociation { .. } | OrchestrationError::Unclassified(_) => {
                ErrorKind::UnclassifiedError
            }
        }
    }

    /// The remote service's error code, when the failure came from it.
    pub fn remote_code(&self) -> Option<&str> {
        match self {
            OrchestrationError::Remote(err) => err.code.as_deref(),
            _ => None,
        }
    }
}

fn join_display<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
