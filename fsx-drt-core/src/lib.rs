//! fsx-drt core library: domain types, configuration, path rules, errors.
//!
//! Public API surface:
//! - [`types`] newtypes and domain structs for associations and tasks
//! - [`error`] [`ConfigError`], [`RemoteError`], [`OrchestrationError`]
//! - [`config`] configuration sources and the resolver
//! - [`paths`] base-path normalization and report-path joining
//! - [`api`] the [`DataRepositoryApi`] seam to the remote service

pub mod api;
pub mod config;
pub mod error;
pub mod paths;
pub mod types;

pub use api::DataRepositoryApi;
pub use config::{resolve, RawConfig, TaskConfig};
pub use error::{ConfigError, ErrorKind, OrchestrationError, RemoteError, RemoteOperation};
pub use types::{
    AssociationLifecycle, CreatedTask, FileSystemId, ReportSpec, RepositoryAssociation,
    ResolvedAssociation, TaskDirection, TaskLifecycle, TaskReceipt, TaskRequest,
};
