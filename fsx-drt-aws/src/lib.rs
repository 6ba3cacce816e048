//! AWS SDK backend for the FSx data repository API.
//!
//! [`FsxClient`] implements [`fsx_drt_core::DataRepositoryApi`] on top of
//! `aws-sdk-fsx`, translating between SDK shapes and the domain types.

mod client;
mod convert;

pub use client::{ClientSettings, FsxClient};
