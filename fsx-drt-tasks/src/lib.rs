//! # fsx-drt-tasks
//!
//! Association lookup, task construction and the invocation pipeline.
//!
//! Call [`pipeline::run`] to resolve the active association for a file system
//! and submit one data repository task, or [`pipeline::plan`] to build the
//! request without submitting it.

pub mod locator;
pub mod outcome;
pub mod pipeline;
pub mod requester;

pub use locator::{locate, select};
pub use outcome::InvocationOutcome;
pub use pipeline::{
    plan, plan_with_deadline, run, run_with_deadline, within_deadline, Plan,
};
pub use requester::{build_request, submit};
