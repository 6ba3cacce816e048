//! `fsx-drt export` / `fsx-drt import`: one-off tasks configured by flags.

use anyhow::Result;
use clap::Args;

use fsx_drt_core::config::{
    self, RawConfig, COMPLETION_REPORT_PATH, FILE_SYSTEM_ID, FSX_PATHS, TASK_TYPE,
};
use fsx_drt_core::{ReportSpec, TaskDirection};

use super::{execute, ExecArgs};

/// Arguments shared by `fsx-drt export` and `fsx-drt import`.
#[derive(Args, Debug)]
pub struct TaskArgs {
    /// File system to run the task on (`fs-...`).
    #[arg(long)]
    pub filesystem_id: String,

    /// Comma-separated paths. Recorded only: the task always covers the
    /// association's base path (file system side for export, repository
    /// side for import), and a warning is logged when these differ.
    #[arg(long)]
    pub paths: String,

    /// Completion report location, relative to the repository root.
    #[arg(long)]
    pub completion_report_path: String,

    /// Completion report scope. Only FAILED_FILES_ONLY is supported.
    #[arg(long, default_value = ReportSpec::SCOPE)]
    pub report_scope: String,

    #[command(flatten)]
    pub exec: ExecArgs,
}

impl TaskArgs {
    pub fn run(self, direction: TaskDirection) -> Result<()> {
        if !self.report_scope.eq_ignore_ascii_case(ReportSpec::SCOPE) {
            tracing::warn!(
                requested = %self.report_scope,
                using = ReportSpec::SCOPE,
                "unsupported report scope; falling back"
            );
        }

        let mut raw = RawConfig::new();
        raw.set(FILE_SYSTEM_ID, self.filesystem_id)
            .set(TASK_TYPE, direction.service_value())
            .set(COMPLETION_REPORT_PATH, self.completion_report_path)
            .set(FSX_PATHS, self.paths);

        let region = self.exec.region.clone();
        execute(config::resolve(&raw), &self.exec, region)
    }
}
