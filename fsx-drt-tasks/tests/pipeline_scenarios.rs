//! End-to-end invocation scenarios against an in-memory FSx stand-in.

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use fsx_drt_core::{
    config::{self, RawConfig, COMPLETION_REPORT_PATH, FILE_SYSTEM_ID, FSX_PATHS, TASK_TYPE},
    AssociationLifecycle, CreatedTask, DataRepositoryApi, ErrorKind, FileSystemId,
    OrchestrationError, RemoteError, RemoteOperation, RepositoryAssociation, TaskConfig,
    TaskDirection, TaskLifecycle, TaskRequest,
};
use fsx_drt_tasks::{pipeline, InvocationOutcome};
use rstest::rstest;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct FakeFsx {
    associations: Result<Vec<RepositoryAssociation>, RemoteError>,
    create: Result<CreatedTask, RemoteError>,
    list_delay: Option<Duration>,
    submitted: Mutex<Vec<TaskRequest>>,
}

impl FakeFsx {
    fn with(associations: Vec<RepositoryAssociation>) -> Self {
        Self {
            associations: Ok(associations),
            create: Ok(created_task()),
            list_delay: None,
            submitted: Mutex::new(Vec::new()),
        }
    }

    fn submitted(&self) -> Vec<TaskRequest> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl DataRepositoryApi for FakeFsx {
    async fn list_associations(
        &self,
        _file_system_id: &FileSystemId,
    ) -> Result<Vec<RepositoryAssociation>, RemoteError> {
        if let Some(delay) = self.list_delay {
            tokio::time::sleep(delay).await;
        }
        self.associations.clone()
    }

    async fn create_task(&self, request: &TaskRequest) -> Result<CreatedTask, RemoteError> {
        self.submitted.lock().unwrap().push(request.clone());
        self.create.clone()
    }
}

fn creation_time() -> DateTime<Utc> {
    Utc.timestamp_opt(1_735_689_600, 123_456_789).unwrap()
}

fn created_task() -> CreatedTask {
    CreatedTask {
        task_id: "task-0a1b2c3d4e5f60718".into(),
        lifecycle: TaskLifecycle::Pending,
        task_type: "EXPORT_TO_REPOSITORY".into(),
        paths: vec!["/fsx/data".into()],
        resource_arn: Some("arn:aws:fsx:us-east-1:123456789012:task/task-0a1b2c3d4e5f60718".into()),
        failure_message: None,
        creation_time: creation_time(),
        start_time: None,
        end_time: None,
    }
}

fn association(lifecycle: &str) -> RepositoryAssociation {
    RepositoryAssociation {
        association_id: Some("dra-0123456789abcdef0".into()),
        repository_path: "/repo".into(),
        file_system_path: "/fsx/data".into(),
        lifecycle: AssociationLifecycle::from(lifecycle),
    }
}

fn task_config(direction: TaskDirection) -> TaskConfig {
    TaskConfig {
        file_system_id: FileSystemId::from("fs-0123456789abcdef0"),
        direction,
        report_sub_path: "/reports".into(),
        target_paths: vec!["/fsx/data/project".into()],
    }
}

// ---------------------------------------------------------------------------
// 1. Path derivation scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn export_submits_file_system_base_path() {
    let api = FakeFsx::with(vec![association("AVAILABLE")]);
    let receipt = pipeline::run(&api, &task_config(TaskDirection::Export))
        .await
        .expect("run");

    let submitted = api.submitted();
    assert_eq!(submitted.len(), 1, "exactly one create call");
    assert_eq!(submitted[0].paths, vec!["/fsx/data".to_string()]);
    assert_eq!(submitted[0].report.path, "/repo/reports");
    assert_eq!(submitted[0].direction, TaskDirection::Export);
    assert_eq!(receipt.task_id, "task-0a1b2c3d4e5f60718");
}

#[tokio::test]
async fn import_submits_repository_base_path() {
    let api = FakeFsx::with(vec![association("AVAILABLE")]);
    pipeline::run(&api, &task_config(TaskDirection::Import))
        .await
        .expect("run");

    let submitted = api.submitted();
    assert_eq!(submitted[0].paths, vec!["/repo".to_string()]);
    assert_eq!(submitted[0].report.path, "/repo/reports");
    assert_eq!(submitted[0].direction, TaskDirection::Import);
}

#[rstest]
#[case("s3://bucket/prefix/", "/fsx/data/", "s3://bucket/prefix", "/fsx/data")]
#[case("s3://bucket/prefix", "/fsx/data", "s3://bucket/prefix", "/fsx/data")]
#[case("s3://bucket///", "/", "s3://bucket", "/")]
#[tokio::test]
async fn trailing_separators_never_reach_the_request(
    #[case] repo: &str,
    #[case] fsx: &str,
    #[case] expected_repo: &str,
    #[case] expected_fsx: &str,
) {
    let mut assoc = association("AVAILABLE");
    assoc.repository_path = repo.into();
    assoc.file_system_path = fsx.into();

    let api = FakeFsx::with(vec![assoc]);
    let export = pipeline::plan(&api, &task_config(TaskDirection::Export))
        .await
        .expect("plan export");
    let import = pipeline::plan(&api, &task_config(TaskDirection::Import))
        .await
        .expect("plan import");

    assert_eq!(export.request.paths, vec![expected_fsx.to_string()]);
    assert_eq!(import.request.paths, vec![expected_repo.to_string()]);
    assert_eq!(export.request.report.path, format!("{expected_repo}/reports"));
    assert!(api.submitted().is_empty(), "planning must not create");
}

#[tokio::test]
async fn plan_never_creates() {
    let mut assoc = association("AVAILABLE");
    assoc.repository_path = "s3://b/p/".into();
    let api = FakeFsx::with(vec![assoc]);

    let planned = pipeline::plan(&api, &task_config(TaskDirection::Import))
        .await
        .expect("plan");

    assert_eq!(planned.request.paths, vec!["s3://b/p".to_string()]);
    assert_eq!(planned.request.report.path, "s3://b/p/reports");
    assert!(api.submitted().is_empty(), "dry-run must not create");
}

// ---------------------------------------------------------------------------
// 2. Association failures never reach create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_listing_is_no_association_found() {
    let api = FakeFsx::with(vec![]);
    let err = pipeline::run(&api, &task_config(TaskDirection::Export))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoAssociationFound);
    assert!(api.submitted().is_empty(), "create must not be called");
}

#[tokio::test]
async fn creating_association_is_not_available() {
    let api = FakeFsx::with(vec![association("CREATING")]);
    let err = pipeline::run(&api, &task_config(TaskDirection::Export))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoAvailableAssociationFound);
    assert!(api.submitted().is_empty(), "create must not be called");
}

#[tokio::test]
async fn listing_failure_is_remote_error() {
    let mut api = FakeFsx::with(vec![]);
    api.associations = Err(RemoteError::new(
        RemoteOperation::DescribeDataRepositoryAssociations,
        Some("FileSystemNotFound".into()),
        "File system 'fs-0123456789abcdef0' does not exist.",
    ));
    let err = pipeline::run(&api, &task_config(TaskDirection::Import))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RemoteServiceError);
    assert_eq!(err.remote_code(), Some("FileSystemNotFound"));
    assert!(api.submitted().is_empty());
}

// ---------------------------------------------------------------------------
// 3. Create failures and timestamps
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_rejection_is_surfaced_verbatim_without_retry() {
    let mut api = FakeFsx::with(vec![association("AVAILABLE")]);
    api.create = Err(RemoteError::new(
        RemoteOperation::CreateDataRepositoryTask,
        Some("ServiceLimitExceeded".into()),
        "Too many concurrent data repository tasks.",
    ));

    let result = pipeline::run(&api, &task_config(TaskDirection::Export)).await;
    assert_eq!(api.submitted().len(), 1, "no local retry");

    let outcome = InvocationOutcome::from_result(&result);
    match outcome {
        InvocationOutcome::Failed {
            kind,
            message,
            remote_code,
        } => {
            assert_eq!(kind, ErrorKind::RemoteServiceError);
            assert_eq!(remote_code.as_deref(), Some("ServiceLimitExceeded"));
            assert!(message.contains("Too many concurrent data repository tasks."));
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn receipt_timestamps_reparse_to_the_same_instant() {
    let mut task = created_task();
    task.start_time = Some(Utc.timestamp_opt(1_735_689_660, 0).unwrap());
    let mut api = FakeFsx::with(vec![association("AVAILABLE")]);
    api.create = Ok(task);

    let receipt = pipeline::run(&api, &task_config(TaskDirection::Export))
        .await
        .expect("run");

    assert_eq!(receipt.creation_time, "2025-01-01T00:00:00.123456789Z");
    let reparsed = DateTime::parse_from_rfc3339(&receipt.creation_time).expect("rfc3339");
    assert_eq!(reparsed.with_timezone(&Utc), creation_time());

    let start = receipt.start_time.as_deref().expect("start time");
    assert_eq!(start, "2025-01-01T00:01:00Z");
    assert!(receipt.end_time.is_none());

    let json = serde_json::to_value(&receipt).expect("serialize");
    assert_eq!(json["creation_time"], "2025-01-01T00:00:00.123456789Z");
    assert!(json.get("end_time").is_none());
}

// ---------------------------------------------------------------------------
// 4. Deadline
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn slow_listing_times_out_before_create() {
    let mut api = FakeFsx::with(vec![association("AVAILABLE")]);
    api.list_delay = Some(Duration::from_secs(120));

    let err = pipeline::run_with_deadline(
        &api,
        &task_config(TaskDirection::Export),
        Duration::from_secs(30),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, OrchestrationError::TimedOut { .. }), "got: {err}");
    assert_eq!(err.kind(), ErrorKind::RemoteServiceError);
    assert!(api.submitted().is_empty());
}

#[tokio::test(start_paused = true)]
async fn slow_listing_times_out_when_planning() {
    let captured = Captured::default();
    let _guard = tracing::subscriber::set_default(capture_logs(&captured));

    let mut api = FakeFsx::with(vec![association("AVAILABLE")]);
    api.list_delay = Some(Duration::from_secs(120));

    let err = pipeline::plan_with_deadline(
        &api,
        &task_config(TaskDirection::Export),
        Duration::from_secs(30),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, OrchestrationError::TimedOut { .. }), "got: {err}");
    assert!(api.submitted().is_empty());
    let logs = captured.contents();
    assert!(logs.contains("deadline"), "logs: {logs}");
}

#[tokio::test(start_paused = true)]
async fn deadline_covers_client_setup() {
    let api = FakeFsx::with(vec![association("AVAILABLE")]);
    let config = task_config(TaskDirection::Export);

    let err = pipeline::within_deadline(&config, Duration::from_secs(30), async {
        // stands in for slow credential or region resolution
        tokio::time::sleep(Duration::from_secs(45)).await;
        pipeline::run(&api, &config).await
    })
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RemoteServiceError);
    assert!(api.submitted().is_empty());
}

#[tokio::test]
async fn fast_run_finishes_within_deadline() {
    let api = FakeFsx::with(vec![association("AVAILABLE")]);
    let receipt = pipeline::run_with_deadline(
        &api,
        &task_config(TaskDirection::Import),
        Duration::from_secs(30),
    )
    .await
    .expect("run");
    assert_eq!(receipt.lifecycle, TaskLifecycle::Pending);
}

// ---------------------------------------------------------------------------
// 5. Configuration gate
// ---------------------------------------------------------------------------

#[test]
fn missing_file_system_and_direction_fails_before_any_call() {
    let mut raw = RawConfig::new();
    raw.set(COMPLETION_REPORT_PATH, "/reports")
        .set(FSX_PATHS, "/fsx/data");

    let err = OrchestrationError::from(config::resolve(&raw).unwrap_err());
    assert_eq!(err.kind(), ErrorKind::ConfigurationError);
    let msg = err.to_string();
    assert!(msg.contains(FILE_SYSTEM_ID) && msg.contains(TASK_TYPE), "got: {msg}");
}

// ---------------------------------------------------------------------------
// 6. Failure logging
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture_logs(captured: &Captured) -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_writer(captured.clone())
        .with_ansi(false)
        .finish()
}

#[tokio::test]
async fn failures_are_logged_with_step_and_input() {
    let captured = Captured::default();
    let _guard = tracing::subscriber::set_default(capture_logs(&captured));

    let api = FakeFsx::with(vec![association("MISCONFIGURED")]);
    let _ = pipeline::run(&api, &task_config(TaskDirection::Export)).await;

    let logs = captured.contents();
    assert!(logs.contains("ERROR"), "logs: {logs}");
    assert!(logs.contains("locate"), "logs: {logs}");
    assert!(logs.contains("fs-0123456789abcdef0"), "logs: {logs}");
    assert!(logs.contains("NoAvailableAssociationFound"), "logs: {logs}");
}

#[tokio::test]
async fn import_warns_that_configured_paths_are_superseded() {
    let captured = Captured::default();
    let _guard = tracing::subscriber::set_default(capture_logs(&captured));

    let api = FakeFsx::with(vec![association("AVAILABLE")]);
    let planned = pipeline::plan(&api, &task_config(TaskDirection::Import))
        .await
        .expect("plan");

    assert_eq!(planned.request.paths, vec!["/repo".to_string()]);
    let logs = captured.contents();
    assert!(logs.contains("WARN"), "logs: {logs}");
    assert!(logs.contains("configured paths are not used"), "logs: {logs}");
    assert!(logs.contains("/fsx/data/project"), "logs: {logs}");
}
