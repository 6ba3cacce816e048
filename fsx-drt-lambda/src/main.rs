//! Lambda entry point: one scheduled invocation creates one data repository
//! task, configured entirely by the function's environment.

mod handler;

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;

use fsx_drt_aws::{ClientSettings, FsxClient};
use fsx_drt_core::RawConfig;

/// Used when the runtime does not report a deadline.
const DEFAULT_BUDGET: Duration = Duration::from_secs(60);
/// Headroom left for reporting the outcome before the runtime kills us.
const DEADLINE_MARGIN: Duration = Duration::from_millis(500);

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();
    let client = FsxClient::new(ClientSettings::default()).await;
    let client = &client;
    run(service_fn(move |event: LambdaEvent<Value>| {
        async move {
            tracing::debug!(
                request_id = %event.context.request_id,
                payload = %event.payload,
                "trigger received"
            );
            let budget = remaining_budget(event.context.deadline);
            let raw = RawConfig::from_vars(std::env::vars());
            handler::handle(client, &raw, budget)
                .await
                .map_err(Error::from)
        }
    }))
    .await
}

/// Time left before `deadline_ms` (epoch milliseconds), minus a margin.
fn remaining_budget(deadline_ms: u64) -> Duration {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    Duration::from_millis(deadline_ms)
        .checked_sub(now)
        .and_then(|left| left.checked_sub(DEADLINE_MARGIN))
        .filter(|left| !left.is_zero())
        .unwrap_or(DEFAULT_BUDGET)
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .json()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .try_init();
}
