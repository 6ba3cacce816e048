pub mod associations;
pub mod run;
pub mod task;

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use fsx_drt_aws::{ClientSettings, FsxClient};
use fsx_drt_core::{ConfigError, OrchestrationError, TaskConfig};
use fsx_drt_tasks::{pipeline, InvocationOutcome, Plan};

/// Execution flags shared by `run`, `export` and `import`.
#[derive(Args, Debug, Clone)]
pub struct ExecArgs {
    /// Resolve the association and print the request without creating a task.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,

    /// Upper bound on the whole invocation, in seconds.
    #[arg(long, default_value_t = 60)]
    pub timeout: u64,

    /// AWS region (defaults to the SDK provider chain).
    #[arg(long)]
    pub region: Option<String>,
}

/// Single-threaded runtime; an invocation is strictly sequential.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    Ok(runtime.block_on(future))
}

/// Drive one invocation from a resolved (or rejected) configuration.
///
/// Configuration is checked before any AWS client is built, so a rejected
/// configuration never touches the network.
pub(crate) fn execute(
    resolved: Result<TaskConfig, ConfigError>,
    exec: &ExecArgs,
    region: Option<String>,
) -> Result<()> {
    let config = match resolved {
        Ok(config) => config,
        Err(err) => {
            let err = OrchestrationError::from(err);
            tracing::error!(
                step = "resolve",
                kind = %err.kind(),
                error = %err,
                "configuration rejected"
            );
            return fail(err, exec.json);
        }
    };

    let deadline = Duration::from_secs(exec.timeout);
    let settings = ClientSettings { region };

    // The bound covers client construction too: region and credential
    // resolution can stall on instance metadata.
    if exec.dry_run {
        let planned = block_on(pipeline::within_deadline(&config, deadline, async {
            let client = FsxClient::new(settings).await;
            pipeline::plan(&client, &config).await
        }))?;
        return match planned {
            Ok(planned) => print_plan(&planned, exec.json),
            Err(err) => fail(err, exec.json),
        };
    }

    let result = block_on(pipeline::within_deadline(&config, deadline, async {
        let client = FsxClient::new(settings).await;
        pipeline::run(&client, &config).await
    }))?;
    match result {
        Ok(task) if exec.json => print_json(&InvocationOutcome::Succeeded { task }),
        Ok(receipt) => {
            println!(
                "{} created task {} ({})",
                "✓".green(),
                receipt.task_id.bold(),
                receipt.lifecycle
            );
            println!("  type:    {}", receipt.task_type);
            println!("  paths:   {}", receipt.paths.join(", "));
            println!("  created: {}", receipt.creation_time);
            Ok(())
        }
        Err(err) => fail(err, exec.json),
    }
}

/// Report a classified failure and turn it into a non-zero exit.
fn fail(err: OrchestrationError, json: bool) -> Result<()> {
    if json {
        print_json(&InvocationOutcome::from_error(&err))?;
    }
    let kind = err.kind();
    Err(anyhow::Error::new(err).context(kind.to_string()))
}

#[derive(Serialize)]
struct PlanJson<'a> {
    status: &'static str,
    #[serde(flatten)]
    plan: &'a Plan,
    cli_equivalent: String,
}

fn print_plan(planned: &Plan, json: bool) -> Result<()> {
    let cli_equivalent = planned.request.cli_equivalent();
    if json {
        return print_json(&PlanJson {
            status: "planned",
            plan: planned,
            cli_equivalent,
        });
    }

    let request = &planned.request;
    println!(
        "{} would create {} task on {}",
        "[dry-run]".yellow(),
        request.direction.service_value(),
        request.file_system_id.as_str().bold()
    );
    println!(
        "  association: {}",
        planned.association.association_id.as_deref().unwrap_or("-")
    );
    println!("  paths:       {}", request.paths.join(", "));
    println!("  report:      {}", request.report.path);
    println!("  equivalent:  {cli_equivalent}");
    Ok(())
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to encode JSON output")?;
    println!("{rendered}");
    Ok(())
}
