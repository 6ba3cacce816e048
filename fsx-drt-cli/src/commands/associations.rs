//! `fsx-drt associations`: list associations and show which one a task would use.

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use fsx_drt_aws::{ClientSettings, FsxClient};
use fsx_drt_core::{DataRepositoryApi, FileSystemId, RepositoryAssociation};
use fsx_drt_tasks::locator;

use super::{block_on, print_json};

/// Arguments for `fsx-drt associations`.
#[derive(Args, Debug)]
pub struct AssociationsArgs {
    /// File system to inspect (`fs-...`).
    #[arg(long)]
    pub filesystem_id: String,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,

    /// AWS region (defaults to the SDK provider chain).
    #[arg(long)]
    pub region: Option<String>,
}

impl AssociationsArgs {
    pub fn run(self) -> Result<()> {
        let file_system_id = FileSystemId::from(self.filesystem_id.trim());
        if !file_system_id.is_well_formed() {
            bail!(
                "file system id '{file_system_id}' must start with '{}'",
                FileSystemId::PREFIX
            );
        }

        let settings = ClientSettings {
            region: self.region.clone(),
        };
        let associations = block_on(async {
            let client = FsxClient::new(settings).await;
            client.list_associations(&file_system_id).await
        })??;

        let report = build_report(&file_system_id, associations);
        if self.json {
            return print_json(&report);
        }
        print_table(&report);
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct AssociationsReport {
    file_system_id: FileSystemId,
    associations: Vec<RepositoryAssociation>,
    /// Index into `associations` of the one a task would use.
    #[serde(skip)]
    selected_index: Option<usize>,
    selected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    selection_error: Option<String>,
}

fn build_report(
    file_system_id: &FileSystemId,
    associations: Vec<RepositoryAssociation>,
) -> AssociationsReport {
    let (selected_index, selected, selection_error) =
        match locator::select(file_system_id, &associations) {
            Ok(resolved) => (
                associations.iter().position(|a| a.lifecycle.is_available()),
                resolved.association_id,
                None,
            ),
            Err(err) => (None, None, Some(err.to_string())),
        };
    AssociationsReport {
        file_system_id: file_system_id.clone(),
        associations,
        selected_index,
        selected,
        selection_error,
    }
}

#[derive(Tabled)]
struct AssociationRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "Association")]
    id: String,
    #[tabled(rename = "Lifecycle")]
    lifecycle: String,
    #[tabled(rename = "File system path")]
    file_system_path: String,
    #[tabled(rename = "Repository path")]
    repository_path: String,
}

fn print_table(report: &AssociationsReport) {
    if report.associations.is_empty() {
        println!(
            "{} no data repository associations on {}",
            "✗".red(),
            report.file_system_id
        );
        return;
    }

    let rows = report
        .associations
        .iter()
        .enumerate()
        .map(|(i, a)| AssociationRow {
            marker: if report.selected_index == Some(i) { "*" } else { "" },
            id: a.association_id.clone().unwrap_or_else(|| "-".into()),
            lifecycle: a.lifecycle.to_string(),
            file_system_path: a.file_system_path.clone(),
            repository_path: a.repository_path.clone(),
        })
        .collect::<Vec<_>>();
    println!("{}", Table::new(rows).with(Style::rounded()));

    match (&report.selected, &report.selection_error) {
        (_, Some(err)) => println!("{} {err}", "✗".red()),
        (Some(id), None) => println!("{} tasks will use {}", "✓".green(), id.bold()),
        (None, None) => println!(
            "{} tasks will use the unnamed AVAILABLE association",
            "✓".green()
        ),
    }
}

#[cfg(test)]
mod tests {
    use fsx_drt_core::AssociationLifecycle;

    use super::*;

    fn assoc(id: &str, lifecycle: &str) -> RepositoryAssociation {
        RepositoryAssociation {
            association_id: Some(id.into()),
            repository_path: "s3://bucket/prefix/".into(),
            file_system_path: "/fsx".into(),
            lifecycle: AssociationLifecycle::from(lifecycle),
        }
    }

    #[test]
    fn report_marks_first_available() {
        let fs = FileSystemId::from("fs-0123456789abcdef0");
        let report = build_report(
            &fs,
            vec![
                assoc("dra-a", "CREATING"),
                assoc("dra-b", "AVAILABLE"),
                assoc("dra-c", "AVAILABLE"),
            ],
        );
        assert_eq!(report.selected_index, Some(1));
        assert_eq!(report.selected.as_deref(), Some("dra-b"));
        assert!(report.selection_error.is_none());
    }

    #[test]
    fn report_explains_missing_selection() {
        let fs = FileSystemId::from("fs-0123456789abcdef0");
        let report = build_report(&fs, vec![assoc("dra-a", "MISCONFIGURED")]);
        assert_eq!(report.selected_index, None);
        let err = report.selection_error.as_deref().expect("selection error");
        assert!(err.contains("MISCONFIGURED"), "got: {err}");

        let json = serde_json::to_value(&report).expect("serialize");
        assert!(json.get("selected_index").is_none());
        assert!(json["selected"].is_null());
    }
}
