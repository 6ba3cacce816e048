//! `fsx-drt run`: the scheduled entry point, configured by file and environment.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use fsx_drt_core::config::{self, ConfigFile, RawConfig};

use super::{execute, ExecArgs};

/// Arguments for `fsx-drt run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// YAML config file; defaults to `~/.fsx-drt/config.yaml` when present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub exec: ExecArgs,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let file = self.load_file()?;

        // file < environment
        let mut raw = file.as_ref().map(ConfigFile::to_raw).unwrap_or_default();
        raw.merge(RawConfig::from_vars(std::env::vars()));

        let region = self
            .exec
            .region
            .clone()
            .or_else(|| file.and_then(|f| f.region));
        execute(config::resolve(&raw), &self.exec, region)
    }

    fn load_file(&self) -> Result<Option<ConfigFile>> {
        if let Some(path) = self.config.as_ref() {
            let file = config::load_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            return Ok(Some(file));
        }
        match dirs::home_dir() {
            Some(home) => config::load_default_at(&home).context("failed to load default config"),
            None => Ok(None),
        }
    }
}
