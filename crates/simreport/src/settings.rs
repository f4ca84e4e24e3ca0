use anyhow::{bail, Context};
use clap::Parser;
use simreport_core::schemas::ReportKind;
use simreport_data::analysis::{AnalysisInputs, PowerInputs};
use std::path::PathBuf;

use crate::registry::ProjectRegistry;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Parse cache-simulation and power reports into plot-ready data
#[derive(Parser, Debug, Clone)]
#[command(
    name = "simreport",
    about = "Parse cache-simulation and power reports into plot-ready data",
    version
)]
pub struct Settings {
    /// Report kind (defaults to the project's kind, then hit-miss)
    #[arg(long, value_parser = ["hit-miss", "hit-rate", "two-level"])]
    pub kind: Option<String>,

    /// Simulator series report to parse
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Power report before the change
    #[arg(long)]
    pub power_before: Option<PathBuf>,

    /// Power report after the change
    #[arg(long)]
    pub power_after: Option<PathBuf>,

    /// Project id to look up in the registry
    #[arg(long)]
    pub project: Option<String>,

    /// Project registry file (defaults to ~/.simreport/projects.json)
    #[arg(long, env = "SIMREPORT_REGISTRY")]
    pub registry: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments.
    pub fn load() -> Self {
        Self::load_from(std::env::args_os())
    }

    /// Parse an explicit argument list and apply `--debug`.
    pub fn load_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Combine CLI flags with the selected registry project into pipeline
    /// inputs. Explicit flags win over registry values.
    pub fn resolve_inputs(&self, registry: Option<&ProjectRegistry>) -> anyhow::Result<AnalysisInputs> {
        let project = match &self.project {
            Some(id) => {
                let registry = registry
                    .with_context(|| format!("--project {} given but no registry loaded", id))?;
                let entry = registry.resolve(id)?;
                tracing::info!("Using project {} ({})", id, entry.label);
                Some(entry)
            }
            None => None,
        };

        let kind = match &self.kind {
            Some(k) => k.parse::<ReportKind>()?,
            None => project.as_ref().map(|p| p.kind).unwrap_or(ReportKind::HitMiss),
        };

        let series_path = self
            .report
            .clone()
            .or_else(|| project.as_ref().map(|p| p.output.clone()))
            .context("no series report given: pass --report or --project")?;

        let before = self
            .power_before
            .clone()
            .or_else(|| project.as_ref().and_then(|p| p.power_before.clone()));
        let after = self
            .power_after
            .clone()
            .or_else(|| project.as_ref().and_then(|p| p.power_after.clone()));

        let power = match (before, after) {
            (Some(before), Some(after)) => Some(PowerInputs { before, after }),
            (None, None) => None,
            (Some(_), None) => bail!("--power-before given without --power-after"),
            (None, Some(_)) => bail!("--power-after given without --power-before"),
        };

        Ok(AnalysisInputs {
            kind,
            series_path,
            power,
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
