//! Project registry: named simulation projects and where their reports land.
//!
//! Stored as JSON, e.g. `~/.simreport/projects.json`:
//!
//! ```json
//! {
//!   "root": "/work/cache-projects",
//!   "projects": {
//!     "1": { "label": "Direct Mapped", "output": "project_1/cache_metrics.txt" },
//!     "4": { "label": "Combined", "kind": "two-level", "output": "project_4/cache_metrics.txt" }
//!   }
//! }
//! ```
//!
//! Relative paths are resolved against `root` when it is set.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use simreport_core::schemas::ReportKind;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

fn default_kind() -> ReportKind {
    ReportKind::HitMiss
}

/// One registered project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub label: String,
    #[serde(default = "default_kind")]
    pub kind: ReportKind,
    /// Series report the simulator writes.
    pub output: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_before: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_after: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectRegistry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectEntry>,
}

impl ProjectRegistry {
    /// Return the default registry path, `~/.simreport/projects.json`.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".simreport")
            .join("projects.json")
    }

    /// Load a registry from an explicit path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read registry {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse registry {}", path.display()))
    }

    /// Load from `path`, or from the default path when it exists.
    ///
    /// Returns `Ok(None)` when no path was given and the default file is
    /// absent.
    pub fn load_optional(path: Option<&Path>) -> anyhow::Result<Option<Self>> {
        match path {
            Some(p) => Self::load_from(p).map(Some),
            None => {
                let default = Self::default_path();
                if default.exists() {
                    Self::load_from(&default).map(Some)
                } else {
                    Ok(None)
                }
            }
        }
    }

    /// Look up `id` and resolve its paths against `root`.
    pub fn resolve(&self, id: &str) -> anyhow::Result<ProjectEntry> {
        let entry = self.projects.get(id).with_context(|| {
            let known: Vec<&str> = self.projects.keys().map(String::as_str).collect();
            format!("Unknown project {:?} (known: {})", id, known.join(", "))
        })?;

        Ok(ProjectEntry {
            label: entry.label.clone(),
            kind: entry.kind,
            output: self.absolute(&entry.output),
            power_before: entry.power_before.as_deref().map(|p| self.absolute(p)),
            power_after: entry.power_after.as_deref().map(|p| self.absolute(p)),
        })
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
