//! Assembled portfolio output.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::error_code::VantageErrorCode;
use crate::errors::ScanError;
use crate::meta::AutomationLevel;
use crate::types::git::GitStatus;
use crate::types::priority::PriorityScore;
use crate::types::project::LayoutKind;
use crate::types::stage::Stage;
use crate::types::tasks::TaskSummary;

/// A non-fatal problem attached to a project or to the scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub code: String,
    pub message: String,
}

impl Annotation {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&ScanError> for Annotation {
    fn from(err: &ScanError) -> Self {
        Self::new(err.error_code(), err.to_string())
    }
}

/// One project's row in the portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectStatus {
    pub path: PathBuf,
    pub name: String,
    pub layout: LayoutKind,
    pub stage: Stage,
    pub tasks: TaskSummary,
    pub score: PriorityScore,
    pub git: Option<GitStatus>,
    pub automation_level: AutomationLevel,
    /// Non-fatal problems hit while analyzing this project.
    pub annotations: Vec<Annotation>,
}

/// Timing and counter stats for one scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    pub projects_found: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    /// Tasks documents actually parsed (cache misses do work, hits do not).
    pub parse_count: usize,
    pub discover_ms: u64,
    pub analyze_ms: u64,
    pub persist_ms: u64,
    pub warning_count: usize,
}

impl ScanStats {
    pub fn cache_hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            0.0
        } else {
            self.cache_hits as f64 / lookups as f64
        }
    }
}

/// The ranked portfolio: projects sorted by score descending, ties
/// broken by path ascending. Rebuilt fresh on every aggregation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioStatus {
    pub projects: Vec<ProjectStatus>,
    pub stats: ScanStats,
    /// Scan-level warnings (config fallbacks, cache load problems).
    pub warnings: Vec<Annotation>,
}

impl PortfolioStatus {
    /// Projects at or above the attention threshold, in rank order.
    pub fn needs_attention(&self, threshold: f64) -> impl Iterator<Item = &ProjectStatus> {
        self.projects
            .iter()
            .filter(move |p| p.score.value >= threshold)
    }

    /// Sort into the canonical order: score descending, path ascending.
    pub fn sort(&mut self) {
        self.projects.sort_by(|a, b| {
            b.score
                .value
                .total_cmp(&a.score.value)
                .then_with(|| a.path.cmp(&b.path))
        });
    }
}
