//! `vantage` binary. Wires configuration, the persisted cache, and the
//! scanner together; everything interesting lives in the library crates.

mod reporter;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use vantage_analysis::PortfolioScanner;
use vantage_core::{
    Annotation, AutomationLevel, MetaStore, PortfolioStatus, ScanError, VantageConfig,
};
use vantage_storage::StatusStore;

#[derive(Parser)]
#[command(name = "vantage")]
#[command(about = "Portfolio intelligence for Spec-Kit project trees")]
#[command(version)]
struct Cli {
    /// Configuration file (overrides $VANTAGE_CONFIG and the default location)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a directory tree and print summary statistics
    Scan {
        /// Root directory to scan
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Override the configured discovery depth
        #[arg(long, value_name = "N")]
        depth: Option<usize>,

        /// Drop the persisted cache and recompute every project
        #[arg(long)]
        no_cache: bool,

        /// Print the full portfolio as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Show the ranked portfolio
    Status {
        /// Root directory to scan
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: Format,

        /// Filter: needs-attention, incomplete, or stage:NAME
        #[arg(long, value_name = "FILTER")]
        only: Option<String>,
    },
    /// Write the Markdown report
    Report {
        /// Root directory to scan
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Report destination (default: ROOT/.vantage/STATUS.md)
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Inspect or edit per-project overrides
    Meta {
        #[command(subcommand)]
        action: MetaAction,
    },
}

#[derive(Subcommand)]
enum MetaAction {
    /// Print the override store for a scan root
    Show {
        #[arg(default_value = ".")]
        root: PathBuf,
    },
    /// Set overrides for one project
    Set {
        /// Project slug (the project's directory name)
        project: String,

        #[arg(default_value = ".")]
        root: PathBuf,

        /// Business impact, 1 (low) to 3 (high)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
        impact: Option<u8>,

        /// Automation level
        #[arg(long, value_enum)]
        automation: Option<AutomationArg>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Json,
    Markdown,
}

#[derive(Clone, Copy, ValueEnum)]
enum AutomationArg {
    L0,
    L1,
    L2,
    L3,
}

impl From<AutomationArg> for AutomationLevel {
    fn from(arg: AutomationArg) -> Self {
        match arg {
            AutomationArg::L0 => AutomationLevel::L0,
            AutomationArg::L1 => AutomationLevel::L1,
            AutomationArg::L2 => AutomationLevel::L2,
            AutomationArg::L3 => AutomationLevel::L3,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Scan {
            root,
            depth,
            no_cache,
            json,
        } => {
            let outcome = run_scan(cli.config.as_deref(), &root, depth, no_cache);
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.status)?);
            } else {
                print!(
                    "{}",
                    reporter::scan_summary(&outcome.status, outcome.attention_threshold)
                );
            }
            Ok(())
        }
        Commands::Status { root, format, only } => {
            let mut outcome = run_scan(cli.config.as_deref(), &root, None, false);
            if let Some(filter) = only.as_deref() {
                apply_filter(&mut outcome.status, filter, outcome.attention_threshold);
            }
            match format {
                Format::Table => print!("{}", reporter::render_table(&outcome.status)),
                Format::Json => {
                    println!("{}", serde_json::to_string_pretty(&outcome.status)?)
                }
                Format::Markdown => print!(
                    "{}",
                    reporter::render_markdown(&outcome.status, outcome.attention_threshold)
                ),
            }
            Ok(())
        }
        Commands::Report { root, output } => {
            let outcome = run_scan(cli.config.as_deref(), &root, None, false);
            let path = output.unwrap_or_else(|| root.join(".vantage").join("STATUS.md"));
            reporter::save_markdown(&outcome.status, outcome.attention_threshold, &path)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            println!("Report written to {}", path.display());
            Ok(())
        }
        Commands::Meta { action } => run_meta(action),
    }
}

struct ScanOutcome {
    status: PortfolioStatus,
    attention_threshold: f64,
}

/// One full pipeline run: load config, seed the cache from disk, scan,
/// persist the snapshot. Nothing here is fatal; storage trouble
/// degrades to warnings and the scan continues uncached.
fn run_scan(
    config_path: Option<&Path>,
    root: &Path,
    depth: Option<usize>,
    no_cache: bool,
) -> ScanOutcome {
    let (mut config, mut warnings) = VantageConfig::load(config_path);
    if let Some(depth) = depth {
        config.scan_depth = Some(depth);
        warnings.extend(config.sanitize());
    }
    let attention_threshold = config.effective_attention_threshold();

    let store = open_store(&config);
    let scanner = PortfolioScanner::new(config);

    if let Some(store) = &store {
        if no_cache {
            if let Err(e) = store.clear() {
                tracing::warn!(error = %e, "failed to clear persisted cache");
                warnings.push(ScanError::Storage(e));
            }
        } else {
            match store.load_all() {
                Ok((entries, load_warnings)) => {
                    scanner.cache().seed(entries);
                    warnings.extend(load_warnings);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to load persisted cache");
                    warnings.push(ScanError::Storage(e));
                }
            }
        }
    }

    let mut status = scanner.scan(root);

    let persist_start = Instant::now();
    if let Some(store) = &store {
        if let Err(e) = store.replace_all(&scanner.cache().snapshot()) {
            tracing::warn!(error = %e, "failed to persist scan results");
            warnings.push(ScanError::Storage(e));
        }
    }
    status.stats.persist_ms = persist_start.elapsed().as_millis() as u64;

    status.stats.warning_count += warnings.len();
    status
        .warnings
        .extend(warnings.iter().map(Annotation::from));

    ScanOutcome {
        status,
        attention_threshold,
    }
}

/// Open the persisted cache, or run without one if it is unavailable.
fn open_store(config: &VantageConfig) -> Option<StatusStore> {
    let path = match config.effective_cache_path() {
        Some(path) => path,
        None => {
            tracing::debug!("no data directory, scanning without persistence");
            return None;
        }
    };
    match StatusStore::open(&path) {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "cache store unavailable, scanning without persistence"
            );
            None
        }
    }
}

/// Narrow the portfolio in place. Unknown filters leave it untouched.
fn apply_filter(status: &mut PortfolioStatus, filter: &str, attention_threshold: f64) {
    match filter {
        "needs-attention" => status
            .projects
            .retain(|p| p.score.value >= attention_threshold),
        "incomplete" => status.projects.retain(|p| p.tasks.completed < p.tasks.total),
        other => {
            if let Some(stage_name) = other.strip_prefix("stage:") {
                let stage_name = stage_name.to_ascii_lowercase();
                status.projects.retain(|p| p.stage.as_str() == stage_name);
            } else {
                tracing::warn!(filter = other, "unknown filter ignored");
            }
        }
    }
}

fn run_meta(action: MetaAction) -> Result<()> {
    match action {
        MetaAction::Show { root } => {
            let (store, warning) = MetaStore::load_or_default(&root);
            if let Some(warning) = warning {
                tracing::warn!(error = %warning, "override store unreadable, showing defaults");
            }
            println!("{}", serde_json::to_string_pretty(&store)?);
            Ok(())
        }
        MetaAction::Set {
            project,
            root,
            impact,
            automation,
        } => {
            let (mut store, warning) = MetaStore::load_or_default(&root);
            if let Some(warning) = warning {
                tracing::warn!(error = %warning, "override store unreadable, starting fresh");
            }
            let entry = store.entry(&project);
            if let Some(impact) = impact {
                entry.impact = Some(impact);
            }
            if let Some(automation) = automation {
                entry.automation_level = Some(automation.into());
            }
            store
                .save(&root)
                .with_context(|| format!("failed to save overrides under {}", root.display()))?;
            println!("Updated overrides for {project}");
            Ok(())
        }
    }
}

/// `VANTAGE_LOG` wins; otherwise verbosity flags pick the default level.
/// Logs go to stderr so stdout stays clean for reports and JSON.
fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_env("VANTAGE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    fn write_project(root: &Path, name: &str, tasks: &str) {
        let dir = root.join(name).join("specs");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("spec.md"), "# Spec\n").unwrap();
        fs::write(dir.join("plan.md"), "# Plan\n").unwrap();
        fs::write(dir.join("tasks.md"), tasks).unwrap();
    }

    #[test]
    fn run_scan_persists_and_reuses_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("portfolio");
        fs::create_dir_all(&root).unwrap();
        write_project(&root, "api", "- [x] done\n- [ ] pending\n");

        let cache_path = dir.path().join("cache").join("status.db");
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            format!("cache_path = \"{}\"\n", cache_path.display()),
        )
        .unwrap();

        let first = run_scan(Some(&config_path), &root, None, false);
        assert_eq!(first.status.projects.len(), 1);
        assert_eq!(first.status.stats.cache_misses, 1);
        assert!(cache_path.exists());

        // A fresh scanner seeded from disk serves the project from cache.
        let second = run_scan(Some(&config_path), &root, None, false);
        assert_eq!(second.status.projects.len(), 1);
        assert_eq!(second.status.stats.cache_hits, 1);
        assert_eq!(second.status.stats.parse_count, 0);
        assert_eq!(
            first.status.projects[0].score.value,
            second.status.projects[0].score.value
        );
    }

    #[test]
    fn run_scan_no_cache_recomputes() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("portfolio");
        fs::create_dir_all(&root).unwrap();
        write_project(&root, "api", "- [ ] pending\n");

        let cache_path = dir.path().join("status.db");
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            format!("cache_path = \"{}\"\n", cache_path.display()),
        )
        .unwrap();

        let _ = run_scan(Some(&config_path), &root, None, false);
        let again = run_scan(Some(&config_path), &root, None, true);
        assert_eq!(again.status.stats.cache_misses, 1);
        assert_eq!(again.status.stats.parse_count, 1);
    }

    #[test]
    fn depth_override_is_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("portfolio");
        fs::create_dir_all(&root).unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            format!(
                "cache_path = \"{}\"\n",
                dir.path().join("status.db").display()
            ),
        )
        .unwrap();

        let outcome = run_scan(Some(&config_path), &root, Some(0), false);
        assert!(outcome
            .status
            .warnings
            .iter()
            .any(|w| w.code == "CONFIG_INVALID"));
    }

    #[test]
    fn filter_needs_attention_keeps_hot_projects() {
        let mut status = PortfolioStatus::default();
        for (name, score) in [("hot", 80.0), ("cold", 10.0)] {
            let mut projects = fixture_project(name, score);
            status.projects.append(&mut projects);
        }

        apply_filter(&mut status, "needs-attention", 50.0);
        assert_eq!(status.projects.len(), 1);
        assert_eq!(status.projects[0].name, "hot");
    }

    #[test]
    fn filter_by_stage_matches_case_insensitively() {
        let mut status = PortfolioStatus::default();
        status.projects = fixture_project("only", 10.0);

        apply_filter(&mut status, "stage:IMPLEMENT", 50.0);
        assert_eq!(status.projects.len(), 1);

        apply_filter(&mut status, "stage:done", 50.0);
        assert!(status.projects.is_empty());
    }

    #[test]
    fn unknown_filter_is_ignored() {
        let mut status = PortfolioStatus::default();
        status.projects = fixture_project("kept", 10.0);

        apply_filter(&mut status, "bogus", 50.0);
        assert_eq!(status.projects.len(), 1);
    }

    fn fixture_project(name: &str, score: f64) -> Vec<vantage_core::ProjectStatus> {
        use vantage_core::{LayoutKind, PriorityInputs, PriorityScore, Stage, TaskSummary};
        vec![vantage_core::ProjectStatus {
            path: PathBuf::from(format!("/work/{name}")),
            name: name.to_string(),
            layout: LayoutKind::Direct,
            stage: Stage::Implement,
            tasks: TaskSummary {
                total: 4,
                completed: 1,
                ..Default::default()
            },
            score: PriorityScore {
                value: score,
                inputs: PriorityInputs::default(),
            },
            git: None,
            automation_level: AutomationLevel::L1,
            annotations: Vec::new(),
        }]
    }
}
