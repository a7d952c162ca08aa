//! Report rendering: Markdown, aligned text table, and the scan summary.
//!
//! Everything here is pure string building over a `PortfolioStatus`;
//! JSON output is plain serde and lives with the callers.

use std::io;
use std::path::Path;

use vantage_core::{GitStatus, PortfolioStatus, PriorityInputs, ProjectStatus, Stage};

/// Markdown report: summary, attention section, stage distribution,
/// the full ranked table, and collected warnings.
pub fn render_markdown(status: &PortfolioStatus, attention_threshold: f64) -> String {
    let mut out = String::new();

    out.push_str("# Portfolio Status\n\n");

    // Summary
    let (total_tasks, completed_tasks) = task_totals(status);
    let attention_count = status.needs_attention(attention_threshold).count();
    let stats = &status.stats;
    out.push_str("## Summary\n\n");
    out.push_str(&format!("- **Projects**: {}\n", status.projects.len()));
    out.push_str(&format!("- **Need Attention**: {attention_count}\n"));
    out.push_str(&format!(
        "- **Tasks**: {completed_tasks}/{total_tasks} completed ({:.0}%)\n",
        percent(completed_tasks, total_tasks)
    ));
    out.push_str(&format!(
        "- **Cache**: {}/{} hits ({} parsed)\n",
        stats.cache_hits,
        stats.cache_hits + stats.cache_misses,
        stats.parse_count
    ));
    out.push_str(&format!(
        "- **Scan Time**: {}ms (discover {}, analyze {}, persist {})\n\n",
        stats.discover_ms + stats.analyze_ms + stats.persist_ms,
        stats.discover_ms,
        stats.analyze_ms,
        stats.persist_ms
    ));

    // Attention section
    out.push_str("## Needs Attention\n\n");
    let hot: Vec<&ProjectStatus> = status.needs_attention(attention_threshold).collect();
    if hot.is_empty() {
        out.push_str("No projects need attention.\n\n");
    } else {
        out.push_str("| Score | Project | Stage | Tasks | Signals |\n");
        out.push_str("|-------|---------|-------|-------|--------|\n");
        for project in hot {
            out.push_str(&format!(
                "| {:.1} {} | {} | {} | {}/{} | {} |\n",
                project.score.value,
                score_icon(project.score.value),
                project.name,
                project.stage,
                project.tasks.completed,
                project.tasks.total,
                signal_summary(&project.score.inputs)
            ));
        }
        out.push('\n');
    }

    // Stage distribution
    out.push_str("## Stage Distribution\n\n");
    out.push_str("| Stage | Count |\n");
    out.push_str("|-------|-------|\n");
    for stage in Stage::ALL {
        let count = status.projects.iter().filter(|p| p.stage == stage).count();
        out.push_str(&format!("| {stage} | {count} |\n"));
    }
    out.push('\n');

    // Full ranking
    out.push_str("## Ranked Projects\n\n");
    if status.projects.is_empty() {
        out.push_str("No projects found.\n\n");
    } else {
        out.push_str("| # | Score | Project | Stage | Tasks | Branch | Automation |\n");
        out.push_str("|---|-------|---------|-------|-------|--------|------------|\n");
        for (idx, project) in status.projects.iter().enumerate() {
            out.push_str(&format!(
                "| {} | {:.1} | {} | {} | {}/{} | {} | {:?} |\n",
                idx + 1,
                project.score.value,
                project.name,
                project.stage,
                project.tasks.completed,
                project.tasks.total,
                branch_label(project.git.as_ref()),
                project.automation_level
            ));
        }
        out.push('\n');
    }

    // Warnings
    let project_warnings: Vec<(&str, &vantage_core::Annotation)> = status
        .projects
        .iter()
        .flat_map(|p| p.annotations.iter().map(move |a| (p.name.as_str(), a)))
        .collect();
    if !status.warnings.is_empty() || !project_warnings.is_empty() {
        out.push_str("## Warnings\n\n");
        for warning in &status.warnings {
            out.push_str(&format!("- {}: {}\n", warning.code, warning.message));
        }
        for (name, annotation) in project_warnings {
            out.push_str(&format!(
                "- `{name}`: {}: {}\n",
                annotation.code, annotation.message
            ));
        }
        out.push('\n');
    }

    out.push_str("---\n*Generated by vantage*\n");
    out
}

/// Write the Markdown report, creating parent directories as needed.
pub fn save_markdown(
    status: &PortfolioStatus,
    attention_threshold: f64,
    path: &Path,
) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, render_markdown(status, attention_threshold))
}

/// Aligned plain-text table, one row per project in rank order.
pub fn render_table(status: &PortfolioStatus) -> String {
    if status.projects.is_empty() {
        return "No projects found.\n".to_string();
    }

    let name_width = status
        .projects
        .iter()
        .map(|p| p.name.len())
        .max()
        .unwrap_or(0)
        .max("PROJECT".len());

    let mut out = String::new();
    out.push_str(&format!(
        "{:>7}  {:<name_width$}  {:<9}  {:>7}  {:<14}  AUTO\n",
        "SCORE", "PROJECT", "STAGE", "TASKS", "BRANCH"
    ));
    for project in &status.projects {
        let tasks = format!("{}/{}", project.tasks.completed, project.tasks.total);
        let stage = project.stage.to_string();
        out.push_str(&format!(
            "{:>7.1}  {:<name_width$}  {stage:<9}  {tasks:>7}  {:<14}  {:?}\n",
            project.score.value,
            project.name,
            branch_label(project.git.as_ref()),
            project.automation_level
        ));
    }
    out
}

/// The post-scan summary block printed by `vantage scan`.
pub fn scan_summary(status: &PortfolioStatus, attention_threshold: f64) -> String {
    let (total_tasks, completed_tasks) = task_totals(status);
    let stats = &status.stats;

    let mut out = String::new();
    out.push_str("=== Scan Complete ===\n");
    out.push_str(&format!("Projects found: {}\n", stats.projects_found));
    out.push_str(&format!(
        "Need attention: {}\n",
        status.needs_attention(attention_threshold).count()
    ));
    out.push_str(&format!(
        "Tasks: {completed_tasks}/{total_tasks} completed\n"
    ));
    out.push_str(&format!(
        "Cache: {}/{} hits ({} parsed)\n",
        stats.cache_hits,
        stats.cache_hits + stats.cache_misses,
        stats.parse_count
    ));
    out.push_str(&format!(
        "Timing: discover {}ms, analyze {}ms, persist {}ms\n",
        stats.discover_ms, stats.analyze_ms, stats.persist_ms
    ));
    if stats.warning_count > 0 {
        out.push_str(&format!("Warnings: {}\n", stats.warning_count));
        for warning in &status.warnings {
            out.push_str(&format!("  - {}: {}\n", warning.code, warning.message));
        }
    }
    out
}

fn task_totals(status: &PortfolioStatus) -> (usize, usize) {
    let total = status.projects.iter().map(|p| p.tasks.total).sum();
    let completed = status.projects.iter().map(|p| p.tasks.completed).sum();
    (total, completed)
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn score_icon(score: f64) -> &'static str {
    if score > 70.0 {
        "🔴"
    } else if score > 40.0 {
        "🟡"
    } else {
        "🟢"
    }
}

/// Signals at or above 0.5, the ones that actually drove the score up.
fn signal_summary(inputs: &PriorityInputs) -> String {
    let mut signals = Vec::new();
    if inputs.needs_human >= 0.5 {
        signals.push("human");
    }
    if inputs.risk >= 0.5 {
        signals.push("risk");
    }
    if inputs.staleness >= 0.5 {
        signals.push("stale");
    }
    if inputs.impact >= 0.5 {
        signals.push("impact");
    }
    if signals.is_empty() {
        "-".to_string()
    } else {
        signals.join(", ")
    }
}

fn branch_label(git: Option<&GitStatus>) -> String {
    match git {
        Some(status) => {
            let name = status.current_branch.as_deref().unwrap_or("(detached)");
            if status.is_dirty {
                format!("{name}*")
            } else {
                name.to_string()
            }
        }
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use vantage_core::{
        Annotation, AutomationLevel, LayoutKind, PriorityScore, ScanStats, TaskSummary,
    };

    fn project(name: &str, score: f64) -> ProjectStatus {
        ProjectStatus {
            path: PathBuf::from(format!("/work/{name}")),
            name: name.to_string(),
            layout: LayoutKind::FeatureBased,
            stage: Stage::Implement,
            tasks: TaskSummary {
                total: 12,
                completed: 5,
                ..Default::default()
            },
            score: PriorityScore {
                value: score,
                inputs: PriorityInputs {
                    needs_human: 1.0,
                    risk: 0.4,
                    staleness: 0.5,
                    impact: 0.66,
                    confidence: 0.5,
                },
            },
            git: Some(GitStatus {
                current_branch: Some("main".to_string()),
                is_dirty: true,
                last_commit_time: None,
                ahead: 0,
                behind: 0,
            }),
            automation_level: AutomationLevel::L1,
            annotations: Vec::new(),
        }
    }

    fn portfolio() -> PortfolioStatus {
        let mut status = PortfolioStatus {
            projects: vec![project("api-service", 61.1), project("docs-site", 11.2)],
            stats: ScanStats {
                projects_found: 2,
                cache_hits: 1,
                cache_misses: 1,
                parse_count: 1,
                discover_ms: 12,
                analyze_ms: 48,
                persist_ms: 3,
                warning_count: 0,
            },
            warnings: Vec::new(),
        };
        status.projects[1].git = None;
        status.projects[1].stage = Stage::Done;
        status.projects[1].tasks = TaskSummary {
            total: 8,
            completed: 8,
            ..Default::default()
        };
        status
    }

    #[test]
    fn markdown_lists_attention_projects_above_threshold() {
        let report = render_markdown(&portfolio(), 50.0);

        let attention = report
            .split("## Needs Attention")
            .nth(1)
            .and_then(|s| s.split("## Stage Distribution").next())
            .unwrap();
        assert!(attention.contains("api-service"));
        assert!(!attention.contains("docs-site"));
        assert!(attention.contains("human"));
    }

    #[test]
    fn markdown_reports_empty_attention_section() {
        let report = render_markdown(&portfolio(), 99.0);
        assert!(report.contains("No projects need attention."));
    }

    #[test]
    fn markdown_ranks_projects_in_portfolio_order() {
        let report = render_markdown(&portfolio(), 50.0);
        let ranked = report.split("## Ranked Projects").nth(1).unwrap();
        let first = ranked.find("api-service").unwrap();
        let second = ranked.find("docs-site").unwrap();
        assert!(first < second);
        assert!(ranked.contains("| 1 | 61.1 |"));
    }

    #[test]
    fn markdown_counts_stages() {
        let report = render_markdown(&portfolio(), 50.0);
        assert!(report.contains("| implement | 1 |"));
        assert!(report.contains("| done | 1 |"));
        assert!(report.contains("| bootstrap | 0 |"));
    }

    #[test]
    fn markdown_collects_warnings_from_scan_and_projects() {
        let mut status = portfolio();
        status.warnings.push(Annotation::new("CONFIG_INVALID", "bad depth"));
        status.projects[0]
            .annotations
            .push(Annotation::new("MALFORMED_ARTIFACT", "tasks.md unreadable"));

        let report = render_markdown(&status, 50.0);
        assert!(report.contains("## Warnings"));
        assert!(report.contains("CONFIG_INVALID: bad depth"));
        assert!(report.contains("`api-service`: MALFORMED_ARTIFACT"));
    }

    #[test]
    fn markdown_omits_warning_section_when_clean() {
        let report = render_markdown(&portfolio(), 50.0);
        assert!(!report.contains("## Warnings"));
    }

    #[test]
    fn table_aligns_and_marks_dirty_branches() {
        let table = render_table(&portfolio());
        let mut lines = table.lines();

        let header = lines.next().unwrap();
        assert!(header.contains("SCORE"));
        assert!(header.contains("PROJECT"));

        let first = lines.next().unwrap();
        assert!(first.contains("61.1"));
        assert!(first.contains("api-service"));
        assert!(first.contains("main*"));

        let second = lines.next().unwrap();
        assert!(second.contains("docs-site"));
        assert!(second.contains("  -  ") || second.contains(" - "));
    }

    #[test]
    fn table_handles_empty_portfolio() {
        let status = PortfolioStatus::default();
        assert_eq!(render_table(&status), "No projects found.\n");
    }

    #[test]
    fn scan_summary_reports_counts_and_timing() {
        let summary = scan_summary(&portfolio(), 50.0);
        assert!(summary.contains("Projects found: 2"));
        assert!(summary.contains("Need attention: 1"));
        assert!(summary.contains("Tasks: 13/20 completed"));
        assert!(summary.contains("Cache: 1/2 hits (1 parsed)"));
        assert!(summary.contains("discover 12ms"));
        assert!(!summary.contains("Warnings:"));
    }

    #[test]
    fn scan_summary_lists_scan_level_warnings() {
        let mut status = portfolio();
        status.stats.warning_count = 1;
        status.warnings.push(Annotation::new("CACHE_CORRUPT", "bad row"));

        let summary = scan_summary(&status, 50.0);
        assert!(summary.contains("Warnings: 1"));
        assert!(summary.contains("CACHE_CORRUPT: bad row"));
    }

    #[test]
    fn save_markdown_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".vantage").join("STATUS.md");
        save_markdown(&portfolio(), 50.0, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Portfolio Status"));
    }

    #[test]
    fn json_field_names_are_stable() {
        let value = serde_json::to_value(portfolio()).unwrap();
        assert!(value.get("projects").is_some());
        assert!(value.get("stats").is_some());
        assert!(value.get("warnings").is_some());
        let project = &value["projects"][0];
        assert!(project.get("score").is_some());
        assert!(project.get("stage").is_some());
        assert!(project.get("tasks").is_some());
    }
}
