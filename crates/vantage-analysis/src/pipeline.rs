//! Portfolio scan orchestration: locate → parse → classify → score →
//! cache, fanned out per project, assembled into one sorted snapshot.
//!
//! Projects are independent; the status cache is the only shared
//! resource. The aggregator waits for every worker before sorting, so
//! a result never mixes two scan generations.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Instant, SystemTime};

use rayon::prelude::*;

use vantage_core::{
    Annotation, ArtifactKind, CacheEntry, FxHashSet, GitStatus, MetaStore, PortfolioStatus,
    ProjectStatus, ScanStats, VantageConfig,
};

use crate::cache::{fingerprint, StatusCache};
use crate::git;
use crate::locator::{self, ResolvedProject};
use crate::markers::MarkerEngine;
use crate::priority::PriorityCalculator;
use crate::stage;

/// Scans a portfolio root and assembles the ranked status.
///
/// Holds the marker engine, scoring weights, and status cache for the
/// process lifetime; `scan` can be called repeatedly and reuses all
/// three.
pub struct PortfolioScanner {
    config: VantageConfig,
    engine: MarkerEngine,
    calculator: PriorityCalculator,
    cache: StatusCache,
    parse_count: AtomicUsize,
}

impl PortfolioScanner {
    pub fn new(config: VantageConfig) -> Self {
        let calculator = PriorityCalculator::from_config(&config);
        Self {
            config,
            engine: MarkerEngine::new(),
            calculator,
            cache: StatusCache::default(),
            parse_count: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &VantageConfig {
        &self.config
    }

    /// The status cache, for seeding from and flushing to storage.
    pub fn cache(&self) -> &StatusCache {
        &self.cache
    }

    /// Tasks documents parsed over this scanner's lifetime. Cache hits
    /// do not parse, so an unchanged rescan leaves this unchanged.
    pub fn parse_count(&self) -> usize {
        self.parse_count.load(Ordering::Relaxed)
    }

    /// Scan `root` and return the ranked portfolio.
    ///
    /// Never fails: problems degrade to per-project annotations or
    /// scan-level warnings.
    pub fn scan(&self, root: &Path) -> PortfolioStatus {
        let hits_before = self.cache.hit_count();
        let misses_before = self.cache.miss_count();
        let parses_before = self.parse_count();

        let discover_start = Instant::now();
        let roots = locator::find_project_roots(root, self.config.effective_scan_depth());
        let discover_ms = discover_start.elapsed().as_millis() as u64;

        let (meta, meta_warning) = MetaStore::load_or_default(root);

        let analyze_start = Instant::now();
        let now = SystemTime::now();
        let projects: Vec<ProjectStatus> = roots
            .par_iter()
            .map(|path| self.analyze_project(path, &meta, now))
            .collect();
        let analyze_ms = analyze_start.elapsed().as_millis() as u64;

        // Entries for projects no longer on disk do not survive
        // aggregation.
        let live: FxHashSet<_> = roots.iter().cloned().collect();
        self.cache.retain_projects(&live);

        let mut warnings = Vec::new();
        if let Some(w) = &meta_warning {
            warnings.push(Annotation::from(w));
        }
        let warning_count =
            warnings.len() + projects.iter().map(|p| p.annotations.len()).sum::<usize>();

        let stats = ScanStats {
            projects_found: projects.len(),
            cache_hits: self.cache.hit_count() - hits_before,
            cache_misses: self.cache.miss_count() - misses_before,
            parse_count: self.parse_count() - parses_before,
            discover_ms,
            analyze_ms,
            persist_ms: 0,
            warning_count,
        };

        let mut status = PortfolioStatus {
            projects,
            stats,
            warnings,
        };
        status.sort();
        status
    }

    /// Run one project through the pipeline.
    ///
    /// Resolution and git collection always run; parsing, classifying,
    /// and scoring only run when the fingerprint misses the cache.
    fn analyze_project(&self, path: &Path, meta: &MetaStore, now: SystemTime) -> ProjectStatus {
        let resolved = locator::resolve_project(path);
        let fp = fingerprint(&resolved.files);

        let git = git::collect_status(path);
        let name = resolved.root.name();
        let impact = meta.impact_for(&name);
        let automation_level = meta.automation_for(&name);

        let mut annotations: Vec<Annotation> =
            resolved.warnings.iter().map(Annotation::from).collect();

        let entry = self.cache.get_or_compute(path, fp, || {
            self.compute_entry(&resolved, fp, git.as_ref(), impact, now, &mut annotations)
        });

        for annotation in &annotations {
            tracing::warn!(
                path = %path.display(),
                code = %annotation.code,
                message = %annotation.message,
                "project warning"
            );
        }

        ProjectStatus {
            path: path.to_path_buf(),
            name,
            layout: resolved.root.layout,
            stage: entry.stage,
            tasks: entry.tasks,
            score: entry.score,
            git,
            automation_level,
            annotations,
        }
    }

    fn compute_entry(
        &self,
        resolved: &ResolvedProject,
        fingerprint: u64,
        git: Option<&GitStatus>,
        impact: Option<u8>,
        now: SystemTime,
        annotations: &mut Vec<Annotation>,
    ) -> CacheEntry {
        self.parse_count.fetch_add(1, Ordering::Relaxed);

        let (artifacts, load_warnings) = locator::load_artifacts(resolved);
        annotations.extend(load_warnings.iter().map(Annotation::from));

        let tasks = self
            .engine
            .parse(artifacts.get(ArtifactKind::Tasks).unwrap_or(""));
        let stage = stage::classify(&artifacts, &tasks, &self.engine);
        let score = self.calculator.evaluate(stage, &tasks, git, impact, now);

        CacheEntry {
            path: resolved.root.path.clone(),
            fingerprint,
            stage,
            tasks,
            score,
        }
    }
}
