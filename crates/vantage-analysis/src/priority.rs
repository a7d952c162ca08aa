//! Weighted priority scoring.
//!
//! `score = w1*needs_human + w2*risk + w3*staleness + w4*impact -
//! w5*confidence`, every signal clamped to `[0, 1]` before weighting.
//! Scoring is pure and total: identical inputs always produce the
//! identical score, and nothing accumulates across calls.

use std::time::SystemTime;

use vantage_core::{
    GitStatus, PriorityInputs, PriorityScore, PriorityWeights, Stage, TaskSummary, VantageConfig,
};

/// Number of equal-weight heuristic triggers behind `needs_human`.
const SOFT_TRIGGER_COUNT: f64 = 3.0;

/// Derives the five priority signals and combines them into a score.
#[derive(Debug, Clone)]
pub struct PriorityCalculator {
    weights: PriorityWeights,
    staleness_horizon_days: f64,
}

impl PriorityCalculator {
    pub fn new(weights: PriorityWeights, staleness_horizon_days: f64) -> Self {
        Self {
            weights,
            staleness_horizon_days,
        }
    }

    pub fn from_config(config: &VantageConfig) -> Self {
        Self::new(
            config.effective_weights(),
            config.effective_staleness_horizon_days(),
        )
    }

    /// Derive signals, then weight them.
    pub fn evaluate(
        &self,
        stage: Stage,
        tasks: &TaskSummary,
        git: Option<&GitStatus>,
        impact: Option<u8>,
        now: SystemTime,
    ) -> PriorityScore {
        self.score(self.derive_inputs(stage, tasks, git, impact, now))
    }

    /// Derive the five normalized signals for one project.
    pub fn derive_inputs(
        &self,
        stage: Stage,
        tasks: &TaskSummary,
        git: Option<&GitStatus>,
        impact: Option<u8>,
        now: SystemTime,
    ) -> PriorityInputs {
        let staleness = self.staleness(git, now);
        PriorityInputs {
            needs_human: needs_human(stage, tasks, git, staleness),
            risk: risk(tasks, git),
            staleness,
            impact: impact_signal(impact),
            confidence: confidence(stage, tasks),
        }
    }

    /// Weight already-derived signals. Clamps each to `[0, 1]` first.
    pub fn score(&self, inputs: PriorityInputs) -> PriorityScore {
        let inputs = inputs.clamped();
        let w = &self.weights;
        let value = w.needs_human * inputs.needs_human
            + w.risk * inputs.risk
            + w.staleness * inputs.staleness
            + w.impact * inputs.impact
            - w.confidence * inputs.confidence;
        PriorityScore { value, inputs }
    }

    /// Elapsed-time signal, saturating at the configured horizon.
    ///
    /// Projects without a repository or without any commit score 0.5:
    /// maximum uncertainty, not an error.
    fn staleness(&self, git: Option<&GitStatus>, now: SystemTime) -> f64 {
        match git.and_then(|g| g.days_since_commit(now)) {
            Some(days) => (days / self.staleness_horizon_days).min(1.0),
            None => 0.5,
        }
    }
}

/// 1.0 on a hard trigger (Review stage, any blocked task), otherwise
/// the fraction of soft triggers present. Hard triggers dominate, so
/// adding a blocking condition never lowers the signal.
fn needs_human(stage: Stage, tasks: &TaskSummary, git: Option<&GitStatus>, staleness: f64) -> f64 {
    if stage == Stage::Review || tasks.blocked > 0 {
        return 1.0;
    }

    let mut triggers = 0u32;
    // Scoping still open: someone has to decide what gets built.
    if stage <= Stage::Plan {
        triggers += 1;
    }
    if git.is_some_and(|g| g.is_dirty) {
        triggers += 1;
    }
    // Stalled: nothing finished and the staleness horizon has passed.
    if tasks.completed == 0 && staleness >= 1.0 {
        triggers += 1;
    }
    f64::from(triggers) / SOFT_TRIGGER_COUNT
}

fn risk(tasks: &TaskSummary, git: Option<&GitStatus>) -> f64 {
    let dirty = if git.is_some_and(|g| g.is_dirty) {
        1.0
    } else {
        0.0
    };
    0.6 * tasks.blocked_ratio() + 0.4 * dirty
}

/// Operator-declared impact on a 1..=3 scale, mid-value when unset.
fn impact_signal(impact: Option<u8>) -> f64 {
    match impact {
        Some(1) => 0.33,
        Some(3) => 1.0,
        _ => 0.66,
    }
}

/// Confidence grows with lifecycle position and with a task sample
/// large enough to mean something. Twenty tasks saturates the sample
/// term.
fn confidence(stage: Stage, tasks: &TaskSummary) -> f64 {
    let lifecycle = stage.index() as f64 / 7.0;
    let sample = (tasks.total as f64 / 20.0).min(1.0);
    0.6 * lifecycle + 0.4 * sample
}
