//! Lifecycle stage classification.
//!
//! A pure function of artifact presence and task counts. Stage is
//! recomputed fresh from current artifact state on every scan; there
//! is no persisted state machine.

use vantage_core::{ArtifactKind, ArtifactSet, Stage, TaskSummary};

use crate::markers::MarkerEngine;

/// Classify a project's lifecycle stage.
///
/// Presence cascade first: no artifacts is `Bootstrap`, then the
/// furthest-along artifact decides until a tasks document exists.
/// With tasks, the completion split takes over. When every task is
/// complete, phase headings in the tasks (then plan) text refine the
/// result; without any, the project is `Done`.
pub fn classify(artifacts: &ArtifactSet, tasks: &TaskSummary, engine: &MarkerEngine) -> Stage {
    if artifacts.is_empty() {
        return Stage::Bootstrap;
    }

    if !artifacts.has(ArtifactKind::Tasks) {
        if artifacts.has(ArtifactKind::Plan) {
            return Stage::Plan;
        }
        // Spec present, or only a constitution: either way the
        // project is still specifying.
        return Stage::Specify;
    }

    if tasks.total == 0 {
        return Stage::Tasks;
    }
    if tasks.completed < tasks.total {
        return Stage::Implement;
    }

    refine_complete(artifacts, engine)
}

/// Pick among Test, Review, Done once every task is complete.
///
/// A review heading outranks a test heading: when both phases exist
/// and all listed work is done, the remaining gate is the review.
fn refine_complete(artifacts: &ArtifactSet, engine: &MarkerEngine) -> Stage {
    let tasks_text = artifacts.get(ArtifactKind::Tasks).unwrap_or("");
    let plan_text = artifacts.get(ArtifactKind::Plan).unwrap_or("");

    if engine.has_review_heading(tasks_text) || engine.has_review_heading(plan_text) {
        return Stage::Review;
    }
    if engine.has_test_heading(tasks_text) || engine.has_test_heading(plan_text) {
        return Stage::Test;
    }
    Stage::Done
}
