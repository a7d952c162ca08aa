//! Task counts extracted from a tasks document.

use serde::{Deserialize, Serialize};

/// Summary of one tasks document.
///
/// Every recognized task line lands in `total` and is either completed
/// or not; `incomplete()` is always `total - completed`. In-progress
/// lines count toward `total` but not `completed` and are tracked in
/// `in_progress` so they stay visible. The `parallel` and `blocked`
/// counters are orthogonal flags on task lines, so `blocked <= total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub parallel: usize,
    pub blocked: usize,
}

impl TaskSummary {
    pub fn incomplete(&self) -> usize {
        self.total.saturating_sub(self.completed)
    }

    /// Fraction of tasks completed, 0.0 for an empty document.
    pub fn completion_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    /// Fraction of tasks flagged blocked, 0.0 for an empty document.
    pub fn blocked_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.blocked as f64 / self.total as f64
        }
    }

    /// True when the document declares tasks and all are done.
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_is_total_minus_completed() {
        let summary = TaskSummary {
            total: 15,
            completed: 5,
            ..Default::default()
        };
        assert_eq!(summary.incomplete(), 10);
        assert_eq!(summary.completed + summary.incomplete(), summary.total);
    }

    #[test]
    fn ratios_are_zero_for_empty_documents() {
        let summary = TaskSummary::default();
        assert_eq!(summary.completion_ratio(), 0.0);
        assert_eq!(summary.blocked_ratio(), 0.0);
        assert!(!summary.is_complete());
    }

    #[test]
    fn complete_requires_nonzero_total() {
        let empty = TaskSummary::default();
        assert!(!empty.is_complete());

        let done = TaskSummary {
            total: 3,
            completed: 3,
            ..Default::default()
        };
        assert!(done.is_complete());
    }
}
