//! The marker engine: pre-compiled patterns for task classification.
//!
//! Every pattern is compiled once when the engine is built and shared
//! across parse calls; a parse is a single linear pass over the
//! document. Portfolio scans are latency-bounded, so this stays a
//! design constraint, not an implementation detail.

use aho_corasick::AhoCorasick;
use regex::{Regex, RegexSet};
use vantage_core::TaskSummary;

/// Line classifiers in priority order. The lowest matching index wins,
/// so a line matching two formats is counted exactly once.
const LINE_PATTERNS: &[&str] = &[
    r"^[-*] \[ \]",    // open checkbox
    r"^[-*] \[[xX]\]", // done checkbox
    r"^T\d{3,4}:",     // task-id line
    r"^(✅|☑)",        // done emoji
    r"^(❌|⬜|☐)",     // open emoji
    r"^🔄",            // in-progress emoji
    r"TODO:",          // open keyword
    r"DONE:",          // done keyword
];

const P_CHECKBOX_OPEN: usize = 0;
const P_CHECKBOX_DONE: usize = 1;
const P_TASK_ID: usize = 2;
const P_EMOJI_DONE: usize = 3;
const P_EMOJI_OPEN: usize = 4;
const P_EMOJI_WIP: usize = 5;
const P_TODO: usize = 6;
const P_DONE: usize = 7;

/// Inline checkbox deciding completion of a task-id line.
const INLINE_DONE: &str = r"\[[xX]\]";

/// Flag tokens, matched anywhere on a task line. The first three mark
/// parallel-eligible tasks, the rest blocked tasks.
const FLAG_TOKENS: &[&str] = &["[P]", "(P)", "||", "[BLOCKED]", "🚫", "⛔"];
const FLAG_PARALLEL_COUNT: usize = 3;

/// Phase headings used to refine the completed stages.
const REVIEW_HEADING: &str = r"(?im)^ {0,3}#{1,6}[^\r\n]*\breviews?\b";
const TEST_HEADING: &str = r"(?im)^ {0,3}#{1,6}[^\r\n]*\b(tests?|testing|qa)\b";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineClass {
    Completed,
    Incomplete,
    InProgress,
}

/// The marker matching engine. Build once, parse many.
pub struct MarkerEngine {
    compiled: Option<Compiled>,
}

struct Compiled {
    classifiers: RegexSet,
    inline_done: Regex,
    flags: AhoCorasick,
    review_heading: Regex,
    test_heading: Regex,
}

impl Compiled {
    fn build() -> Option<Self> {
        Some(Self {
            classifiers: RegexSet::new(LINE_PATTERNS).ok()?,
            inline_done: Regex::new(INLINE_DONE).ok()?,
            flags: AhoCorasick::new(FLAG_TOKENS).ok()?,
            review_heading: Regex::new(REVIEW_HEADING).ok()?,
            test_heading: Regex::new(TEST_HEADING).ok()?,
        })
    }

    /// Classify one trimmed line: first matching pattern wins.
    fn classify(&self, trimmed: &str) -> Option<LineClass> {
        let first = self.classifiers.matches(trimmed).iter().next()?;
        Some(match first {
            P_CHECKBOX_OPEN => LineClass::Incomplete,
            P_CHECKBOX_DONE => LineClass::Completed,
            // Completion of a task-id line comes from a checkbox on the
            // same line; without one the task is open.
            P_TASK_ID => {
                if self.inline_done.is_match(trimmed) {
                    LineClass::Completed
                } else {
                    LineClass::Incomplete
                }
            }
            P_EMOJI_DONE => LineClass::Completed,
            P_EMOJI_OPEN => LineClass::Incomplete,
            P_EMOJI_WIP => LineClass::InProgress,
            P_TODO => LineClass::Incomplete,
            P_DONE => LineClass::Completed,
            _ => return None,
        })
    }

    /// Which flag families appear on a line: (parallel, blocked).
    fn flags_on(&self, line: &str) -> (bool, bool) {
        let mut parallel = false;
        let mut blocked = false;
        for m in self.flags.find_iter(line) {
            if m.pattern().as_usize() < FLAG_PARALLEL_COUNT {
                parallel = true;
            } else {
                blocked = true;
            }
            if parallel && blocked {
                break;
            }
        }
        (parallel, blocked)
    }
}

impl MarkerEngine {
    pub fn new() -> Self {
        let compiled = Compiled::build();
        if compiled.is_none() {
            tracing::error!("marker patterns failed to compile, task parsing disabled");
        }
        Self { compiled }
    }

    /// Parse a tasks document into a summary in one linear pass.
    ///
    /// Lines matching no marker are ignored. Flags only count on lines
    /// classified as tasks, which keeps `blocked <= total`.
    pub fn parse(&self, text: &str) -> TaskSummary {
        let compiled = match &self.compiled {
            Some(c) => c,
            None => return TaskSummary::default(),
        };

        let mut summary = TaskSummary::default();
        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let class = match compiled.classify(trimmed) {
                Some(c) => c,
                None => continue,
            };

            summary.total += 1;
            match class {
                LineClass::Completed => summary.completed += 1,
                LineClass::InProgress => summary.in_progress += 1,
                LineClass::Incomplete => {}
            }

            let (parallel, blocked) = compiled.flags_on(line);
            if parallel {
                summary.parallel += 1;
            }
            if blocked {
                summary.blocked += 1;
            }
        }
        summary
    }

    /// True when the document has a review phase heading.
    pub fn has_review_heading(&self, text: &str) -> bool {
        self.compiled
            .as_ref()
            .map(|c| c.review_heading.is_match(text))
            .unwrap_or(false)
    }

    /// True when the document has a test phase heading.
    pub fn has_test_heading(&self, text: &str) -> bool {
        self.compiled
            .as_ref()
            .map(|c| c.test_heading.is_match(text))
            .unwrap_or(false)
    }

    /// Number of compiled line classifiers.
    pub fn pattern_count(&self) -> usize {
        self.compiled
            .as_ref()
            .map(|c| c.classifiers.len())
            .unwrap_or(0)
    }
}

impl Default for MarkerEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> MarkerEngine {
        MarkerEngine::new()
    }

    #[test]
    fn counts_open_and_done_checkboxes() {
        let mut doc = String::new();
        for i in 0..10 {
            doc.push_str(&format!("- [ ] task {i}\n"));
        }
        for i in 0..5 {
            doc.push_str(&format!("- [x] task {i}\n"));
        }

        let summary = engine().parse(&doc);
        assert_eq!(summary.total, 15);
        assert_eq!(summary.completed, 5);
        assert_eq!(summary.incomplete(), 10);
    }

    #[test]
    fn star_bullets_and_capital_x_count() {
        let summary = engine().parse("* [ ] one\n* [x] two\n- [X] three\n");
        assert_eq!(summary.total, 3);
        assert_eq!(summary.completed, 2);
    }

    #[test]
    fn task_id_lines_use_inline_checkbox() {
        let doc = "T001: set up repo\nT002: [x] write parser\nT003: [ ] wire cache\n";
        let summary = engine().parse(doc);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.completed, 1);
    }

    #[test]
    fn short_task_ids_are_not_tasks() {
        let summary = engine().parse("T1: too short\nT12: still short\nT0001: counted\n");
        assert_eq!(summary.total, 1);
    }

    #[test]
    fn emoji_markers_classify_lines() {
        let doc = "✅ shipped\n☑ also shipped\n❌ failed\n⬜ queued\n☐ queued too\n🔄 migrating\n";
        let summary = engine().parse(doc);
        assert_eq!(summary.total, 6);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.in_progress, 1);
        assert_eq!(summary.incomplete(), 4);
    }

    #[test]
    fn in_progress_is_not_silently_dropped() {
        let summary = engine().parse("🔄 rolling upgrade\n");
        assert_eq!(summary.total, 1);
        assert_eq!(summary.completed, 0);
        assert_eq!(summary.in_progress, 1);
    }

    #[test]
    fn keyword_markers_match_anywhere_on_the_line() {
        let doc = "TODO: fix flaky test\nnote DONE: cut release\n";
        let summary = engine().parse(doc);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.completed, 1);
    }

    #[test]
    fn first_match_wins_counts_once() {
        // Checkbox beats the TODO keyword on the same line.
        let summary = engine().parse("- [ ] TODO: deduplicate\n");
        assert_eq!(summary.total, 1);
        assert_eq!(summary.completed, 0);

        // Done checkbox beats DONE keyword.
        let summary = engine().parse("- [x] DONE: merged\n");
        assert_eq!(summary.total, 1);
        assert_eq!(summary.completed, 1);
    }

    #[test]
    fn parallel_flags_are_orthogonal() {
        let doc = "- [ ] deploy api [P]\n- [x] schema (P)\n- [ ] docs || site\n";
        let summary = engine().parse(doc);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.parallel, 3);
        assert_eq!(summary.completed, 1);
    }

    #[test]
    fn blocked_flags_count_on_task_lines_only() {
        let doc = "- [ ] waiting on budget [BLOCKED]\n- [x] landed 🚫\nT004: rollout ⛔\nprose mentioning [BLOCKED] is not a task\n";
        let summary = engine().parse(doc);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.blocked, 3);
        assert!(summary.blocked <= summary.total);
    }

    #[test]
    fn unmarked_lines_are_ignored() {
        let doc = "# Tasks\n\nSome intro prose.\n- a plain bullet\n";
        let summary = engine().parse(doc);
        assert_eq!(summary, TaskSummary::default());
    }

    #[test]
    fn empty_document_is_all_zero() {
        assert_eq!(engine().parse(""), TaskSummary::default());
    }

    #[test]
    fn completed_plus_incomplete_is_total() {
        let doc = "- [ ] a\n- [x] b\nT001: c\nT002: [x] d\n✅ e\n❌ f\n🔄 g\nTODO: h\nDONE: i\n";
        let summary = engine().parse(doc);
        assert_eq!(summary.completed + summary.incomplete(), summary.total);
        assert_eq!(summary.total, 9);
        assert_eq!(summary.completed, 4);
    }

    #[test]
    fn heading_detection_is_case_insensitive() {
        let e = engine();
        assert!(e.has_review_heading("## Code Review\n"));
        assert!(e.has_review_heading("### phase 5: REVIEW gate\n"));
        assert!(!e.has_review_heading("we should review this later\n"));

        assert!(e.has_test_heading("## Testing\n"));
        assert!(e.has_test_heading("# QA\n"));
        assert!(e.has_test_heading("## Phase 4: Tests\n"));
        assert!(!e.has_test_heading("run the tests often\n"));
    }

    #[test]
    fn engine_compiles_all_patterns() {
        assert_eq!(engine().pattern_count(), LINE_PATTERNS.len());
    }
}
