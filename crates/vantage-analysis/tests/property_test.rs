//! Property-based tests for the parser and the scorer.

use proptest::prelude::*;

use vantage_analysis::{MarkerEngine, PriorityCalculator};
use vantage_core::{PriorityInputs, PriorityWeights};

// =============================================================================
// Strategy helpers
// =============================================================================

/// One line of a tasks document: every marker format the parser
/// recognizes, plus noise it must ignore.
fn task_line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("- [ ] pending work".to_string()),
        Just("- [x] finished work".to_string()),
        Just("- [X] finished loudly".to_string()),
        Just("* [ ] star bullet".to_string()),
        Just("T001: wire the parser".to_string()),
        Just("T002: [x] already landed".to_string()),
        Just("✅ shipped".to_string()),
        Just("❌ rejected".to_string()),
        Just("🔄 in flight".to_string()),
        Just("⬜ queued".to_string()),
        Just("TODO: tighten this".to_string()),
        Just("DONE: released".to_string()),
        Just("- [ ] concurrent piece [P]".to_string()),
        Just("- [ ] stuck piece [BLOCKED]".to_string()),
        Just("- [x] landed despite 🚫".to_string()),
        Just("## Phase heading".to_string()),
        Just("plain prose, not a task".to_string()),
        Just(String::new()),
    ]
}

fn unit_interval() -> impl Strategy<Value = f64> {
    0.0f64..=1.0
}

fn inputs() -> impl Strategy<Value = PriorityInputs> {
    (
        unit_interval(),
        unit_interval(),
        unit_interval(),
        unit_interval(),
        unit_interval(),
    )
        .prop_map(
            |(needs_human, risk, staleness, impact, confidence)| PriorityInputs {
                needs_human,
                risk,
                staleness,
                impact,
                confidence,
            },
        )
}

// =============================================================================
// Parser invariants
// =============================================================================

proptest! {
    #[test]
    fn task_counts_always_balance(lines in prop::collection::vec(task_line(), 0..120)) {
        let engine = MarkerEngine::new();
        let summary = engine.parse(&lines.join("\n"));

        prop_assert_eq!(summary.completed + summary.incomplete(), summary.total);
        prop_assert!(summary.completed <= summary.total);
        prop_assert!(summary.blocked <= summary.total);
        prop_assert!(summary.parallel <= summary.total);
        prop_assert!(summary.in_progress <= summary.total);
    }

    #[test]
    fn parsing_is_insensitive_to_trailing_whitespace(lines in prop::collection::vec(task_line(), 0..60)) {
        let engine = MarkerEngine::new();
        let plain = lines.join("\n");
        let padded: String = lines.iter().map(|l| format!("  {l}  \n")).collect();

        prop_assert_eq!(engine.parse(&plain), engine.parse(&padded));
    }
}

// =============================================================================
// Scorer invariants
// =============================================================================

proptest! {
    #[test]
    fn raising_a_positive_signal_never_lowers_the_score(
        inputs in inputs(),
        bump in unit_interval(),
    ) {
        let calc = PriorityCalculator::new(PriorityWeights::default(), 30.0);
        let base = calc.score(inputs);

        let riskier = PriorityInputs { risk: (inputs.risk + bump).min(1.0), ..inputs };
        prop_assert!(calc.score(riskier).value >= base.value);

        let needier = PriorityInputs {
            needs_human: (inputs.needs_human + bump).min(1.0),
            ..inputs
        };
        prop_assert!(calc.score(needier).value >= base.value);
    }

    #[test]
    fn raising_confidence_never_raises_the_score(
        inputs in inputs(),
        bump in unit_interval(),
    ) {
        let calc = PriorityCalculator::new(PriorityWeights::default(), 30.0);
        let base = calc.score(inputs);
        let surer = PriorityInputs {
            confidence: (inputs.confidence + bump).min(1.0),
            ..inputs
        };
        prop_assert!(calc.score(surer).value <= base.value);
    }

    #[test]
    fn default_scores_stay_in_the_documented_range(inputs in inputs()) {
        let calc = PriorityCalculator::new(PriorityWeights::default(), 30.0);
        let score = calc.score(inputs).value;
        prop_assert!(score >= -10.0);
        prop_assert!(score <= 95.0);
    }
}
