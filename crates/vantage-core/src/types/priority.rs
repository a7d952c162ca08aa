//! Priority inputs and the weighted score.

use serde::{Deserialize, Serialize};

/// The five normalized priority signals, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriorityInputs {
    pub needs_human: f64,
    pub risk: f64,
    pub staleness: f64,
    pub impact: f64,
    pub confidence: f64,
}

impl PriorityInputs {
    /// Clamp every signal into `[0, 1]`. NaN clamps to 0.
    pub fn clamped(self) -> Self {
        Self {
            needs_human: clamp01(self.needs_human),
            risk: clamp01(self.risk),
            staleness: clamp01(self.staleness),
            impact: clamp01(self.impact),
            confidence: clamp01(self.confidence),
        }
    }
}

/// A computed priority score with the inputs that produced it.
///
/// Keeping the inputs alongside the value keeps every score
/// re-derivable and explainable in reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityScore {
    pub value: f64,
    pub inputs: PriorityInputs,
}

impl PriorityScore {
    pub const ZERO: PriorityScore = PriorityScore {
        value: 0.0,
        inputs: PriorityInputs {
            needs_human: 0.0,
            risk: 0.0,
            staleness: 0.0,
            impact: 0.0,
            confidence: 0.0,
        },
    };
}

impl Default for PriorityScore {
    fn default() -> Self {
        Self::ZERO
    }
}

pub(crate) fn clamp01(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_bounds_every_signal() {
        let inputs = PriorityInputs {
            needs_human: 1.7,
            risk: -0.2,
            staleness: 0.5,
            impact: f64::NAN,
            confidence: 2.0,
        }
        .clamped();

        assert_eq!(inputs.needs_human, 1.0);
        assert_eq!(inputs.risk, 0.0);
        assert_eq!(inputs.staleness, 0.5);
        assert_eq!(inputs.impact, 0.0);
        assert_eq!(inputs.confidence, 1.0);
    }
}
