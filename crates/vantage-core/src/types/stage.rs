//! Lifecycle stages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The eight lifecycle stages, in order.
///
/// Derived `Ord` follows declaration order, so later stages compare
/// greater and `index()` doubles as lifecycle progress.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Stage {
    Bootstrap,
    Specify,
    Plan,
    Tasks,
    Implement,
    Test,
    Review,
    Done,
}

impl Stage {
    pub const ALL: [Stage; 8] = [
        Stage::Bootstrap,
        Stage::Specify,
        Stage::Plan,
        Stage::Tasks,
        Stage::Implement,
        Stage::Test,
        Stage::Review,
        Stage::Done,
    ];

    /// Position in the lifecycle, 0 (Bootstrap) through 7 (Done).
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Bootstrap => "bootstrap",
            Stage::Specify => "specify",
            Stage::Plan => "plan",
            Stage::Tasks => "tasks",
            Stage::Implement => "implement",
            Stage::Test => "test",
            Stage::Review => "review",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
