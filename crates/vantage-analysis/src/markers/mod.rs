//! Tolerant multi-format task marker recognition.

mod engine;

pub use engine::MarkerEngine;
