//! Shared type definitions for the portfolio pipeline.

pub mod cache;
pub mod collections;
pub mod git;
pub mod portfolio;
pub mod priority;
pub mod project;
pub mod stage;
pub mod tasks;
