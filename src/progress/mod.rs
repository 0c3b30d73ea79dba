// src/progress/mod.rs

//! Progression and grading engine.
//!
//! Pure functions over data already fetched from the store: scoring single
//! attempts, picking the best attempt per topic, deciding which topics are
//! unlocked, and aggregating grades into a report.

pub mod best_attempt;
pub mod grading;
pub mod report;
pub mod score;
pub mod unlock;
