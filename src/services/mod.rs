// src/services/mod.rs

pub mod progress;

pub use progress::ProgressService;
