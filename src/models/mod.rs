// src/models/mod.rs

pub mod attempt;
pub mod quiz;
pub mod report;
pub mod school;
pub mod student;
pub mod syllabus;
pub mod teacher;
