// src/handlers/mod.rs

pub mod auth;
pub mod school;
pub mod student;
pub mod teacher;
