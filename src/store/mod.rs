// src/store/mod.rs

//! Persistence seam. Handlers and services only see `LearningStore`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        attempt::{Attempt, NewAttempt},
        quiz::QuizQuestion,
        school::{ClassRoom, School},
        student::{NewStudent, Student},
        syllabus::{Chapter, Topic},
        teacher::{NewTeacher, Teacher},
    },
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type DynStore = Arc<dyn LearningStore>;

/// Everything the progression engine needs for one class and one student,
/// read as a single consistent unit.
#[derive(Debug, Clone, Default)]
pub struct ClassSnapshot {
    pub chapters: Vec<Chapter>,
    pub topics: Vec<Topic>,
    /// The student's attempts on those topics, newest first.
    pub attempts: Vec<Attempt>,
    pub questions: Vec<QuizQuestion>,
}

#[async_trait]
pub trait LearningStore: Send + Sync {
    async fn list_schools(&self) -> Result<Vec<School>, AppError>;
    async fn find_school(&self, id: i64) -> Result<Option<School>, AppError>;
    async fn list_classes(&self, school_id: i64) -> Result<Vec<ClassRoom>, AppError>;
    async fn find_class(&self, id: i64) -> Result<Option<ClassRoom>, AppError>;

    /// Fails with `Conflict` when the NISN is taken.
    async fn create_student(&self, student: NewStudent) -> Result<Student, AppError>;
    async fn find_student(&self, id: i64) -> Result<Option<Student>, AppError>;
    async fn find_student_by_nisn(&self, nisn: &str) -> Result<Option<Student>, AppError>;
    async fn list_students_by_class(
        &self,
        class_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Student>, AppError>;

    /// Fails with `Conflict` when the NIP is taken.
    async fn create_teacher(&self, teacher: NewTeacher) -> Result<Teacher, AppError>;
    async fn find_teacher(&self, id: i64) -> Result<Option<Teacher>, AppError>;
    async fn find_teacher_by_nip(&self, nip: &str) -> Result<Option<Teacher>, AppError>;

    async fn load_class_snapshot(
        &self,
        class_id: i64,
        student_id: i64,
    ) -> Result<ClassSnapshot, AppError>;

    /// Appends one attempt. Never partially written.
    async fn insert_attempt(&self, attempt: NewAttempt) -> Result<Attempt, AppError>;

    /// Removes every attempt of the student. Returns the number removed.
    async fn delete_attempts_for_student(&self, student_id: i64) -> Result<u64, AppError>;
}
