// src/store/memory.rs

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

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

use super::{ClassSnapshot, LearningStore};

#[derive(Debug, Default)]
struct Tables {
    schools: Vec<School>,
    classes: Vec<ClassRoom>,
    students: Vec<Student>,
    teachers: Vec<Teacher>,
    chapters: Vec<Chapter>,
    topics: Vec<Topic>,
    questions: Vec<QuizQuestion>,
    attempts: Vec<Attempt>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process store for tests and local runs without Postgres.
///
/// Every table sits behind one lock, so each call sees a consistent state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_school(&self, name: &str, semester: Option<&str>, academic_year: Option<&str>) -> School {
        let mut t = self.tables.write().await;
        let school = School {
            id: t.next_id(),
            name: name.to_string(),
            address: None,
            semester: semester.map(str::to_string),
            academic_year: academic_year.map(str::to_string),
        };
        t.schools.push(school.clone());
        school
    }

    pub async fn add_class(&self, school_id: i64, name: &str) -> ClassRoom {
        let mut t = self.tables.write().await;
        let class = ClassRoom {
            id: t.next_id(),
            school_id,
            name: name.to_string(),
        };
        t.classes.push(class.clone());
        class
    }

    pub async fn add_chapter(&self, class_id: i64, number: &str, title: &str) -> Chapter {
        let mut t = self.tables.write().await;
        let chapter = Chapter {
            id: t.next_id(),
            class_id,
            number: number.to_string(),
            title: title.to_string(),
        };
        t.chapters.push(chapter.clone());
        chapter
    }

    pub async fn add_topic(&self, chapter_id: i64, code: &str, title: &str) -> Topic {
        let mut t = self.tables.write().await;
        let topic = Topic {
            id: t.next_id(),
            chapter_id,
            code: code.to_string(),
            title: title.to_string(),
        };
        t.topics.push(topic.clone());
        topic
    }

    pub async fn add_question(&self, topic_id: i64, prompt: &str, answer: &str) -> QuizQuestion {
        let mut t = self.tables.write().await;
        let question = QuizQuestion {
            id: t.next_id(),
            topic_id,
            prompt: prompt.to_string(),
            options: sqlx::types::Json(vec![
                "A".to_string(),
                "B".to_string(),
                "C".to_string(),
                "D".to_string(),
            ]),
            answer: answer.to_string(),
        };
        t.questions.push(question.clone());
        question
    }
}

#[async_trait]
impl LearningStore for MemoryStore {
    async fn list_schools(&self) -> Result<Vec<School>, AppError> {
        Ok(self.tables.read().await.schools.clone())
    }

    async fn find_school(&self, id: i64) -> Result<Option<School>, AppError> {
        let t = self.tables.read().await;
        Ok(t.schools.iter().find(|s| s.id == id).cloned())
    }

    async fn list_classes(&self, school_id: i64) -> Result<Vec<ClassRoom>, AppError> {
        let t = self.tables.read().await;
        Ok(t.classes
            .iter()
            .filter(|c| c.school_id == school_id)
            .cloned()
            .collect())
    }

    async fn find_class(&self, id: i64) -> Result<Option<ClassRoom>, AppError> {
        let t = self.tables.read().await;
        Ok(t.classes.iter().find(|c| c.id == id).cloned())
    }

    async fn create_student(&self, student: NewStudent) -> Result<Student, AppError> {
        let mut t = self.tables.write().await;
        if t.students.iter().any(|s| s.nisn == student.nisn) {
            return Err(AppError::Conflict(format!(
                "NISN '{}' already exists",
                student.nisn
            )));
        }

        let created = Student {
            id: t.next_id(),
            full_name: student.full_name,
            nisn: student.nisn,
            class_id: student.class_id,
        };
        t.students.push(created.clone());
        Ok(created)
    }

    async fn find_student(&self, id: i64) -> Result<Option<Student>, AppError> {
        let t = self.tables.read().await;
        Ok(t.students.iter().find(|s| s.id == id).cloned())
    }

    async fn find_student_by_nisn(&self, nisn: &str) -> Result<Option<Student>, AppError> {
        let t = self.tables.read().await;
        Ok(t.students.iter().find(|s| s.nisn == nisn).cloned())
    }

    async fn list_students_by_class(
        &self,
        class_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Student>, AppError> {
        let t = self.tables.read().await;
        Ok(t.students
            .iter()
            .filter(|s| s.class_id == class_id)
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn create_teacher(&self, teacher: NewTeacher) -> Result<Teacher, AppError> {
        let mut t = self.tables.write().await;
        if t.teachers.iter().any(|g| g.nip == teacher.nip) {
            return Err(AppError::Conflict(format!(
                "NIP '{}' already exists",
                teacher.nip
            )));
        }

        let created = Teacher {
            id: t.next_id(),
            full_name: teacher.full_name,
            nip: teacher.nip,
            password: teacher.password_hash,
            school_id: teacher.school_id,
        };
        t.teachers.push(created.clone());
        Ok(created)
    }

    async fn find_teacher(&self, id: i64) -> Result<Option<Teacher>, AppError> {
        let t = self.tables.read().await;
        Ok(t.teachers.iter().find(|g| g.id == id).cloned())
    }

    async fn find_teacher_by_nip(&self, nip: &str) -> Result<Option<Teacher>, AppError> {
        let t = self.tables.read().await;
        Ok(t.teachers.iter().find(|g| g.nip == nip).cloned())
    }

    async fn load_class_snapshot(
        &self,
        class_id: i64,
        student_id: i64,
    ) -> Result<ClassSnapshot, AppError> {
        let t = self.tables.read().await;

        let mut chapters: Vec<Chapter> = t
            .chapters
            .iter()
            .filter(|c| c.class_id == class_id)
            .cloned()
            .collect();
        chapters.sort_by_key(|c| c.id);

        let topics: Vec<Topic> = t
            .topics
            .iter()
            .filter(|topic| chapters.iter().any(|c| c.id == topic.chapter_id))
            .cloned()
            .collect();
        let in_class = |topic_id: i64| topics.iter().any(|topic| topic.id == topic_id);

        let mut attempts: Vec<Attempt> = t
            .attempts
            .iter()
            .filter(|a| a.student_id == student_id && in_class(a.topic_id))
            .cloned()
            .collect();
        attempts.sort_by(|a, b| {
            b.completed_at
                .cmp(&a.completed_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let questions: Vec<QuizQuestion> = t
            .questions
            .iter()
            .filter(|q| in_class(q.topic_id))
            .cloned()
            .collect();

        Ok(ClassSnapshot {
            chapters,
            topics,
            attempts,
            questions,
        })
    }

    async fn insert_attempt(&self, attempt: NewAttempt) -> Result<Attempt, AppError> {
        let mut t = self.tables.write().await;
        let stored = Attempt {
            id: t.next_id(),
            student_id: attempt.student_id,
            topic_id: attempt.topic_id,
            answers: attempt.answers,
            completed_at: attempt.completed_at,
        };
        t.attempts.push(stored.clone());
        Ok(stored)
    }

    async fn delete_attempts_for_student(&self, student_id: i64) -> Result<u64, AppError> {
        let mut t = self.tables.write().await;
        let before = t.attempts.len();
        t.attempts.retain(|a| a.student_id != student_id);
        Ok((before - t.attempts.len()) as u64)
    }
}
