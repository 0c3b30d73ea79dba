// src/services/progress.rs

use std::collections::HashSet;

use chrono::Utc;

use crate::{
    error::AppError,
    models::{
        attempt::{Attempt, NewAttempt},
        quiz::{PublicQuizQuestion, SubmittedAnswer},
        report::{ProgressReport, ReportSchool, ReportStudent, ReportTeacher},
        student::Student,
    },
    progress::{
        best_attempt::best_attempts_by_topic,
        grading::GradingScale,
        report::{ChapterGrade, grade_chapters, summarize},
        score::{AnswerKey, answer_keys_by_topic, score_attempt},
        unlock::{ChapterProgress, Syllabus, TopicAccess},
    },
    store::{ClassSnapshot, DynStore},
};

/// Orchestrates a snapshot read from the store and the pure progression
/// engine. Holds no mutable state, so clones are cheap and independent.
#[derive(Clone)]
pub struct ProgressService {
    store: DynStore,
    grading: GradingScale,
}

impl ProgressService {
    pub fn new(store: DynStore, grading: GradingScale) -> Self {
        Self { store, grading }
    }

    async fn student(&self, student_id: i64) -> Result<Student, AppError> {
        self.store
            .find_student(student_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Peserta didik not found".to_string()))
    }

    async fn snapshot(&self, student: &Student) -> Result<ClassSnapshot, AppError> {
        self.store
            .load_class_snapshot(student.class_id, student.id)
            .await
    }

    /// Topic ids with at least one attempt, scored or not.
    fn completed(snapshot: &ClassSnapshot) -> HashSet<i64> {
        snapshot.attempts.iter().map(|a| a.topic_id).collect()
    }

    /// Chapters of the student's class with unlock flags on chapters and topics.
    pub async fn unlocked_syllabus(&self, student_id: i64) -> Result<Vec<ChapterProgress>, AppError> {
        let student = self.student(student_id).await?;
        let snapshot = self.snapshot(&student).await?;

        let syllabus = Syllabus::new(&snapshot.chapters, &snapshot.topics);
        Ok(syllabus.annotate(&Self::completed(&snapshot)))
    }

    fn access_in(snapshot: &ClassSnapshot, topic_id: i64) -> Result<bool, AppError> {
        let syllabus = Syllabus::new(&snapshot.chapters, &snapshot.topics);
        match syllabus.topic_access(&Self::completed(snapshot), topic_id) {
            TopicAccess::Unlocked => Ok(true),
            TopicAccess::Locked => Ok(false),
            TopicAccess::NotFound => Err(AppError::NotFound("Topik not found".to_string())),
        }
    }

    /// Whether the student may open the topic. `NotFound` when the topic is
    /// not part of the student's class.
    pub async fn check_topic_access(&self, student_id: i64, topic_id: i64) -> Result<bool, AppError> {
        let student = self.student(student_id).await?;
        let snapshot = self.snapshot(&student).await?;
        Self::access_in(&snapshot, topic_id)
    }

    /// Quiz questions of an unlocked topic, without answers.
    pub async fn quiz_for_topic(
        &self,
        student_id: i64,
        topic_id: i64,
    ) -> Result<Vec<PublicQuizQuestion>, AppError> {
        let student = self.student(student_id).await?;
        let snapshot = self.snapshot(&student).await?;

        if !Self::access_in(&snapshot, topic_id)? {
            return Err(AppError::Forbidden("Topik belum terbuka/unlocked".to_string()));
        }

        Ok(snapshot
            .questions
            .into_iter()
            .filter(|q| q.topic_id == topic_id)
            .map(PublicQuizQuestion::from)
            .collect())
    }

    /// Validates and appends one attempt.
    ///
    /// At least one answer is required. Every submitted question must belong
    /// to the topic and appear once; otherwise nothing is written.
    pub async fn submit_attempt(
        &self,
        student_id: i64,
        topic_id: i64,
        answers: Vec<SubmittedAnswer>,
    ) -> Result<(Attempt, Option<u8>), AppError> {
        if answers.is_empty() {
            return Err(AppError::BadRequest("No answers submitted".to_string()));
        }

        let student = self.student(student_id).await?;
        let snapshot = self.snapshot(&student).await?;

        if !Self::access_in(&snapshot, topic_id)? {
            return Err(AppError::Forbidden("Topik belum terbuka/unlocked".to_string()));
        }

        let submitted: HashSet<i64> = answers.iter().map(|a| a.quiz_id).collect();
        let matched = snapshot
            .questions
            .iter()
            .filter(|q| q.topic_id == topic_id && submitted.contains(&q.id))
            .count();
        if matched != answers.len() {
            return Err(AppError::ValidationMismatch(
                "Some quiz not found or do not belong to the topik".to_string(),
            ));
        }

        let stored = self
            .store
            .insert_attempt(NewAttempt {
                student_id,
                topic_id,
                answers: serde_json::to_string(&answers)?,
                completed_at: Utc::now(),
            })
            .await?;

        let key = AnswerKey::from_questions(snapshot.questions.iter().filter(|q| q.topic_id == topic_id));
        let score = score_attempt(&stored, &key);

        tracing::info!(
            student_id,
            topic_id,
            attempt_id = stored.id,
            score = ?score,
            "Quiz attempt recorded"
        );

        Ok((stored, score))
    }

    /// Chapters with per-topic best scores, for the teacher's grade view.
    pub async fn grades(&self, student_id: i64) -> Result<Vec<ChapterGrade>, AppError> {
        let student = self.student(student_id).await?;
        let snapshot = self.snapshot(&student).await?;
        Ok(self.grade(&snapshot))
    }

    fn grade(&self, snapshot: &ClassSnapshot) -> Vec<ChapterGrade> {
        let keys = answer_keys_by_topic(&snapshot.questions);
        let best = best_attempts_by_topic(&snapshot.attempts, &keys);
        let syllabus = Syllabus::new(&snapshot.chapters, &snapshot.topics);
        grade_chapters(&syllabus, &best, &self.grading)
    }

    /// Full report. `teacher_id` only fills the signature block.
    pub async fn build_report(
        &self,
        student_id: i64,
        teacher_id: Option<i64>,
    ) -> Result<ProgressReport, AppError> {
        let student = self.student(student_id).await?;

        let class = self.store.find_class(student.class_id).await?;
        let school = match &class {
            Some(c) => self.store.find_school(c.school_id).await?,
            None => None,
        };
        let teacher = match teacher_id {
            Some(id) => self.store.find_teacher(id).await?,
            None => None,
        };

        let snapshot = self.snapshot(&student).await?;
        let chapters = self.grade(&snapshot);
        let summary = summarize(&chapters, &self.grading);

        Ok(ProgressReport {
            student: ReportStudent {
                name: student.full_name,
                nisn: student.nisn,
            },
            class_name: class.map(|c| c.name),
            school: school
                .map(|s| ReportSchool {
                    name: Some(s.name),
                    address: s.address,
                    semester: s.semester,
                    academic_year: s.academic_year,
                })
                .unwrap_or_default(),
            teacher: teacher.map(|t| ReportTeacher {
                name: t.full_name,
                nip: t.nip,
            }),
            chapters,
            summary,
        })
    }

    /// Deletes all attempts of the student, returning every topic to its
    /// initial locked/ungraded state.
    pub async fn reset_progress(&self, student_id: i64) -> Result<u64, AppError> {
        let student = self.student(student_id).await?;
        let removed = self.store.delete_attempts_for_student(student.id).await?;
        tracing::info!(student_id, removed, "Quiz attempts reset");
        Ok(removed)
    }
}
