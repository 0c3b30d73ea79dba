// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::PgPool;

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

const STUDENT_COLUMNS: &str = "id, nama_lengkap, nisn, kelas_id";
const TEACHER_COLUMNS: &str = "id, nama_lengkap, nip, password, sekolah_id";
const ATTEMPT_COLUMNS: &str = "id, peserta_didik_id, topik_id, hasil_quiz, tanggal_selesai";

/// Postgres-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a unique violation to `Conflict`, everything else to a 500.
fn conflict_or_internal(e: sqlx::Error, what: &str) -> AppError {
    let unique = e
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    if unique {
        AppError::Conflict(format!("{} already exists", what))
    } else {
        tracing::error!("Failed to insert {}: {:?}", what, e);
        AppError::from(e)
    }
}

#[async_trait]
impl LearningStore for PgStore {
    async fn list_schools(&self) -> Result<Vec<School>, AppError> {
        let schools = sqlx::query_as::<_, School>(
            "SELECT id, nama, alamat, semester, tahun_ajaran FROM sekolah ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(schools)
    }

    async fn find_school(&self, id: i64) -> Result<Option<School>, AppError> {
        let school = sqlx::query_as::<_, School>(
            "SELECT id, nama, alamat, semester, tahun_ajaran FROM sekolah WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(school)
    }

    async fn list_classes(&self, school_id: i64) -> Result<Vec<ClassRoom>, AppError> {
        let classes = sqlx::query_as::<_, ClassRoom>(
            "SELECT id, sekolah_id, nama FROM kelas WHERE sekolah_id = $1 ORDER BY id",
        )
        .bind(school_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(classes)
    }

    async fn find_class(&self, id: i64) -> Result<Option<ClassRoom>, AppError> {
        let class = sqlx::query_as::<_, ClassRoom>(
            "SELECT id, sekolah_id, nama FROM kelas WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(class)
    }

    async fn create_student(&self, student: NewStudent) -> Result<Student, AppError> {
        let sql = format!(
            "INSERT INTO peserta_didik (nama_lengkap, nisn, kelas_id) VALUES ($1, $2, $3) RETURNING {}",
            STUDENT_COLUMNS
        );

        sqlx::query_as::<_, Student>(&sql)
            .bind(&student.full_name)
            .bind(&student.nisn)
            .bind(student.class_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_or_internal(e, &format!("NISN '{}'", student.nisn)))
    }

    async fn find_student(&self, id: i64) -> Result<Option<Student>, AppError> {
        let sql = format!("SELECT {} FROM peserta_didik WHERE id = $1", STUDENT_COLUMNS);
        let student = sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(student)
    }

    async fn find_student_by_nisn(&self, nisn: &str) -> Result<Option<Student>, AppError> {
        let sql = format!("SELECT {} FROM peserta_didik WHERE nisn = $1", STUDENT_COLUMNS);
        let student = sqlx::query_as::<_, Student>(&sql)
            .bind(nisn)
            .fetch_optional(&self.pool)
            .await?;

        Ok(student)
    }

    async fn list_students_by_class(
        &self,
        class_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Student>, AppError> {
        let sql = format!(
            "SELECT {} FROM peserta_didik WHERE kelas_id = $1 ORDER BY id LIMIT $2 OFFSET $3",
            STUDENT_COLUMNS
        );
        let students = sqlx::query_as::<_, Student>(&sql)
            .bind(class_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(students)
    }

    async fn create_teacher(&self, teacher: NewTeacher) -> Result<Teacher, AppError> {
        let sql = format!(
            "INSERT INTO guru (nama_lengkap, nip, password, sekolah_id) VALUES ($1, $2, $3, $4) RETURNING {}",
            TEACHER_COLUMNS
        );

        sqlx::query_as::<_, Teacher>(&sql)
            .bind(&teacher.full_name)
            .bind(&teacher.nip)
            .bind(&teacher.password_hash)
            .bind(teacher.school_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_or_internal(e, &format!("NIP '{}'", teacher.nip)))
    }

    async fn find_teacher(&self, id: i64) -> Result<Option<Teacher>, AppError> {
        let sql = format!("SELECT {} FROM guru WHERE id = $1", TEACHER_COLUMNS);
        let teacher = sqlx::query_as::<_, Teacher>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(teacher)
    }

    async fn find_teacher_by_nip(&self, nip: &str) -> Result<Option<Teacher>, AppError> {
        let sql = format!("SELECT {} FROM guru WHERE nip = $1", TEACHER_COLUMNS);
        let teacher = sqlx::query_as::<_, Teacher>(&sql)
            .bind(nip)
            .fetch_optional(&self.pool)
            .await?;

        Ok(teacher)
    }

    /// Reads chapters, topics, attempts and questions in one read-only
    /// repeatable-read transaction.
    async fn load_class_snapshot(
        &self,
        class_id: i64,
        student_id: i64,
    ) -> Result<ClassSnapshot, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let chapters = sqlx::query_as::<_, Chapter>(
            "SELECT id, kelas_id, nomor, judul FROM bab WHERE kelas_id = $1 ORDER BY id",
        )
        .bind(class_id)
        .fetch_all(&mut *tx)
        .await?;

        let chapter_ids: Vec<i64> = chapters.iter().map(|c| c.id).collect();
        let topics = sqlx::query_as::<_, Topic>(
            "SELECT id, bab_id, kode, judul FROM topik WHERE bab_id = ANY($1)",
        )
        .bind(&chapter_ids)
        .fetch_all(&mut *tx)
        .await?;

        let topic_ids: Vec<i64> = topics.iter().map(|t| t.id).collect();
        let attempts_sql = format!(
            "SELECT {} FROM nilai_quiz WHERE peserta_didik_id = $1 AND topik_id = ANY($2) \
             ORDER BY tanggal_selesai DESC, id DESC",
            ATTEMPT_COLUMNS
        );
        let attempts = sqlx::query_as::<_, Attempt>(&attempts_sql)
            .bind(student_id)
            .bind(&topic_ids)
            .fetch_all(&mut *tx)
            .await?;

        let questions = sqlx::query_as::<_, QuizQuestion>(
            "SELECT id, topik_id, pertanyaan, pilihan, jawaban FROM quiz WHERE topik_id = ANY($1) ORDER BY id",
        )
        .bind(&topic_ids)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ClassSnapshot {
            chapters,
            topics,
            attempts,
            questions,
        })
    }

    async fn insert_attempt(&self, attempt: NewAttempt) -> Result<Attempt, AppError> {
        let sql = format!(
            "INSERT INTO nilai_quiz (peserta_didik_id, topik_id, hasil_quiz, tanggal_selesai) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            ATTEMPT_COLUMNS
        );

        let stored = sqlx::query_as::<_, Attempt>(&sql)
            .bind(attempt.student_id)
            .bind(attempt.topic_id)
            .bind(&attempt.answers)
            .bind(attempt.completed_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert quiz attempt: {:?}", e);
                AppError::from(e)
            })?;

        Ok(stored)
    }

    async fn delete_attempts_for_student(&self, student_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM nilai_quiz WHERE peserta_didik_id = $1")
            .bind(student_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
