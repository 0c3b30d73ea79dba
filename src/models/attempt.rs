// src/models/attempt.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Represents the 'nilai_quiz' table. Attempts are append-only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Attempt {
    pub id: i64,

    #[sqlx(rename = "peserta_didik_id")]
    pub student_id: i64,

    #[sqlx(rename = "topik_id")]
    pub topic_id: i64,

    /// Raw JSON array of `SubmittedAnswer`, parsed lazily when scoring.
    #[sqlx(rename = "hasil_quiz")]
    #[serde(skip)]
    pub answers: String,

    #[sqlx(rename = "tanggal_selesai")]
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAttempt {
    pub student_id: i64,
    pub topic_id: i64,
    pub answers: String,
    pub completed_at: DateTime<Utc>,
}

/// Response body after a successful submission.
#[derive(Debug, Serialize)]
pub struct SubmitQuizResponse {
    pub message: String,
    pub attempt_id: i64,
    pub nilai: Option<u8>,
}
