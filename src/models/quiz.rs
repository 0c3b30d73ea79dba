// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

/// Represents the 'quiz' table: one question of a topic's quiz.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: i64,

    #[sqlx(rename = "topik_id")]
    pub topic_id: i64,

    #[sqlx(rename = "pertanyaan")]
    pub prompt: String,

    /// Stored as a JSON array in the database.
    #[sqlx(rename = "pilihan")]
    pub options: Json<Vec<String>>,

    /// The correct answer, compared case-sensitively.
    #[sqlx(rename = "jawaban")]
    pub answer: String,
}

/// DTO for sending a question to the student (excludes the answer).
#[derive(Debug, Serialize)]
pub struct PublicQuizQuestion {
    pub id: i64,
    pub topic_id: i64,
    pub prompt: String,
    pub options: Json<Vec<String>>,
}

impl From<QuizQuestion> for PublicQuizQuestion {
    fn from(q: QuizQuestion) -> Self {
        Self {
            id: q.id,
            topic_id: q.topic_id,
            prompt: q.prompt,
            options: q.options,
        }
    }
}

/// One submitted answer. This is also the stored shape of `nilai_quiz.hasil_quiz`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    pub quiz_id: i64,
    pub jawaban: String,
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitQuizRequest {
    #[validate(length(min = 1, message = "No answers submitted"))]
    pub hasil_quiz: Vec<SubmittedAnswer>,
}
