// src/handlers/student.rs

//! Endpoints for the logged-in student (role `peserta_didik`).

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{attempt::SubmitQuizResponse, quiz::SubmitQuizRequest},
    services::ProgressService,
    utils::jwt::Claims,
};

/// Chapters of the caller's class with unlock and completion flags.
pub async fn list_syllabus(
    State(progress): State<ProgressService>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let chapters = progress.unlocked_syllabus(claims.subject_id()?).await?;
    Ok(Json(chapters))
}

/// Questions of one topic. 403 while the topic is still locked.
pub async fn get_quiz(
    State(progress): State<ProgressService>,
    Extension(claims): Extension<Claims>,
    Path(topic_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let questions = progress
        .quiz_for_topic(claims.subject_id()?, topic_id)
        .await?;
    Ok(Json(questions))
}

/// Records one attempt and returns its score.
pub async fn submit_quiz(
    State(progress): State<ProgressService>,
    Extension(claims): Extension<Claims>,
    Path(topic_id): Path<i64>,
    Json(payload): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let (attempt, score) = progress
        .submit_attempt(claims.subject_id()?, topic_id, payload.hasil_quiz)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitQuizResponse {
            message: "Quiz submitted".to_string(),
            attempt_id: attempt.id,
            nilai: score,
        }),
    ))
}

/// The caller's own progress report.
pub async fn my_report(
    State(progress): State<ProgressService>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let report = progress.build_report(claims.subject_id()?, None).await?;
    Ok(Json(report))
}
