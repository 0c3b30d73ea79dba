// src/handlers/teacher.rs

//! Endpoints for teachers (role `guru`). A teacher only sees students of
//! classes that belong to their own school.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::{Html, IntoResponse},
};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::{student::RosterParams, teacher::Teacher},
    render::render_report_html,
    services::ProgressService,
    store::DynStore,
    utils::jwt::Claims,
};

const DEFAULT_ROSTER_LIMIT: i64 = 20;

async fn current_teacher(store: &DynStore, claims: &Claims) -> Result<Teacher, AppError> {
    store
        .find_teacher(claims.subject_id()?)
        .await?
        .ok_or(AppError::AuthError("Guru no longer exists".to_string()))
}

/// 404 for an unknown class, 403 for a class of another school.
async fn ensure_class_in_school(
    store: &DynStore,
    teacher: &Teacher,
    class_id: i64,
) -> Result<(), AppError> {
    let class = store
        .find_class(class_id)
        .await?
        .ok_or(AppError::NotFound("Kelas not found".to_string()))?;

    if class.school_id != teacher.school_id {
        return Err(AppError::Forbidden(
            "Kelas belongs to another sekolah".to_string(),
        ));
    }
    Ok(())
}

async fn ensure_student_in_school(
    store: &DynStore,
    teacher: &Teacher,
    student_id: i64,
) -> Result<(), AppError> {
    let student = store
        .find_student(student_id)
        .await?
        .ok_or(AppError::NotFound("Peserta didik not found".to_string()))?;

    ensure_class_in_school(store, teacher, student.class_id).await
}

/// Paginated roster of one class.
pub async fn list_class_students(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    Path(class_id): Path<i64>,
    Query(params): Query<RosterParams>,
) -> Result<impl IntoResponse, AppError> {
    params.validate()?;

    let teacher = current_teacher(&store, &claims).await?;
    ensure_class_in_school(&store, &teacher, class_id).await?;

    let limit = params.limit.unwrap_or(DEFAULT_ROSTER_LIMIT);
    let offset = params.offset.unwrap_or(0);
    let students = store.list_students_by_class(class_id, limit, offset).await?;

    Ok(Json(json!({
        "data": students,
        "limit": limit,
        "offset": offset
    })))
}

/// Best attempt per topic, grouped by chapter.
pub async fn student_grades(
    State(store): State<DynStore>,
    State(progress): State<ProgressService>,
    Extension(claims): Extension<Claims>,
    Path(student_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let teacher = current_teacher(&store, &claims).await?;
    ensure_student_in_school(&store, &teacher, student_id).await?;

    let chapters = progress.grades(student_id).await?;
    Ok(Json(chapters))
}

/// Deletes every attempt of the student.
pub async fn reset_student_grades(
    State(store): State<DynStore>,
    State(progress): State<ProgressService>,
    Extension(claims): Extension<Claims>,
    Path(student_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let teacher = current_teacher(&store, &claims).await?;
    ensure_student_in_school(&store, &teacher, student_id).await?;

    let deleted = progress.reset_progress(student_id).await?;
    tracing::info!(teacher_id = teacher.id, student_id, deleted, "Guru reset nilai");

    Ok(Json(json!({
        "message": "Nilai reset",
        "deleted": deleted
    })))
}

pub async fn student_report(
    State(store): State<DynStore>,
    State(progress): State<ProgressService>,
    Extension(claims): Extension<Claims>,
    Path(student_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let teacher = current_teacher(&store, &claims).await?;
    ensure_student_in_school(&store, &teacher, student_id).await?;

    let report = progress.build_report(student_id, Some(teacher.id)).await?;
    Ok(Json(report))
}

/// Printable HTML of the same report, dated today.
pub async fn print_student_report(
    State(store): State<DynStore>,
    State(progress): State<ProgressService>,
    Extension(claims): Extension<Claims>,
    Path(student_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let teacher = current_teacher(&store, &claims).await?;
    ensure_student_in_school(&store, &teacher, student_id).await?;

    let report = progress.build_report(student_id, Some(teacher.id)).await?;
    let today = chrono::Local::now().date_naive();

    Ok(Html(render_report_html(&report, today)?))
}
