// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::{
        student::{NewStudent, RegisterStudentRequest, StudentLoginRequest},
        teacher::TeacherLoginRequest,
    },
    store::DynStore,
    utils::{
        hash::verify_password,
        jwt::{ROLE_STUDENT, ROLE_TEACHER, sign_jwt},
    },
};

/// Registers a new student into an existing class.
///
/// Returns 201 Created with the stored student.
pub async fn register_student(
    State(store): State<DynStore>,
    Json(payload): Json<RegisterStudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let nama = payload.nama.trim();
    let nisn = payload.nisn.trim();
    if nama.is_empty() || nisn.is_empty() {
        return Err(AppError::BadRequest(
            "Nama and NISN must not be blank".to_string(),
        ));
    }

    if store.find_class(payload.kelas_id).await?.is_none() {
        return Err(AppError::NotFound("Kelas not found".to_string()));
    }

    let student = store
        .create_student(NewStudent {
            full_name: nama.to_string(),
            nisn: nisn.to_string(),
            class_id: payload.kelas_id,
        })
        .await?;

    tracing::info!(student_id = student.id, "Peserta didik registered");

    Ok((StatusCode::CREATED, Json(student)))
}

/// Students log in with their NISN alone.
pub async fn login_student(
    State(store): State<DynStore>,
    State(config): State<Config>,
    Json(payload): Json<StudentLoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let student = store
        .find_student_by_nisn(payload.nisn.trim())
        .await?
        .ok_or(AppError::AuthError("NISN not registered".to_string()))?;

    let token = sign_jwt(
        student.id,
        ROLE_STUDENT,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(Json(json!({
        "token": token,
        "peserta_didik": student
    })))
}

/// Authenticates a teacher against NIP, password and school.
pub async fn login_teacher(
    State(store): State<DynStore>,
    State(config): State<Config>,
    Json(payload): Json<TeacherLoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let teacher = store
        .find_teacher_by_nip(payload.nip.trim())
        .await?
        .ok_or(AppError::AuthError("Invalid NIP or password".to_string()))?;

    if !verify_password(&payload.password, &teacher.password)? {
        return Err(AppError::AuthError("Invalid NIP or password".to_string()));
    }

    if teacher.school_id != payload.sekolah_id {
        return Err(AppError::AuthError(
            "Guru is not registered at this sekolah".to_string(),
        ));
    }

    let token = sign_jwt(
        teacher.id,
        ROLE_TEACHER,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(Json(json!({
        "token": token,
        "guru": teacher
    })))
}
