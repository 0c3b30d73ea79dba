// src/models/student.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'peserta_didik' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,

    #[sqlx(rename = "nama_lengkap")]
    pub full_name: String,

    /// National student number, unique across the system.
    pub nisn: String,

    #[sqlx(rename = "kelas_id")]
    pub class_id: i64,
}

/// DTO for student self-registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterStudentRequest {
    #[validate(length(min = 1, max = 100, message = "Name must not be empty."))]
    pub nama: String,
    #[validate(length(min = 1, max = 20, message = "NISN must not be empty."))]
    pub nisn: String,
    #[validate(range(min = 1, message = "Class id must be positive."))]
    pub kelas_id: i64,
}

/// DTO for student login. Students authenticate with their NISN only.
#[derive(Debug, Deserialize, Validate)]
pub struct StudentLoginRequest {
    #[validate(length(min = 1, max = 20))]
    pub nisn: String,
}

/// Insert payload handed to the store.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub full_name: String,
    pub nisn: String,
    pub class_id: i64,
}

/// Pagination for the class roster.
#[derive(Debug, Deserialize, Validate)]
pub struct RosterParams {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
    #[validate(range(min = 0))]
    pub offset: Option<i64>,
}
