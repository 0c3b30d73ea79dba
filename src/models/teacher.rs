// src/models/teacher.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'guru' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Teacher {
    pub id: i64,

    #[sqlx(rename = "nama_lengkap")]
    pub full_name: String,

    /// Civil servant number, unique across the system.
    pub nip: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    #[sqlx(rename = "sekolah_id")]
    pub school_id: i64,
}

/// DTO for teacher login.
#[derive(Debug, Deserialize, Validate)]
pub struct TeacherLoginRequest {
    #[validate(length(min = 1, max = 30))]
    pub nip: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
    #[validate(range(min = 1))]
    pub sekolah_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewTeacher {
    pub full_name: String,
    pub nip: String,
    pub password_hash: String,
    pub school_id: i64,
}
