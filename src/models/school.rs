// src/models/school.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'sekolah' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct School {
    pub id: i64,

    #[sqlx(rename = "nama")]
    pub name: String,

    #[sqlx(rename = "alamat")]
    pub address: Option<String>,

    /// 'ganjil' (odd) or 'genap' (even).
    pub semester: Option<String>,

    /// e.g. "2025/2026".
    #[sqlx(rename = "tahun_ajaran")]
    pub academic_year: Option<String>,
}

/// Represents the 'kelas' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ClassRoom {
    pub id: i64,

    #[sqlx(rename = "sekolah_id")]
    pub school_id: i64,

    #[sqlx(rename = "nama")]
    pub name: String,
}
