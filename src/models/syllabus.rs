// src/models/syllabus.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'bab' table. Chapters of a class are ordered by id.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Chapter {
    pub id: i64,

    #[sqlx(rename = "kelas_id")]
    pub class_id: i64,

    /// Display number, e.g. "1" or "II".
    #[sqlx(rename = "nomor")]
    pub number: String,

    #[sqlx(rename = "judul")]
    pub title: String,
}

/// Represents the 'topik' table. Topics of a chapter are ordered by `code`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,

    #[sqlx(rename = "bab_id")]
    pub chapter_id: i64,

    /// Lexically sortable code, e.g. "A", "B".
    #[sqlx(rename = "kode")]
    pub code: String,

    #[sqlx(rename = "judul")]
    pub title: String,
}
