// src/models/report.rs

use serde::Serialize;

use crate::progress::report::{ChapterGrade, CourseSummary};

/// Student identity block of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportStudent {
    pub name: String,
    pub nisn: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ReportSchool {
    pub name: Option<String>,
    pub address: Option<String>,
    pub semester: Option<String>,
    pub academic_year: Option<String>,
}

/// Signature block. Only affects rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTeacher {
    pub name: String,
    pub nip: String,
}

/// Full progress report of one student, consumed by the JSON endpoint and the
/// printable renderer. Carries no timestamp so repeated builds compare equal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    pub student: ReportStudent,
    pub class_name: Option<String>,
    pub school: ReportSchool,
    pub teacher: Option<ReportTeacher>,
    pub chapters: Vec<ChapterGrade>,
    pub summary: CourseSummary,
}
