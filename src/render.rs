// src/render.rs

//! Printable rendering of a `ProgressReport` as a standalone HTML page.
//!
//! The layout lives in `templates/laporan.html`; askama escapes every
//! interpolated value.

use askama::Template;
use chrono::{Datelike, NaiveDate};

use crate::{
    error::AppError,
    models::report::{ProgressReport, ReportTeacher},
    progress::{
        grading::OverallPredicate,
        report::{ChapterGrade, ChapterStatus, TopicGrade},
    },
};

const MONTHS: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni", "Juli", "Agustus", "September",
    "Oktober", "November", "Desember",
];

/// Long Indonesian date, e.g. "17 Oktober 2026".
pub fn format_date(date: NaiveDate) -> String {
    format!("{} {} {}", date.day(), MONTHS[date.month0() as usize], date.year())
}

fn score_text(score: Option<u8>) -> String {
    score.map_or_else(|| "-".to_string(), |s| s.to_string())
}

fn status_class(status: ChapterStatus) -> &'static str {
    match status {
        ChapterStatus::Passed => "passed",
        ChapterStatus::InProgress => "progress",
        ChapterStatus::NotStarted => "idle",
    }
}

fn predicate_class(predicate: OverallPredicate) -> &'static str {
    match predicate {
        OverallPredicate::VeryGood => "very-good",
        OverallPredicate::Good => "good",
        OverallPredicate::Fair => "fair",
        OverallPredicate::NeedsGuidance | OverallPredicate::NotAssessed => "low",
    }
}

struct TopicRow<'a> {
    code: &'a str,
    title: &'a str,
    score: String,
    predicate: &'static str,
}

impl<'a> From<&'a TopicGrade> for TopicRow<'a> {
    fn from(topic: &'a TopicGrade) -> Self {
        Self {
            code: &topic.code,
            title: &topic.title,
            score: score_text(topic.best_score),
            predicate: topic.predicate.as_str(),
        }
    }
}

struct ChapterRow<'a> {
    number: &'a str,
    title: String,
    status: &'static str,
    status_class: &'static str,
    score: String,
    predicate: &'static str,
    topics: Vec<TopicRow<'a>>,
}

impl<'a> From<&'a ChapterGrade> for ChapterRow<'a> {
    fn from(chapter: &'a ChapterGrade) -> Self {
        Self {
            number: &chapter.number,
            title: chapter.title.to_uppercase(),
            status: chapter.status.as_str(),
            status_class: status_class(chapter.status),
            score: score_text(chapter.average_score),
            predicate: chapter.predicate.as_str(),
            topics: chapter.topics.iter().map(TopicRow::from).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "laporan.html")]
struct ReportPage<'a> {
    student_name: &'a str,
    nisn: &'a str,
    class_name: &'a str,
    class_label: &'a str,
    school_name: &'a str,
    address: &'a str,
    semester: &'static str,
    academic_year: &'a str,
    printed: String,
    progress_percent: u8,
    stars_collected: usize,
    stars_total: usize,
    overall_predicate: &'static str,
    predicate_class: &'static str,
    chapters: Vec<ChapterRow<'a>>,
    teacher: Option<&'a ReportTeacher>,
}

impl<'a> ReportPage<'a> {
    fn new(report: &'a ProgressReport, printed_on: NaiveDate) -> Self {
        let school = &report.school;
        let summary = &report.summary;

        Self {
            student_name: &report.student.name,
            nisn: &report.student.nisn,
            class_name: report.class_name.as_deref().unwrap_or("-"),
            class_label: report.class_name.as_deref().unwrap_or(""),
            school_name: school.name.as_deref().unwrap_or("SD NEGERI"),
            address: school.address.as_deref().unwrap_or("-"),
            semester: match school.semester.as_deref() {
                Some("genap") => "Genap",
                _ => "Ganjil",
            },
            academic_year: school.academic_year.as_deref().unwrap_or("-"),
            printed: format_date(printed_on),
            progress_percent: summary.progress_percent,
            stars_collected: summary.stars_collected,
            stars_total: summary.stars_total,
            overall_predicate: summary.overall_predicate.as_str(),
            predicate_class: predicate_class(summary.overall_predicate),
            chapters: report.chapters.iter().map(ChapterRow::from).collect(),
            teacher: report.teacher.as_ref(),
        }
    }
}

/// Renders the report. `printed_on` fills the print date and signature date.
pub fn render_report_html(report: &ProgressReport, printed_on: NaiveDate) -> Result<String, AppError> {
    ReportPage::new(report, printed_on).render().map_err(|e| {
        tracing::error!("Failed to render laporan: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })
}
