// src/progress/report.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::syllabus::Topic;

use super::{
    best_attempt::BestAttempt,
    grading::{GradingScale, OverallPredicate, Predicate},
    score::rounded_div,
    unlock::Syllabus,
};

/// Completion state of a chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChapterStatus {
    #[serde(rename = "LULUS")]
    Passed,
    #[serde(rename = "PROSES")]
    InProgress,
    #[serde(rename = "-")]
    NotStarted,
}

impl ChapterStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ChapterStatus::Passed => "LULUS",
            ChapterStatus::InProgress => "PROSES",
            ChapterStatus::NotStarted => "-",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptSummary {
    pub id: i64,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicGrade {
    pub topic_id: i64,
    pub code: String,
    pub title: String,
    pub best_score: Option<u8>,
    pub predicate: Predicate,
    pub best_attempt: Option<AttemptSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterGrade {
    pub chapter_id: i64,
    pub number: String,
    pub title: String,
    pub average_score: Option<u8>,
    pub status: ChapterStatus,
    pub predicate: Predicate,
    pub topics: Vec<TopicGrade>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseSummary {
    pub progress_percent: u8,
    pub stars_collected: usize,
    pub stars_total: usize,
    pub overall_predicate: OverallPredicate,
}

impl Default for CourseSummary {
    fn default() -> Self {
        Self {
            progress_percent: 0,
            stars_collected: 0,
            stars_total: 0,
            overall_predicate: OverallPredicate::NotAssessed,
        }
    }
}

/// Rounded mean of the scored topics, `None` if nothing is scored.
pub fn average_score(scores: &[Option<u8>]) -> Option<u8> {
    let scored: Vec<u64> = scores.iter().flatten().map(|&s| u64::from(s)).collect();
    if scored.is_empty() {
        return None;
    }
    u8::try_from(rounded_div(scored.iter().sum(), scored.len() as u64)).ok()
}

/// `Passed` when every topic is scored (vacuously so for an empty chapter),
/// `InProgress` when only some are, `NotStarted` when none are.
pub fn chapter_status(scores: &[Option<u8>]) -> ChapterStatus {
    if scores.iter().all(Option::is_some) {
        ChapterStatus::Passed
    } else if scores.iter().any(Option::is_some) {
        ChapterStatus::InProgress
    } else {
        ChapterStatus::NotStarted
    }
}

fn grade_topic(topic: &Topic, best: Option<&BestAttempt<'_>>, scale: &GradingScale) -> TopicGrade {
    let best_score = best.and_then(|b| b.score);
    TopicGrade {
        topic_id: topic.id,
        code: topic.code.clone(),
        title: topic.title.clone(),
        best_score,
        predicate: scale.predicate(best_score),
        best_attempt: best.map(|b| AttemptSummary {
            id: b.attempt.id,
            completed_at: b.attempt.completed_at,
        }),
    }
}

/// Grades every chapter of the syllabus from the best attempt per topic.
pub fn grade_chapters(
    syllabus: &Syllabus<'_>,
    best: &HashMap<i64, BestAttempt<'_>>,
    scale: &GradingScale,
) -> Vec<ChapterGrade> {
    syllabus
        .chapters()
        .iter()
        .map(|outline| {
            let topics: Vec<TopicGrade> = outline
                .topics
                .iter()
                .map(|t| grade_topic(t, best.get(&t.id), scale))
                .collect();
            let scores: Vec<Option<u8>> = topics.iter().map(|t| t.best_score).collect();
            let average = average_score(&scores);

            ChapterGrade {
                chapter_id: outline.chapter.id,
                number: outline.chapter.number.clone(),
                title: outline.chapter.title.clone(),
                average_score: average,
                status: chapter_status(&scores),
                predicate: scale.predicate(average),
                topics,
            }
        })
        .collect()
}

/// Course-level figures. The overall predicate is taken from the mean of all
/// topic scores, not from chapter averages.
pub fn summarize(chapters: &[ChapterGrade], scale: &GradingScale) -> CourseSummary {
    let scores: Vec<u8> = chapters
        .iter()
        .flat_map(|c| c.topics.iter())
        .filter_map(|t| t.best_score)
        .collect();
    let total = chapters.iter().map(|c| c.topics.len()).sum::<usize>();

    let progress_percent = match total {
        0 => 0,
        _ => rounded_div(100 * scores.len() as u64, total as u64) as u8,
    };

    CourseSummary {
        progress_percent,
        stars_collected: scores.len(),
        stars_total: total,
        overall_predicate: scale.overall(scores.iter().copied()),
    }
}
