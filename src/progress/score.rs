// src/progress/score.rs

use std::collections::HashMap;

use crate::models::{
    attempt::Attempt,
    quiz::{QuizQuestion, SubmittedAnswer},
};

/// Correct answers of one topic's quiz, keyed by question id.
#[derive(Debug, Clone, Default)]
pub struct AnswerKey {
    answers: HashMap<i64, String>,
}

impl AnswerKey {
    pub fn from_questions<'a, I>(questions: I) -> Self
    where
        I: IntoIterator<Item = &'a QuizQuestion>,
    {
        Self {
            answers: questions
                .into_iter()
                .map(|q| (q.id, q.answer.clone()))
                .collect(),
        }
    }

    /// Strict, case-sensitive comparison. Unknown question ids never count.
    pub fn is_correct(&self, answer: &SubmittedAnswer) -> bool {
        self.answers
            .get(&answer.quiz_id)
            .is_some_and(|correct| *correct == answer.jawaban)
    }
}

/// Builds one answer key per topic.
pub fn answer_keys_by_topic(questions: &[QuizQuestion]) -> HashMap<i64, AnswerKey> {
    let mut grouped: HashMap<i64, Vec<&QuizQuestion>> = HashMap::new();
    for q in questions {
        grouped.entry(q.topic_id).or_default().push(q);
    }

    grouped
        .into_iter()
        .map(|(topic_id, qs)| (topic_id, AnswerKey::from_questions(qs)))
        .collect()
}

/// Integer division rounded half up. `denom` must be non-zero.
///
/// Every rounded score and average in the engine goes through this, so a
/// ratio of exactly .5 always lands on the higher integer.
pub fn rounded_div(numer: u64, denom: u64) -> u64 {
    debug_assert!(denom > 0);
    (2 * numer + denom) / (2 * denom)
}

/// Score 0..=100 of a list of answers, or `None` when nothing was submitted.
pub fn score_answers(answers: &[SubmittedAnswer], key: &AnswerKey) -> Option<u8> {
    if answers.is_empty() {
        return None;
    }

    let correct = answers.iter().filter(|a| key.is_correct(a)).count() as u64;
    let score = rounded_div(100 * correct, answers.len() as u64);

    // correct <= total, so score never exceeds 100.
    u8::try_from(score).ok()
}

pub fn parse_answers(raw: &str) -> Result<Vec<SubmittedAnswer>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Scores a stored attempt. An unreadable payload yields `None` instead of an error.
pub fn score_attempt(attempt: &Attempt, key: &AnswerKey) -> Option<u8> {
    match parse_answers(&attempt.answers) {
        Ok(answers) => score_answers(&answers, key),
        Err(e) => {
            tracing::warn!(
                attempt_id = attempt.id,
                "Ignoring malformed stored answers: {}",
                e
            );
            None
        }
    }
}
