// src/progress/best_attempt.rs

use std::collections::HashMap;

use crate::models::attempt::Attempt;

use super::score::{AnswerKey, score_attempt};

/// The highest-scoring attempt of one student on one topic.
#[derive(Debug, Clone, Copy)]
pub struct BestAttempt<'a> {
    pub attempt: &'a Attempt,
    /// `None` when no attempt on the topic could be scored.
    pub score: Option<u8>,
}

/// Folds scored items down to the best one.
///
/// The first item seeds the result even when unscored. Afterwards an item only
/// replaces the current best when its score is strictly greater, so ties keep
/// the earliest item and an unscored item never displaces anything.
pub fn select_best<T, I>(scored: I) -> Option<(T, Option<u8>)>
where
    I: IntoIterator<Item = (T, Option<u8>)>,
{
    scored.into_iter().fold(None, |best, (item, score)| match best {
        None => Some((item, score)),
        // `None < Some(_)` for Option, which is exactly the replacement rule.
        Some((_, current)) if score > current => Some((item, score)),
        keep => keep,
    })
}

pub fn best_attempt<'a, I>(attempts: I, key: &AnswerKey) -> Option<BestAttempt<'a>>
where
    I: IntoIterator<Item = &'a Attempt>,
{
    select_best(attempts.into_iter().map(|a| (a, score_attempt(a, key))))
        .map(|(attempt, score)| BestAttempt { attempt, score })
}

/// Best attempt for every topic that has at least one attempt.
///
/// Attempts keep their supplied order within a topic, which decides ties.
pub fn best_attempts_by_topic<'a>(
    attempts: &'a [Attempt],
    keys: &HashMap<i64, AnswerKey>,
) -> HashMap<i64, BestAttempt<'a>> {
    let mut by_topic: HashMap<i64, Vec<&'a Attempt>> = HashMap::new();
    for attempt in attempts {
        by_topic.entry(attempt.topic_id).or_default().push(attempt);
    }

    let empty = AnswerKey::default();
    by_topic
        .into_iter()
        .filter_map(|(topic_id, list)| {
            let key = keys.get(&topic_id).unwrap_or(&empty);
            best_attempt(list, key).map(|best| (topic_id, best))
        })
        .collect()
}
