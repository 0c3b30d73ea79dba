// src/progress/unlock.rs

use std::{
    collections::{HashMap, HashSet},
    ops::ControlFlow,
};

use serde::Serialize;

use crate::models::syllabus::{Chapter, Topic};

/// One chapter with its topics in code order.
#[derive(Debug, Clone)]
pub struct ChapterOutline<'a> {
    pub chapter: &'a Chapter,
    pub topics: Vec<&'a Topic>,
}

/// Chapters of a class ordered by id, each with topics ordered by code.
#[derive(Debug, Clone)]
pub struct Syllabus<'a> {
    chapters: Vec<ChapterOutline<'a>>,
}

/// Result of checking a single topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicAccess {
    Unlocked,
    Locked,
    /// The topic does not belong to any chapter of the syllabus.
    NotFound,
}

/// Chapter annotated with unlock state, as shown to the student.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterProgress {
    pub id: i64,
    pub number: String,
    pub title: String,
    pub unlocked: bool,
    pub topics: Vec<TopicProgress>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicProgress {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub unlocked: bool,
    /// At least one attempt exists.
    pub completed: bool,
}

impl<'a> Syllabus<'a> {
    /// Orders the inputs. Topics whose chapter is not in `chapters` are dropped.
    pub fn new(chapters: &'a [Chapter], topics: &'a [Topic]) -> Self {
        let mut ordered: Vec<&Chapter> = chapters.iter().collect();
        ordered.sort_by_key(|c| c.id);

        let mut by_chapter: HashMap<i64, Vec<&Topic>> = HashMap::new();
        for topic in topics {
            by_chapter.entry(topic.chapter_id).or_default().push(topic);
        }

        let chapters = ordered
            .into_iter()
            .map(|chapter| {
                let mut topics = by_chapter.remove(&chapter.id).unwrap_or_default();
                topics.sort_by(|a, b| a.code.cmp(&b.code));
                ChapterOutline { chapter, topics }
            })
            .collect();

        Self { chapters }
    }

    pub fn chapters(&self) -> &[ChapterOutline<'a>] {
        &self.chapters
    }

    pub fn topics(&self) -> impl Iterator<Item = &'a Topic> + '_ {
        self.chapters.iter().flat_map(|c| c.topics.iter().copied())
    }

    /// The first chapter is always open. Any later chapter opens once every
    /// topic of the chapter right before it has been completed, which is
    /// vacuously true for an empty chapter.
    pub fn chapter_unlocked(&self, index: usize, completed: &HashSet<i64>) -> bool {
        match index.checked_sub(1) {
            None => true,
            Some(prev) => self.chapters[prev]
                .topics
                .iter()
                .all(|t| completed.contains(&t.id)),
        }
    }

    /// Visits every topic in order with its unlock flag, stopping early when
    /// `visit` breaks.
    fn walk<B, F>(&self, completed: &HashSet<i64>, mut visit: F) -> ControlFlow<B>
    where
        F: FnMut(&'a Topic, bool) -> ControlFlow<B>,
    {
        for (index, outline) in self.chapters.iter().enumerate() {
            let chapter_open = self.chapter_unlocked(index, completed);

            for (position, topic) in outline.topics.iter().copied().enumerate() {
                let unlocked = chapter_open
                    && match position.checked_sub(1) {
                        None => true,
                        Some(prev) => completed.contains(&outline.topics[prev].id),
                    };

                if let ControlFlow::Break(b) = visit(topic, unlocked) {
                    return ControlFlow::Break(b);
                }
            }
        }
        ControlFlow::Continue(())
    }

    /// Unlock flag of every topic.
    pub fn unlock_map(&self, completed: &HashSet<i64>) -> HashMap<i64, bool> {
        let mut map = HashMap::new();
        let _ = self.walk::<(), _>(completed, |topic, unlocked| {
            map.insert(topic.id, unlocked);
            ControlFlow::Continue(())
        });
        map
    }

    /// Unlock state of one topic, stopping as soon as it is reached.
    pub fn topic_access(&self, completed: &HashSet<i64>, topic_id: i64) -> TopicAccess {
        let found = self.walk(completed, |topic, unlocked| {
            if topic.id == topic_id {
                ControlFlow::Break(unlocked)
            } else {
                ControlFlow::Continue(())
            }
        });

        match found {
            ControlFlow::Break(true) => TopicAccess::Unlocked,
            ControlFlow::Break(false) => TopicAccess::Locked,
            ControlFlow::Continue(()) => TopicAccess::NotFound,
        }
    }

    /// Builds the student-facing view. Source records are left untouched.
    pub fn annotate(&self, completed: &HashSet<i64>) -> Vec<ChapterProgress> {
        let unlocks = self.unlock_map(completed);

        self.chapters
            .iter()
            .enumerate()
            .map(|(index, outline)| ChapterProgress {
                id: outline.chapter.id,
                number: outline.chapter.number.clone(),
                title: outline.chapter.title.clone(),
                unlocked: self.chapter_unlocked(index, completed),
                topics: outline
                    .topics
                    .iter()
                    .map(|t| TopicProgress {
                        id: t.id,
                        code: t.code.clone(),
                        title: t.title.clone(),
                        unlocked: unlocks.get(&t.id).copied().unwrap_or(false),
                        completed: completed.contains(&t.id),
                    })
                    .collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(id: i64) -> Chapter {
        Chapter {
            id,
            class_id: 1,
            number: id.to_string(),
            title: format!("Chapter {}", id),
        }
    }

    fn topic(id: i64, chapter_id: i64, code: &str) -> Topic {
        Topic {
            id,
            chapter_id,
            code: code.to_string(),
            title: format!("Topic {}", code),
        }
    }

    /// Chapter 1: [A=11, B=12], chapter 2: [A=21]. Deliberately shuffled.
    fn two_chapters() -> (Vec<Chapter>, Vec<Topic>) {
        (
            vec![chapter(2), chapter(1)],
            vec![topic(21, 2, "A"), topic(12, 1, "B"), topic(11, 1, "A")],
        )
    }

    fn done(ids: &[i64]) -> HashSet<i64> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_sequential_unlock_scenario() {
        let (chapters, topics) = two_chapters();
        let syllabus = Syllabus::new(&chapters, &topics);

        let map = syllabus.unlock_map(&done(&[]));
        assert!(map[&11]);
        assert!(!map[&12]);
        assert!(!map[&21]);

        let map = syllabus.unlock_map(&done(&[11]));
        assert!(map[&12]);
        assert!(!map[&21]);

        let map = syllabus.unlock_map(&done(&[11, 12]));
        assert!(map[&21]);
    }

    #[test]
    fn test_orders_chapters_by_id_and_topics_by_code() {
        let (chapters, topics) = two_chapters();
        let syllabus = Syllabus::new(&chapters, &topics);
        let ids: Vec<i64> = syllabus.topics().map(|t| t.id).collect();
        assert_eq!(ids, vec![11, 12, 21]);
    }

    #[test]
    fn test_empty_chapter_does_not_block() {
        let chapters = vec![chapter(1), chapter(2), chapter(3)];
        let topics = vec![topic(11, 1, "A"), topic(31, 3, "A")];
        let syllabus = Syllabus::new(&chapters, &topics);

        // The empty chapter itself waits for chapter 1...
        assert!(!syllabus.chapter_unlocked(1, &done(&[])));
        assert!(syllabus.chapter_unlocked(1, &done(&[11])));
        // ...but counts as complete for the chapter after it.
        assert!(syllabus.chapter_unlocked(2, &done(&[])));
        assert_eq!(syllabus.topic_access(&done(&[11]), 31), TopicAccess::Unlocked);
    }

    #[test]
    fn test_locked_chapter_locks_every_topic() {
        let (chapters, topics) = two_chapters();
        let mut topics = topics;
        topics.push(topic(22, 2, "B"));
        let syllabus = Syllabus::new(&chapters, &topics);

        // 21 completed but chapter 2 still closed: 22 stays locked.
        let map = syllabus.unlock_map(&done(&[11, 21]));
        assert!(!map[&21]);
        assert!(!map[&22]);
    }

    #[test]
    fn test_topic_access_matches_full_map() {
        let (chapters, topics) = two_chapters();
        let syllabus = Syllabus::new(&chapters, &topics);

        for completed in [done(&[]), done(&[11]), done(&[11, 12]), done(&[12])] {
            let map = syllabus.unlock_map(&completed);
            for (id, unlocked) in map {
                let expected = if unlocked {
                    TopicAccess::Unlocked
                } else {
                    TopicAccess::Locked
                };
                assert_eq!(syllabus.topic_access(&completed, id), expected);
            }
        }
    }

    #[test]
    fn test_unknown_topic_not_found() {
        let (chapters, topics) = two_chapters();
        let syllabus = Syllabus::new(&chapters, &topics);
        assert_eq!(syllabus.topic_access(&done(&[]), 999), TopicAccess::NotFound);
    }

    #[test]
    fn test_completion_never_relocks() {
        let (chapters, topics) = two_chapters();
        let syllabus = Syllabus::new(&chapters, &topics);

        let before = syllabus.unlock_map(&done(&[11]));
        let after = syllabus.unlock_map(&done(&[11, 12]));
        for (id, unlocked) in before {
            assert!(!unlocked || after[&id]);
        }
    }

    #[test]
    fn test_annotate_view() {
        let (chapters, topics) = two_chapters();
        let syllabus = Syllabus::new(&chapters, &topics);
        let view = syllabus.annotate(&done(&[11]));

        assert_eq!(view.len(), 2);
        assert!(view[0].unlocked);
        assert!(!view[1].unlocked);
        assert_eq!(view[0].topics[0].code, "A");
        assert!(view[0].topics[0].completed);
        assert!(view[0].topics[1].unlocked);
        assert!(!view[0].topics[1].completed);
    }

    #[test]
    fn test_no_chapters() {
        let syllabus = Syllabus::new(&[], &[]);
        assert!(syllabus.unlock_map(&done(&[])).is_empty());
        assert!(syllabus.annotate(&done(&[])).is_empty());
    }
}
