// src/progress/grading.rs

use serde::Serialize;

/// Score bands shared by every predicate in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    A,
    B,
    C,
    D,
}

/// Letter predicate of a topic or chapter score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Predicate {
    A,
    B,
    C,
    D,
    #[serde(rename = "-")]
    Ungraded,
}

impl Predicate {
    pub fn as_str(self) -> &'static str {
        match self {
            Predicate::A => "A",
            Predicate::B => "B",
            Predicate::C => "C",
            Predicate::D => "D",
            Predicate::Ungraded => "-",
        }
    }
}

/// Course-wide predicate, derived from the mean of all scored topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverallPredicate {
    #[serde(rename = "SANGAT BAIK")]
    VeryGood,
    #[serde(rename = "BAIK")]
    Good,
    #[serde(rename = "CUKUP")]
    Fair,
    #[serde(rename = "PERLU BIMBINGAN")]
    NeedsGuidance,
    #[serde(rename = "BELUM DINILAI")]
    NotAssessed,
}

impl OverallPredicate {
    pub fn as_str(self) -> &'static str {
        match self {
            OverallPredicate::VeryGood => "SANGAT BAIK",
            OverallPredicate::Good => "BAIK",
            OverallPredicate::Fair => "CUKUP",
            OverallPredicate::NeedsGuidance => "PERLU BIMBINGAN",
            OverallPredicate::NotAssessed => "BELUM DINILAI",
        }
    }
}

/// Minimum scores for bands A, B and C. Anything below `c_min` is D.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradingScale {
    pub a_min: u8,
    pub b_min: u8,
    pub c_min: u8,
}

impl Default for GradingScale {
    fn default() -> Self {
        Self {
            a_min: 88,
            b_min: 75,
            c_min: 60,
        }
    }
}

impl GradingScale {
    /// Returns `None` unless `100 >= a_min > b_min > c_min`.
    pub fn new(a_min: u8, b_min: u8, c_min: u8) -> Option<Self> {
        (a_min <= 100 && a_min > b_min && b_min > c_min).then_some(Self {
            a_min,
            b_min,
            c_min,
        })
    }

    pub fn band(&self, score: u8) -> Band {
        self.band_of_mean(u64::from(score), 1)
    }

    /// Band of the exact mean `sum / count`, compared without rounding.
    /// `count` must be non-zero.
    pub fn band_of_mean(&self, sum: u64, count: u64) -> Band {
        let reaches = |min: u8| sum >= u64::from(min) * count;
        if reaches(self.a_min) {
            Band::A
        } else if reaches(self.b_min) {
            Band::B
        } else if reaches(self.c_min) {
            Band::C
        } else {
            Band::D
        }
    }

    pub fn predicate(&self, score: Option<u8>) -> Predicate {
        match score.map(|s| self.band(s)) {
            None => Predicate::Ungraded,
            Some(Band::A) => Predicate::A,
            Some(Band::B) => Predicate::B,
            Some(Band::C) => Predicate::C,
            Some(Band::D) => Predicate::D,
        }
    }

    /// Overall predicate from the scores collected so far.
    pub fn overall<I>(&self, scores: I) -> OverallPredicate
    where
        I: IntoIterator<Item = u8>,
    {
        let (sum, count) = scores
            .into_iter()
            .fold((0u64, 0u64), |(sum, count), s| (sum + u64::from(s), count + 1));

        if count == 0 {
            return OverallPredicate::NotAssessed;
        }

        match self.band_of_mean(sum, count) {
            Band::A => OverallPredicate::VeryGood,
            Band::B => OverallPredicate::Good,
            Band::C => OverallPredicate::Fair,
            Band::D => OverallPredicate::NeedsGuidance,
        }
    }
}
