use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

pub const STAGE_COUNT: u8 = 3;
pub const QUESTIONS_PER_STAGE: u8 = 5;
pub const QUESTIONS_PER_QUIZ: usize = (STAGE_COUNT * QUESTIONS_PER_STAGE) as usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub stage: u8,
    pub question_id: u8,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub personalized_context: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    Interest,
    Technology,
    Blockchain,
    Location,
}

impl QuestionCategory {
    /// Canonical order; slot rotation indexes into this.
    pub const ALL: [QuestionCategory; 4] = [
        QuestionCategory::Interest,
        QuestionCategory::Technology,
        QuestionCategory::Blockchain,
        QuestionCategory::Location,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionCategory::Interest => "interest",
            QuestionCategory::Technology => "technology",
            QuestionCategory::Blockchain => "blockchain",
            QuestionCategory::Location => "location",
        }
    }

    fn index(&self) -> usize {
        match self {
            QuestionCategory::Interest => 0,
            QuestionCategory::Technology => 1,
            QuestionCategory::Blockchain => 2,
            QuestionCategory::Location => 3,
        }
    }
}

impl fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionSlot {
    pub stage: u8,
    pub position: u8,
    pub question_id: u8,
    pub category: QuestionCategory,
}

/// Per-request assignment counts. Once every category has reached the cap
/// the cap no longer applies.
#[derive(Debug, Clone)]
pub struct CategoryQuota {
    max_per_category: usize,
    counts: [usize; 4],
}

impl CategoryQuota {
    pub fn new(max_per_category: usize) -> Self {
        Self {
            max_per_category,
            counts: [0; 4],
        }
    }

    pub fn available(&self) -> Vec<QuestionCategory> {
        let under_cap: Vec<QuestionCategory> = QuestionCategory::ALL
            .iter()
            .copied()
            .filter(|c| self.counts[c.index()] < self.max_per_category)
            .collect();
        if under_cap.is_empty() {
            QuestionCategory::ALL.to_vec()
        } else {
            under_cap
        }
    }

    pub fn record(&mut self, category: QuestionCategory) {
        self.counts[category.index()] += 1;
    }

    pub fn count(&self, category: QuestionCategory) -> usize {
        self.counts[category.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_serializes_with_camel_case_keys() {
        let q = Question {
            stage: 1,
            question_id: 1,
            question_text: "What city is alex.base based in?".into(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: 0,
            personalized_context: "Based on alex.base's X posts".into(),
        };
        let v = serde_json::to_value(&q).unwrap();
        assert_eq!(v["questionId"], 1);
        assert_eq!(v["questionText"], "What city is alex.base based in?");
        assert_eq!(v["correctAnswer"], 0);
        assert_eq!(v["personalizedContext"], "Based on alex.base's X posts");
    }

    #[test]
    fn quota_relaxes_only_when_every_category_is_full() {
        let mut quota = CategoryQuota::new(1);
        quota.record(QuestionCategory::Interest);
        quota.record(QuestionCategory::Location);
        assert_eq!(
            quota.available(),
            vec![QuestionCategory::Technology, QuestionCategory::Blockchain]
        );

        quota.record(QuestionCategory::Technology);
        quota.record(QuestionCategory::Blockchain);
        assert_eq!(quota.available(), QuestionCategory::ALL.to_vec());
    }

    #[test]
    fn full_quota_reopens_every_category() {
        let mut quota = CategoryQuota::new(4);
        for category in QuestionCategory::ALL {
            for _ in 0..3 {
                quota.record(category);
            }
        }
        assert_eq!(quota.available(), QuestionCategory::ALL.to_vec());

        for category in &QuestionCategory::ALL[..3] {
            quota.record(*category);
        }
        assert_eq!(quota.available(), vec![QuestionCategory::Location]);

        quota.record(QuestionCategory::Location);
        assert_eq!(quota.available(), QuestionCategory::ALL.to_vec());
        quota.record(QuestionCategory::Interest);
        assert_eq!(quota.count(QuestionCategory::Interest), 5);
        assert_eq!(quota.available(), QuestionCategory::ALL.to_vec());
    }
}
