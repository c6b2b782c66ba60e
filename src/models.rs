use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Advanced => "advanced",
        }
    }

    /// Title-cased form used in reports.
    pub fn title(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "Beginner",
            ExperienceLevel::Intermediate => "Intermediate",
            ExperienceLevel::Advanced => "Advanced",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    InProgress,
    Completed,
}

/// One candidate's assessment run. Created on interview start, mutated once
/// per accepted answer, immutable once completed.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Interview {
    pub session_id: String,
    pub user_name: String,
    pub experience_level: ExperienceLevel,
    pub status: InterviewStatus,
    pub total_questions: u32,
    pub total_score: f64,
    /// total_score / total_questions, set only at completion.
    pub final_score: Option<f64>,
    /// Adaptive progression signal. Monotonically non-decreasing: bumped by
    /// exactly 1 on each answer scoring >= 3.
    pub current_difficulty: u8,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Catalog entries already served to this session. Per-session no-repeat
    /// tracking; cleared by the bank when its pool is exhausted.
    pub used_entries: HashSet<usize>,
}

impl Interview {
    /// Final score once completed, otherwise the running average.
    pub fn average_score(&self) -> f64 {
        match self.final_score {
            Some(score) => score,
            None if self.total_questions > 0 => {
                self.total_score / self.total_questions as f64
            }
            None => 0.0,
        }
    }
}

/// A question instantiated for a session. Answer, score and feedback are
/// attached exactly once on submission and never change afterwards.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct QuestionRecord {
    pub id: String,
    pub session_id: String,
    /// 1-based position within the session's question sequence.
    pub number: u32,
    pub text: String,
    pub category: String,
    pub difficulty: u8,
    /// Scoring guidance only, never shown to the candidate.
    pub expected_answer: String,
    pub user_answer: Option<String>,
    pub score: Option<u8>,
    pub feedback: Option<String>,
}

/// Structured result of scoring one answer.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Evaluation {
    /// 1..=5 inclusive.
    pub score: u8,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn interview() -> Interview {
        Interview {
            session_id: "s1".to_string(),
            user_name: "Test".to_string(),
            experience_level: ExperienceLevel::Beginner,
            status: InterviewStatus::InProgress,
            total_questions: 0,
            total_score: 0.0,
            final_score: None,
            current_difficulty: 1,
            started_at: Utc::now(),
            completed_at: None,
            used_entries: HashSet::new(),
        }
    }

    #[test]
    fn average_score_running_vs_final() {
        let mut i = interview();
        assert_eq!(i.average_score(), 0.0);

        i.total_questions = 4;
        i.total_score = 14.0;
        assert_eq!(i.average_score(), 3.5);

        i.final_score = Some(4.0);
        assert_eq!(i.average_score(), 4.0);
    }

    #[test]
    fn level_serializes_lowercase() {
        let level: ExperienceLevel = serde_json::from_str("\"intermediate\"").unwrap();
        assert_eq!(level, ExperienceLevel::Intermediate);
        assert_eq!(
            serde_json::to_string(&InterviewStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }
}
