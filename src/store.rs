use parking_lot::Mutex;
use std::collections::HashMap;

use crate::models::{Interview, QuestionRecord};

#[derive(Default)]
struct Inner {
    interviews: HashMap<String, Interview>,
    questions: HashMap<String, QuestionRecord>,
}

/// In-memory session/question store. Values are cloned out so no lock is
/// ever held across an await; a submission's mutations are committed under
/// a single lock so no partial state is observable. The engine only touches
/// this create/get/update surface, so a database-backed store could slot in
/// behind it.
#[derive(Default)]
pub struct SessionStore {
    inner: Mutex<Inner>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_interview(&self, interview: Interview, first_question: QuestionRecord) {
        let mut inner = self.inner.lock();
        inner
            .interviews
            .insert(interview.session_id.clone(), interview);
        inner
            .questions
            .insert(first_question.id.clone(), first_question);
    }

    pub fn get_interview(&self, session_id: &str) -> Option<Interview> {
        self.inner.lock().interviews.get(session_id).cloned()
    }

    pub fn get_question(&self, question_id: &str) -> Option<QuestionRecord> {
        self.inner.lock().questions.get(question_id).cloned()
    }

    /// Atomically persists one accepted answer: the updated interview, the
    /// answered question, and the next question when the interview
    /// continues.
    pub fn commit_submission(
        &self,
        interview: Interview,
        answered: QuestionRecord,
        next: Option<QuestionRecord>,
    ) {
        let mut inner = self.inner.lock();
        inner
            .interviews
            .insert(interview.session_id.clone(), interview);
        inner.questions.insert(answered.id.clone(), answered);
        if let Some(question) = next {
            inner.questions.insert(question.id.clone(), question);
        }
    }

    /// All questions asked in a session, in the order they were asked.
    pub fn questions_for_session(&self, session_id: &str) -> Vec<QuestionRecord> {
        let inner = self.inner.lock();
        let mut questions: Vec<QuestionRecord> = inner
            .questions
            .values()
            .filter(|q| q.session_id == session_id)
            .cloned()
            .collect();
        questions.sort_by_key(|q| q.number);
        questions
    }

    pub fn session_count(&self) -> usize {
        self.inner.lock().interviews.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExperienceLevel, InterviewStatus};
    use chrono::Utc;
    use std::collections::HashSet;

    fn interview(session_id: &str) -> Interview {
        Interview {
            session_id: session_id.to_string(),
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

    fn question(id: &str, session_id: &str, number: u32) -> QuestionRecord {
        QuestionRecord {
            id: id.to_string(),
            session_id: session_id.to_string(),
            number,
            text: "What is SUM?".to_string(),
            category: "Basic Formulas".to_string(),
            difficulty: 1,
            expected_answer: "Adds values.".to_string(),
            user_answer: None,
            score: None,
            feedback: None,
        }
    }

    #[test]
    fn create_then_get_round_trip() {
        let store = SessionStore::new();
        store.create_interview(interview("s1"), question("q1", "s1", 1));

        assert!(store.get_interview("s1").is_some());
        assert!(store.get_interview("missing").is_none());
        assert_eq!(store.get_question("q1").unwrap().number, 1);
        assert_eq!(store.session_count(), 1);
    }

    #[test]
    fn questions_come_back_in_asking_order() {
        let store = SessionStore::new();
        store.create_interview(interview("s1"), question("q3", "s1", 3));
        store.commit_submission(interview("s1"), question("q1", "s1", 1), None);
        store.commit_submission(interview("s1"), question("q2", "s1", 2), Some(question("x1", "other", 1)));

        let questions = store.questions_for_session("s1");
        let numbers: Vec<u32> = questions.iter().map(|q| q.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }
}
