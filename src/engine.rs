use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use log::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{Evaluation, ExperienceLevel, Interview, InterviewStatus, QuestionRecord};
use crate::question_bank::{CatalogEntry, QuestionBank};
use crate::report::ReportGenerator;
use crate::scorer::AnswerScorer;
use crate::store::SessionStore;

/// The interview ends after this many accepted answers.
pub const QUESTION_LIMIT: u32 = 10;

/// Result of one accepted answer.
#[derive(Debug)]
pub struct SubmitOutcome {
    pub evaluation: Evaluation,
    /// `None` once the interview is complete.
    pub next_question: Option<QuestionRecord>,
    pub final_score: Option<f64>,
    pub total_questions: u32,
}

impl SubmitOutcome {
    pub fn interview_complete(&self) -> bool {
        self.next_question.is_none()
    }
}

/// Owns per-session progress: question count, cumulative score, status,
/// next-difficulty and termination decisions. The slow evaluator call runs
/// outside the store lock; a submission's mutations land atomically.
pub struct InterviewEngine {
    store: Arc<SessionStore>,
    bank: QuestionBank,
    scorer: AnswerScorer,
    reporter: ReportGenerator,
}

impl InterviewEngine {
    pub fn new(
        store: Arc<SessionStore>,
        bank: QuestionBank,
        scorer: AnswerScorer,
        reporter: ReportGenerator,
    ) -> Self {
        Self {
            store,
            bank,
            scorer,
            reporter,
        }
    }

    /// Creates a session and its first question at the declared level.
    pub fn start(
        &self,
        user_name: String,
        level: ExperienceLevel,
    ) -> ApiResult<(Interview, QuestionRecord)> {
        let session_id = Uuid::new_v4().to_string();

        let mut used = HashSet::new();
        let entry = self
            .bank
            .first_question(level, &mut used)
            .ok_or_else(|| ApiError::Configuration("question catalog is empty".to_string()))?;

        let interview = Interview {
            session_id: session_id.clone(),
            user_name,
            experience_level: level,
            status: InterviewStatus::InProgress,
            total_questions: 0,
            total_score: 0.0,
            final_score: None,
            current_difficulty: entry.difficulty,
            started_at: Utc::now(),
            completed_at: None,
            used_entries: used,
        };
        let question = instantiate(entry, &session_id, 1);

        info!(
            "🎬 Started interview {} for {} ({} level)",
            session_id,
            interview.user_name,
            level.as_str()
        );

        self.store
            .create_interview(interview.clone(), question.clone());
        Ok((interview, question))
    }

    /// Scores one answer and advances the session: attaches the evaluation
    /// to the question, updates progress, then either completes the
    /// interview (question budget reached, or catalog exhausted at the
    /// required tier) or issues the next question at the adjusted
    /// difficulty.
    pub async fn submit(
        &self,
        session_id: &str,
        question_id: &str,
        answer_text: &str,
    ) -> ApiResult<SubmitOutcome> {
        let answer = answer_text.trim();
        if answer.is_empty() {
            return Err(ApiError::InvalidInput(
                "No answer provided. Please provide either text or clear audio recording."
                    .to_string(),
            ));
        }

        let mut interview = self
            .store
            .get_interview(session_id)
            .ok_or_else(|| ApiError::NotFound("Interview session not found".to_string()))?;
        let mut question = self
            .store
            .get_question(question_id)
            .filter(|q| q.session_id == session_id)
            .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

        if interview.status == InterviewStatus::Completed {
            return Err(ApiError::InvalidInput(
                "Interview already completed".to_string(),
            ));
        }
        if question.score.is_some() {
            return Err(ApiError::InvalidInput(
                "Question already answered".to_string(),
            ));
        }

        // Slow collaborator call; no lock held. Never fails: the scorer
        // degrades to its heuristic internally.
        let evaluation = self
            .scorer
            .evaluate(&question.text, answer, &question.expected_answer, &question.category)
            .await;

        question.user_answer = Some(answer.to_string());
        question.score = Some(evaluation.score);
        question.feedback = Some(evaluation.feedback.clone());

        interview.total_questions += 1;
        interview.total_score += evaluation.score as f64;

        if interview.total_questions >= QUESTION_LIMIT {
            complete(&mut interview);
            let outcome = SubmitOutcome {
                evaluation,
                next_question: None,
                final_score: interview.final_score,
                total_questions: interview.total_questions,
            };
            info!(
                "🏁 Interview {} completed with final score {:.1}/5",
                session_id,
                interview.final_score.unwrap_or(0.0)
            );
            self.store.commit_submission(interview, question, None);
            return Ok(outcome);
        }

        // Difficulty only ever ratchets up.
        if evaluation.score >= 3 {
            interview.current_difficulty += 1;
        }

        let next_entry = self.bank.next_question(
            interview.current_difficulty,
            &question.category,
            &mut interview.used_entries,
        );

        match next_entry {
            Some(entry) => {
                let next =
                    instantiate(entry, session_id, interview.total_questions + 1);
                let outcome = SubmitOutcome {
                    evaluation,
                    next_question: Some(next.clone()),
                    final_score: None,
                    total_questions: interview.total_questions,
                };
                self.store
                    .commit_submission(interview, question, Some(next));
                Ok(outcome)
            }
            None => {
                // Catalog exhausted for the required tier: end early.
                complete(&mut interview);
                let outcome = SubmitOutcome {
                    evaluation,
                    next_question: None,
                    final_score: interview.final_score,
                    total_questions: interview.total_questions,
                };
                info!(
                    "🏁 Interview {} ended early - no questions left at difficulty {}",
                    session_id, interview.current_difficulty
                );
                self.store.commit_submission(interview, question, None);
                Ok(outcome)
            }
        }
    }

    /// The session's full question history plus the narrative report.
    /// Valid in any state, but requires at least one asked question.
    pub async fn report(
        &self,
        session_id: &str,
    ) -> ApiResult<(Interview, Vec<QuestionRecord>, String)> {
        let interview = self
            .store
            .get_interview(session_id)
            .ok_or_else(|| ApiError::NotFound("Interview session not found".to_string()))?;

        let questions = self.store.questions_for_session(session_id);
        if questions.is_empty() {
            return Err(ApiError::NotFound(
                "No questions found for this session".to_string(),
            ));
        }

        let report = self.reporter.generate(&interview, &questions).await;
        Ok((interview, questions, report))
    }

    pub fn interview(&self, session_id: &str) -> Option<Interview> {
        self.store.get_interview(session_id)
    }

    pub fn question(&self, question_id: &str) -> Option<QuestionRecord> {
        self.store.get_question(question_id)
    }

    pub fn scorer_available(&self) -> bool {
        self.scorer.is_available()
    }

    pub fn reporter_available(&self) -> bool {
        self.reporter.is_available()
    }

    pub fn has_questions(&self) -> bool {
        !self.bank.is_empty()
    }

    pub fn session_count(&self) -> usize {
        self.store.session_count()
    }
}

fn complete(interview: &mut Interview) {
    interview.status = InterviewStatus::Completed;
    interview.completed_at = Some(Utc::now());
    interview.final_score = Some(if interview.total_questions > 0 {
        interview.total_score / interview.total_questions as f64
    } else {
        0.0
    });
}

fn instantiate(entry: &CatalogEntry, session_id: &str, number: u32) -> QuestionRecord {
    QuestionRecord {
        id: Uuid::new_v4().to_string(),
        session_id: session_id.to_string(),
        number,
        text: entry.text.to_string(),
        category: entry.category.to_string(),
        difficulty: entry.difficulty,
        expected_answer: entry.expected_answer.to_string(),
        user_answer: None,
        score: None,
        feedback: None,
    }
}
