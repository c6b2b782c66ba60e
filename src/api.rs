use std::sync::Arc;

use base64::Engine as _;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::engine::{InterviewEngine, QUESTION_LIMIT};
use crate::error::{ApiError, ApiResult};
use crate::models::{Evaluation, ExperienceLevel, InterviewStatus, QuestionRecord};
use crate::question_bank::QuestionBank;
use crate::report::ReportGenerator;
use crate::scorer::AnswerScorer;
use crate::store::SessionStore;
use crate::transcriber::{AudioTranscriber, Transcription};

/// Effective answer when transcription was attempted and produced no text.
pub const TRANSCRIPTION_FAILED_PLACEHOLDER: &str =
    "[Audio uploaded but transcription failed - please provide text answer]";
/// Effective answer when the transcription call itself errored.
pub const TRANSCRIPTION_ERROR_PLACEHOLDER: &str =
    "[Audio transcription failed - please try again or provide text answer]";
/// Effective answer when no transcription capability is configured.
pub const TRANSCRIPTION_UNAVAILABLE_PLACEHOLDER: &str =
    "[Audio uploaded but transcription service unavailable - please provide text answer]";

/// Everything a transport needs to serve the interview API. Wire framing
/// (HTTP routing, CORS, startup) stays outside; this layer owns request
/// composition and the response shapes.
pub struct ServiceState {
    engine: InterviewEngine,
    transcriber: AudioTranscriber,
}

impl ServiceState {
    pub fn new(config: AppConfig) -> Self {
        let engine = InterviewEngine::new(
            Arc::new(SessionStore::new()),
            QuestionBank::builtin(),
            AnswerScorer::new(config.google_api_key.clone()),
            ReportGenerator::new(config.google_api_key),
        );
        let transcriber = AudioTranscriber::new(config.assemblyai_api_key);
        Self {
            engine,
            transcriber,
        }
    }

    pub fn from_env() -> Self {
        Self::new(AppConfig::from_env())
    }

    /// Assembles a state from prebuilt components, e.g. to run against an
    /// alternate question catalog.
    pub fn from_parts(engine: InterviewEngine, transcriber: AudioTranscriber) -> Self {
        Self {
            engine,
            transcriber,
        }
    }

    pub fn engine(&self) -> &InterviewEngine {
        &self.engine
    }
}

#[derive(Deserialize, Debug)]
pub struct StartRequest {
    pub name: Option<String>,
    pub experience: Option<ExperienceLevel>,
}

#[derive(Serialize, Debug)]
pub struct QuestionView {
    pub id: String,
    pub text: String,
    pub category: String,
}

impl From<&QuestionRecord> for QuestionView {
    fn from(record: &QuestionRecord) -> Self {
        Self {
            id: record.id.clone(),
            text: record.text.clone(),
            category: record.category.clone(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct StartResponse {
    pub session_id: String,
    pub question: QuestionView,
    pub message: String,
}

/// Audio payload as carried over a JSON transport.
#[derive(Deserialize, Debug)]
pub struct AudioUpload {
    /// Base64-encoded audio bytes.
    pub data: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct SubmitRequest {
    pub session_id: String,
    pub question_id: String,
    #[serde(default)]
    pub answer_text: String,
    pub audio: Option<AudioUpload>,
}

#[derive(Serialize, Debug)]
pub struct SubmitResponse {
    pub evaluation: Evaluation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question: Option<QuestionView>,
    pub interview_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_questions: Option<u32>,
    pub message: String,
}

#[derive(Serialize, Debug)]
pub struct ReportQuestionView {
    pub text: String,
    pub user_answer: String,
    pub score: u8,
    pub feedback: String,
    pub category: String,
}

#[derive(Serialize, Debug)]
pub struct ReportResponse {
    pub session_id: String,
    pub user_name: String,
    pub final_score: f64,
    pub total_questions: u32,
    pub report: String,
    pub questions: Vec<ReportQuestionView>,
    pub status: InterviewStatus,
}

#[derive(Serialize, Debug)]
pub struct HealthServices {
    pub llm: bool,
    pub audio: bool,
    pub questions: bool,
}

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: &'static str,
    pub services: HealthServices,
    pub active_sessions: usize,
}

/// Starts a new interview session.
pub fn start_interview(state: &ServiceState, request: StartRequest) -> ApiResult<StartResponse> {
    let name = request
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Anonymous".to_string());
    let level = request.experience.unwrap_or(ExperienceLevel::Beginner);

    let (interview, question) = state.engine.start(name, level)?;
    Ok(StartResponse {
        session_id: interview.session_id,
        question: QuestionView::from(&question),
        message: "Interview started successfully".to_string(),
    })
}

/// Submits one answer. When audio is present it is transcribed first and
/// the result becomes the effective answer; otherwise the supplied text is
/// used, with a fixed placeholder synthesized when audio was supplied but
/// yielded nothing. The effective text is what the state machine scores.
pub async fn submit_answer(
    state: &ServiceState,
    request: SubmitRequest,
) -> ApiResult<SubmitResponse> {
    // Identifier checks come first so an unknown session or question is
    // reported before any transcription work happens.
    if state.engine.interview(&request.session_id).is_none() {
        return Err(ApiError::NotFound("Interview session not found".to_string()));
    }
    if state.engine.question(&request.question_id).is_none() {
        return Err(ApiError::NotFound("Question not found".to_string()));
    }

    let mut final_answer = request.answer_text.clone();

    if let Some(audio) = &request.audio {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&audio.data)
            .map_err(|_| {
                ApiError::InvalidInput("Audio payload is not valid base64".to_string())
            })?;

        info!(
            "Processing audio submission: {} bytes ({:?}, {:?})",
            bytes.len(),
            audio.filename,
            audio.content_type
        );

        let outcome = state
            .transcriber
            .transcribe(&bytes, audio.filename.as_deref(), audio.content_type.as_deref())
            .await;

        match outcome {
            Transcription::Text(text) => {
                info!("Using transcribed answer: {:.100}", text);
                final_answer = text;
            }
            Transcription::Failed => {
                warn!("No transcription result");
                if final_answer.trim().is_empty() {
                    final_answer = TRANSCRIPTION_FAILED_PLACEHOLDER.to_string();
                }
            }
            Transcription::Errored => {
                if final_answer.trim().is_empty() {
                    final_answer = TRANSCRIPTION_ERROR_PLACEHOLDER.to_string();
                }
            }
            Transcription::Unavailable => {
                warn!("Audio transcription service not available");
                if final_answer.trim().is_empty() {
                    final_answer = TRANSCRIPTION_UNAVAILABLE_PLACEHOLDER.to_string();
                }
            }
        }
    }

    let outcome = state
        .engine
        .submit(&request.session_id, &request.question_id, &final_answer)
        .await?;

    let complete = outcome.interview_complete();
    Ok(SubmitResponse {
        evaluation: outcome.evaluation,
        next_question: outcome.next_question.as_ref().map(QuestionView::from),
        interview_complete: complete,
        final_score: outcome.final_score,
        total_questions: complete.then_some(outcome.total_questions),
        message: if !complete {
            "Answer submitted successfully".to_string()
        } else if outcome.total_questions < QUESTION_LIMIT {
            // Catalog ran out at the required tier before the budget.
            "Interview completed - no more questions available".to_string()
        } else {
            "Interview completed successfully".to_string()
        },
    })
}

/// Full report view for a session.
pub async fn get_report(state: &ServiceState, session_id: &str) -> ApiResult<ReportResponse> {
    let (interview, questions, report) = state.engine.report(session_id).await?;

    Ok(ReportResponse {
        session_id: interview.session_id.clone(),
        user_name: interview.user_name.clone(),
        final_score: interview.final_score.unwrap_or(0.0),
        total_questions: interview.total_questions,
        report,
        questions: questions
            .iter()
            .map(|q| ReportQuestionView {
                text: q.text.clone(),
                user_answer: q
                    .user_answer
                    .clone()
                    .unwrap_or_else(|| "No answer provided".to_string()),
                score: q.score.unwrap_or(0),
                feedback: q.feedback.clone().unwrap_or_default(),
                category: q.category.clone(),
            })
            .collect(),
        status: interview.status,
    })
}

/// Diagnostic view of capability availability and session load.
pub fn health(state: &ServiceState) -> HealthResponse {
    HealthResponse {
        status: "healthy",
        services: HealthServices {
            llm: state.engine.scorer_available(),
            audio: state.transcriber.is_available(),
            questions: state.engine.has_questions(),
        },
        active_sessions: state.engine.session_count(),
    }
}
