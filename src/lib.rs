//! AI-powered Excel skills mock interviewer.
//!
//! The core is an adaptive interview session state machine: questions are
//! issued one at a time from a tiered catalog, answers (text or transcribed
//! audio) are scored, difficulty ratchets up with performance, and the
//! session ends after a fixed question budget with a narrative report.
//! The AI collaborators (Gemini evaluation and report narration, AssemblyAI
//! transcription) are optional; every one of them degrades to a
//! deterministic fallback so a request never fails because a capability is
//! down.

pub mod api;
pub mod assemblyai;
pub mod config;
pub mod engine;
pub mod error;
pub mod gemini;
pub mod models;
pub mod question_bank;
pub mod report;
pub mod scorer;
pub mod store;
pub mod transcriber;

pub use api::ServiceState;
pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
