//! The interview collaborator trait and its OpenAI-backed implementation.
//!
//! The session state machine depends on this trait, not on `LlmClient`,
//! so tests can substitute deterministic stubs. `AppState` carries it as
//! an `Arc<dyn InterviewModel>`.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::interview::models::{EvaluationResult, QAPair, SessionConfig};
use crate::interview::parser::parse_evaluation;
use crate::interview::prompts;
use crate::llm_client::{LlmClient, LlmError};

// Sampling temperatures per operation: question generation wants variety,
// evaluation wants stability, the summary sits in between.
const QUESTION_TEMPERATURE: f32 = 0.7;
const EVALUATION_TEMPERATURE: f32 = 0.3;
const SUMMARY_TEMPERATURE: f32 = 0.4;

/// The three LLM-backed interview operations: question generator,
/// answer evaluator, and session summarizer.
#[async_trait]
pub trait InterviewModel: Send + Sync {
    /// Generates the next question given everything asked so far.
    async fn next_question(
        &self,
        cfg: &SessionConfig,
        history: &[QAPair],
    ) -> Result<String, AppError>;

    /// Scores one answer. Always returns a usable result on a successful
    /// call; a failed call is a hard error (no score can be substituted).
    async fn evaluate_answer(
        &self,
        cfg: &SessionConfig,
        question: &str,
        answer: &str,
    ) -> Result<EvaluationResult, AppError>;

    /// Produces the overall assessment of a completed session.
    async fn final_summary(&self, history: &[QAPair]) -> Result<String, AppError>;
}

/// Production implementation over the OpenAI Chat Completions client.
pub struct OpenAiInterviewModel {
    llm: LlmClient,
}

impl OpenAiInterviewModel {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl InterviewModel for OpenAiInterviewModel {
    async fn next_question(
        &self,
        cfg: &SessionConfig,
        history: &[QAPair],
    ) -> Result<String, AppError> {
        let messages = prompts::question_messages(cfg, history);
        match self.llm.call(&messages, QUESTION_TEMPERATURE).await {
            Ok(question) => Ok(question),
            // An empty completion is not worth failing over; callers treat
            // the fallback question like any other generated one.
            Err(LlmError::EmptyContent) => Ok(prompts::FALLBACK_QUESTION.to_string()),
            Err(e) => Err(AppError::Llm(format!("question generation failed: {e}"))),
        }
    }

    async fn evaluate_answer(
        &self,
        cfg: &SessionConfig,
        question: &str,
        answer: &str,
    ) -> Result<EvaluationResult, AppError> {
        let messages = prompts::evaluation_messages(cfg, question, answer);
        let raw = match self.llm.call(&messages, EVALUATION_TEMPERATURE).await {
            Ok(text) => text,
            // Parse the empty object instead: score 0, default feedback.
            Err(LlmError::EmptyContent) => "{}".to_string(),
            Err(e) => return Err(AppError::Llm(format!("answer evaluation failed: {e}"))),
        };

        let mut result = parse_evaluation(&raw);
        if result.feedback.trim().is_empty() {
            result.feedback = prompts::DEFAULT_EVALUATION_FEEDBACK.to_string();
        }
        Ok(result)
    }

    async fn final_summary(&self, history: &[QAPair]) -> Result<String, AppError> {
        if history.is_empty() {
            return Ok(prompts::EMPTY_SESSION_SUMMARY.to_string());
        }

        let messages = prompts::summary_messages(history);
        match self.llm.call(&messages, SUMMARY_TEMPERATURE).await {
            Ok(summary) => Ok(summary),
            Err(LlmError::EmptyContent) => Ok(prompts::UNAVAILABLE_SUMMARY.to_string()),
            Err(e) => Err(AppError::Llm(format!("final summary failed: {e}"))),
        }
    }
}
