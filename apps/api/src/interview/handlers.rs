//! Axum route handlers for the interview API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::interview::model::InterviewModel;
use crate::interview::models::{Difficulty, InterviewResult, QAPair, SessionConfig};
use crate::interview::session::{self, Continuation};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Body of POST /api/v1/interview/answer. The same shape drives both the
/// get-question and submit-answer cases: a usable `answer` selects the
/// latter. The client replays its full history in `previousQA` every call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub job_level: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    // serde's camelCase would produce "previousQa"; the wire name is "previousQA".
    #[serde(default, rename = "previousQA")]
    pub previous_qa: Vec<QAPair>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub question: String,
    /// Advisory: set when the fallback question was substituted for a
    /// failed generation. The status is still a success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    pub score: u8,
    pub feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished: Option<bool>,
    #[serde(rename = "allQA")]
    pub all_qa: Vec<QAPair>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum InterviewResponse {
    Question(QuestionResponse),
    Answer(AnswerResponse),
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interview/answer
///
/// One endpoint drives the whole interview. With no usable `answer`, it
/// returns a question for the session as it stands; with an answer, it
/// returns the evaluation plus either the next question or, at the fifth
/// answered question, the final summary.
pub async fn handle_interview_turn(
    State(state): State<AppState>,
    Json(request): Json<InterviewRequest>,
) -> Result<Json<InterviewResponse>, AppError> {
    let response = run_interview_turn(state.interview.as_ref(), request).await?;
    Ok(Json(response))
}

/// Validates the request and dispatches to the session operations.
/// Split from the Axum handler so scenarios run against stub models.
async fn run_interview_turn(
    model: &dyn InterviewModel,
    request: InterviewRequest,
) -> Result<InterviewResponse, AppError> {
    let cfg = session_config(&request)?;
    let history = request.previous_qa;

    let answer = request
        .answer
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty());

    let Some(answer) = answer else {
        let outcome = session::fetch_question(model, &cfg, &history).await?;
        return Ok(InterviewResponse::Question(QuestionResponse {
            question: outcome.question,
            error: outcome.generation_error,
        }));
    };

    let outcome =
        session::submit_answer(model, &cfg, request.question.as_deref(), answer, history).await?;

    let response = match outcome.continuation {
        Continuation::NextQuestion { question, history } => AnswerResponse {
            score: outcome.score,
            feedback: outcome.feedback,
            next_question: Some(question),
            final_feedback: None,
            total_score: None,
            finished: None,
            all_qa: history,
        },
        Continuation::Finished(InterviewResult {
            total_score,
            final_feedback,
            items,
        }) => AnswerResponse {
            score: outcome.score,
            feedback: outcome.feedback,
            next_question: None,
            final_feedback,
            total_score: Some(total_score),
            finished: Some(true),
            all_qa: items,
        },
    };

    Ok(InterviewResponse::Answer(response))
}

fn session_config(request: &InterviewRequest) -> Result<SessionConfig, AppError> {
    Ok(SessionConfig {
        job_type: required_field(request.job_type.as_deref(), "jobType")?,
        job_level: required_field(request.job_level.as_deref(), "jobLevel")?,
        difficulty: request.difficulty.unwrap_or_default(),
    })
}

fn required_field(value: Option<&str>, name: &str) -> Result<String, AppError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}
