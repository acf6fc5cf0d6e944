//! Interview session progression.
//!
//! The service keeps no session state of its own: the caller owns the
//! history and replays it whole on every request, so the phase is derived
//! from history length alone. Question → answer → score → next question,
//! until the history holds `TOTAL_QUESTIONS` scored pairs, at which point
//! the session completes with a final summary.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::interview::model::InterviewModel;
use crate::interview::models::{InterviewResult, QAPair, SessionConfig, TOTAL_QUESTIONS};
use crate::interview::prompts::FALLBACK_QUESTION;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    AwaitingFirstQuestion,
    AwaitingAnswer,
    Completed,
}

pub fn phase_of(history: &[QAPair]) -> SessionPhase {
    match history.len() {
        0 => SessionPhase::AwaitingFirstQuestion,
        n if n >= TOTAL_QUESTIONS => SessionPhase::Completed,
        _ => SessionPhase::AwaitingAnswer,
    }
}

/// Outcome of a question fetch. When `generation_error` is set, `question`
/// carries the fixed fallback text and the request still counts as a
/// success — the error is advisory only.
#[derive(Debug)]
pub struct QuestionOutcome {
    pub question: String,
    pub generation_error: Option<String>,
}

/// Outcome of one answered question.
#[derive(Debug)]
pub struct AnswerOutcome {
    pub score: u8,
    pub feedback: String,
    pub continuation: Continuation,
}

#[derive(Debug)]
pub enum Continuation {
    /// The session goes on: the next question plus the updated history.
    NextQuestion {
        question: String,
        history: Vec<QAPair>,
    },
    /// The session is complete.
    Finished(InterviewResult),
}

/// Requests a question for the session as it stands. Generation failure
/// degrades to the fixed fallback question rather than failing the request.
pub async fn fetch_question(
    model: &dyn InterviewModel,
    cfg: &SessionConfig,
    history: &[QAPair],
) -> Result<QuestionOutcome, AppError> {
    if phase_of(history) == SessionPhase::Completed {
        return Err(AppError::Validation(format!(
            "the interview is already complete after {TOTAL_QUESTIONS} questions"
        )));
    }

    match model.next_question(cfg, history).await {
        Ok(question) => Ok(QuestionOutcome {
            question,
            generation_error: None,
        }),
        Err(e) => {
            warn!("question generation failed, substituting fallback: {e}");
            Ok(QuestionOutcome {
                question: FALLBACK_QUESTION.to_string(),
                generation_error: Some(e.to_string()),
            })
        }
    }
}

/// Scores an answer and either continues the session or completes it.
///
/// The current question is taken from the request, or recovered from the
/// last history entry; with neither, the request is a client error.
/// Evaluation failure is fatal. Next-question and summary failures are not:
/// the former substitutes the fallback question, the latter omits the
/// summary from an otherwise successful completion.
pub async fn submit_answer(
    model: &dyn InterviewModel,
    cfg: &SessionConfig,
    question: Option<&str>,
    answer: &str,
    history: Vec<QAPair>,
) -> Result<AnswerOutcome, AppError> {
    if phase_of(&history) == SessionPhase::Completed {
        return Err(AppError::Validation(format!(
            "the interview is already complete after {TOTAL_QUESTIONS} questions"
        )));
    }

    let question = match question.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => q.to_string(),
        None => history
            .last()
            .map(|qa| qa.question.clone())
            .ok_or_else(|| {
                AppError::Validation(
                    "no current question: none was supplied and the history is empty"
                        .to_string(),
                )
            })?,
    };

    let answer = answer.trim();
    if answer.is_empty() {
        return Err(AppError::Validation("answer must not be empty".to_string()));
    }

    let evaluation = model.evaluate_answer(cfg, &question, answer).await?;

    let mut completed = history;
    completed.push(QAPair {
        question,
        answer: answer.to_string(),
        score: Some(evaluation.score),
        feedback: Some(evaluation.feedback.clone()),
    });

    if completed.len() >= TOTAL_QUESTIONS {
        let final_feedback = match model.final_summary(&completed).await {
            Ok(summary) => Some(summary),
            // Non-fatal: the evaluation already succeeded, so the session
            // still completes — just without an overall assessment.
            Err(e) => {
                warn!("final summary generation failed: {e}");
                None
            }
        };

        let result = InterviewResult::from_history(completed, final_feedback);
        info!(
            "interview complete: {} questions, total score {}",
            result.items.len(),
            result.total_score
        );

        return Ok(AnswerOutcome {
            score: evaluation.score,
            feedback: evaluation.feedback,
            continuation: Continuation::Finished(result),
        });
    }

    let next_question = match model.next_question(cfg, &completed).await {
        Ok(q) => q,
        Err(e) => {
            warn!("next-question generation failed, substituting fallback: {e}");
            FALLBACK_QUESTION.to_string()
        }
    };

    Ok(AnswerOutcome {
        score: evaluation.score,
        feedback: evaluation.feedback,
        continuation: Continuation::NextQuestion {
            question: next_question,
            history: completed,
        },
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::interview::models::{Difficulty, EvaluationResult};

    /// Deterministic stand-in for the LLM-backed model. Failure toggles
    /// drive the fallback paths; `llm_calls` verifies no-network guarantees.
    #[derive(Default)]
    struct StubModel {
        fail_question: bool,
        fail_evaluation: bool,
        fail_summary: bool,
        llm_calls: AtomicUsize,
    }

    #[async_trait]
    impl InterviewModel for StubModel {
        async fn next_question(
            &self,
            _cfg: &SessionConfig,
            history: &[QAPair],
        ) -> Result<String, AppError> {
            self.llm_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_question {
                return Err(AppError::Llm("question backend down".to_string()));
            }
            Ok(format!("Stub question {}", history.len() + 1))
        }

        async fn evaluate_answer(
            &self,
            _cfg: &SessionConfig,
            _question: &str,
            _answer: &str,
        ) -> Result<EvaluationResult, AppError> {
            self.llm_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_evaluation {
                return Err(AppError::Llm("evaluation backend down".to_string()));
            }
            Ok(EvaluationResult {
                score: 72,
                feedback: "Solid answer.".to_string(),
            })
        }

        async fn final_summary(&self, _history: &[QAPair]) -> Result<String, AppError> {
            self.llm_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_summary {
                return Err(AppError::Llm("summary backend down".to_string()));
            }
            Ok("Overall a solid performance.".to_string())
        }
    }

    fn config() -> SessionConfig {
        SessionConfig {
            job_type: "engineer".to_string(),
            job_level: "junior".to_string(),
            difficulty: Difficulty::Medium,
        }
    }

    fn history_of(len: usize) -> Vec<QAPair> {
        (1..=len)
            .map(|n| QAPair {
                question: format!("question {n}"),
                answer: format!("answer {n}"),
                score: Some(60 + n as u8),
                feedback: Some(format!("feedback {n}")),
            })
            .collect()
    }

    #[test]
    fn test_phase_follows_history_length() {
        assert_eq!(phase_of(&[]), SessionPhase::AwaitingFirstQuestion);
        assert_eq!(phase_of(&history_of(1)), SessionPhase::AwaitingAnswer);
        assert_eq!(
            phase_of(&history_of(TOTAL_QUESTIONS - 1)),
            SessionPhase::AwaitingAnswer
        );
        assert_eq!(phase_of(&history_of(TOTAL_QUESTIONS)), SessionPhase::Completed);
    }

    #[tokio::test]
    async fn test_fetch_question_returns_generated_question() {
        let model = StubModel::default();
        let outcome = fetch_question(&model, &config(), &[]).await.unwrap();
        assert_eq!(outcome.question, "Stub question 1");
        assert!(outcome.generation_error.is_none());
    }

    #[tokio::test]
    async fn test_fetch_question_degrades_to_fallback_on_failure() {
        let model = StubModel {
            fail_question: true,
            ..StubModel::default()
        };
        let outcome = fetch_question(&model, &config(), &[]).await.unwrap();
        assert_eq!(outcome.question, FALLBACK_QUESTION);
        assert!(outcome.generation_error.is_some());
    }

    #[tokio::test]
    async fn test_fetch_question_rejects_completed_session() {
        let model = StubModel::default();
        let err = fetch_question(&model, &config(), &history_of(TOTAL_QUESTIONS))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(model.llm_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submit_answer_continues_session_before_limit() {
        let model = StubModel::default();
        let outcome = submit_answer(
            &model,
            &config(),
            Some("Tell me about yourself"),
            "I have 5 years of experience.",
            vec![],
        )
        .await
        .unwrap();

        assert_eq!(outcome.score, 72);
        assert_eq!(outcome.feedback, "Solid answer.");
        match outcome.continuation {
            Continuation::NextQuestion { question, history } => {
                assert_eq!(question, "Stub question 2");
                assert_eq!(history.len(), 1);
                assert_eq!(history[0].score, Some(72));
            }
            Continuation::Finished(_) => panic!("session must not finish after 1 answer"),
        }
    }

    #[tokio::test]
    async fn test_submit_answer_finishes_at_total_questions() {
        let model = StubModel::default();
        let outcome = submit_answer(
            &model,
            &config(),
            Some("Final question"),
            "Final answer.",
            history_of(TOTAL_QUESTIONS - 1),
        )
        .await
        .unwrap();

        match outcome.continuation {
            Continuation::Finished(result) => {
                assert_eq!(result.items.len(), TOTAL_QUESTIONS);
                assert_eq!(
                    result.final_feedback.as_deref(),
                    Some("Overall a solid performance.")
                );
                assert!(result.total_score <= 100);
            }
            Continuation::NextQuestion { .. } => {
                panic!("session must finish at TOTAL_QUESTIONS")
            }
        }
    }

    #[tokio::test]
    async fn test_summary_failure_completes_without_final_feedback() {
        let model = StubModel {
            fail_summary: true,
            ..StubModel::default()
        };
        let outcome = submit_answer(
            &model,
            &config(),
            Some("Final question"),
            "Final answer.",
            history_of(TOTAL_QUESTIONS - 1),
        )
        .await
        .unwrap();

        match outcome.continuation {
            Continuation::Finished(result) => assert!(result.final_feedback.is_none()),
            Continuation::NextQuestion { .. } => panic!("expected a finished session"),
        }
        assert_eq!(outcome.score, 72);
    }

    #[tokio::test]
    async fn test_next_question_failure_substitutes_fallback() {
        let model = StubModel {
            fail_question: true,
            ..StubModel::default()
        };
        let outcome = submit_answer(&model, &config(), Some("Q"), "A real answer.", vec![])
            .await
            .unwrap();

        match outcome.continuation {
            Continuation::NextQuestion { question, .. } => {
                assert_eq!(question, FALLBACK_QUESTION)
            }
            Continuation::Finished(_) => panic!("expected the session to continue"),
        }
    }

    #[tokio::test]
    async fn test_evaluation_failure_is_fatal() {
        let model = StubModel {
            fail_evaluation: true,
            ..StubModel::default()
        };
        let err = submit_answer(&model, &config(), Some("Q"), "A real answer.", vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
        // The evaluation call itself is the only one attempted.
        assert_eq!(model.llm_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_question_recovered_from_last_history_entry() {
        let model = StubModel::default();
        let outcome = submit_answer(&model, &config(), None, "An answer.", history_of(2))
            .await
            .unwrap();

        match outcome.continuation {
            Continuation::NextQuestion { history, .. } => {
                assert_eq!(history.len(), 3);
                assert_eq!(history[2].question, "question 2");
            }
            Continuation::Finished(_) => panic!("expected the session to continue"),
        }
    }

    #[tokio::test]
    async fn test_undeterminable_question_is_client_error_without_llm_call() {
        let model = StubModel::default();
        let err = submit_answer(&model, &config(), None, "An answer.", vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(model.llm_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blank_answer_is_client_error() {
        let model = StubModel::default();
        let err = submit_answer(&model, &config(), Some("Q"), "   ", vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(model.llm_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submit_answer_rejects_completed_session() {
        let model = StubModel::default();
        let err = submit_answer(
            &model,
            &config(),
            Some("One more"),
            "An answer.",
            history_of(TOTAL_QUESTIONS),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(model.llm_calls.load(Ordering::SeqCst), 0);
    }
}
