use serde::{Deserialize, Serialize};

/// Number of questions in one interview session. History length never
/// exceeds this; reaching it completes the session.
pub const TOTAL_QUESTIONS: usize = 5;

/// One interview question paired with the candidate's answer.
/// Score and feedback are filled in once the answer is evaluated;
/// a scored pair is never mutated again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QAPair {
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

/// The outcome of evaluating a single answer. Score is always in 0..=100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub score: u8,
    pub feedback: String,
}

/// Question style preset. Shapes the guidance sent to the question
/// generator; the wire format is the lowercase tier name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Fixed guidance string injected into the question prompt.
    pub fn guidance(self) -> &'static str {
        match self {
            Difficulty::Easy => "basic questions about motivation and self-introduction",
            Difficulty::Medium => {
                "practical questions about experience, skills, and teamwork"
            }
            Difficulty::Hard => {
                "deep-dive, challenging questions covering problem solving, values, \
                 and questions the candidate would ask the interviewer"
            }
        }
    }
}

/// Per-session configuration extracted from the request.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub job_type: String,
    pub job_level: String,
    pub difficulty: Difficulty,
}

/// Terminal artifact of a completed session, handed to the presentation
/// layer. Reconstructed from the full history — the server keeps no
/// session state between requests.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewResult {
    /// Mean of per-question scores, rounded to the nearest integer.
    pub total_score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_feedback: Option<String>,
    pub items: Vec<QAPair>,
}

impl InterviewResult {
    /// Builds the terminal artifact from the completed history.
    /// Unscored items count as 0 so a history with lost scores cannot
    /// inflate the average.
    pub fn from_history(items: Vec<QAPair>, final_feedback: Option<String>) -> Self {
        let total_score = if items.is_empty() {
            0
        } else {
            let sum: u32 = items.iter().map(|qa| u32::from(qa.score.unwrap_or(0))).sum();
            (f64::from(sum) / items.len() as f64).round() as u8
        };
        Self {
            total_score,
            final_feedback,
            items,
        }
    }
}
