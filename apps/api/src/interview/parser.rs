//! Defensive parsing of evaluation replies.
//!
//! The evaluator is asked for `{"score": <int>, "feedback": "<text>"}` but
//! its output is untrusted free text. This module is a total function over
//! that text: strict JSON first, regex salvage second, and a clamped
//! zero-score result when nothing usable is found. It never errors.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::interview::models::EvaluationResult;

/// Upper bound on raw-text feedback salvaged from an unparseable reply.
const MAX_SALVAGED_FEEDBACK_CHARS: usize = 500;

static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json)?\s*").expect("invalid fence regex"));
static SCORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""score"\s*:\s*(\d+)"#).expect("invalid score regex"));
static FEEDBACK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""feedback"\s*:\s*"([^"]*)""#).expect("invalid feedback regex"));

/// Extracts score and feedback from a raw evaluation reply.
/// The score is clamped to 0..=100 on every path.
pub fn parse_evaluation(raw: &str) -> EvaluationResult {
    let cleaned = FENCE_RE.replace_all(raw, "");
    let cleaned = cleaned.trim();

    match serde_json::from_str::<Value>(cleaned) {
        Ok(value) => EvaluationResult {
            score: clamp_score(coerce_score(value.get("score"))),
            feedback: coerce_feedback(value.get("feedback")),
        },
        Err(_) => salvage(raw),
    }
}

/// Regex fallback for replies that are not valid JSON: `score` and
/// `feedback` are captured independently, either may be absent.
fn salvage(raw: &str) -> EvaluationResult {
    let score = SCORE_RE
        .captures(raw)
        .and_then(|caps| caps[1].parse::<i64>().ok())
        .unwrap_or(0);

    let feedback = FEEDBACK_RE
        .captures(raw)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| raw.chars().take(MAX_SALVAGED_FEEDBACK_CHARS).collect());

    EvaluationResult {
        score: clamp_score(score),
        feedback,
    }
}

/// Accepts a JSON number or a numeric string; anything else is 0.
fn coerce_score(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().map(|f| f.round() as i64).unwrap_or(0),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(|f| f.round() as i64)
            .unwrap_or(0),
        _ => 0,
    }
}

fn coerce_feedback(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn clamp_score(score: i64) -> u8 {
    score.clamp(0, 100) as u8
}
