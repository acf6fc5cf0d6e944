//! Prompt construction for the three interview LLM calls.
//! Cross-cutting fragments (persona, JSON-only rule) live in
//! `llm_client::prompts`; this file owns the interview-specific templates.

use crate::interview::models::{QAPair, SessionConfig};
use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, PERSONA};
use crate::llm_client::ChatMessage;

/// Substituted when question generation fails or returns nothing.
pub const FALLBACK_QUESTION: &str = "Thank you for your time today. \
    To close, is there anything you would like to ask us?";

/// Substituted when an evaluation reply carried no usable feedback text.
pub const DEFAULT_EVALUATION_FEEDBACK: &str = "The answer could not be evaluated.";

/// Returned for a final summary over an empty session — no LLM call is made.
pub const EMPTY_SESSION_SUMMARY: &str = "No answers were recorded for this session.";

/// Substituted when the summary call succeeded but returned nothing usable.
pub const UNAVAILABLE_SUMMARY: &str = "An overall assessment could not be generated.";

/// Output-format contract for the evaluation call. The parser in
/// `interview::parser` is the counterpart that reads this shape back.
const EVALUATION_FORMAT_INSTRUCTION: &str = r#"Respond with a JSON object in exactly this form, with exactly these two fields:
{"score": <integer from 0 to 100>, "feedback": "<feedback text>"}"#;

/// Messages asking for the next question, given everything asked so far.
pub fn question_messages(cfg: &SessionConfig, history: &[QAPair]) -> Vec<ChatMessage> {
    let system = format!(
        "{PERSONA}\nYou are conducting an interview for a {} position at the {} level. \
         Output exactly one clear interview question.",
        cfg.job_type, cfg.job_level
    );

    let context = if history.is_empty() {
        String::new()
    } else {
        format!(
            "\nEXCHANGES SO FAR:\n{}\nAsk a question that does not repeat the topics \
             above and takes the interview one stage deeper.",
            render_transcript(history)
        )
    };

    let user = format!(
        "Difficulty: {} ({}).{}\n\nGenerate the next interview question. \
         Return only the question text.",
        cfg.difficulty.label(),
        cfg.difficulty.guidance(),
        context
    );

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

/// Messages asking for a score and feedback on one answer.
pub fn evaluation_messages(cfg: &SessionConfig, question: &str, answer: &str) -> Vec<ChatMessage> {
    let system = format!(
        "{PERSONA}\nIn an interview for a {} position, score the candidate's answer \
         from 0 to 100 and give concise feedback. Do not be overly harsh: mention \
         both what was good and what could be improved.\n{JSON_ONLY_INSTRUCTION}",
        cfg.job_type
    );

    let user = format!(
        "QUESTION:\n{question}\n\nANSWER:\n{answer}\n\n{EVALUATION_FORMAT_INSTRUCTION}"
    );

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

/// Messages asking for the overall assessment of a completed session.
pub fn summary_messages(history: &[QAPair]) -> Vec<ChatMessage> {
    let system = format!(
        "{PERSONA}\nWrite one concise overall assessment of the whole interview \
         session, around 300 characters, balancing strengths, weaknesses, and \
         your overall impression."
    );

    let user = format!(
        "TODAY'S INTERVIEW:\n{}\n\nBased on the exchanges above, write your overall \
         assessment of the candidate as a single piece of prose.",
        render_scored_transcript(history)
    );

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

/// Renders history as numbered Q/A lines for the question prompt.
fn render_transcript(history: &[QAPair]) -> String {
    history
        .iter()
        .enumerate()
        .map(|(i, qa)| {
            format!("Q{n}: {q}\nA{n}: {a}", n = i + 1, q = qa.question, a = qa.answer)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Renders history with per-item score and feedback for the summary prompt.
fn render_scored_transcript(history: &[QAPair]) -> String {
    history
        .iter()
        .enumerate()
        .map(|(i, qa)| {
            let mut item = format!(
                "Q{n}: {q}\nA{n}: {a}",
                n = i + 1,
                q = qa.question,
                a = qa.answer
            );
            if let Some(score) = qa.score {
                item.push_str(&format!(" [score: {score}]"));
            }
            if let Some(feedback) = &qa.feedback {
                item.push_str(&format!("\nFeedback: {feedback}"));
            }
            item
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
