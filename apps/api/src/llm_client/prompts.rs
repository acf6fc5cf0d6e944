// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// The interviewer persona prepended to every system message.
pub const PERSONA: &str = "You are a strict but fair head of recruiting at a large, \
    established company. During the interview, try to see through to the candidate's \
    real character while keeping a balance between constructive criticism and \
    encouragement.";

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
