// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// House style shared by every editorial prompt.
pub const EDITORIAL_VOICE: &str = "\
    You write for a Danish magazine. Write in Danish. \
    Keep facts, names, numbers and quotes exactly as given in the source. \
    Do NOT invent sources, quotes or figures.";
