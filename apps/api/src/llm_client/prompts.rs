// Cross-cutting prompt fragments. Feature prompts live next to their callers
// (see coach::prompts) and are assembled with these.

/// Appended to every system prompt that expects structured output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Shared persona for every interviewer-facing call.
pub const INTERVIEWER_PERSONA: &str = "You are an experienced, fair hiring manager \
    running a realistic mock job interview. Keep questions concise and specific \
    to the role. Feedback is constructive, encouraging, and never harsh.";

/// Builds a system prompt: persona, task-specific role, JSON-only rule.
pub fn system_prompt(task: &str) -> String {
    format!("{INTERVIEWER_PERSONA} {task} {JSON_ONLY_SYSTEM}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_contains_all_parts() {
        let prompt = system_prompt("Write questions.");
        assert!(prompt.starts_with(INTERVIEWER_PERSONA));
        assert!(prompt.contains("Write questions."));
        assert!(prompt.ends_with(JSON_ONLY_SYSTEM));
    }
}
