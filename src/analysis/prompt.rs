use crate::llm::CompletionRequest;

pub const SYSTEM_PROMPT: &str = "You are a smart-contract security auditor specialising in access control. \
You read Solidity source and name the single most likely function that changes privileged state \
(funds, ownership, configuration, minting, pausing) without checking who the caller is. \
You answer with one JSON object and nothing else.";

/// Build the user half of the prompt, embedding the sanitized source.
pub fn build_user_prompt(source_code: &str) -> String {
    format!(
        r#"Audit the contract below for missing access control.

Rules:
- "target" is the bare function name exactly as declared (no parentheses, no contract prefix).
- Only list external or public functions that take no arguments and that an arbitrary caller could invoke.
- "vulnerabilityType" is one of ACCESS_CONTROL, REENTRANCY, OVERFLOW, OTHER.
- "confidence" is an integer from 0 to 100.
- Order hypotheses from most to least likely.
- If every privileged function is protected, return {{"hypotheses": []}}.

Respond ONLY with JSON of this shape:
{{"hypotheses": [{{"target": "withdraw", "vulnerabilityType": "ACCESS_CONTROL", "confidence": 90, "reasoning": "..."}}]}}

```solidity
{}
```"#,
        source_code
    )
}

pub fn build_request(source_code: &str, temperature: f32, max_tokens: u32) -> CompletionRequest {
    CompletionRequest {
        system: SYSTEM_PROMPT.to_string(),
        user: build_user_prompt(source_code),
        temperature,
        max_tokens,
    }
}
