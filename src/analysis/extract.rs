use std::sync::LazyLock;
use regex::Regex;
use serde_json::Value;
use crate::errors::ProveError;

static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z]*[ \t]*\r?\n?(.*?)```").unwrap()
});

/// Pull the JSON object out of a model reply. Tries, in order: the whole
/// text, the first fenced block, then the first balanced `{...}` span that
/// parses as an object.
pub fn extract_json_object(text: &str) -> Result<Value, ProveError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ProveError::LLMApi("Empty response".into()));
    }

    if let Ok(v @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
        return Ok(v);
    }

    if let Some(caps) = FENCE.captures(trimmed) {
        if let Ok(v @ Value::Object(_)) = serde_json::from_str::<Value>(caps[1].trim()) {
            return Ok(v);
        }
    }

    for (start, _) in trimmed.match_indices('{') {
        if let Some(end) = matching_brace(&trimmed[start..]) {
            let candidate = &trimmed[start..start + end + 1];
            if let Ok(v @ Value::Object(_)) = serde_json::from_str::<Value>(candidate) {
                return Ok(v);
            }
        }
    }

    Err(ProveError::Schema("No JSON object found in response".into()))
}

/// Byte offset of the `}` closing the `{` at offset 0, skipping braces that
/// appear inside JSON strings.
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json() {
        let v = extract_json_object(r#"{"hypotheses": []}"#).unwrap();
        assert!(v["hypotheses"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_fenced_json() {
        let text = "Here you go:\n```json\n{\"hypotheses\": [{\"target\": \"withdraw\"}]}\n```\nLet me know.";
        let v = extract_json_object(text).unwrap();
        assert_eq!(v["hypotheses"][0]["target"], "withdraw");
    }

    #[test]
    fn test_bare_fence() {
        let v = extract_json_object("```\n{\"a\": 1}\n```").unwrap();
        assert_eq!(v["a"], 1);
    }

    #[test]
    fn test_json_surrounded_by_prose() {
        let text = "I think {this} is wrong but the answer is {\"hypotheses\": [], \"note\": \"use {braces}\"} okay";
        let v = extract_json_object(text).unwrap();
        assert_eq!(v["note"], "use {braces}");
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let text = r#"result: {"reasoning": "say \"}{\" twice", "x": 2} done"#;
        let v = extract_json_object(text).unwrap();
        assert_eq!(v["x"], 2);
    }

    #[test]
    fn test_no_object() {
        assert!(matches!(extract_json_object("no json here"), Err(ProveError::Schema(_))));
        assert!(extract_json_object("[1, 2, 3]").is_err());
        assert!(extract_json_object("{\"unterminated\": ").is_err());
    }

    #[test]
    fn test_empty_is_api_error() {
        assert!(matches!(extract_json_object("   "), Err(ProveError::LLMApi(_))));
    }
}
