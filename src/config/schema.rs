use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "llm": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "provider": { "type": "string", "enum": ["openai", "anthropic", "gemini", "openrouter", "local"] },
                    "models": { "type": "array", "items": { "type": "string", "minLength": 1 }, "minItems": 1 },
                    "api_key": { "type": "string" },
                    "base_url": { "type": "string" },
                    "temperature": { "type": "number", "minimum": 0, "maximum": 2 },
                    "max_tokens": { "type": "integer", "minimum": 1 }
                }
            },
            "toolchain": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "binary": { "type": "string", "minLength": 1 },
                    "build_timeout_ms": { "type": "integer", "minimum": 1 },
                    "test_timeout_ms": { "type": "integer", "minimum": 1 },
                    "clean": { "type": "boolean" }
                }
            },
            "sandbox": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "root": { "type": "string", "minLength": 1 },
                    "assets": { "type": "string", "minLength": 1 }
                }
            }
        }
    })
});
