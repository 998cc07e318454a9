use std::path::Path;
use crate::errors::ProveError;
use super::types::FileConfig;
use super::schema::CONFIG_SCHEMA;

pub async fn parse_config(path: &Path) -> Result<FileConfig, ProveError> {
    if !path.exists() {
        return Err(ProveError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(ProveError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

pub fn parse_config_str(content: &str) -> Result<FileConfig, ProveError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
    if yaml.is_null() {
        return Ok(FileConfig::default());
    }

    validate_schema(&yaml)?;

    let config: FileConfig = serde_yaml::from_value(yaml)?;
    Ok(config)
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), ProveError> {
    // Convert YAML value to JSON for schema validation
    let json_value: serde_json::Value = serde_json::to_value(yaml)
        .map_err(|e| ProveError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| ProveError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        let messages: Vec<String> = errors
            .map(|e| format!("{} at {}", e, e.instance_path))
            .collect();
        if !messages.is_empty() {
            return Err(ProveError::Config(format!("Invalid configuration: {}", messages.join("; "))));
        }
    }

    Ok(())
}
