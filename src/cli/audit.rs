use std::path::Path;
use console::style;
use crate::cli::commands::{AuditArgs, SanitizeArgs};
use crate::config::ProveConfig;
use crate::errors::ProveError;
use crate::models::AuditVerdict;
use crate::pipeline::PipelineOrchestrator;
use crate::sanitizer;
use tracing::info;

async fn read_source(path: &Path) -> Result<String, ProveError> {
    let code = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ProveError::InvalidInput(format!("cannot read {}: {}", path.display(), e)))?;
    if code.trim().is_empty() {
        return Err(ProveError::InvalidInput(format!("{} is empty", path.display())));
    }
    Ok(code)
}

/// Exit status for a finished audit.
pub fn verdict_exit_code(verdict: AuditVerdict) -> i32 {
    match verdict {
        AuditVerdict::Secure => 0,
        AuditVerdict::Critical => 10,
        AuditVerdict::Unknown => 11,
        AuditVerdict::Error => 1,
    }
}

pub async fn handle_audit(args: AuditArgs, config_path: Option<&Path>) -> Result<AuditVerdict, ProveError> {
    let code = read_source(&args.file).await?;
    let config = ProveConfig::load(config_path).await?;
    info!(file = %args.file.display(), provider = %config.provider, "Auditing contract");

    let orchestrator = PipelineOrchestrator::from_config(&config)?;
    let result = orchestrator.run(&code).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.logs);
        println!();
        let label = match result.verdict {
            AuditVerdict::Secure => style(result.verdict.to_string()).green().bold(),
            AuditVerdict::Critical => style(result.verdict.to_string()).red().bold(),
            AuditVerdict::Unknown => style(result.verdict.to_string()).yellow().bold(),
            AuditVerdict::Error => style(result.verdict.to_string()).magenta().bold(),
        };
        println!("{} {}", style("Verdict:").white().bold(), label);
    }
    Ok(result.verdict)
}

pub async fn handle_sanitize(args: SanitizeArgs) -> Result<(), ProveError> {
    let code = read_source(&args.file).await?;
    let result = sanitizer::sanitize(&code);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.success {
        println!("{}", result.code);
        for mapping in &result.remapped_imports {
            eprintln!("{} {} -> {}", style("remapped").green(), mapping.original, mapping.mocked);
        }
        for removed in &result.removed_imports {
            eprintln!("{} {}", style("removed").yellow(), removed);
        }
    }

    if !result.success {
        return Err(ProveError::Sanitization(result.error.unwrap_or_default()));
    }
    Ok(())
}
