use std::path::Path;
use console::{style, StyledObject};
use crate::compiler::Toolchain;
use crate::config::ProveConfig;
use crate::errors::ProveError;
use crate::llm::{self, catalog};

fn report(ok: bool, label: &str, detail: &str) {
    let mark = if ok { style("\u{2714}").green().bold() } else { style("\u{2718}").red().bold() };
    println!("  {} {:<12} {}", mark, label, style(detail).dim());
}

/// Runs the same pre-flight checks an audit runs, without auditing anything.
/// Returns the first failure so the exit code names it.
pub async fn handle_doctor(config_path: Option<&Path>) -> Result<(), ProveError> {
    let config = ProveConfig::load(config_path).await?;
    let mut first_error: Option<ProveError> = None;

    let toolchain = Toolchain::shared(config.forge_binary.as_deref());
    match toolchain.resolve().await {
        Ok(invocation) => report(true, "toolchain", &invocation.to_string()),
        Err(e) => {
            report(false, "toolchain", &e.to_string());
            first_error.get_or_insert(e);
        }
    }

    match llm::create_provider(&config).and_then(|p| llm::ensure_configured(p.as_ref())) {
        Ok(()) => report(true, "provider", &format!("{} ({})", config.provider, config.model_chain().join(", "))),
        Err(e) => {
            report(false, "provider", &e.to_string());
            first_error.get_or_insert(e);
        }
    }

    let mocks = config.mocks_dir();
    let missing: Vec<&str> = crate::sanitizer::rules::mock_files()
        .into_iter()
        .filter(|f| !mocks.join(f).is_file())
        .collect();
    if missing.is_empty() {
        report(true, "mocks", &mocks.display().to_string());
    } else {
        let e = ProveError::Config(format!("missing mock fixtures in {}: {}", mocks.display(), missing.join(", ")));
        report(false, "mocks", &e.to_string());
        first_error.get_or_insert(e);
    }

    let template = config.harness_template();
    if template.is_file() {
        report(true, "harness", &template.display().to_string());
    } else {
        let e = ProveError::Config(format!("harness template not found at {}", template.display()));
        report(false, "harness", &e.to_string());
        first_error.get_or_insert(e);
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn status_label(info: &catalog::ProviderInfo, configured: bool) -> StyledObject<String> {
    if configured {
        style("configured".to_string()).green()
    } else {
        style(format!("set {}", info.env_var)).yellow()
    }
}

pub async fn handle_providers(config_path: Option<&Path>) {
    // A broken config should not hide the catalog
    let active = ProveConfig::load(config_path).await.ok().map(|c| c.provider);
    for info in catalog::PROVIDERS {
        let configured = !info.requires_key()
            || std::env::var(info.env_var).map(|v| !v.trim().is_empty()).unwrap_or(false);
        let marker = if active.as_deref() == Some(info.id) { style("*").cyan().bold() } else { style(" ") };
        let status = status_label(info, configured);
        println!("{} {:<11} {:<16} {}", marker, info.id, info.name, status);
        let models: Vec<String> = info.models.iter().map(|m| format!("{} ({})", m.id, m.label)).collect();
        println!("    models: {}", style(models.join(", ")).dim());
    }
}
