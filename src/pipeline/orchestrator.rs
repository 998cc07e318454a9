use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use futures::FutureExt;
use crate::audit::Transcript;
use crate::compiler::{CompileOptions, CompilerAdapter, Sandbox, Toolchain, SOURCE_FILE_NAME};
use crate::config::ProveConfig;
use crate::errors::ProveError;
use crate::llm::{self, LLMProvider};
use crate::analysis::HypothesisGenerator;
use crate::models::{AuditResult, AuditVerdict};
use crate::sanitizer;
use crate::verifier::{detect_contract_name, ContractRef, ExploitVerifier};
use crate::verifier::harness::DEFAULT_CONTRACT;
use super::stage::Stage;
use tracing::{error, info, info_span, warn, Instrument};

/// Runs one audit through SANITIZE, COMPILE, ANALYZE, VERIFY and VERDICT.
///
/// Every stage runs at most once and the first failure ends the run with
/// `ERROR`. The orchestrator writes to a single sandbox, so callers must not
/// run two audits against the same sandbox root concurrently.
pub struct PipelineOrchestrator {
    compiler: CompilerAdapter,
    generator: HypothesisGenerator,
    verifier: ExploitVerifier,
    provider: Arc<dyn LLMProvider>,
    compile_options: CompileOptions,
    secrets: Vec<String>,
}

impl PipelineOrchestrator {
    pub fn new(config: &ProveConfig, provider: Arc<dyn LLMProvider>, toolchain: Arc<Toolchain>) -> Self {
        let sandbox = Sandbox::new(config.sandbox_root.clone(), config.mocks_dir());
        let generator = HypothesisGenerator::new(provider.clone(), config.model_chain())
            .with_sampling(config.temperature, config.max_tokens);
        let verifier = ExploitVerifier::new(
            toolchain.clone(),
            sandbox.clone(),
            config.harness_template(),
            config.test_timeout_ms,
        );
        Self {
            compiler: CompilerAdapter::new(toolchain, sandbox),
            generator,
            verifier,
            provider,
            compile_options: CompileOptions {
                clean: config.clean_build,
                timeout_ms: config.build_timeout_ms,
            },
            secrets: config.secrets().into_iter().map(str::to_string).collect(),
        }
    }

    /// Build the provider named in `config` and use the process-wide toolchain.
    pub fn from_config(config: &ProveConfig) -> Result<Self, ProveError> {
        let provider = llm::create_provider(config)?;
        let toolchain = Toolchain::shared(config.forge_binary.as_deref());
        Ok(Self::new(config, provider, toolchain))
    }

    /// Never fails: every error, including a panic inside a stage, becomes an
    /// `ERROR` verdict with the reason appended to the transcript.
    pub async fn run(&self, source_code: &str) -> AuditResult {
        let secrets: Vec<&str> = self.secrets.iter().map(String::as_str).collect();
        let mut transcript = Transcript::new(&secrets);
        let audit_id = uuid::Uuid::new_v4();
        let span = info_span!("audit", id = %audit_id);
        transcript.event(format!("Audit {} started ({} bytes of source)", audit_id, source_code.len()));

        let outcome = AssertUnwindSafe(self.run_stages(&mut transcript, source_code))
            .catch_unwind()
            .instrument(span.clone())
            .await;

        let verdict = match outcome {
            Ok(Ok(verdict)) => verdict,
            Ok(Err(e)) => {
                let classification = e.classify();
                warn!(error_type = classification.error_type, error = %e, "Audit failed");
                transcript.event(format!("FAILED ({}): {}", classification.error_type, e));
                AuditVerdict::Error
            }
            Err(panic) => {
                let message = panic
                    .downcast_ref::<String>()
                    .cloned()
                    .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(error = %message, "Audit aborted unexpectedly");
                transcript.event(format!("FAILED (InternalError): {}", message));
                AuditVerdict::Error
            }
        };

        transcript.stage(Stage::Verdict);
        transcript.event(format!("Verdict: {}", verdict));
        span.in_scope(|| info!(verdict = %verdict, "Audit finished"));

        AuditResult { logs: transcript.render(), verdict }
    }

    async fn run_stages(&self, transcript: &mut Transcript, source_code: &str) -> Result<AuditVerdict, ProveError> {
        // SANITIZE
        transcript.stage(Stage::Sanitize);
        let sanitized = sanitizer::sanitize(source_code);
        for mapping in &sanitized.remapped_imports {
            transcript.event(format!("Remapped import {} -> {}", mapping.original, mapping.mocked));
        }
        for removed in &sanitized.removed_imports {
            transcript.event(format!("Removed unresolved import {}", removed));
        }
        if !sanitized.success {
            return Err(ProveError::Sanitization(sanitized.error.unwrap_or_default()));
        }
        transcript.event(format!(
            "Sanitized source: {} import(s) remapped, {} removed",
            sanitized.remapped_imports.len(),
            sanitized.removed_imports.len()
        ));

        // COMPILE
        transcript.stage(Stage::Compile);
        let invocation = self.compiler.preflight().await?;
        transcript.event(format!("Toolchain: {}", invocation));
        let build = self.compiler.compile(&sanitized.code, self.compile_options).await;
        transcript.output(&build.logs);
        if !build.success {
            if build.timed_out {
                return Err(ProveError::Timeout(format!(
                    "build exceeded {} ms",
                    self.compile_options.timeout_ms
                )));
            }
            return Err(ProveError::Toolchain("build failed, see compiler output above".into()));
        }
        transcript.event(format!("Build succeeded in {} ms", build.duration_ms));

        // ANALYZE
        transcript.stage(Stage::Analyze);
        llm::ensure_configured(self.provider.as_ref())?;
        transcript.event(format!(
            "Provider: {} (models: {})",
            self.generator.provider_name(),
            self.generator.models().join(", ")
        ));
        let analysis = self.generator.analyze(&sanitized.code).await;
        for attempt in &analysis.attempts {
            match &attempt.error {
                Some(err) => transcript.event(format!("Model {} failed: {}", attempt.model, err)),
                None => transcript.event(format!("Model {} answered", attempt.model)),
            }
        }
        if !analysis.success {
            return Err(ProveError::LLMApi(analysis.error.unwrap_or_default()));
        }
        let primary = match analysis.primary() {
            Some(h) => h.clone(),
            None => {
                transcript.event("No hypotheses returned; nothing to prove");
                return Ok(AuditVerdict::Secure);
            }
        };
        for (idx, h) in analysis.hypotheses.iter().enumerate() {
            transcript.event(format!(
                "Hypothesis #{}: {}() {} confidence {} | {}",
                idx + 1,
                h.target,
                h.vulnerability_type,
                h.confidence,
                h.reasoning
            ));
        }

        // VERIFY
        transcript.stage(Stage::Verify);
        let contract_name = detect_contract_name(&sanitized.code).unwrap_or_else(|| DEFAULT_CONTRACT.to_string());
        let contract = ContractRef::new(SOURCE_FILE_NAME, &contract_name);
        transcript.event(format!("Attacking {}.{}() as an unprivileged caller", contract.contract_name, primary.target));
        let verification = self.verifier.verify(&contract, &primary).await?;
        transcript.output(&verification.test_output);
        transcript.event(format!(
            "Verification: {} in {} ms",
            verification.verdict, verification.duration_ms
        ));

        Ok(AuditVerdict::from(verification.verdict))
    }
}
