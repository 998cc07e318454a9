//! Exploit verifier: renders the harness for a hypothesis and lets the
//! toolchain decide whether the unprivileged call goes through.

pub mod classify;
pub mod harness;

pub use classify::{classify_failure_message, classify_output, EXPLOIT_MARKER, FAIL_MARKER, PASS_MARKER};
pub use harness::{detect_contract_name, is_valid_identifier, ContractRef, INJECTION_MARKER};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use crate::compiler::{Sandbox, Toolchain};
use crate::errors::ProveError;
use crate::models::{InjectionResult, VerificationResult, VerificationVerdict, VulnerabilityHypothesis};
use tracing::{debug, info, warn};

pub struct ExploitVerifier {
    toolchain: Arc<Toolchain>,
    sandbox: Sandbox,
    template_path: PathBuf,
    timeout: Duration,
}

impl ExploitVerifier {
    pub fn new(toolchain: Arc<Toolchain>, sandbox: Sandbox, template_path: impl Into<PathBuf>, timeout_ms: u64) -> Self {
        Self {
            toolchain,
            sandbox,
            template_path: template_path.into(),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// Render the harness for `hypothesis` and write it into the sandbox.
    /// Nothing is written unless rendering fully succeeds.
    pub async fn inject(&self, contract: &ContractRef, hypothesis: &VulnerabilityHypothesis) -> InjectionResult {
        match self.inject_inner(contract, hypothesis).await {
            Ok((path, snippet)) => {
                debug!(path = %path.display(), target = %hypothesis.target, "Harness written");
                InjectionResult {
                    success: true,
                    test_file_path: Some(path.to_string_lossy().into_owned()),
                    exploit_code: Some(snippet),
                    error: None,
                }
            }
            Err(e) => {
                warn!(error = %e, target = %hypothesis.target, "Harness injection failed");
                InjectionResult::failed(e.to_string())
            }
        }
    }

    async fn inject_inner(&self, contract: &ContractRef, hypothesis: &VulnerabilityHypothesis) -> Result<(PathBuf, String), ProveError> {
        if !is_valid_identifier(&hypothesis.target) {
            return Err(ProveError::Injection(format!(
                "target '{}' is not a valid Solidity identifier",
                hypothesis.target.chars().take(64).collect::<String>()
            )));
        }
        let template = tokio::fs::read_to_string(&self.template_path).await.map_err(|e| {
            ProveError::Injection(format!("harness template {} unreadable: {}", self.template_path.display(), e))
        })?;
        let (harness, snippet) = harness::render(&template, contract, hypothesis)?;
        let path = self.sandbox.write_test(&harness).await?;
        Ok((path, snippet))
    }

    /// Run the harness already written to the sandbox.
    pub async fn run(&self, hypothesis: &VulnerabilityHypothesis) -> VerificationResult {
        let started = Instant::now();
        let test_path = self.sandbox.relative_test_path();
        let args = ["test", "--color", "never", "--match-path", test_path.as_str(), "-vv"];

        let (verdict, test_output) = match self.toolchain.run(&args, self.sandbox.root(), self.timeout).await {
            Ok(output) => {
                let log = output.log();
                (classify_output(&log), log)
            }
            Err(e) => {
                let message = e.to_string();
                (classify_failure_message(&message), message)
            }
        };
        let duration_ms = started.elapsed().as_millis() as u64;
        info!(target = %hypothesis.target, verdict = %verdict, duration_ms, "Exploit run finished");

        VerificationResult {
            verdict,
            target_function: hypothesis.target.clone(),
            exploit_succeeded: verdict == VerificationVerdict::VulnerabilityConfirmed,
            test_output,
            duration_ms,
        }
    }

    /// Inject then run. An injection failure is an error, not a verdict.
    pub async fn verify(&self, contract: &ContractRef, hypothesis: &VulnerabilityHypothesis) -> Result<VerificationResult, ProveError> {
        let injection = self.inject(contract, hypothesis).await;
        if !injection.success {
            return Err(ProveError::Injection(injection.error.unwrap_or_default()));
        }
        Ok(self.run(hypothesis).await)
    }
}
