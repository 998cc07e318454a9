//! Compiler adapter: stages the sandbox and drives the external toolchain.

pub mod process;
pub mod sandbox;
pub mod toolchain;

pub use process::{ProcessOutput, STDERR_PREFIX, TIMEOUT_MARKER};
pub use sandbox::{Sandbox, SOURCE_FILE_NAME, TEST_FILE_NAME};
pub use toolchain::{Invocation, Toolchain, INSTALL_HINT};

use std::sync::Arc;
use std::time::{Duration, Instant};
use chrono::Utc;
use crate::errors::ProveError;
use crate::models::CompilationResult;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy)]
pub struct CompileOptions {
    /// Wipe `out/` and `cache/` before building.
    pub clean: bool,
    pub timeout_ms: u64,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { clean: true, timeout_ms: crate::config::DEFAULT_BUILD_TIMEOUT_MS }
    }
}

pub struct CompilerAdapter {
    toolchain: Arc<Toolchain>,
    sandbox: Sandbox,
}

impl CompilerAdapter {
    pub fn new(toolchain: Arc<Toolchain>, sandbox: Sandbox) -> Self {
        Self { toolchain, sandbox }
    }

    /// Pre-flight check: locate a working toolchain without touching the sandbox.
    pub async fn preflight(&self) -> Result<Invocation, ProveError> {
        self.toolchain.resolve().await.cloned()
    }

    /// Stage `sanitized_source` and build it. Never errors: every failure is
    /// folded into an unsuccessful [`CompilationResult`] carrying the reason.
    pub async fn compile(&self, sanitized_source: &str, options: CompileOptions) -> CompilationResult {
        let started = Instant::now();
        let timestamp = Utc::now();

        let result = self.compile_inner(sanitized_source, options).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(output) => {
                let success = output.success();
                if success {
                    info!(duration_ms, "Build succeeded");
                } else {
                    warn!(duration_ms, exit_code = ?output.exit_code, timed_out = output.timed_out, "Build failed");
                }
                CompilationResult {
                    success,
                    logs: output.log(),
                    timestamp,
                    duration_ms,
                    timed_out: output.timed_out,
                }
            }
            Err(e) => {
                warn!(error = %e, "Build could not run");
                CompilationResult {
                    success: false,
                    logs: e.to_string(),
                    timestamp,
                    duration_ms,
                    timed_out: false,
                }
            }
        }
    }

    async fn compile_inner(&self, source: &str, options: CompileOptions) -> Result<ProcessOutput, ProveError> {
        // Resolve first so a missing toolchain leaves the sandbox untouched
        self.toolchain.resolve().await?;

        self.sandbox.ensure_layout().await?;
        self.sandbox.clean(options.clean).await?;
        self.sandbox.install_mocks().await?;
        self.sandbox.write_source(source).await?;

        let mut args = vec!["build", "--color", "never"];
        if options.clean {
            args.push("--force");
        }
        self.toolchain
            .run(&args, self.sandbox.root(), Duration::from_millis(options.timeout_ms))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_toolchain_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let sandbox = Sandbox::new(dir.path().join("sb"), dir.path().join("mocks"));
        let toolchain = Arc::new(Toolchain::new(vec![Invocation::native("/nonexistent/forge")]));
        let adapter = CompilerAdapter::new(toolchain, sandbox);

        let result = adapter.compile("contract A {}", CompileOptions::default()).await;
        assert!(!result.success);
        assert!(result.logs.contains("Toolchain not found"));
        assert!(!dir.path().join("sb").exists());
    }
}
