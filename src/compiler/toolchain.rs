use std::path::Path;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::sync::OnceCell;
use crate::errors::ProveError;
use super::process::{run_with_timeout, ProcessOutput};
use tracing::{debug, info};

const PROBE_TIMEOUT: Duration = Duration::from_secs(15);

pub const INSTALL_HINT: &str = "Install Foundry with `curl -L https://foundry.paradigm.xyz | bash && foundryup` \
(on Windows, run it inside WSL), or point PROVEBOT_FORGE at the forge binary.";

/// One way of launching the toolchain binary: `program prefix... args...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub prefix: Vec<String>,
}

impl Invocation {
    pub fn native(program: &str) -> Self {
        Self { program: program.to_string(), prefix: Vec::new() }
    }

    /// Run through the WSL compatibility shell.
    pub fn wsl(inner: &str) -> Self {
        Self { program: "wsl".to_string(), prefix: vec![inner.to_string()] }
    }

    pub fn args_with(&self, args: &[&str]) -> Vec<String> {
        self.prefix.iter().cloned()
            .chain(args.iter().map(|a| a.to_string()))
            .collect()
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for p in &self.prefix {
            write!(f, " {}", p)?;
        }
        Ok(())
    }
}

/// Resolution order: explicit binary, `forge` on PATH, then the platform
/// fallbacks (WSL shell on Windows, the foundryup install dir elsewhere).
pub fn default_candidates(explicit: Option<&str>) -> Vec<Invocation> {
    let mut candidates = Vec::new();
    if let Some(bin) = explicit.filter(|b| !b.trim().is_empty()) {
        candidates.push(Invocation::native(bin));
    }
    candidates.push(Invocation::native("forge"));

    if cfg!(windows) {
        candidates.push(Invocation::wsl("forge"));
        candidates.push(Invocation::wsl("~/.foundry/bin/forge"));
    } else if let Ok(home) = std::env::var("HOME") {
        let path = Path::new(&home).join(".foundry").join("bin").join("forge");
        candidates.push(Invocation::native(&path.to_string_lossy()));
    }
    candidates
}

/// The toolchain binary, located lazily on first use. A successful probe is
/// memoised for the life of the value and never re-probed; a failed probe is
/// not memoised, so a later install is still picked up.
pub struct Toolchain {
    candidates: Vec<Invocation>,
    resolved: OnceCell<Invocation>,
}

static SHARED: OnceLock<Arc<Toolchain>> = OnceLock::new();

impl Toolchain {
    pub fn new(candidates: Vec<Invocation>) -> Self {
        Self { candidates, resolved: OnceCell::new() }
    }

    /// Process-wide instance. The first caller's candidate list wins.
    pub fn shared(explicit: Option<&str>) -> Arc<Toolchain> {
        SHARED
            .get_or_init(|| Arc::new(Toolchain::new(default_candidates(explicit))))
            .clone()
    }

    pub async fn resolve(&self) -> Result<&Invocation, ProveError> {
        self.resolved.get_or_try_init(|| self.probe()).await
    }

    async fn probe(&self) -> Result<Invocation, ProveError> {
        let mut tried = Vec::with_capacity(self.candidates.len());
        for candidate in &self.candidates {
            debug!(candidate = %candidate, "Probing toolchain");
            match run_with_timeout(&candidate.program, &candidate.args_with(&["--version"]), None, PROBE_TIMEOUT).await {
                Ok(out) if out.success() => {
                    let version = out.lines.first().cloned().unwrap_or_default();
                    info!(candidate = %candidate, version = %version, "Toolchain resolved");
                    return Ok(candidate.clone());
                }
                Ok(out) => tried.push(format!("{} (exit {:?})", candidate, out.exit_code)),
                Err(_) => tried.push(format!("{} (not found)", candidate)),
            }
        }
        Err(ProveError::ToolchainNotFound(format!(
            "forge is not available (tried: {}). {}",
            tried.join(", "),
            INSTALL_HINT
        )))
    }

    /// Run a toolchain subcommand rooted at `cwd`.
    pub async fn run(&self, args: &[&str], cwd: &Path, timeout: Duration) -> Result<ProcessOutput, ProveError> {
        let invocation = self.resolve().await?;
        run_with_timeout(&invocation.program, &invocation.args_with(args), Some(cwd), timeout).await
    }
}
