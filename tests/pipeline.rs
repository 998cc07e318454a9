#![cfg(unix)]

mod common;

use std::sync::Arc;
use provebot::compiler::{Invocation, Toolchain};
use provebot::config::ProveConfig;
use provebot::models::AuditVerdict;
use provebot::pipeline::PipelineOrchestrator;
use tempfile::TempDir;
use common::*;

fn orchestrator(dir: &TempDir, provider: Arc<ScriptedProvider>) -> PipelineOrchestrator {
    let forge = fake_forge(dir.path());
    let toolchain = Arc::new(Toolchain::new(vec![Invocation::native(&forge.to_string_lossy())]));
    PipelineOrchestrator::new(&test_config(dir.path()), provider, toolchain)
}

#[tokio::test]
async fn test_unprotected_withdraw_is_critical() {
    let dir = TempDir::new().unwrap();
    let provider = ScriptedProvider::new(&[WITHDRAW_HYPOTHESIS]);
    let result = orchestrator(&dir, provider.clone()).run(UNPROTECTED_VAULT).await;

    assert_eq!(result.verdict, AuditVerdict::Critical, "{}", result.logs);
    assert_eq!(provider.calls(), 1);

    let harness = std::fs::read_to_string(dir.path().join("sandbox/test/Exploit.t.sol")).unwrap();
    assert!(harness.contains(r#"import {Vault as Victim} from "../src/Target.sol";"#));
    assert!(harness.contains("abi.encodeCall(Victim.withdraw, ())"));

    let staged = std::fs::read_to_string(dir.path().join("sandbox/src/Target.sol")).unwrap();
    assert!(staged.contains(r#"import "./mocks/Ownable.sol";"#));
    assert!(dir.path().join("sandbox/src/mocks/Ownable.sol").is_file());

    let calls = forge_calls(dir.path());
    assert!(calls.iter().any(|c| c.starts_with("build --color never")));
    assert!(calls.iter().any(|c| c == "test --color never --match-path test/Exploit.t.sol -vv"));

    let logs = &result.logs;
    for stage in ["SANITIZE", "COMPILE", "ANALYZE", "VERIFY", "VERDICT"] {
        assert!(logs.contains(stage), "missing {stage}");
    }
    assert!(logs.find("SANITIZE").unwrap() < logs.find("VERDICT").unwrap());
    assert!(logs.contains("VULNERABILITY_CONFIRMED"));
}

#[tokio::test]
async fn test_guarded_withdraw_is_secure() {
    let dir = TempDir::new().unwrap();
    let provider = ScriptedProvider::new(&[WITHDRAW_HYPOTHESIS]);
    let result = orchestrator(&dir, provider).run(GUARDED_VAULT).await;

    assert_eq!(result.verdict, AuditVerdict::Secure, "{}", result.logs);
    assert!(result.logs.contains("FALSE_POSITIVE"));
    assert!(!result.logs.contains("EXPLOIT SUCCEEDED"));
}

#[tokio::test]
async fn test_no_hypotheses_skips_verification() {
    let dir = TempDir::new().unwrap();
    let provider = ScriptedProvider::new(&[r#"{"hypotheses": []}"#]);
    let result = orchestrator(&dir, provider).run(UNPROTECTED_VAULT).await;

    assert_eq!(result.verdict, AuditVerdict::Secure, "{}", result.logs);
    assert!(!forge_calls(dir.path()).iter().any(|c| c.starts_with("test")));
    assert!(!dir.path().join("sandbox/test/Exploit.t.sol").exists());
    assert!(!result.logs.contains("=== [4/5] VERIFY"));
}

#[tokio::test]
async fn test_build_failure_is_error_and_stops() {
    let dir = TempDir::new().unwrap();
    let provider = ScriptedProvider::new(&[WITHDRAW_HYPOTHESIS]);
    let result = orchestrator(&dir, provider.clone()).run("contract Broken { function }").await;

    assert_eq!(result.verdict, AuditVerdict::Error);
    assert_eq!(provider.calls(), 0);
    assert!(result.logs.contains("[stderr] Error: Compiler run failed:"));
    assert!(!result.logs.contains("=== [3/5] ANALYZE"));
    assert!(!forge_calls(dir.path()).iter().any(|c| c.starts_with("test")));
}

#[tokio::test]
async fn test_missing_toolchain_fails_before_writing() {
    let dir = TempDir::new().unwrap();
    let provider = ScriptedProvider::new(&[WITHDRAW_HYPOTHESIS]);
    let toolchain = Arc::new(Toolchain::new(vec![Invocation::native("/nonexistent/bin/forge")]));
    let result = PipelineOrchestrator::new(&test_config(dir.path()), provider.clone(), toolchain)
        .run(UNPROTECTED_VAULT)
        .await;

    assert_eq!(result.verdict, AuditVerdict::Error);
    assert!(result.logs.contains("foundryup"), "{}", result.logs);
    assert!(!dir.path().join("sandbox").exists());
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_build_timeout_is_error_and_skips_analysis() {
    let dir = TempDir::new().unwrap();
    let provider = ScriptedProvider::new(&[WITHDRAW_HYPOTHESIS]);
    let forge = fake_forge(dir.path());
    let toolchain = Arc::new(Toolchain::new(vec![Invocation::native(&forge.to_string_lossy())]));
    let config = ProveConfig { build_timeout_ms: 300, ..test_config(dir.path()) };
    let src = format!("// SLOW_BUILD\n{}", UNPROTECTED_VAULT);
    let result = PipelineOrchestrator::new(&config, provider.clone(), toolchain).run(&src).await;

    assert_eq!(result.verdict, AuditVerdict::Error, "{}", result.logs);
    assert!(result.logs.contains("[TIMEOUT]"));
    assert!(result.logs.contains("TimeoutError"));
    assert!(!result.logs.contains("ToolchainError"));
    assert!(!result.logs.contains("ANALYZE"));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_unconfigured_provider_fails_preflight() {
    let dir = TempDir::new().unwrap();
    let provider = ScriptedProvider::unconfigured();
    let result = orchestrator(&dir, provider.clone()).run(UNPROTECTED_VAULT).await;

    assert_eq!(result.verdict, AuditVerdict::Error);
    assert_eq!(provider.calls(), 0);
    assert!(result.logs.contains("ProviderNotConfiguredError"));
}

#[tokio::test]
async fn test_untrusted_prefix_in_body_is_error() {
    let dir = TempDir::new().unwrap();
    let provider = ScriptedProvider::new(&[WITHDRAW_HYPOTHESIS]);
    let src = "contract C {\n    string constant DEP = \"@openzeppelin/contracts\";\n}";
    let result = orchestrator(&dir, provider).run(src).await;

    assert_eq!(result.verdict, AuditVerdict::Error);
    assert!(result.logs.contains("SanitizationError"));
    assert!(forge_calls(dir.path()).is_empty());
}

#[tokio::test]
async fn test_invalid_target_identifier_is_error() {
    let dir = TempDir::new().unwrap();
    let provider = ScriptedProvider::new(&[
        r#"{"hypotheses": [{"target": "withdraw; selfdestruct", "vulnerabilityType": "ACCESS_CONTROL", "confidence": 80, "reasoning": "x"}]}"#,
    ]);
    let result = orchestrator(&dir, provider).run(UNPROTECTED_VAULT).await;

    assert_eq!(result.verdict, AuditVerdict::Error);
    assert!(result.logs.contains("InjectionError"));
    assert!(!forge_calls(dir.path()).iter().any(|c| c.starts_with("test")));
}
