#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use provebot::config::ProveConfig;
use provebot::errors::ProveError;
use provebot::llm::{CompletionRequest, LLMProvider, LLMResponse};

/// Replays scripted replies in order and counts the calls made.
pub struct ScriptedProvider {
    replies: Mutex<Vec<String>>,
    calls: Mutex<usize>,
    configured: bool,
}

impl ScriptedProvider {
    pub fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            calls: Mutex::new(0),
            configured: true,
        })
    }

    pub fn unconfigured() -> Arc<Self> {
        Arc::new(Self { replies: Mutex::new(Vec::new()), calls: Mutex::new(0), configured: false })
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn complete(&self, model: &str, _request: &CompletionRequest) -> Result<LLMResponse, ProveError> {
        *self.calls.lock().unwrap() += 1;
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(ProveError::LLMApi("no scripted reply left".into()));
        }
        Ok(LLMResponse {
            content: replies.remove(0),
            input_tokens: None,
            output_tokens: None,
            model: model.to_string(),
        })
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

pub fn assets_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets")
}

/// Config pointing at the shipped assets and a sandbox under `dir`.
pub fn test_config(dir: &Path) -> ProveConfig {
    ProveConfig {
        models: vec!["scripted-1".into()],
        sandbox_root: dir.join("sandbox"),
        assets_dir: assets_dir(),
        build_timeout_ms: 10_000,
        test_timeout_ms: 10_000,
        ..Default::default()
    }
}

/// A stand-in for `forge` that behaves like the real tool on the fixtures
/// used in these tests and appends every invocation to `calls.log`.
#[cfg(unix)]
pub fn fake_forge(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = r#"#!/bin/sh
echo "$*" >> "$(dirname "$0")/calls.log"
case "$1" in
  --version)
    echo "forge 1.0.0 (fake)"
    ;;
  build)
    echo "Compiling 2 files with Solc 0.8.24"
    if grep -q 'SLOW_BUILD' src/Target.sol; then
      sleep 5
    fi
    if grep -q 'function }' src/Target.sol; then
      echo "Error: Compiler run failed:" >&2
      echo "Error (2314): Expected identifier but got '}'" >&2
      exit 1
    fi
    echo "Compiler run successful!"
    ;;
  test)
    echo "Ran 1 test for test/Exploit.t.sol:ExploitTest"
    # transfer() back to a caller without receive/fallback reverts
    if grep -q 'onlyOwner' src/Target.sol || ! grep -q 'receive() external payable' test/Exploit.t.sol; then
      echo "[FAIL: access control enforced: withdraw() reverted for stranger] test_exploit() (gas: 14021)"
    else
      echo "[FAIL: revert: EXPLOIT SUCCEEDED: unprivileged call was accepted] test_exploit() (gas: 31337)"
    fi
    echo "Suite result: FAILED. 0 passed; 1 failed; 0 skipped"
    exit 1
    ;;
esac
"#;
    let path = dir.join("forge");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

pub fn forge_calls(dir: &Path) -> Vec<String> {
    std::fs::read_to_string(dir.join("calls.log"))
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

pub const UNPROTECTED_VAULT: &str = r#"// SPDX-License-Identifier: MIT
pragma solidity ^0.8.20;

import "@openzeppelin/contracts/access/Ownable.sol";

contract Vault is Ownable {
    constructor() Ownable(msg.sender) {}

    function withdraw() external {
        payable(msg.sender).transfer(address(this).balance);
    }
}
"#;

pub const GUARDED_VAULT: &str = r#"// SPDX-License-Identifier: MIT
pragma solidity ^0.8.20;

import "@openzeppelin/contracts/access/Ownable.sol";

contract Vault is Ownable {
    constructor() Ownable(msg.sender) {}

    function withdraw() external onlyOwner {
        payable(msg.sender).transfer(address(this).balance);
    }
}
"#;

pub const WITHDRAW_HYPOTHESIS: &str = r#"{"hypotheses": [{"target": "withdraw", "vulnerabilityType": "ACCESS_CONTROL", "confidence": 92, "reasoning": "withdraw has no caller check"}]}"#;
