use std::sync::LazyLock;
use regex::Regex;
use crate::models::VerificationVerdict;

/// Emitted by the harness only when the trailing assertion is reached.
pub const EXPLOIT_MARKER: &str = "EXPLOIT SUCCEEDED";
pub const FAIL_MARKER: &str = "[FAIL";
pub const PASS_MARKER: &str = "[PASS]";

static COMPILE_ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)compil\w*[^\n]*error|compiler run failed").unwrap()
});

/// Classify combined test output. Marker precedence is fixed: the exploit
/// marker beats everything, then `[FAIL`, then `[PASS]`, then a compile error.
pub fn classify_output(output: &str) -> VerificationVerdict {
    if output.contains(EXPLOIT_MARKER) {
        VerificationVerdict::VulnerabilityConfirmed
    } else if output.contains(FAIL_MARKER) {
        VerificationVerdict::FalsePositive
    } else if output.contains(PASS_MARKER) {
        VerificationVerdict::Inconclusive
    } else if COMPILE_ERROR.is_match(output) {
        VerificationVerdict::CompilationFailed
    } else {
        VerificationVerdict::Inconclusive
    }
}

/// Cruder fallback for a run that failed without producing usable output.
pub fn classify_failure_message(message: &str) -> VerificationVerdict {
    let lowered = message.to_lowercase();
    if lowered.contains("compil") || lowered.contains("error") {
        VerificationVerdict::CompilationFailed
    } else {
        VerificationVerdict::Inconclusive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exploit_marker_wins_over_everything() {
        let outputs = [
            "[FAIL: revert: EXPLOIT SUCCEEDED: unprivileged call was accepted] test_exploit() (gas: 31337)",
            "[PASS] test_other()\n[FAIL. Reason: EXPLOIT SUCCEEDED] test_exploit()",
            "Compiler run failed\nError: EXPLOIT SUCCEEDED",
            "EXPLOIT SUCCEEDED",
        ];
        for out in outputs {
            assert_eq!(classify_output(out), VerificationVerdict::VulnerabilityConfirmed, "{out}");
        }
    }

    #[test]
    fn test_revert_without_marker_is_false_positive() {
        let out = "Ran 1 test for test/Exploit.t.sol:ExploitTest\n[FAIL: access control enforced: call reverted] test_exploit() (gas: 12000)";
        assert_eq!(classify_output(out), VerificationVerdict::FalsePositive);
    }

    #[test]
    fn test_fail_beats_pass() {
        assert_eq!(classify_output("[PASS] a()\n[FAIL: x] b()"), VerificationVerdict::FalsePositive);
    }

    #[test]
    fn test_pass_only_is_inconclusive() {
        assert_eq!(classify_output("[PASS] test_exploit() (gas: 100)"), VerificationVerdict::Inconclusive);
    }

    #[test]
    fn test_compile_error_detected() {
        assert_eq!(
            classify_output("[stderr] Error: Compiler run failed:\n[stderr] Error (7576): Undeclared identifier."),
            VerificationVerdict::CompilationFailed
        );
        assert_eq!(classify_output("compilation error in Exploit.t.sol"), VerificationVerdict::CompilationFailed);
    }

    #[test]
    fn test_compile_success_line_is_not_an_error() {
        assert_eq!(classify_output("Compiling 3 files with Solc 0.8.24\nCompiler run successful!"), VerificationVerdict::Inconclusive);
    }

    #[test]
    fn test_nothing_recognisable_is_inconclusive() {
        assert_eq!(classify_output(""), VerificationVerdict::Inconclusive);
        assert_eq!(classify_output("[TIMEOUT] forge exceeded 60000 ms and was killed"), VerificationVerdict::Inconclusive);
    }

    #[test]
    fn test_failure_message_fallback() {
        assert_eq!(classify_failure_message("Compilation aborted"), VerificationVerdict::CompilationFailed);
        assert_eq!(classify_failure_message("Toolchain error: Failed to spawn forge"), VerificationVerdict::CompilationFailed);
        assert_eq!(classify_failure_message("killed"), VerificationVerdict::Inconclusive);
    }
}
