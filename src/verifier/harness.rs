use std::sync::LazyLock;
use regex::Regex;
use crate::errors::ProveError;
use crate::models::{VulnerabilityHypothesis, VulnerabilityType};

/// The single injection point in the harness template.
pub const INJECTION_MARKER: &str = "// @@EXPLOIT_PAYLOAD@@";
/// Contract reference the template is written against.
pub const DEFAULT_CONTRACT: &str = "Target";
pub const DEFAULT_IMPORT_PATH: &str = "../src/Target.sol";
/// Local name the harness gives the contract under test, so the audited
/// contract may share a name with the harness's own contracts.
pub const VICTIM_ALIAS: &str = "Victim";

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap()
});

static CONTRACT_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*contract\s+([A-Za-z_$][A-Za-z0-9_$]*)").unwrap()
});

static DEFAULT_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"import\s*\{\s*Target\s+as\s+Victim\s*\}\s*from\s*"\.\./src/Target\.sol"\s*;"#).unwrap()
});

const RESERVED: &[&str] = &[
    "abstract", "address", "after", "alias", "anonymous", "apply", "as", "assembly", "auto",
    "bool", "break", "byte", "bytes", "calldata", "case", "catch", "constant", "constructor",
    "continue", "contract", "copyof", "default", "define", "delete", "do", "else", "emit",
    "enum", "event", "external", "fallback", "false", "final", "for", "function",
    "if", "immutable", "implements", "import", "in", "indexed", "inline", "interface",
    "internal", "is", "let", "library", "macro", "mapping", "match", "memory", "modifier",
    "mutable", "new", "null", "of", "override", "partial", "payable", "pragma", "private",
    "promise", "public", "pure", "receive", "reference", "relocatable", "return", "returns",
    "revert", "sealed", "sizeof", "static", "storage", "string", "struct", "supports",
    "switch", "this", "throw", "true", "try", "type", "typedef", "typeof", "uint", "int",
    "unchecked", "using", "var", "view", "virtual", "while",
];

/// A Solidity identifier that is safe to splice into generated source.
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name) && !RESERVED.contains(&name)
}

/// The contract the harness deploys: which file to import and which type to
/// instantiate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractRef {
    pub file_name: String,
    pub contract_name: String,
}

impl ContractRef {
    pub fn new(file_name: &str, contract_name: &str) -> Self {
        Self { file_name: file_name.to_string(), contract_name: contract_name.to_string() }
    }

    /// `Vault.sol` -> contract `Vault`.
    pub fn from_file_name(file_name: &str) -> Self {
        let stem = file_name.strip_suffix(".sol").unwrap_or(file_name);
        Self::new(file_name, stem)
    }

    fn is_default(&self) -> bool {
        self.contract_name == DEFAULT_CONTRACT && self.import_path() == DEFAULT_IMPORT_PATH
    }

    fn import_path(&self) -> String {
        format!("../src/{}", self.file_name)
    }

    fn import_statement(&self) -> String {
        format!("import {{{} as {}}} from \"{}\";", self.contract_name, VICTIM_ALIAS, self.import_path())
    }
}

/// Name of the last concrete contract declared in `source`. Abstract
/// contracts, interfaces and libraries are skipped.
pub fn detect_contract_name(source: &str) -> Option<String> {
    CONTRACT_DECL
        .captures_iter(source)
        .last()
        .map(|c| c[1].to_string())
}

/// The attack is always the same: call the target as a stranger and see
/// whether it is rejected. The variant only changes how the attempt is
/// labelled in the harness and in the revert reason.
pub fn exploit_snippet(contract: &str, hypothesis: &VulnerabilityHypothesis) -> String {
    let (label, rejected) = match hypothesis.vulnerability_type {
        VulnerabilityType::AccessControl => ("call as an account with no privileges", "access control enforced"),
        VulnerabilityType::Reentrancy => ("call from an arbitrary contract", "caller restriction enforced"),
        VulnerabilityType::Overflow => ("call with unprivileged state", "call rejected"),
        VulnerabilityType::Other => ("direct unprivileged call", "call rejected"),
    };
    let function = &hypothesis.target;
    format!(
        "// {kind}: {label} to {function}()\n        \
         (bool ok, ) = stranger.invoke(address(victim), abi.encodeCall({contract}.{function}, ()));\n        \
         require(ok, \"{rejected}: {function}() reverted for stranger\");",
        kind = hypothesis.vulnerability_type,
    )
}

/// Render `template` for `contract` with the exploit for `hypothesis`.
/// Returns `(harness_source, exploit_snippet)`.
pub fn render(
    template: &str,
    contract: &ContractRef,
    hypothesis: &VulnerabilityHypothesis,
) -> Result<(String, String), ProveError> {
    if !is_valid_identifier(&hypothesis.target) {
        return Err(ProveError::Injection(format!(
            "target '{}' is not a valid Solidity identifier",
            hypothesis.target.chars().take(64).collect::<String>()
        )));
    }
    if !is_valid_identifier(&contract.contract_name) {
        return Err(ProveError::Injection(format!(
            "contract name '{}' is not a valid Solidity identifier",
            contract.contract_name
        )));
    }

    match template.matches(INJECTION_MARKER).count() {
        0 => return Err(ProveError::Injection("harness template has no injection marker".into())),
        1 => {}
        n => return Err(ProveError::Injection(format!("harness template has {} injection markers, expected 1", n))),
    }

    let mut harness = template.to_string();
    if !contract.is_default() {
        match DEFAULT_IMPORT.find_iter(template).count() {
            1 => {}
            n => return Err(ProveError::Injection(format!(
                "harness template must import the default contract exactly once, found {}",
                n
            ))),
        }
        harness = DEFAULT_IMPORT
            .replace(&harness, regex::NoExpand(&contract.import_statement()))
            .into_owned();
    }

    let snippet = exploit_snippet(VICTIM_ALIAS, hypothesis);
    let harness = harness.replacen(INJECTION_MARKER, &snippet, 1);
    Ok((harness, snippet))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = include_str!("../../assets/harness/Exploit.t.sol.tmpl");

    fn hypothesis(target: &str, kind: VulnerabilityType) -> VulnerabilityHypothesis {
        VulnerabilityHypothesis {
            target: target.to_string(),
            vulnerability_type: kind,
            confidence: 90,
            reasoning: String::new(),
        }
    }

    #[test]
    fn test_shipped_template_has_one_marker_and_no_literal_exploit_marker() {
        assert_eq!(TEMPLATE.matches(INJECTION_MARKER).count(), 1);
        assert!(!TEMPLATE.contains(super::super::classify::EXPLOIT_MARKER));
    }

    #[test]
    fn test_render_default_contract() {
        let (harness, snippet) = render(
            TEMPLATE,
            &ContractRef::from_file_name("Target.sol"),
            &hypothesis("withdraw", VulnerabilityType::AccessControl),
        ).unwrap();
        assert!(!harness.contains(INJECTION_MARKER));
        assert!(harness.contains(&snippet));
        assert!(snippet.contains("abi.encodeCall(Victim.withdraw, ())"));
        assert!(harness.contains(r#"import {Target as Victim} from "../src/Target.sol";"#));
    }

    #[test]
    fn test_render_rewrites_contract_reference() {
        let (harness, _) = render(
            TEMPLATE,
            &ContractRef::new("Target.sol", "Vault"),
            &hypothesis("sweep", VulnerabilityType::Other),
        ).unwrap();
        assert!(harness.contains(r#"import {Vault as Victim} from "../src/Target.sol";"#));
        assert!(harness.contains("Victim internal victim;"));
        assert!(harness.contains("new Victim()"));
        assert!(harness.contains("abi.encodeCall(Victim.sweep, ())"));
        assert!(!harness.contains("{Target"));
    }

    #[test]
    fn test_contract_named_like_harness_contract_is_aliased() {
        for name in ["Stranger", "ExploitTest"] {
            let (harness, _) = render(
                TEMPLATE,
                &ContractRef::new("Target.sol", name),
                &hypothesis("withdraw", VulnerabilityType::AccessControl),
            ).unwrap();
            assert!(harness.contains(&format!(r#"import {{{name} as Victim}} from "../src/Target.sol";"#)));
            assert_eq!(harness.matches(&format!("contract {name}")).count(), 1, "{name}");
            assert!(harness.contains("abi.encodeCall(Victim.withdraw, ())"));
        }
    }

    #[test]
    fn test_rewrite_needs_default_import() {
        let template = format!("import {{Target}} from \"../src/Target.sol\";\n{}", INJECTION_MARKER);
        let err = render(&template, &ContractRef::new("Target.sol", "Vault"), &hypothesis("withdraw", VulnerabilityType::Other))
            .unwrap_err();
        assert!(err.to_string().contains("import the default contract exactly once"));
    }

    #[test]
    fn test_stranger_accepts_value_sent_back() {
        let stranger = &TEMPLATE[TEMPLATE.find("contract Stranger").unwrap()..TEMPLATE.find("contract ExploitTest").unwrap()];
        assert!(stranger.contains("receive() external payable {}"));
        assert!(stranger.contains("fallback() external payable {}"));
    }

    #[test]
    fn test_render_rewrites_file_name() {
        let (harness, _) = render(
            TEMPLATE,
            &ContractRef::from_file_name("Bank.sol"),
            &hypothesis("drain", VulnerabilityType::Reentrancy),
        ).unwrap();
        assert!(harness.contains(r#"import {Bank as Victim} from "../src/Bank.sol";"#));
    }

    #[test]
    fn test_rejects_injection_through_target() {
        let attacks = [
            "withdraw, ())); selfdestruct(payable(msg.sender)); //",
            "withdraw()",
            "",
            "1withdraw",
            "contract",
        ];
        for target in attacks {
            let err = render(TEMPLATE, &ContractRef::from_file_name("Target.sol"), &hypothesis(target, VulnerabilityType::AccessControl))
                .unwrap_err();
            assert!(matches!(err, ProveError::Injection(_)), "{target:?}");
        }
    }

    #[test]
    fn test_missing_and_duplicate_markers() {
        let h = hypothesis("withdraw", VulnerabilityType::AccessControl);
        let target = ContractRef::from_file_name("Target.sol");
        assert!(render("contract X {}", &target, &h).unwrap_err().to_string().contains("no injection marker"));
        let doubled = format!("{m}\n{m}", m = INJECTION_MARKER);
        assert!(render(&doubled, &target, &h).unwrap_err().to_string().contains("2 injection markers"));
    }

    #[test]
    fn test_identifier_rules() {
        assert!(is_valid_identifier("withdraw"));
        assert!(is_valid_identifier("_set$Owner2"));
        assert!(!is_valid_identifier("with draw"));
        assert!(!is_valid_identifier("function"));
        assert!(!is_valid_identifier("émettre"));
    }

    #[test]
    fn test_detect_contract_name() {
        let src = "interface IVault {}\nabstract contract Base {}\nlibrary L {}\ncontract Helper {}\ncontract Vault is Base {\n}\n";
        assert_eq!(detect_contract_name(src).as_deref(), Some("Vault"));
        assert_eq!(detect_contract_name("interface I {}"), None);
    }

    #[test]
    fn test_snippet_per_type_calls_target() {
        for kind in [VulnerabilityType::AccessControl, VulnerabilityType::Reentrancy, VulnerabilityType::Overflow, VulnerabilityType::Other] {
            let snippet = exploit_snippet("Vault", &hypothesis("withdraw", kind));
            assert!(snippet.contains("stranger.invoke(address(victim), abi.encodeCall(Vault.withdraw, ()))"));
            assert!(snippet.contains(kind.as_str()));
        }
    }
}
