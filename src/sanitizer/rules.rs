use std::sync::LazyLock;
use regex::Regex;

/// A single remapping rule: imports whose path matches `pattern` are pointed
/// at `mock_path` instead.
pub struct ImportRule {
    pub name: &'static str,
    pub pattern: Regex,
    pub mock_path: &'static str,
}

impl ImportRule {
    fn new(name: &'static str, pattern: &str, mock_path: &'static str) -> Self {
        Self {
            name,
            // Patterns are literals below; a typo is caught by test_rule_table_compiles
            pattern: Regex::new(pattern).unwrap_or_else(|e| panic!("invalid import rule {name}: {e}")),
            mock_path,
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }
}

/// Ordered, first-match-wins. `ERC20\.sol$` also matches `SafeERC20.sol` and
/// `IERC20.sol`, so the more specific rules must come first.
pub static IMPORT_RULES: LazyLock<Vec<ImportRule>> = LazyLock::new(|| vec![
    ImportRule::new("ownable", r"(^|/)Ownable(2Step)?\.sol$", "./mocks/Ownable.sol"),
    ImportRule::new("access-control", r"(^|/)AccessControl\.sol$", "./mocks/AccessControl.sol"),
    ImportRule::new("safe-erc20", r"(^|/)SafeERC20\.sol$", "./mocks/SafeERC20.sol"),
    ImportRule::new("ierc20", r"(^|/)IERC20\.sol$", "./mocks/IERC20.sol"),
    ImportRule::new("erc20", r"ERC20\.sol$", "./mocks/ERC20.sol"),
    ImportRule::new("ierc721", r"(^|/)IERC721\.sol$", "./mocks/IERC721.sol"),
    ImportRule::new("erc721", r"ERC721\.sol$", "./mocks/ERC721.sol"),
    ImportRule::new("reentrancy-guard", r"(^|/)ReentrancyGuard\.sol$", "./mocks/ReentrancyGuard.sol"),
    ImportRule::new("pausable", r"(^|/)Pausable\.sol$", "./mocks/Pausable.sol"),
    ImportRule::new("safe-math", r"(^|/)SafeMath\.sol$", "./mocks/SafeMath.sol"),
]);

/// Dependency prefixes that must never survive into sanitized output.
pub const UNTRUSTED_PREFIXES: &[&str] = &[
    "@openzeppelin/",
    "@chainlink/",
    "@uniswap/",
    "@aave/",
    "@solmate/",
    "solmate/",
    "forge-std/",
    "node_modules/",
    "github.com/",
];

/// Find the first rule matching `path`.
pub fn resolve(path: &str) -> Option<&'static ImportRule> {
    IMPORT_RULES.iter().find(|rule| rule.matches(path))
}

/// Every mock file a rule can point at, deduplicated, in table order.
pub fn mock_files() -> Vec<&'static str> {
    let mut files: Vec<&'static str> = Vec::new();
    for rule in IMPORT_RULES.iter() {
        let file = rule.mock_path.trim_start_matches("./mocks/");
        if !files.contains(&file) {
            files.push(file);
        }
    }
    files
}
