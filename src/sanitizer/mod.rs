//! Import sanitization.
//!
//! Untrusted source may pull arbitrary dependencies into the build sandbox.
//! Every import statement is either pointed at a vetted mock from
//! [`rules::IMPORT_RULES`] or commented out. The statement keeps its line
//! count so toolchain diagnostics still point at the right line.

pub mod rules;

use std::sync::LazyLock;
use regex::Regex;
use crate::models::{ImportMapping, SanitizationResult};
use tracing::{debug, warn};

// An import begins a line or follows the end of another top-level item
// (`;`, `}` or a block comment) on the same line.
static IMPORT_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[;}]|\*/)\s*(import)\b").unwrap()
});

static IMPORT_LINE_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*import\b").unwrap()
});

// Plain, aliased (`"p" as X`), namespace (`* as X from "p"`) and symbol
// (`{A, B as C} from "p"`) forms.
static IMPORT_STATEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)^\s*import\s+(?:(?:\*\s*as\s+[A-Za-z_$][\w$]*|\{[^}]*\}|[A-Za-z_$][\w$]*)\s+from\s+)?(?P<open>["'])(?P<path>[^"'\n]*)(?P<close>["'])(?:\s+as\s+[A-Za-z_$][\w$]*)?\s*;"#
    ).unwrap()
});

/// Multi-line imports longer than this are treated as malformed.
const MAX_STATEMENT_LINES: usize = 32;

/// Byte span of the import path inside a statement.
struct ParsedImport {
    path: String,
    start: usize,
    end: usize,
}

fn parse_statement(statement: &str) -> Option<ParsedImport> {
    let caps = IMPORT_STATEMENT.captures(statement)?;
    if caps["open"] != caps["close"] {
        return None;
    }
    let path = caps.name("path")?;
    if path.as_str().trim().is_empty() {
        return None;
    }
    Some(ParsedImport {
        path: path.as_str().to_string(),
        start: path.start(),
        end: path.end(),
    })
}

/// Byte offset of the next import keyword in `text`.
fn find_import(text: &str) -> Option<usize> {
    IMPORT_START.captures(text).and_then(|c| c.get(1)).map(|m| m.start())
}

/// A statement found in the line buffer, from `import` up to and including
/// its `;`. Positions are `(line, byte column)`; `end` is exclusive.
struct Statement {
    text: String,
    end_line: usize,
    end_col: usize,
}

/// The import starting at `(line, col)`. One with no terminating `;` before
/// the next import line (or within reach) is taken to run to the end of its
/// line, and will fail to parse.
fn statement_at(lines: &[&str], line: usize, col: usize) -> Statement {
    let limit = (line + MAX_STATEMENT_LINES).min(lines.len());
    for idx in line..limit {
        let from = if idx == line { col } else { 0 };
        if idx > line && IMPORT_LINE_START.is_match(lines[idx]) {
            break;
        }
        if let Some(semi) = lines[idx][from..].find(';') {
            let end_col = from + semi + 1;
            let mut text = lines[line][col..].to_string();
            if idx == line {
                text.truncate(end_col - col);
            } else {
                for mid in &lines[line + 1..idx] {
                    text.push('\n');
                    text.push_str(mid);
                }
                text.push('\n');
                text.push_str(&lines[idx][..end_col]);
            }
            return Statement { text, end_line: idx, end_col };
        }
    }
    Statement {
        text: lines[line][col..].to_string(),
        end_line: line,
        end_col: lines[line].len(),
    }
}

/// Rewrite every import in `raw_source`. Pure and deterministic.
pub fn sanitize(raw_source: &str) -> SanitizationResult {
    let lines: Vec<&str> = raw_source.split('\n').collect();
    let mut output: Vec<String> = Vec::with_capacity(lines.len());
    let mut current = String::new();
    let mut remapped_imports = Vec::new();
    let mut removed_imports = Vec::new();

    let (mut i, mut col) = (0, 0);
    while i < lines.len() {
        let rest = &lines[i][col..];
        let Some(pos) = find_import(rest) else {
            current.push_str(rest);
            output.push(std::mem::take(&mut current));
            i += 1;
            col = 0;
            continue;
        };
        current.push_str(&rest[..pos]);

        let statement = statement_at(&lines, i, col + pos);
        let replacement = match parse_statement(&statement.text) {
            Some(parsed) => match rules::resolve(&parsed.path) {
                Some(rule) => {
                    debug!(original = %parsed.path, mocked = rule.mock_path, rule = rule.name, "Remapped import");
                    let rewritten = format!(
                        "{}{}{}",
                        &statement.text[..parsed.start],
                        rule.mock_path,
                        &statement.text[parsed.end..]
                    );
                    remapped_imports.push(ImportMapping {
                        original: parsed.path,
                        mocked: rule.mock_path.to_string(),
                    });
                    rewritten
                }
                None => {
                    debug!(path = %parsed.path, "Removed unresolved import");
                    removed_imports.push(parsed.path);
                    removal_comment(&statement.text, removed_imports.len())
                }
            },
            None => {
                debug!(line = i + 1, "Removed malformed import");
                removed_imports.push(statement.text.trim().to_string());
                removal_comment(&statement.text, removed_imports.len())
            }
        };

        let mut parts = replacement.split('\n');
        current.push_str(parts.next().unwrap_or_default());
        for part in parts {
            output.push(std::mem::take(&mut current));
            current.push_str(part);
        }
        i = statement.end_line;
        col = statement.end_col;
    }

    let code = output.join("\n");

    if let Err(reason) = validate(&code) {
        warn!(reason = %reason, "Sanitized output failed validation");
        return SanitizationResult {
            code: String::new(),
            remapped_imports,
            removed_imports,
            success: false,
            error: Some(reason),
        };
    }

    SanitizationResult {
        code,
        remapped_imports,
        removed_imports,
        success: true,
        error: None,
    }
}

/// A block comment with as many lines as `statement`, so code sharing a line
/// with the import survives. The path is not echoed: it lives in
/// `removed_imports`, and must not reappear in the code.
fn removal_comment(statement: &str, ordinal: usize) -> String {
    let segments: Vec<&str> = statement.split('\n').collect();
    let last = segments.len() - 1;
    segments
        .iter()
        .enumerate()
        .map(|(idx, segment)| {
            let cr = if segment.ends_with('\r') { "\r" } else { "" };
            match (idx == 0, idx == last) {
                (true, true) => format!("/* [sanitizer] removed unresolved import #{ordinal} */{cr}"),
                (true, false) => format!("/* [sanitizer] removed unresolved import #{ordinal}{cr}"),
                (false, true) => format!("*/{cr}"),
                (false, false) => cr.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Second pass over the rewritten code. Catches anything the first pass
/// missed: a surviving untrusted prefix anywhere, or an active import that is
/// not one of the mock paths.
pub fn validate(code: &str) -> Result<(), String> {
    let lowered = code.to_lowercase();
    for prefix in rules::UNTRUSTED_PREFIXES {
        if let Some(pos) = lowered.find(prefix) {
            let line = lowered[..pos].matches('\n').count() + 1;
            return Err(format!("untrusted dependency prefix '{}' survived on line {}", prefix, line));
        }
    }

    let lines: Vec<&str> = code.split('\n').collect();
    let (mut i, mut col) = (0, 0);
    while i < lines.len() {
        let Some(pos) = find_import(&lines[i][col..]) else {
            i += 1;
            col = 0;
            continue;
        };
        let statement = statement_at(&lines, i, col + pos);
        let allowed = parse_statement(&statement.text)
            .map(|p| rules::IMPORT_RULES.iter().any(|r| r.mock_path == p.path))
            .unwrap_or(false);
        if !allowed {
            return Err(format!("non-whitelisted import survived on line {}", i + 1));
        }
        i = statement.end_line;
        col = statement.end_col;
    }
    Ok(())
}
