//! Generated Source Checks
//!
//! Three passes over emitted TSX:
//! - delimiter balance, string and comment aware
//! - exported names that shadow imported ones
//! - a tree-sitter TSX parse with no ERROR or MISSING nodes

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use tree_sitter::{Node, Parser as TsParser};

use crate::types::{HarvestError, Result, SyntaxIssue, SyntaxIssueKind};

/// Parse problems reported before giving up on a file
const MAX_PARSE_ISSUES: usize = 5;

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^\s*import\s+(?:type\s+)?(?:([A-Za-z_$][\w$]*)\s*,?\s*)?(?:\*\s+as\s+([A-Za-z_$][\w$]*)\s*)?(?:\{([^}]*)\})?\s*from\s",
    )
    .unwrap()
});

static EXPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^\s*export\s+(?:default\s+)?(?:async\s+)?(?:function|const|let|var|class|interface|type|enum)\s+([A-Za-z_$][\w$]*)",
    )
    .unwrap()
});

/// Run every check and fail with all issues found
pub fn validate_tsx(component: &str, source: &str) -> Result<()> {
    let issues = check_tsx(source);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(HarvestError::Codegen {
            component: component.to_string(),
            issues,
        })
    }
}

pub fn check_tsx(source: &str) -> Vec<SyntaxIssue> {
    let mut issues = Vec::new();
    issues.extend(check_delimiters(source));
    issues.extend(check_identifier_collisions(source));
    issues.extend(check_parse(source));
    issues
}

// =============================================================================
// Delimiters
// =============================================================================

pub fn check_delimiters(source: &str) -> Option<SyntaxIssue> {
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut in_string: Option<char> = None;
    let mut in_block_comment = false;
    let mut line = 1;

    let mut chars = source.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\n' {
            line += 1;
        }

        if in_block_comment {
            if ch == '*' && chars.peek() == Some(&'/') {
                chars.next();
                in_block_comment = false;
            }
            continue;
        }

        if let Some(quote) = in_string {
            if ch == '\\' {
                chars.next();
            } else if ch == quote {
                in_string = None;
            } else if ch == '\n' && quote != '`' {
                return Some(delimiter_issue(line - 1, format!("unterminated string {}", quote)));
            }
            continue;
        }

        match ch {
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        line += 1;
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                in_block_comment = true;
            }
            '\'' | '"' | '`' => in_string = Some(ch),
            '{' | '(' | '[' => stack.push((ch, line)),
            '}' | ')' | ']' => {
                let expected = match ch {
                    '}' => '{',
                    ')' => '(',
                    _ => '[',
                };
                match stack.pop() {
                    Some((open, _)) if open == expected => {}
                    Some((open, open_line)) => {
                        return Some(delimiter_issue(
                            line,
                            format!("'{}' closes '{}' opened on line {}", ch, open, open_line),
                        ));
                    }
                    None => {
                        return Some(delimiter_issue(line, format!("unmatched '{}'", ch)));
                    }
                }
            }
            _ => {}
        }
    }

    if let Some(quote) = in_string {
        return Some(delimiter_issue(line, format!("unterminated string {}", quote)));
    }
    stack
        .pop()
        .map(|(open, open_line)| delimiter_issue(open_line, format!("unclosed '{}'", open)))
}

fn delimiter_issue(line: usize, message: String) -> SyntaxIssue {
    SyntaxIssue {
        kind: SyntaxIssueKind::UnbalancedDelimiter,
        line,
        message,
    }
}

// =============================================================================
// Identifier Collisions
// =============================================================================

pub fn imported_identifiers(source: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for caps in IMPORT_RE.captures_iter(source) {
        for group in [1, 2] {
            if let Some(m) = caps.get(group) {
                names.insert(m.as_str().to_string());
            }
        }
        if let Some(named) = caps.get(3) {
            for spec in named.as_str().split(',') {
                let spec = spec.trim().trim_start_matches("type ").trim();
                let local = spec.rsplit(" as ").next().unwrap_or(spec).trim();
                if !local.is_empty() {
                    names.insert(local.to_string());
                }
            }
        }
    }
    names
}

pub fn exported_identifiers(source: &str) -> BTreeSet<String> {
    EXPORT_RE
        .captures_iter(source)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

pub fn check_identifier_collisions(source: &str) -> Vec<SyntaxIssue> {
    let imported = imported_identifiers(source);
    exported_identifiers(source)
        .intersection(&imported)
        .map(|name| SyntaxIssue {
            kind: SyntaxIssueKind::IdentifierCollision,
            line: 0,
            message: format!("'{}' is both imported and exported", name),
        })
        .collect()
}

// =============================================================================
// Parser
// =============================================================================

pub fn check_parse(source: &str) -> Vec<SyntaxIssue> {
    let mut parser = TsParser::new();
    if let Err(e) = parser.set_language(&tree_sitter_typescript::LANGUAGE_TSX.into()) {
        return vec![parse_issue(0, format!("TSX grammar unavailable: {}", e))];
    }
    let Some(tree) = parser.parse(source, None) else {
        return vec![parse_issue(0, "TSX parser produced no tree".to_string())];
    };

    let mut issues = Vec::new();
    collect_parse_errors(tree.root_node(), source, &mut issues);
    issues
}

fn collect_parse_errors(node: Node, source: &str, issues: &mut Vec<SyntaxIssue>) {
    if issues.len() >= MAX_PARSE_ISSUES || !node.has_error() {
        return;
    }
    let line = node.start_position().row + 1;

    if node.is_missing() {
        issues.push(parse_issue(line, format!("missing {}", node.kind())));
        return;
    }
    if node.is_error() {
        let text = node.utf8_text(source.as_bytes()).unwrap_or_default();
        let snippet: String = text.chars().take(40).collect();
        issues.push(parse_issue(line, format!("unexpected `{}`", snippet.trim())));
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_parse_errors(child, source, issues);
    }
}

fn parse_issue(line: usize, message: String) -> SyntaxIssue {
    SyntaxIssue {
        kind: SyntaxIssueKind::ParseError,
        line,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"import React from 'react';

export interface UiTagProps extends React.HTMLAttributes<HTMLSpanElement> {
  variant?: 'default' | 'success';
}

// a comment with an apostrophe: it's fine {
export function UiTag({ variant = 'default', style, children, ...rest }: UiTagProps) {
  const label = `tag-${variant}`;
  return (
    <span data-variant={label} style={{ ...style }} {...rest}>
      {children}
    </span>
  );
}

export default UiTag;
"#;

    #[test]
    fn test_valid_source_passes() {
        assert!(check_tsx(VALID).is_empty(), "{:?}", check_tsx(VALID));
        assert!(validate_tsx("tag", VALID).is_ok());
    }

    #[test]
    fn test_missing_destructuring_brace() {
        let broken = VALID.replace("UiTag({ variant", "UiTag( variant");
        let issue = check_delimiters(&broken).unwrap();
        assert_eq!(issue.kind, SyntaxIssueKind::UnbalancedDelimiter);
        assert_eq!(issue.line, 8);

        let err = validate_tsx("tag", &broken).unwrap_err();
        assert!(matches!(err, HarvestError::Codegen { ref component, .. } if component == "tag"));
    }

    #[test]
    fn test_unclosed_delimiter_reports_open_line() {
        let issue = check_delimiters("const a = {\n  b: [1, 2],\n").unwrap();
        assert_eq!(issue.line, 1);
        assert_eq!(issue.message, "unclosed '{'");
    }

    #[test]
    fn test_delimiters_inside_strings_ignored() {
        assert!(check_delimiters("const s = '{('; const t = \"]\";\n/* ) */").is_none());
        assert!(check_delimiters("const s = 'it\\'s';").is_none());
    }

    #[test]
    fn test_identifier_collision() {
        let source = "import React from 'react';\nimport { Button as Btn, type Props } from './x';\nexport function Btn() { return null; }\nexport default React;\n";
        let imported = imported_identifiers(source);
        assert!(imported.contains("React"));
        assert!(imported.contains("Btn"));
        assert!(imported.contains("Props"));
        assert!(!imported.contains("Button"));

        let issues = check_identifier_collisions(source);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "'Btn' is both imported and exported");
    }

    #[test]
    fn test_parser_flags_invalid_expression() {
        let issues = check_parse("const value = ;\n");
        assert!(!issues.is_empty());
        assert!(issues.iter().all(|i| i.kind == SyntaxIssueKind::ParseError));
        assert!(check_parse(VALID).is_empty());
    }
}
