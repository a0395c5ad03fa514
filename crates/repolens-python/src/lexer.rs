use std::path::Path;

use anyhow::{Context, Result};
use tree_sitter::{Language, Node, Parser, Point};

use repolens_core::error::Error;

/// Lexical class of a token, the only part of a token the normalizer's
/// drop rules inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Str,
    Comment,
    Newline,
    Indent,
    Other,
}

/// Position in a source file, 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

/// One classified token. Produced transiently during normalization; `line`
/// is the full text of the physical line the token starts on, which the
/// normalizer uses to restore indentation.
#[derive(Debug, Clone)]
pub struct TokenRecord {
    pub kind: TokenKind,
    pub text: String,
    pub start: Position,
    pub end: Position,
    pub line: String,
}

/// Classify one file's character stream into a token sequence in source
/// order.
///
/// The tree-sitter CST is flattened to its leaf tokens, with `string` and
/// `comment` nodes kept atomic. `Newline` tokens are synthesized from row
/// gaps between consecutive tokens (one per physical line break, blank
/// lines included); an `Indent` token is synthesized when a line whose
/// first token is not a comment starts at a strictly greater
/// leading-whitespace width than the previous such line.
///
/// A parse tree containing an error or missing node fails whole with
/// `Error::MalformedSource`; no repair is attempted.
pub fn classify_tokens(
    language: &Language,
    path: &Path,
    content: &str,
) -> Result<Vec<TokenRecord>> {
    let mut parser = Parser::new();
    parser
        .set_language(language)
        .context("failed to set Python language")?;
    let tree = parser
        .parse(content, None)
        .context("failed to parse Python file")?;
    let root = tree.root_node();

    if root.has_error() {
        let point = first_error(root).unwrap_or_else(|| root.start_position());
        return Err(Error::MalformedSource {
            path: path.to_path_buf(),
            line: point.row + 1,
            column: point.column + 1,
        }
        .into());
    }

    let src_lines: Vec<&str> = content.lines().collect();
    let mut tokens = Vec::new();
    let mut last_row = 0usize;
    let mut last_indent = 0usize;
    let mut seen_any = false;

    let mut cursor = root.walk();
    'walk: loop {
        let node = cursor.node();
        if !is_atomic(&node) && cursor.goto_first_child() {
            continue;
        }

        if node.id() != root.id() {
            let start = node.start_position();
            let end = node.end_position();
            let row = start.row;
            let kind = match node.kind() {
                "comment" => TokenKind::Comment,
                "string" => TokenKind::Str,
                _ => TokenKind::Other,
            };
            let line_text = src_lines.get(row).copied().unwrap_or("");

            if !seen_any || row > last_row {
                let from_row = if seen_any { last_row } else { 0 };
                for nl_row in from_row..row {
                    let nl_line = src_lines.get(nl_row).copied().unwrap_or("");
                    tokens.push(TokenRecord {
                        kind: TokenKind::Newline,
                        text: "\n".to_string(),
                        start: Position {
                            row: nl_row,
                            column: nl_line.len(),
                        },
                        end: Position {
                            row: nl_row + 1,
                            column: 0,
                        },
                        line: nl_line.to_string(),
                    });
                }

                // Comment-only lines never open an indentation level, so a
                // docstring after an inline comment is still preceded by
                // the Indent of its own line.
                if kind != TokenKind::Comment {
                    let indent = line_text.len() - line_text.trim_start().len();
                    if indent > last_indent {
                        tokens.push(TokenRecord {
                            kind: TokenKind::Indent,
                            text: line_text[..indent].to_string(),
                            start: Position { row, column: 0 },
                            end: Position {
                                row,
                                column: indent,
                            },
                            line: line_text.to_string(),
                        });
                    }
                    last_indent = indent;
                }
            }

            tokens.push(TokenRecord {
                kind,
                text: content[node.byte_range()].to_string(),
                start: Position {
                    row,
                    column: start.column,
                },
                end: Position {
                    row: end.row,
                    column: end.column,
                },
                line: line_text.to_string(),
            });
            last_row = end.row;
            seen_any = true;
        }

        loop {
            if cursor.goto_next_sibling() {
                continue 'walk;
            }
            if !cursor.goto_parent() {
                break 'walk;
            }
        }
    }

    Ok(tokens)
}

/// Strings and comments are classified whole, not descended into.
fn is_atomic(node: &Node) -> bool {
    node.child_count() == 0 || matches!(node.kind(), "string" | "comment")
}

fn first_error(node: Node) -> Option<Point> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position());
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(point) = first_error(child) {
            return Some(point);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn python() -> Language {
        tree_sitter_python::LANGUAGE.into()
    }

    fn classify(content: &str) -> Vec<TokenRecord> {
        classify_tokens(&python(), Path::new("test.py"), content).unwrap()
    }

    #[test]
    fn test_simple_assignment_tokens() {
        let tokens = classify("x = 1\n");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["x", "=", "1"]);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Other));
    }

    #[test]
    fn test_comment_and_string_kinds() {
        let tokens = classify("# note\nx = \"hi\"\n");
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].text, "# note");
        let string = tokens.iter().find(|t| t.kind == TokenKind::Str).unwrap();
        assert_eq!(string.text, "\"hi\"");
    }

    #[test]
    fn test_newlines_synthesized_per_physical_line() {
        let tokens = classify("x = 1\n\ny = 2\n");
        let newlines = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Newline)
            .count();
        // One for the end of line 0, one for the blank line.
        assert_eq!(newlines, 2);
    }

    #[test]
    fn test_docstring_preceded_by_indent() {
        let tokens = classify("def f():\n    \"\"\"doc\"\"\"\n    return 1\n");
        let string_idx = tokens
            .iter()
            .position(|t| t.kind == TokenKind::Str)
            .unwrap();
        assert_eq!(tokens[string_idx - 1].kind, TokenKind::Indent);
        assert_eq!(tokens[string_idx - 1].text, "    ");
    }

    #[test]
    fn test_no_indent_token_at_same_level() {
        let tokens = classify("x = 1\ny = 2\n");
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Indent));
    }

    #[test]
    fn test_token_records_carry_line_text() {
        let tokens = classify("def f():\n    return 1\n");
        let ret = tokens.iter().find(|t| t.text == "return").unwrap();
        assert_eq!(ret.line, "    return 1");
        assert_eq!(ret.start.row, 1);
    }

    #[test]
    fn test_malformed_source_is_rejected_with_position() {
        let err = classify_tokens(&python(), Path::new("bad.py"), "def def def(((\n")
            .unwrap_err();
        let err = err.downcast_ref::<Error>().expect("core error");
        assert!(matches!(err, Error::MalformedSource { .. }));
    }

    #[test]
    fn test_empty_file_yields_no_tokens() {
        assert!(classify("").is_empty());
    }
}
