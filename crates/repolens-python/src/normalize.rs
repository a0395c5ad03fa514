use crate::lexer::{TokenKind, TokenRecord};

/// The normalizer's only state: the kinds of the last three tokens,
/// most-recent-first. Reset at every file start, seeded with `Indent` so a
/// module docstring as the very first token is dropped.
type Lookback = [Option<TokenKind>; 3];

const INITIAL_LOOKBACK: Lookback = [Some(TokenKind::Indent), None, None];

/// Fold a classified token stream into comment/docstring-free lines.
///
/// Drop rules, applied per token:
/// - a string whose previous token is `Indent` (a standalone documentation
///   string);
/// - every comment;
/// - a string whose previous three kinds are `(Newline, Newline, Comment)`
///   most-recent-first (an encoding-declaration header string).
///
/// Dropped tokens still enter the lookback window. Each `Newline` flushes
/// one output line (possibly empty); kept texts are joined by single spaces
/// and prefixed with the leading whitespace of the first kept token's
/// physical line, so indentation survives for the nesting estimator.
pub fn normalize_tokens(tokens: &[TokenRecord]) -> Vec<String> {
    let mut lookback = INITIAL_LOOKBACK;
    let mut lines = Vec::new();
    let mut kept: Vec<&str> = Vec::new();
    let mut indent = "";

    for tok in tokens {
        match tok.kind {
            TokenKind::Newline => {
                lines.push(render_line(indent, &kept));
                kept.clear();
                indent = "";
            }
            // Indentation is restored from the line text, not the token.
            TokenKind::Indent => {}
            TokenKind::Comment => {}
            TokenKind::Str if dropped_string(&lookback) => {}
            _ => {
                if kept.is_empty() {
                    indent = leading_whitespace(&tok.line);
                }
                kept.push(&tok.text);
            }
        }
        lookback = [Some(tok.kind), lookback[0], lookback[1]];
    }

    if !kept.is_empty() {
        lines.push(render_line(indent, &kept));
    }
    lines
}

fn dropped_string(lookback: &Lookback) -> bool {
    // Docstring: string directly after an indentation increase.
    if lookback[0] == Some(TokenKind::Indent) {
        return true;
    }
    // Encoding-declaration idiom: header string after a comment preamble
    // and two line breaks.
    lookback[0] == Some(TokenKind::Newline)
        && lookback[1] == Some(TokenKind::Newline)
        && lookback[2] == Some(TokenKind::Comment)
}

fn render_line(indent: &str, kept: &[&str]) -> String {
    if kept.is_empty() {
        return String::new();
    }
    format!("{indent}{}", kept.join(" "))
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}
