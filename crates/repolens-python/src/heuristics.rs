//! Single-line filters and extractors over normalized Python lines.
//!
//! These are best-effort pattern matchers, not parsers. Known limitations
//! are kept as-is: aliased imports (`import x as y`) return the alias text
//! verbatim, and variable extraction is line-local, not flow-aware.

use repolens_core::types::Extraction;

/// True iff the line looks like a function definition: the `def` marker
/// plus an open and a close parenthesis. Nesting and balance are not
/// validated.
pub fn is_function(line: &str) -> bool {
    line.contains("def ") && line.contains('(') && line.contains(')')
}

/// True iff the line introduces a `for` loop. Matched as a whole token so
/// identifiers merely containing "for" do not count.
pub fn is_loop(line: &str) -> bool {
    line.split_whitespace().any(|tok| tok == "for")
}

/// True iff the line's first token is `import` or `from`.
pub fn is_import(line: &str) -> bool {
    matches!(line.split_whitespace().next(), Some("import") | Some("from"))
}

/// Package names imported by the line.
///
/// Dotted import: the first dotted segment of the second token. `from`
/// import: the named module. Comma-joined import: each name with commas
/// trimmed. Otherwise: the second token. A line without a second token is
/// `Ambiguous`.
pub fn extract_packages(line: &str) -> Extraction {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(second) = tokens.get(1) else {
        return Extraction::Ambiguous;
    };

    if line.contains('.') {
        let root = second.split('.').next().unwrap_or(second);
        Extraction::Names(vec![root.to_string()])
    } else if line.contains("from") {
        Extraction::Names(vec![second.to_string()])
    } else if line.contains(',') {
        let names = tokens[1..]
            .iter()
            .map(|tok| tok.trim_matches(','))
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        Extraction::Names(names)
    } else {
        Extraction::Names(vec![second.to_string()])
    }
}

/// Parameter names of a function-definition line: the text after the open
/// parenthesis with `)` and `:` removed, comma-split and trimmed, empties
/// and the `self` receiver excluded. A signature without a parenthesis is
/// `Ambiguous`, never an error.
pub fn extract_parameters(line: &str) -> Extraction {
    let Some((_, rest)) = line.split_once('(') else {
        return Extraction::Ambiguous;
    };
    let cleaned: String = rest.chars().filter(|c| *c != ')' && *c != ':').collect();
    let names = cleaned
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty() && *p != "self")
        .map(str::to_string)
        .collect();
    Extraction::Names(names)
}

/// Names assigned on the line.
///
/// A line with both a comma and `=` is treated as a comma-separated
/// destructuring target on the left-hand side. Otherwise every token
/// immediately followed by a bare `=` is collected, repeats included.
pub fn extract_variables(line: &str) -> Extraction {
    if line.contains(',') && line.contains('=') {
        let Some((lhs, _)) = line.split_once('=') else {
            return Extraction::Ambiguous;
        };
        let names = lhs
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        return Extraction::Names(names);
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let mut names = Vec::new();
    for pair in tokens.windows(2) {
        if pair[1] == "=" && pair[0] != "=" {
            names.push(pair[0].to_string());
        }
    }
    Extraction::Names(names)
}
