//! Substring heuristics deciding whether an expected failure category
//! actually occurred. Deliberately loose: the compiler under test is free to
//! word its diagnostics however it likes.

pub const PARSER_ERROR: &str = "PARSER_ERROR";
pub const LEXER_ERROR: &str = "LEXER_ERROR";

static PARSER_PATTERNS: [&str; 4] = ["parser error", "parse error", "parsing error", "syntax error"];
static LEXER_PATTERNS: [&str; 4] = ["lexer error", "lex error", "lexical error", "token error"];

fn patterns_for(kind: &str) -> Option<(&'static [&'static str], &'static str)> {
    match kind {
        PARSER_ERROR => Some((&PARSER_PATTERNS, "parser")),
        LEXER_ERROR => Some((&LEXER_PATTERNS, "lexer")),
        _ => None,
    }
}

/// True when `kind` names a known error category. The directive parser's
/// legacy path uses this to tell error literals from expected outputs.
pub fn is_known_kind(kind: &str) -> bool {
    patterns_for(kind).is_some()
}

/// Checks the compiler's combined output for the expected error kind.
/// Matching is case-insensitive. An unknown kind always fails: that is a
/// harness configuration defect, surfaced to the operator.
pub fn validate_error_output(kind: &str, output: &str) -> Result<(), String> {
    let Some((patterns, label)) = patterns_for(kind) else {
        return Err(format!("Unknown expected error kind: {kind}"));
    };
    let haystack = output.to_lowercase();
    if patterns.iter().any(|p| haystack.contains(p)) {
        Ok(())
    } else {
        Err(format!("Expected {label} error but none found in output"))
    }
}
