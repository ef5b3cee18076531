mod error;
mod grammar;
mod parser;

pub use error::ParseError;
pub use parser::{ParsedRule, ParsedRules};

use winnow::Parser;

use crate::AccessLevel;

/// Parse the full text of one rule source.
///
/// Blank lines and lines starting with `#` are skipped. `source` only names
/// the input in error messages.
///
/// # Errors
///
/// Returns [`ParseError`] for the first malformed line.
pub fn parse(source: &str, input: &str) -> Result<ParsedRules, ParseError> {
    let mut rules = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (level, element) = grammar::rule_line
            .parse(line)
            .map_err(|e| ParseError::new(source, idx + 1, line, describe(&e.inner().to_string())))?;
        rules.push(ParsedRule {
            element,
            level,
            line: idx + 1,
        });
    }
    Ok(ParsedRules {
        source: source.to_owned(),
        rules,
    })
}

pub(crate) fn parse_access_level(token: &str) -> Result<AccessLevel, ParseError> {
    let token = token.trim();
    grammar::access_token
        .parse(token)
        .map_err(|e| ParseError::new("<token>", 1, token, describe(&e.inner().to_string())))
}

fn describe(message: &str) -> String {
    let message = message.trim();
    if message.is_empty() {
        "malformed rule".to_owned()
    } else {
        message.replace('\n', "; ")
    }
}
