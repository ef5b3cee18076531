use crate::{AccessLevel, ElementReference};

/// One rule line after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRule {
    pub element: ElementReference,
    pub level: AccessLevel,
    /// 1-based line number within its source.
    pub line: usize,
}

/// The result of parsing one rule source.
#[derive(Debug, Clone)]
pub struct ParsedRules {
    pub source: String,
    pub rules: Vec<ParsedRule>,
}
