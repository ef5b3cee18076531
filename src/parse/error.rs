use std::fmt;

/// A malformed rule line.
///
/// Carries the name of the rule source, the 1-based line number and the
/// offending text so the broken line can be found in its file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    source_name: String,
    line: usize,
    text: String,
    message: String,
}

impl ParseError {
    pub(crate) fn new(
        source_name: impl Into<String>,
        line: usize,
        text: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            line,
            text: text.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parse error in {} at line {}: {} (`{}`)",
            self.source_name, self.line, self.message, self.text
        )
    }
}

impl std::error::Error for ParseError {}
