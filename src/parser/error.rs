use thiserror::Error;

use crate::lexer::Token;

/// Grammar violations. Parsing stops at the first one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Expected {expected}, got {found} at line {line}, column {column}")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
        column: usize,
    },
    #[error("Invalid assignment target at line {line}, column {column}")]
    InvalidAssignmentTarget { line: usize, column: usize },
}

impl ParseError {
    pub(super) fn unexpected(expected: impl Into<String>, found: &Token<'_>) -> Self {
        Self::UnexpectedToken {
            expected: expected.into(),
            found: found.describe(),
            line: found.span.line,
            column: found.span.column,
        }
    }
}
