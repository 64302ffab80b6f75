use thiserror::Error;

use crate::builtins::BuiltinError;

/// Typed errors produced by the tree-walking interpreter backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String },
    #[error("Undefined function '{name}'")]
    UndefinedFunction { name: String },
    #[error("Can only call functions identified by name, got {kind}")]
    InvalidCallee { kind: &'static str },
    #[error("Function '{name}' expected {expected} arguments, got {found}")]
    BuiltinArityMismatch {
        name: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Invalid argument type for '{name}': argument {position} expected string, got number")]
    BuiltinArgumentType { name: &'static str, position: usize },
    #[error(transparent)]
    Builtin(#[from] BuiltinError),
    #[error("Unknown statement type: {kind}")]
    UnknownStatement { kind: &'static str },
    #[error("Unknown expression type: {kind}")]
    UnknownExpression { kind: &'static str },
    #[error("Return outside of function")]
    ReturnOutsideFunction,
    #[error("Failed to write program output: {reason}")]
    Output { reason: String },
}
